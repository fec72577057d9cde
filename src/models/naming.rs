//! Artifact file names and timestamp formats
//!
//! Backups are written as a pair:
//!
//! - `Edge<Channel>-ProfilesRegistry[-<ddMMMMyyyy>]-<user>.reg`
//! - `Edge<Channel>-UserData[-<ddMMMMyyyy>]-<user>.zip`
//!
//! The Stable channel carries no channel tag, so a dateless Stable backup for
//! `alice` is `Edge-ProfilesRegistry-alice.reg` + `Edge-UserData-alice.zip`.

use chrono::{DateTime, TimeZone};

use super::channel::Channel;

/// Extension of archive files, without the dot
pub const ARCHIVE_EXTENSION: &str = "zip";
/// Extension of registry export files, without the dot
pub const REGISTRY_EXTENSION: &str = "reg";

/// Date stamp embedded in artifact names, e.g. `30July2021`
pub fn date_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%d%B%Y").to_string()
}

/// Suffix appended to a renamed `User Data` folder, e.g. `30July2021-143022`
pub fn rename_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%d%B%Y-%H%M%S").to_string()
}

fn artifact_name(
    channel: Channel,
    kind: &str,
    stamp: Option<&str>,
    username: &str,
    extension: &str,
) -> String {
    let stamp = stamp.map(|s| format!("-{}", s)).unwrap_or_default();
    format!(
        "Edge{}-{}{}-{}.{}",
        channel.tag(),
        kind,
        stamp,
        username,
        extension
    )
}

/// File name of a registry export
pub fn registry_file_name(channel: Channel, stamp: Option<&str>, username: &str) -> String {
    artifact_name(channel, "ProfilesRegistry", stamp, username, REGISTRY_EXTENSION)
}

/// File name of a profile archive
pub fn archive_file_name(channel: Channel, stamp: Option<&str>, username: &str) -> String {
    artifact_name(channel, "UserData", stamp, username, ARCHIVE_EXTENSION)
}
