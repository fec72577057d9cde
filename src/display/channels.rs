//! Channel location table

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::UserContext;
use crate::models::Channel;

#[derive(Tabled)]
struct ChannelRow {
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Profile folder")]
    profile: String,
    #[tabled(rename = "Registry key")]
    registry_key: String,
    #[tabled(rename = "Present")]
    present: &'static str,
}

/// Format every channel's resolved locations as a table
pub fn format_channel_table(context: &UserContext) -> String {
    let rows: Vec<ChannelRow> = Channel::ALL
        .iter()
        .map(|channel| {
            let location = channel.resolve(context);
            ChannelRow {
                channel: channel.to_string(),
                profile: location.profile_path.display().to_string(),
                registry_key: location.registry_key,
                present: if location.profile_path.is_dir() { "yes" } else { "no" },
            }
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}
