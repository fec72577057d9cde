//! Release channels and where each keeps its data

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::UserContext;

/// Name of the folder inside a profile root that holds the profiles
pub const USER_DATA_DIR: &str = "User Data";

const PROFILE_VENDOR_DIR: &str = "Microsoft";
const PROFILE_BASE_NAME: &str = "Edge";
const REGISTRY_ROOT: &str = r"HKCU\Software\Microsoft";
const REGISTRY_LEAF: &str = "PreferenceMACs";

/// A release track of the browser
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Stable,
    Beta,
    Dev,
    Canary,
}

impl Channel {
    /// Every channel, in release order
    pub const ALL: [Channel; 4] = [Channel::Stable, Channel::Beta, Channel::Dev, Channel::Canary];

    /// Suffix used in folder, key and file names; empty for Stable
    pub fn tag(self) -> &'static str {
        match self {
            Channel::Stable => "",
            Channel::Beta => "Beta",
            Channel::Dev => "Dev",
            Channel::Canary => "Canary",
        }
    }

    /// `Edge` for Stable, `Edge Beta` and friends otherwise
    fn product_name(self) -> String {
        match self {
            Channel::Stable => PROFILE_BASE_NAME.to_string(),
            other => format!("{} {}", PROFILE_BASE_NAME, other.tag()),
        }
    }

    /// Map this channel to its profile folder and registry key
    pub fn resolve(self, context: &UserContext) -> ChannelLocation {
        let product = self.product_name();
        ChannelLocation {
            channel: self,
            profile_path: context
                .local_app_data
                .join(PROFILE_VENDOR_DIR)
                .join(&product),
            registry_key: format!(r"{}\{}\{}", REGISTRY_ROOT, product, REGISTRY_LEAF),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stable => write!(f, "Stable"),
            Channel::Beta => write!(f, "Beta"),
            Channel::Dev => write!(f, "Dev"),
            Channel::Canary => write!(f, "Canary"),
        }
    }
}

/// Where a channel keeps its profile data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLocation {
    pub channel: Channel,
    /// Profile root, e.g. `%LOCALAPPDATA%\Microsoft\Edge`
    pub profile_path: PathBuf,
    /// Registry subtree exported alongside the profile
    pub registry_key: String,
}

impl ChannelLocation {
    /// The `User Data` folder inside the profile root
    pub fn user_data_path(&self) -> PathBuf {
        self.profile_path.join(USER_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn ctx() -> UserContext {
        UserContext::new("/local", "alice", "/backups")
    }

    #[test]
    fn test_stable_uses_base_paths() {
        let loc = Channel::Stable.resolve(&ctx());
        assert_eq!(loc.profile_path, Path::new("/local/Microsoft/Edge"));
        assert_eq!(loc.registry_key, r"HKCU\Software\Microsoft\Edge\PreferenceMACs");
        assert_eq!(loc.user_data_path(), Path::new("/local/Microsoft/Edge/User Data"));
    }

    #[test]
    fn test_other_channels_are_suffixed() {
        for channel in [Channel::Beta, Channel::Dev, Channel::Canary] {
            let loc = channel.resolve(&ctx());
            let product = format!("Edge {}", channel.tag());
            assert_eq!(loc.profile_path, Path::new("/local/Microsoft").join(&product));
            assert_eq!(
                loc.registry_key,
                format!(r"HKCU\Software\Microsoft\{}\PreferenceMACs", product)
            );
        }
    }

    #[test]
    fn test_resolve_is_independent_of_call_order() {
        let context = ctx();
        let forward: Vec<_> = Channel::ALL.iter().map(|c| c.resolve(&context)).collect();
        let backward: Vec<_> = Channel::ALL.iter().rev().map(|c| c.resolve(&context)).collect();
        for (a, b) in forward.iter().zip(backward.iter().rev()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Channel::Canary.to_string(), "Canary");
        assert_eq!(serde_json::to_string(&Channel::Dev).unwrap(), "\"dev\"");
    }
}
