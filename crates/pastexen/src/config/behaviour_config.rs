use crate::config::{default_copy_link, default_open_link};

use serde::{Deserialize, Serialize};

/// What happens with a link once an upload completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Copy the link to the clipboard.
    #[serde(default = "default_copy_link")]
    pub copy_link: bool,
    /// Open the link in the default browser.
    #[serde(default = "default_open_link")]
    pub open_link: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            copy_link: default_copy_link(),
            open_link: default_open_link(),
        }
    }
}
