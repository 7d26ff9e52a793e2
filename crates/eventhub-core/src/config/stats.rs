//! Hit recording and view aggregation configuration.

use serde::{Deserialize, Serialize};

/// Settings for the hit recorder and popularity enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Application name stamped on hits this service records about itself.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// URI prefix under which event pages are viewed (`{prefix}/{id}`).
    #[serde(default = "default_event_uri_prefix")]
    pub event_uri_prefix: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            event_uri_prefix: default_event_uri_prefix(),
        }
    }
}

fn default_app_name() -> String {
    "eventhub-main".to_string()
}

fn default_event_uri_prefix() -> String {
    "/events".to_string()
}
