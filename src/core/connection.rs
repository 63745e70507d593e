use crate::domain::model::ConnectionSignal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionSpeed {
    Slow,
    Medium,
    Fast,
    Unknown,
}

impl ConnectionSpeed {
    pub const ALL: [ConnectionSpeed; 4] = [
        ConnectionSpeed::Slow,
        ConnectionSpeed::Medium,
        ConnectionSpeed::Fast,
        ConnectionSpeed::Unknown,
    ];

    /// Key used by the `connectionSpeed` rule section.
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionSpeed::Slow => "slow",
            ConnectionSpeed::Medium => "medium",
            ConnectionSpeed::Fast => "fast",
            ConnectionSpeed::Unknown => "unknown",
        }
    }

    /// 標籤區分大小寫
    pub fn from_link_label(label: &str) -> Self {
        match label {
            "slow-2g" | "2g" => ConnectionSpeed::Slow,
            "3g" => ConnectionSpeed::Medium,
            "4g" | "bluetooth" | "cellular" | "ethernet" | "wifi" | "wimax" => ConnectionSpeed::Fast,
            _ => ConnectionSpeed::Unknown,
        }
    }
}

impl fmt::Display for ConnectionSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_connection(signal: Option<&ConnectionSignal>) -> ConnectionSpeed {
    signal
        .and_then(ConnectionSignal::label)
        .map(ConnectionSpeed::from_link_label)
        .unwrap_or(ConnectionSpeed::Unknown)
}
