use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// OpenRTB 裝置類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Code 1. Part of the taxonomy, never inferred from a user agent.
    Phone,
    Pc,
    ConnectedTv,
    Mobile,
    Tablet,
    Unknown,
}

impl DeviceClass {
    pub fn code(self) -> Option<u8> {
        match self {
            DeviceClass::Phone => Some(1),
            DeviceClass::Pc => Some(2),
            DeviceClass::ConnectedTv => Some(3),
            DeviceClass::Mobile => Some(4),
            DeviceClass::Tablet => Some(5),
            DeviceClass::Unknown => None,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(DeviceClass::Phone),
            2 => Some(DeviceClass::Pc),
            3 => Some(DeviceClass::ConnectedTv),
            4 => Some(DeviceClass::Mobile),
            5 => Some(DeviceClass::Tablet),
            _ => None,
        }
    }

    /// Key used by the `deviceType` rule section.
    pub fn rule_key(self) -> Option<String> {
        self.code().map(|code| code.to_string())
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceClass::Phone => "phone",
            DeviceClass::Pc => "pc",
            DeviceClass::ConnectedTv => "connected_tv",
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// 依優先順序比對：tablet > mobile > connected TV > desktop
pub const DEVICE_PATTERNS: &[(DeviceClass, &str)] = &[
    (
        DeviceClass::Tablet,
        r"ipad|tablet|kindle|silk/|playbook|xoom|sch-i800|android 3\.0|nexus (7|9|10)\b|sm-t\d",
    ),
    (
        DeviceClass::Mobile,
        r"iphone|ipod|android|blackberry|bb10|windows (ce|phone)|iemobile|opera mini|mobi|palm|smartphone",
    ),
    (
        DeviceClass::ConnectedTv,
        r"smart-?tv|googletv|apple ?tv|hbbtv|netcast|roku|crkey|bravia|tizen.*tv|web0?os|viera|\baft[a-z]{1,2}\b|philipstv",
    ),
    (
        DeviceClass::Pc,
        r"windows nt|macintosh|mac os x|x11|linux x86_64|\bcros\b|ubuntu|fedora",
    ),
];

static DEVICE_MATCHERS: LazyLock<Vec<(DeviceClass, Regex)>> = LazyLock::new(|| {
    DEVICE_PATTERNS
        .iter()
        .filter_map(|(class, pattern)| {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => Some((*class, regex)),
                Err(e) => {
                    tracing::warn!("Skipping {} device pattern: {}", class, e);
                    None
                }
            }
        })
        .collect()
});

pub fn classify_device(user_agent: Option<&str>) -> DeviceClass {
    let Some(user_agent) = user_agent else {
        return DeviceClass::Unknown;
    };

    DEVICE_MATCHERS
        .iter()
        .find(|(_, regex)| regex.is_match(user_agent))
        .map(|(class, _)| *class)
        .unwrap_or(DeviceClass::Unknown)
}
