use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeoutError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid section '{section}': {reason}")]
    InvalidSection { section: String, reason: String },

    #[error("Invalid key '{key}' in section '{section}': {reason}")]
    InvalidRuleKey {
        section: String,
        key: String,
        reason: String,
    },

    #[error("Invalid modifier for '{section}.{key}': {value} is not an integer")]
    InvalidModifierValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("Overlapping keys in numAdUnits: '{first}' and '{second}'")]
    OverlappingRange { first: String, second: String },

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidConfigValueError { field: String, reason: String },
}

impl TimeoutError {
    /// 給使用者的修正建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TimeoutError::IoError(_) => "Check that the file exists and is readable",
            TimeoutError::JsonError(_) => "Check the JSON syntax of the rule table or placements file",
            TimeoutError::TomlError(_) => "Check the TOML syntax of the rule table",
            TimeoutError::InvalidSection { .. } => {
                "Rule sections (includesVideo, connectionSpeed, deviceType, numAdUnits) must be tables"
            }
            TimeoutError::InvalidRuleKey { .. } => "Remove or rename the key so it matches the section's vocabulary",
            TimeoutError::InvalidModifierValue { .. } => "Modifiers must be whole numbers of milliseconds",
            TimeoutError::OverlappingRange { .. } => {
                "Make numAdUnits ranges disjoint; only the first matching key is applied"
            }
            TimeoutError::InvalidConfigValueError { .. } => "Check the command line arguments",
        }
    }
}

pub type Result<T> = std::result::Result<T, TimeoutError>;
