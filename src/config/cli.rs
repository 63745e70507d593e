use crate::domain::model::{ConnectionSignal, Placement, Signals};
use crate::utils::error::{Result, TimeoutError};
use crate::utils::validation::{validate_input_file, Validate};
use clap::Parser;
use serde_json::json;

#[derive(Debug, Clone, Parser)]
#[command(name = "bid-timeout")]
#[command(about = "Compute the timeout modifier for an auction from a rule table")]
pub struct CliConfig {
    /// Rule table file (.json or .toml)
    #[arg(long)]
    pub rules: String,

    /// JSON array of placements
    #[arg(long)]
    pub placements: Option<String>,

    /// Number of placements to simulate when no placements file is given
    #[arg(long, default_value = "1")]
    pub ad_units: usize,

    /// Simulated placements include video
    #[arg(long)]
    pub video: bool,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// Network link type, e.g. wifi or 4g
    #[arg(long)]
    pub connection_type: Option<String>,

    /// Effective connection type, used when no link type is given
    #[arg(long)]
    pub effective_type: Option<String>,

    /// Base timeout in milliseconds
    #[arg(long, default_value = "1000")]
    pub base_timeout: u64,

    #[arg(long, help = "Reject malformed or overlapping rules before evaluating")]
    pub strict: bool,

    #[arg(long, help = "Print the breakdown as JSON")]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn signals(&self) -> Signals {
        let connection = if self.connection_type.is_some() || self.effective_type.is_some() {
            Some(ConnectionSignal {
                link_type: self.connection_type.clone(),
                effective_type: self.effective_type.clone(),
            })
        } else {
            None
        };

        Signals::new(self.user_agent.clone(), connection)
    }

    /// 讀取版位檔案，未指定時依 `--ad-units` 產生
    pub fn load_placements(&self) -> Result<Vec<Placement>> {
        if let Some(path) = &self.placements {
            let content = std::fs::read_to_string(path)?;
            let placements: Vec<Placement> = serde_json::from_str(&content)?;
            tracing::debug!("Loaded {} placements from {}", placements.len(), path);
            return Ok(placements);
        }

        Ok((0..self.ad_units)
            .map(|index| {
                let placement = Placement::new(format!("ad-unit-{}", index + 1));
                if self.video && index == 0 {
                    placement.with_media_type("video", json!({}))
                } else {
                    placement.with_media_type("banner", json!({}))
                }
            })
            .collect())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_input_file("rules", &self.rules, &["json", "toml"])?;
        if let Some(path) = &self.placements {
            validate_input_file("placements", path, &["json"])?;
        } else if self.video && self.ad_units == 0 {
            return Err(TimeoutError::InvalidConfigValueError {
                field: "video".to_string(),
                reason: "--video needs at least one simulated ad unit".to_string(),
            });
        }
        Ok(())
    }
}
