use crate::core::connection::ConnectionSpeed;
use crate::core::device::DeviceClass;
use crate::core::range::CountKey;
use crate::utils::error::{Result, TimeoutError};
use crate::utils::validation::{
    validate_allowed_key, validate_modifier_value, validate_section_shape, value_kind, Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const INCLUDES_VIDEO: &str = "includesVideo";
pub const CONNECTION_SPEED: &str = "connectionSpeed";
pub const DEVICE_TYPE: &str = "deviceType";
pub const NUM_AD_UNITS: &str = "numAdUnits";

/// Caller-supplied rules mapping classification outcomes to modifiers.
///
/// The document is kept as loaded. Sections are read on demand and a
/// section of the wrong shape reads as absent, so a table never fails to
/// evaluate. [`Validate::validate`] reports those problems instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable(Value);

impl RuleTable {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// 從 JSON 字串解析規則表
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Ok(Self(value))
    }

    /// 從 TOML 字串解析規則表
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let value: Value = toml::from_str(content)?;
        Ok(Self(value))
    }

    /// 從檔案載入，副檔名 `.toml` 使用 TOML，其餘使用 JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let table = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        tracing::debug!(
            "Loaded rule table from {} ({} sections)",
            path.display(),
            table.section_names().len()
        );
        Ok(table)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Whether the document itself is an object. Anything else evaluates to 0.
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// Raw value of a section, whatever its shape.
    pub fn raw_section(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|root| root.get(name))
    }

    /// A section that is present and is a table.
    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.raw_section(name).and_then(Value::as_object)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.0
            .as_object()
            .map(|root| root.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn validate_keyed_section(&self, section: &str, allowed: &[&str]) -> Result<()> {
        let Some(table) = validate_section_shape(section, self.raw_section(section))? else {
            return Ok(());
        };

        for (key, value) in table {
            validate_allowed_key(section, key, allowed)?;
            validate_modifier_value(section, key, value)?;
        }
        Ok(())
    }

    fn validate_device_section(&self) -> Result<()> {
        let Some(table) = validate_section_shape(DEVICE_TYPE, self.raw_section(DEVICE_TYPE))? else {
            return Ok(());
        };

        for (key, value) in table {
            let known = key
                .parse::<u8>()
                .ok()
                .and_then(DeviceClass::from_code)
                .filter(|class| class.rule_key().as_deref() == Some(key.as_str()));
            if known.is_none() {
                return Err(TimeoutError::InvalidRuleKey {
                    section: DEVICE_TYPE.to_string(),
                    key: key.clone(),
                    reason: "Device type must be a code between 1 and 5".to_string(),
                });
            }
            validate_modifier_value(DEVICE_TYPE, key, value)?;
        }
        Ok(())
    }

    fn validate_count_section(&self) -> Result<()> {
        let Some(table) = validate_section_shape(NUM_AD_UNITS, self.raw_section(NUM_AD_UNITS))? else {
            return Ok(());
        };

        let mut seen: Vec<(&str, CountKey)> = Vec::with_capacity(table.len());
        for (key, value) in table {
            let count_key = CountKey::parse(key).ok_or_else(|| TimeoutError::InvalidRuleKey {
                section: NUM_AD_UNITS.to_string(),
                key: key.clone(),
                reason: "Expected a count like \"2\" or an inclusive range like \"4-5\"".to_string(),
            })?;
            validate_modifier_value(NUM_AD_UNITS, key, value)?;

            if let Some((first, _)) = seen.iter().find(|(_, other)| other.overlaps(&count_key)) {
                return Err(TimeoutError::OverlappingRange {
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
            seen.push((key.as_str(), count_key));
        }
        Ok(())
    }
}

impl From<Value> for RuleTable {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl Validate for RuleTable {
    fn validate(&self) -> Result<()> {
        if !self.0.is_object() {
            return Err(TimeoutError::InvalidSection {
                section: "<root>".to_string(),
                reason: format!("expected a table, found {}", value_kind(&self.0)),
            });
        }

        self.validate_keyed_section(INCLUDES_VIDEO, &["true", "false"])?;

        let speeds: Vec<&str> = ConnectionSpeed::ALL.iter().map(|speed| speed.as_str()).collect();
        self.validate_keyed_section(CONNECTION_SPEED, &speeds)?;

        self.validate_device_section()?;
        self.validate_count_section()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_parse_json_rule_table() {
        let table = RuleTable::from_json_str(
            r#"{ "connectionSpeed": { "slow": 200, "fast": 50 }, "numAdUnits": { "4-5": 400, "1": 100 } }"#,
        )
        .unwrap();

        assert_eq!(table.section_names(), vec![CONNECTION_SPEED, NUM_AD_UNITS]);
        assert_eq!(table.section(CONNECTION_SPEED).unwrap()["slow"], json!(200));

        // 保留鍵的原始順序
        let keys: Vec<&String> = table.section(NUM_AD_UNITS).unwrap().keys().collect();
        assert_eq!(keys, vec!["4-5", "1"]);
    }

    #[test]
    fn test_parse_toml_rule_table() {
        let toml_content = r#"
[includesVideo]
true = 200
false = 50

[deviceType]
2 = 50
4 = 100

[numAdUnits]
"4-5" = 400
1 = 100
"#;

        let table = RuleTable::from_toml_str(toml_content).unwrap();
        assert_eq!(table.section(INCLUDES_VIDEO).unwrap()["true"], json!(200));
        assert_eq!(table.section(DEVICE_TYPE).unwrap()["4"], json!(100));

        let keys: Vec<&String> = table.section(NUM_AD_UNITS).unwrap().keys().collect();
        assert_eq!(keys, vec!["4-5", "1"]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_wrong_shape_reads_as_absent() {
        let table = RuleTable::from_value(json!({
            "includesVideo": null,
            "connectionSpeed": "invalid",
            "numAdUnits": []
        }));

        assert!(table.section(INCLUDES_VIDEO).is_none());
        assert!(table.section(CONNECTION_SPEED).is_none());
        assert!(table.section(NUM_AD_UNITS).is_none());
        assert_eq!(table.raw_section(CONNECTION_SPEED), Some(&json!("invalid")));
    }

    #[test]
    fn test_non_object_document() {
        let table = RuleTable::from_json_str("[1, 2, 3]").unwrap();
        assert!(!table.is_object());
        assert!(table.section_names().is_empty());
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_syntax_errors_are_reported() {
        assert!(matches!(
            RuleTable::from_json_str("{ not json"),
            Err(TimeoutError::JsonError(_))
        ));
        assert!(matches!(
            RuleTable::from_toml_str("[numAdUnits\n1 = "),
            Err(TimeoutError::TomlError(_))
        ));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut json_file = Builder::new().suffix(".json").tempfile().unwrap();
        json_file
            .write_all(br#"{ "deviceType": { "5": 200 } }"#)
            .unwrap();
        let table = RuleTable::from_file(json_file.path()).unwrap();
        assert_eq!(table.section(DEVICE_TYPE).unwrap()["5"], json!(200));

        let mut toml_file = Builder::new().suffix(".toml").tempfile().unwrap();
        toml_file.write_all(b"[deviceType]\n5 = 300\n").unwrap();
        let table = RuleTable::from_file(toml_file.path()).unwrap();
        assert_eq!(table.section(DEVICE_TYPE).unwrap()["5"], json!(300));
    }

    #[test]
    fn test_missing_file() {
        let result = RuleTable::from_file("/nonexistent/rules.json");
        assert!(matches!(result, Err(TimeoutError::IoError(_))));
    }

    #[test]
    fn test_validate_well_formed() {
        let table = RuleTable::from_value(json!({
            "connectionSpeed": { "slow": 200, "medium": 100, "fast": 50, "unknown": 0 },
            "deviceType": { "2": 50, "4": 100, "5": 200 },
            "includesVideo": { "true": 200, "false": 50 },
            "numAdUnits": { "1": 100, "2": 200, "3": 300, "4-5": -400 },
            "futureAxis": "ignored"
        }));
        assert!(table.validate().is_ok());
        assert!(RuleTable::from_value(json!({})).validate().is_ok());
        assert!(RuleTable::from_value(json!({ "deviceType": null })).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_shape() {
        let table = RuleTable::from_value(json!({ "connectionSpeed": "invalid" }));
        assert!(matches!(
            table.validate(),
            Err(TimeoutError::InvalidSection { section, .. }) if section == CONNECTION_SPEED
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_keys() {
        let cases = [
            json!({ "includesVideo": { "yes": 100 } }),
            json!({ "connectionSpeed": { "Slow": 100 } }),
            json!({ "deviceType": { "7": 100 } }),
            json!({ "deviceType": { "phone": 100 } }),
            json!({ "deviceType": { "04": 100 } }),
            json!({ "numAdUnits": { "5-1": 100 } }),
        ];

        for rules in cases {
            let table = RuleTable::from_value(rules.clone());
            assert!(
                matches!(table.validate(), Err(TimeoutError::InvalidRuleKey { .. })),
                "rules: {}",
                rules
            );
        }
    }

    #[test]
    fn test_validate_rejects_non_integer_modifier() {
        let table = RuleTable::from_value(json!({ "includesVideo": { "true": "200" } }));
        assert!(matches!(
            table.validate(),
            Err(TimeoutError::InvalidModifierValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let table = RuleTable::from_value(json!({ "numAdUnits": { "1-5": 100, "6-10": 200, "10": 300 } }));
        match table.validate() {
            Err(TimeoutError::OverlappingRange { first, second }) => {
                assert_eq!(first, "6-10");
                assert_eq!(second, "10");
            }
            other => panic!("expected overlap error, got {:?}", other),
        }
    }
}
