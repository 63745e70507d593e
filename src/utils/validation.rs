use crate::utils::error::{Result, TimeoutError};
use serde_json::{Map, Value};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 輸入檔案路徑：不可為空，副檔名須在允許清單內
pub fn validate_input_file(field_name: &str, path: &str, allowed_extensions: &[&str]) -> Result<()> {
    if path.trim().is_empty() || path.contains('\0') {
        return Err(TimeoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            reason: format!("'{}' is not a usable file path", path.escape_default()),
        });
    }

    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if allowed_extensions.contains(&ext.as_str()) => Ok(()),
        _ => Err(TimeoutError::InvalidConfigValueError {
            field: field_name.to_string(),
            reason: format!(
                "'{}' must end in one of: .{}",
                path,
                allowed_extensions.join(", .")
            ),
        }),
    }
}

/// 區段不存在或為 null 時回傳 `None`，其他非物件型別視為錯誤
pub fn validate_section_shape<'a>(
    section: &str,
    value: Option<&'a Value>,
) -> Result<Option<&'a Map<String, Value>>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(TimeoutError::InvalidSection {
            section: section.to_string(),
            reason: format!("expected a table, found {}", value_kind(other)),
        }),
    }
}

pub fn validate_modifier_value(section: &str, key: &str, value: &Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| TimeoutError::InvalidModifierValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
}

pub fn validate_allowed_key(section: &str, key: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&key) {
        return Err(TimeoutError::InvalidRuleKey {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("Allowed keys: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}
