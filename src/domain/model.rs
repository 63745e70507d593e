use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 拍賣中的一個廣告版位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub media_types: Option<HashMap<String, serde_json::Value>>,
}

impl Placement {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            media_types: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>, params: serde_json::Value) -> Self {
        self.media_types
            .get_or_insert_with(HashMap::new)
            .insert(media_type.into(), params);
        self
    }

    /// `null`、`false`、`0`、`""` 的媒體類型視同未宣告
    pub fn declares_media_type(&self, media_type: &str) -> bool {
        self.media_types
            .as_ref()
            .and_then(|types| types.get(media_type))
            .is_some_and(is_declared)
    }
}

fn is_declared(params: &serde_json::Value) -> bool {
    use serde_json::Value;

    match params {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => true,
    }
}

/// Network information as exposed by the client environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSignal {
    #[serde(rename = "type", default)]
    pub link_type: Option<String>,
    #[serde(rename = "effectiveType", default)]
    pub effective_type: Option<String>,
}

impl ConnectionSignal {
    pub fn link(link_type: impl Into<String>) -> Self {
        Self {
            link_type: Some(link_type.into()),
            effective_type: None,
        }
    }

    /// `type` 優先，空字串視為缺少
    pub fn label(&self) -> Option<&str> {
        self.link_type
            .as_deref()
            .filter(|label| !label.is_empty())
            .or_else(|| self.effective_type.as_deref().filter(|label| !label.is_empty()))
    }
}

/// Client signals injected by the caller for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub connection: Option<ConnectionSignal>,
}

impl Signals {
    pub fn new(user_agent: Option<String>, connection: Option<ConnectionSignal>) -> Self {
        Self {
            user_agent,
            connection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placement_media_types() {
        let video = Placement::new("div-1").with_media_type("video", json!({}));
        assert!(video.declares_media_type("video"));
        assert!(!video.declares_media_type("banner"));

        let nulled = Placement::new("div-2").with_media_type("video", json!(null));
        assert!(!nulled.declares_media_type("video"));

        for falsy in [json!(false), json!(0), json!(0.0), json!("")] {
            let placement = Placement::new("div-3").with_media_type("video", falsy.clone());
            assert!(!placement.declares_media_type("video"), "params: {}", falsy);
        }

        for truthy in [json!(true), json!(1), json!("outstream"), json!([])] {
            let placement = Placement::new("div-4").with_media_type("video", truthy.clone());
            assert!(placement.declares_media_type("video"), "params: {}", truthy);
        }

        assert!(!Placement::default().declares_media_type("video"));
    }

    #[test]
    fn test_placement_deserialize_partial() {
        let placements: Vec<Placement> = serde_json::from_value(json!([
            { "code": "test1" },
            { "code": "test2", "mediaTypes": {} },
            { "mediaTypes": { "video": { "context": "outstream" } } }
        ]))
        .unwrap();

        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].media_types, None);
        assert!(placements[2].declares_media_type("video"));
        assert_eq!(placements[2].code, None);
    }

    #[test]
    fn test_connection_label_fallback() {
        assert_eq!(ConnectionSignal::link("wifi").label(), Some("wifi"));

        let effective_only = ConnectionSignal {
            link_type: None,
            effective_type: Some("3g".to_string()),
        };
        assert_eq!(effective_only.label(), Some("3g"));

        let empty_type = ConnectionSignal {
            link_type: Some(String::new()),
            effective_type: Some("4g".to_string()),
        };
        assert_eq!(empty_type.label(), Some("4g"));

        assert_eq!(ConnectionSignal::default().label(), None);
    }

    #[test]
    fn test_signals_deserialize() {
        let signals: Signals = serde_json::from_value(json!({
            "userAgent": "Mozilla/5.0",
            "connection": { "type": "ethernet", "effectiveType": "4g" }
        }))
        .unwrap();

        assert_eq!(signals.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(
            signals.connection.as_ref().and_then(ConnectionSignal::label),
            Some("ethernet")
        );
    }
}
