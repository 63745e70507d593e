use crate::config::rule_table::{RuleTable, CONNECTION_SPEED, DEVICE_TYPE, INCLUDES_VIDEO, NUM_AD_UNITS};
use crate::core::connection::{classify_connection, ConnectionSpeed};
use crate::core::content::has_video;
use crate::core::device::{classify_device, DeviceClass};
use crate::core::range::find_count_entry;
use crate::domain::model::Placement;
use crate::domain::ports::SignalSource;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    IncludesVideo,
    ConnectionSpeed,
    DeviceType,
    NumAdUnits,
}

impl Axis {
    pub fn section(self) -> &'static str {
        match self {
            Axis::IncludesVideo => INCLUDES_VIDEO,
            Axis::ConnectionSpeed => CONNECTION_SPEED,
            Axis::DeviceType => DEVICE_TYPE,
            Axis::NumAdUnits => NUM_AD_UNITS,
        }
    }
}

/// 單次評估所需的分類結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub has_video: bool,
    pub connection: ConnectionSpeed,
    pub device: DeviceClass,
    pub placement_count: usize,
}

impl Classification {
    pub fn new(placements: &[Placement], signals: &dyn SignalSource) -> Self {
        Self {
            has_video: has_video(placements),
            connection: classify_connection(signals.connection()),
            device: classify_device(signals.user_agent()),
            placement_count: placements.len(),
        }
    }
}

/// Resolves one axis against its section: the matched key and its modifier.
type Resolver = fn(&Classification, &Map<String, Value>) -> Option<(String, i64)>;

const AXES: [(Axis, Resolver); 4] = [
    (Axis::IncludesVideo, resolve_includes_video),
    (Axis::ConnectionSpeed, resolve_connection_speed),
    (Axis::DeviceType, resolve_device_type),
    (Axis::NumAdUnits, resolve_num_ad_units),
];

fn lookup(section: &Map<String, Value>, key: &str) -> Option<(String, i64)> {
    section
        .get(key)
        .and_then(Value::as_i64)
        .map(|modifier| (key.to_string(), modifier))
}

fn resolve_includes_video(ctx: &Classification, section: &Map<String, Value>) -> Option<(String, i64)> {
    lookup(section, if ctx.has_video { "true" } else { "false" })
}

fn resolve_connection_speed(ctx: &Classification, section: &Map<String, Value>) -> Option<(String, i64)> {
    lookup(section, ctx.connection.as_str())
}

fn resolve_device_type(ctx: &Classification, section: &Map<String, Value>) -> Option<(String, i64)> {
    lookup(section, &ctx.device.rule_key()?)
}

fn resolve_num_ad_units(ctx: &Classification, section: &Map<String, Value>) -> Option<(String, i64)> {
    find_count_entry(ctx.placement_count, section).map(|(key, modifier)| (key.to_string(), modifier))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisContribution {
    pub axis: Axis,
    /// Rule key that matched, if any.
    pub key: Option<String>,
    pub modifier: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierBreakdown {
    pub classification: Classification,
    pub contributions: Vec<AxisContribution>,
}

impl ModifierBreakdown {
    /// 先以 i128 精確加總，最後才夾回 i64 範圍
    pub fn total(&self) -> i64 {
        let exact: i128 = self
            .contributions
            .iter()
            .map(|contribution| i128::from(contribution.modifier))
            .sum();
        exact.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    pub fn contribution(&self, axis: Axis) -> i64 {
        self.contributions
            .iter()
            .find(|contribution| contribution.axis == axis)
            .map(|contribution| contribution.modifier)
            .unwrap_or(0)
    }
}

/// Evaluates every axis against `rules` and reports what each one added.
///
/// Absent or non-object rules, absent sections and sections of the wrong
/// shape all contribute zero. This never fails.
pub fn evaluate(
    placements: &[Placement],
    rules: Option<&RuleTable>,
    signals: &dyn SignalSource,
) -> ModifierBreakdown {
    let classification = Classification::new(placements, signals);

    let contributions = AXES
        .iter()
        .map(|(axis, resolve)| {
            let matched = rules
                .and_then(|rules| rules.section(axis.section()))
                .and_then(|section| resolve(&classification, section));

            match matched {
                Some((key, modifier)) => AxisContribution {
                    axis: *axis,
                    key: Some(key),
                    modifier,
                },
                None => AxisContribution {
                    axis: *axis,
                    key: None,
                    modifier: 0,
                },
            }
        })
        .collect();

    ModifierBreakdown {
        classification,
        contributions,
    }
}

pub fn calculate_timeout_modifier(
    placements: &[Placement],
    rules: Option<&RuleTable>,
    signals: &dyn SignalSource,
) -> i64 {
    evaluate(placements, rules, signals).total()
}

/// `base + modifier`，結果不低於 0
pub fn adjusted_timeout(base_ms: u64, modifier: i64) -> u64 {
    if modifier >= 0 {
        base_ms.saturating_add(modifier.unsigned_abs())
    } else {
        base_ms.saturating_sub(modifier.unsigned_abs())
    }
}

/// Engine bound to one signal source.
pub struct TimeoutModifier<S: SignalSource> {
    signals: S,
}

impl<S: SignalSource> TimeoutModifier<S> {
    pub fn new(signals: S) -> Self {
        Self { signals }
    }

    pub fn signals(&self) -> &S {
        &self.signals
    }

    pub fn evaluate(&self, placements: &[Placement], rules: Option<&RuleTable>) -> ModifierBreakdown {
        evaluate(placements, rules, &self.signals)
    }

    pub fn modifier(&self, placements: &[Placement], rules: Option<&RuleTable>) -> i64 {
        calculate_timeout_modifier(placements, rules, &self.signals)
    }

    pub fn timeout(&self, base_ms: u64, placements: &[Placement], rules: Option<&RuleTable>) -> u64 {
        adjusted_timeout(base_ms, self.modifier(placements, rules))
    }
}
