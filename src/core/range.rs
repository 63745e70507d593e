use serde_json::{Map, Value};
use std::fmt;

/// `numAdUnits` 的鍵：精確數量或閉區間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKey {
    Exact(u64),
    Range { lo: u64, hi: u64 },
}

impl CountKey {
    /// Parses `"2"` or `"4-5"`. Returns `None` for anything else, including
    /// reversed ranges.
    pub fn parse(key: &str) -> Option<Self> {
        match key.split_once('-') {
            Some((lo, hi)) => {
                let lo = parse_count(lo)?;
                let hi = parse_count(hi)?;
                (lo <= hi).then_some(CountKey::Range { lo, hi })
            }
            None => parse_count(key).map(CountKey::Exact),
        }
    }

    pub fn contains(&self, n: u64) -> bool {
        match *self {
            CountKey::Exact(value) => value == n,
            CountKey::Range { lo, hi } => lo <= n && n <= hi,
        }
    }

    fn bounds(&self) -> (u64, u64) {
        match *self {
            CountKey::Exact(value) => (value, value),
            CountKey::Range { lo, hi } => (lo, hi),
        }
    }

    pub fn overlaps(&self, other: &CountKey) -> bool {
        let (lo, hi) = self.bounds();
        let (other_lo, other_hi) = other.bounds();
        lo <= other_hi && other_lo <= hi
    }
}

impl fmt::Display for CountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountKey::Exact(value) => write!(f, "{}", value),
            CountKey::Range { lo, hi } => write!(f, "{}-{}", lo, hi),
        }
    }
}

fn parse_count(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// First matching entry in authored order, with its key.
pub(crate) fn find_count_entry(n: usize, table: &Map<String, Value>) -> Option<(&str, i64)> {
    let n = n as u64;
    table.iter().find_map(|(key, value)| {
        let modifier = value.as_i64()?;
        CountKey::parse(key)
            .filter(|count_key| count_key.contains(n))
            .map(|_| (key.as_str(), modifier))
    })
}

/// 沒有符合的鍵或表格格式錯誤時回傳 0
pub fn match_count(n: usize, table: Option<&Value>) -> i64 {
    match table {
        Some(Value::Object(map)) => find_count_entry(n, map)
            .map(|(_, modifier)| modifier)
            .unwrap_or(0),
        _ => 0,
    }
}
