//! Typed outputs of the JSON-shaped chains.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One generated interview question with its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaItem {
    pub skill: String,
    pub question: String,
    pub answer: String,
}

/// Experience summary used to ground resume suggestions.
///
/// Parsed best-effort: every key is optional and tolerates the loose shapes
/// models tend to emit (numbers as strings, years as numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDetails {
    #[serde(default, deserialize_with = "lenient_years")]
    pub total_years: i64,
    #[serde(default = "unknown_domain", deserialize_with = "lenient_domain")]
    pub domain: String,
    #[serde(default, deserialize_with = "lenient_periods")]
    pub periods: Vec<(String, String)>,
}

impl Default for ExperienceDetails {
    fn default() -> Self {
        Self {
            total_years: 0,
            domain: unknown_domain(),
            periods: Vec::new(),
        }
    }
}

impl ExperienceDetails {
    /// Renders periods the way they are shown to the model: `[(2015, 2020), (2021, Present)]`.
    pub fn format_periods(&self) -> String {
        let inner: Vec<String> = self
            .periods
            .iter()
            .map(|(start, end)| format!("({start}, {end})"))
            .collect();
        format!("[{}]", inner.join(", "))
    }
}

fn unknown_domain() -> String {
    "Unknown".to_string()
}

fn lenient_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f.trunc() as i64).unwrap_or(0),
        _ => 0,
    })
}

fn lenient_domain<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => s,
        Value::Null | Value::String(_) => unknown_domain(),
        other => other.to_string(),
    })
}

fn lenient_periods<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(String, String)>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(|item| match item {
            Value::Array(pair) if pair.len() >= 2 => {
                Some((scalar_text(&pair[0]), scalar_text(&pair[1])))
            }
            Value::Object(map) => match (map.get("start"), map.get("end")) {
                (Some(start), Some(end)) => Some((scalar_text(start), scalar_text(end))),
                _ => None,
            },
            _ => None,
        })
        .collect())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
