//! Display metrics (`{ value, label, icon?, description? }`).

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::log;

/// One headline number of a case study.
///
/// `value` is display text ("x1.5", "CEO", "30%"), never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Metric {
    #[serde(deserialize_with = "display_text")]
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Metric {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            icon: None,
            description: None,
        }
    }

    /// Icon name, treating an empty string as absent.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref().filter(|icon| !icon.trim().is_empty())
    }
}

/// Metric list where an invalid item is dropped with a warning, `null` is empty.
///
/// A value that is not a list at all still fails.
pub(crate) fn lenient_metrics<'de, D>(deserializer: D) -> Result<Vec<Metric>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(items.map(decode_each).unwrap_or_default())
}

/// Optional variant of [`lenient_metrics`], `null` maps to `None`.
pub(crate) fn opt_lenient_metrics<'de, D>(deserializer: D) -> Result<Option<Vec<Metric>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(items.map(decode_each))
}

fn decode_each(items: Vec<Value>) -> Vec<Metric> {
    items
        .into_iter()
        .filter_map(|item| match Metric::deserialize(item) {
            Ok(metric) => Some(metric),
            Err(err) => {
                log!("warning"; "skipping invalid metric: {}", err);
                None
            }
        })
        .collect()
}

/// Accept `"30%"` as well as bare JSON numbers like `42`.
pub(crate) fn display_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}

/// Optional variant of [`display_text`], `null` maps to `None`.
pub(crate) fn opt_display_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
