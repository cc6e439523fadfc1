//! Dashboard widget record
//!
//! A widget is an open JSON object. Only `id` is typed; every other field is
//! carried through load/save unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single dashboard widget
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Widget {
    /// Position in the list at load time. Stored ids are not authoritative.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_id"
    )]
    pub id: Option<u64>,
    /// Every other field, passed through as-is
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Ordered widget list, always replaced as a whole
pub type WidgetList = Vec<Widget>;

impl Widget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Assign every widget its zero-based position as `id`
pub fn reindex(list: &mut [Widget]) {
    for (index, widget) in list.iter_mut().enumerate() {
        widget.id = Some(index as u64);
    }
}

/// Stored ids get overwritten on load anyway, so anything that is not a
/// non-negative integer reads as "no id" instead of failing the whole list.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_fields_pass_through() {
        let raw = json!({"id": 4, "name": "Clock", "size": {"w": 2, "h": 1}, "pinned": true});
        let widget: Widget = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(widget.id, Some(4));
        assert_eq!(widget.get("name"), Some(&json!("Clock")));
        assert!(!widget.fields.contains_key("id"));
        assert_eq!(serde_json::to_value(&widget).unwrap(), raw);
    }

    #[test]
    fn test_missing_id_is_not_serialized() {
        let widget = Widget::new().with_field("name", "A");
        assert_eq!(serde_json::to_value(&widget).unwrap(), json!({"name": "A"}));
    }

    #[test]
    fn test_non_integer_id_is_dropped() {
        for raw in [json!({"id": "abc"}), json!({"id": -1}), json!({"id": 1.5}), json!({"id": null})] {
            let widget: Widget = serde_json::from_value(raw).unwrap();
            assert_eq!(widget.id, None);
        }
    }

    #[test]
    fn test_reindex_overwrites_ids() {
        let mut list = vec![
            Widget { id: Some(9), ..Widget::new() },
            Widget::new(),
            Widget { id: Some(0), ..Widget::new() },
        ];
        reindex(&mut list);
        let ids: Vec<_> = list.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![Some(0), Some(1), Some(2)]);
    }
}
