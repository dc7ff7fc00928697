//! Listed resources and listing pages.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::remote::RemoteError;

/// One resource as returned by a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedResource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ListedResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// One page of a cursor-based listing.
///
/// This is also the presented shape every list tool returns:
/// `{items: [...], count: n, next_cursor?: "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub items: Vec<ListedResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl ListPage {
    pub fn new(items: Vec<ListedResource>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Parse a list tool's presented data.
    ///
    /// An empty-string cursor is treated as "no more pages".
    pub fn from_presented(data: &Value) -> Result<Self, RemoteError> {
        let mut page: ListPage = serde_json::from_value(data.clone())
            .map_err(|e| RemoteError::UnexpectedResponse(format!("not a list page: {}", e)))?;
        if page.next_cursor.as_deref() == Some("") {
            page.next_cursor = None;
        }
        Ok(page)
    }

    /// Render as presented data, with a `count` field
    pub fn to_presented(&self) -> Value {
        let mut data = serde_json::json!({
            "items": self.items,
            "count": self.items.len(),
        });
        if let (Some(cursor), Value::Object(map)) = (&self.next_cursor, &mut data) {
            map.insert("next_cursor".to_string(), Value::String(cursor.clone()));
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_page_presents_items_and_count_only() {
        assert_eq!(ListPage::default().to_presented(), json!({"items": [], "count": 0}));
    }

    #[test]
    fn test_from_presented_reads_cursor_and_tags() {
        let data = json!({
            "items": [
                {"id": "i-1", "state": "running", "tags": {"Environment": "prod"}, "instance_type": "t3.micro"},
                {"id": "i-2"}
            ],
            "count": 2,
            "next_cursor": "abc"
        });
        let page = ListPage::from_presented(&data).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].tags.get("Environment").map(String::as_str), Some("prod"));
        assert_eq!(page.items[1].state, None);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_cursor_means_last_page() {
        let page = ListPage::from_presented(&json!({"items": [], "next_cursor": ""})).unwrap();
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_from_presented_rejects_wrong_shape() {
        let err = ListPage::from_presented(&json!({"items": "nope"})).unwrap_err();
        assert!(matches!(err, RemoteError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_presented_round_trip_keeps_cursor() {
        let page = ListPage::new(
            vec![ListedResource::new("t1").with_state("ACTIVE")],
            Some("t1".to_string()),
        );
        assert_eq!(ListPage::from_presented(&page.to_presented()).unwrap(), page);
    }
}
