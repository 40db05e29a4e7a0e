//! Record modifiers
//!
//! The only transformations the tap performs: attaching the parent
//! board's id to child records that need it, and projecting a board's
//! custom-field definitions onto card records so downstream consumers
//! see field names and dropdown texts instead of bare ids.

use super::descriptor::Modifier;
use crate::error::Result;
use crate::http::TrelloApi;
use crate::types::Record;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

/// Custom-field definitions for one board
///
/// Custom fields are defined at the board level, so the maps are built
/// once per board and applied to every card fetched for it.
#[derive(Debug, Default)]
pub struct CustomFieldMaps {
    /// Field id -> field name
    names: HashMap<String, String>,
    /// `{field_id}_{option_id}` -> dropdown option text
    dropdown_options: HashMap<String, String>,
}

impl CustomFieldMaps {
    /// Fetch a board's custom-field definitions and build the maps
    pub async fn load(api: &dyn TrelloApi, board_id: &str) -> Result<Self> {
        let endpoint = format!("/boards/{board_id}/customFields");
        let fields = api.get_list(&endpoint, &[]).await?;

        let mut maps = Self::default();
        for field in &fields {
            let (Some(id), Some(name)) = (
                field.get("id").and_then(Value::as_str),
                field.get("name").and_then(Value::as_str),
            ) else {
                continue;
            };
            maps.names.insert(id.to_string(), name.to_string());

            if field.get("type").and_then(Value::as_str) == Some("list") {
                let options = field
                    .get("options")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                for option in options {
                    let (Some(field_id), Some(option_id), Some(text)) = (
                        option.get("idCustomField").and_then(Value::as_str),
                        option.get("id").and_then(Value::as_str),
                        option.pointer("/value/text").and_then(Value::as_str),
                    ) else {
                        continue;
                    };
                    maps.dropdown_options
                        .insert(dropdown_option_key(field_id, option_id), text.to_string());
                }
            }
        }
        Ok(maps)
    }

    /// Build maps directly; used by tests
    pub fn from_parts(
        names: HashMap<String, String>,
        dropdown_options: HashMap<String, String>,
    ) -> Self {
        Self {
            names,
            dropdown_options,
        }
    }

    /// Annotate each `customFieldItems` entry of a card with the field's
    /// name and, for dropdown values, the selected option's text
    pub fn apply(&self, record: &mut Record) {
        let Some(items) = record
            .get_mut("customFieldItems")
            .and_then(Value::as_array_mut)
        else {
            return;
        };

        for item in items {
            let Some(field_id) = item
                .get("idCustomField")
                .and_then(Value::as_str)
                .map(ToString::to_string)
            else {
                continue;
            };

            match self.names.get(&field_id) {
                Some(name) => {
                    item["name"] = json!(name);
                }
                None => {
                    warn!(field_id, "custom field item references an unknown field");
                    continue;
                }
            }

            let option_id = item
                .get("idValue")
                .and_then(Value::as_str)
                .map(ToString::to_string);
            if let Some(option_id) = option_id {
                let key = dropdown_option_key(&field_id, &option_id);
                match self.dropdown_options.get(&key) {
                    Some(text) => {
                        item["value"] = json!({ "option": text });
                    }
                    None => {
                        warn!(field_id, option_id, "unknown dropdown option on custom field");
                    }
                }
            }
        }
    }
}

fn dropdown_option_key(field_id: &str, option_id: &str) -> String {
    format!("{field_id}_{option_id}")
}

/// Apply a stream's modifier to one record
pub(crate) fn apply_modifier(
    modifier: Modifier,
    mut record: Record,
    parent_id: Option<&str>,
    custom_fields: Option<&CustomFieldMaps>,
) -> Record {
    match modifier {
        Modifier::Identity => record,
        Modifier::AttachBoardId => {
            if let Some(parent_id) = parent_id {
                record["boardId"] = json!(parent_id);
            }
            record
        }
        Modifier::CustomFields => {
            if let Some(maps) = custom_fields {
                maps.apply(&mut record);
            }
            record
        }
    }
}

#[cfg(test)]
mod modify_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn maps() -> CustomFieldMaps {
        CustomFieldMaps::from_parts(
            HashMap::from([
                ("f1".to_string(), "Priority".to_string()),
                ("f2".to_string(), "Estimate".to_string()),
            ]),
            HashMap::from([("f1_o1".to_string(), "High".to_string())]),
        )
    }

    #[test]
    fn test_attach_board_id() {
        let record = json!({"id": "u1"});
        let modified =
            apply_modifier(Modifier::AttachBoardId, record, Some("board-1"), None);
        assert_eq!(modified, json!({"id": "u1", "boardId": "board-1"}));
    }

    #[test]
    fn test_identity_leaves_record_alone() {
        let record = json!({"id": "a1", "date": "2024-01-01T00:00:00.000Z"});
        let modified = apply_modifier(Modifier::Identity, record.clone(), Some("b"), None);
        assert_eq!(modified, record);
    }

    #[test]
    fn test_custom_fields_projection() {
        let record = json!({
            "id": "c1",
            "customFieldItems": [
                {"idCustomField": "f1", "idValue": "o1"},
                {"idCustomField": "f2", "value": {"number": "3"}}
            ]
        });
        let maps = maps();
        let modified =
            apply_modifier(Modifier::CustomFields, record, Some("board-1"), Some(&maps));

        let items = modified["customFieldItems"].as_array().unwrap();
        assert_eq!(items[0]["name"], "Priority");
        assert_eq!(items[0]["value"], json!({"option": "High"}));
        assert_eq!(items[1]["name"], "Estimate");
        // Non-dropdown value untouched
        assert_eq!(items[1]["value"], json!({"number": "3"}));
    }

    #[test]
    fn test_unknown_field_is_skipped() {
        let record = json!({
            "id": "c1",
            "customFieldItems": [{"idCustomField": "mystery", "idValue": "o9"}]
        });
        let maps = maps();
        let modified =
            apply_modifier(Modifier::CustomFields, record, Some("board-1"), Some(&maps));
        let items = modified["customFieldItems"].as_array().unwrap();
        assert!(items[0].get("name").is_none());
    }

    #[test]
    fn test_card_without_custom_field_items() {
        let record = json!({"id": "c1"});
        let maps = maps();
        let modified = apply_modifier(
            Modifier::CustomFields,
            record.clone(),
            Some("board-1"),
            Some(&maps),
        );
        assert_eq!(modified, record);
    }
}
