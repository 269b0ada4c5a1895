//! Item Mapper
//!
//! Converts one ARM record into an [`Item`]: attributes without tags, tags
//! relocated, provisioning state translated into health, and edges built from
//! the type binding's reference bag.

use super::bindings::TypeBinding;
use super::registry::ResourceDef;
use crate::azure::composite_key;
use crate::item::{Health, Item};
use crate::link::{LinkBuilder, ReferenceBag};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute holding the encoded key of child types
pub const COMPOSITE_ATTRIBUTE: &str = "uniqueAttr";

/// Attribute holding the name of top-level types
pub const NAME_ATTRIBUTE: &str = "name";

/// Get a value from JSON using a dot-notation path (numeric parts index arrays)
pub fn json_value_at<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = item;

    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(idx) => current.get(idx)?,
            Err(_) => current.get(part)?,
        };
    }

    Some(current)
}

/// String at a dot-notation path
pub fn str_at<'a>(item: &'a Value, path: &str) -> Option<&'a str> {
    json_value_at(item, path).and_then(|v| v.as_str())
}

/// Array at a dot-notation path, empty when absent
pub fn array_at<'a>(item: &'a Value, path: &str) -> &'a [Value] {
    json_value_at(item, path)
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// `id` of a sub-resource object at a dot-notation path
pub fn id_at<'a>(item: &'a Value, path: &str) -> Option<&'a str> {
    json_value_at(item, path).and_then(id_of)
}

/// `id` of a sub-resource object (`{ "id": "/subscriptions/..." }`)
pub fn id_of(value: &Value) -> Option<&str> {
    value.get("id").and_then(|v| v.as_str())
}

/// A record being mapped, with the key it is being mapped under
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    pub record: &'a Value,
    /// Full key parts of this record (parents first)
    pub parts: &'a [String],
}

impl<'a> RecordView<'a> {
    pub fn get(&self, path: &str) -> Option<&'a Value> {
        json_value_at(self.record, path)
    }

    pub fn str_at(&self, path: &str) -> Option<&'a str> {
        str_at(self.record, path)
    }

    pub fn array_at(&self, path: &str) -> &'a [Value] {
        array_at(self.record, path)
    }

    pub fn id_at(&self, path: &str) -> Option<&'a str> {
        id_at(self.record, path)
    }

    /// Key parts of the direct parent; `None` for top-level types
    pub fn parent_parts(&self) -> Option<Vec<String>> {
        match self.parts.len() {
            0 | 1 => None,
            n => Some(self.parts[..n - 1].to_vec()),
        }
    }

    /// Key parts of an embedded child object, named by its `name` field
    pub fn child_parts(&self, child: &Value) -> Option<Vec<String>> {
        let name = str_at(child, "name")?;
        let mut parts = self.parts.to_vec();
        parts.push(name.to_string());
        Some(parts)
    }
}

/// Tags as a string map; non-string values are rendered as JSON
pub fn extract_tags(record: &Value) -> BTreeMap<String, String> {
    record
        .get("tags")
        .and_then(|v| v.as_object())
        .map(|tags| {
            tags.iter()
                .filter_map(|(key, value)| match value {
                    Value::Null => None,
                    Value::String(s) => Some((key.clone(), s.clone())),
                    other => Some((key.clone(), other.to_string())),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Health from `properties.provisioningState`
pub fn extract_health(record: &Value) -> Option<Health> {
    str_at(record, "properties.provisioningState").and_then(Health::from_provisioning_state)
}

/// Map one record. Returns `None` when the record has no name.
///
/// `parent_parts` are the key parts of the parent the record was fetched
/// under, empty for top-level types. Edge scopes matching one of
/// `known_scopes` ignoring case take its spelling.
pub fn map_record(
    def: &ResourceDef,
    binding: &TypeBinding,
    record: &Value,
    scope: &str,
    parent_parts: &[String],
    known_scopes: &[String],
) -> Option<Item> {
    let name = record
        .get(NAME_ATTRIBUTE)
        .and_then(|v| v.as_str())
        .filter(|name| !name.is_empty())?;

    let mut parts = parent_parts.to_vec();
    parts.push(name.to_string());

    let mut attributes = record.as_object().cloned().unwrap_or_default();
    attributes.remove("tags");

    let unique_attribute = if def.is_child() {
        attributes.insert(
            COMPOSITE_ATTRIBUTE.to_string(),
            Value::String(composite_key::encode(&parts)),
        );
        COMPOSITE_ATTRIBUTE
    } else {
        NAME_ATTRIBUTE
    };

    let view = RecordView {
        record,
        parts: &parts,
    };
    let mut bag = ReferenceBag::new();
    (binding.references)(&view, &mut bag);

    let mut links = LinkBuilder::new(scope).with_known_scopes(known_scopes.iter().cloned());
    links.add_bag(&bag);

    Some(Item {
        item_type: binding.item_type,
        scope: scope.to_string(),
        unique_attribute: unique_attribute.to_string(),
        attributes,
        tags: extract_tags(record),
        health: extract_health(record),
        linked_item_queries: links.finish(),
    })
}
