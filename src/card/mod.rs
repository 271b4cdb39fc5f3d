//! The logical character card and its schema-synonym field mapping
//!
//! Different producers store the same logical fields at different paths:
//! v2-style exports nest everything under `data`, v3-style exports under
//! `spec` or `card`, ad-hoc tools write flat objects. This module resolves a
//! single typed [`CardDocument`] view from any of the known shapes.

pub mod normalize;

pub use normalize::normalize;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a card's ordered link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLink {
    pub title: String,
    pub url: String,
}

/// Which family of synonym paths a parsed object matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
    /// Fields nested under a `data` object (v2-style exports).
    Nested,
    /// Fields nested under `spec` or `card` (v3-style exports).
    Spec,
    /// Fields at the top level; also what this tool writes.
    #[default]
    Flat,
}

/// The character card: name, opening message, behavior text, link list.
///
/// Every field is optional; a field missing from the source object stays
/// absent and is never defaulted to a guessed value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_mes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<CardLink>,

    /// Which shape the source object had. Not part of the card itself.
    #[serde(skip)]
    pub schema: SchemaVariant,
}

impl CardDocument {
    /// Map any known card shape onto a document, per-field synonym lookup in
    /// priority order.
    ///
    /// Returns `None` when the value is not a JSON object or when no
    /// recognized field is present at all, so that unrelated JSON metadata
    /// (color profiles, generator settings) never turns into an empty card.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let schema = if obj.get("data").is_some_and(Value::is_object) {
            SchemaVariant::Nested
        } else if obj.get("spec").is_some_and(Value::is_object)
            || obj.get("card").is_some_and(Value::is_object)
        {
            SchemaVariant::Spec
        } else {
            SchemaVariant::Flat
        };

        let doc = Self {
            id: first_string(value, &["id", "data.id"]),
            name: first_string(value, &["name", "character", "title", "data.name"]),
            first_mes: first_string(
                value,
                &["data.first_mes", "spec.first_mes", "card.first_mes", "first_mes"],
            ),
            description: first_string(
                value,
                &["description", "behavior", "data.description", "personality"],
            ),
            links: first_links(value, &["links", "data.links"]),
            schema,
        };

        if doc.is_empty() {
            None
        } else {
            Some(doc)
        }
    }

    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.first_mes.is_none()
            && self.description.is_none()
            && self.links.is_empty()
    }

    /// The flat canonical JSON object the embedder writes.
    pub fn to_canonical_json(&self) -> String {
        serde_json::to_string(self).expect("card document serialization is infallible")
    }
}

/// Walk a dotted path (`"data.first_mes"`) through nested objects.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

/// First path that resolves to a string. Numbers are accepted too, for
/// producers that write numeric ids.
fn first_string(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match lookup(value, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First array found at any of the paths, with malformed entries dropped.
fn first_links(value: &Value, paths: &[&str]) -> Vec<CardLink> {
    paths
        .iter()
        .find_map(|path| lookup(value, path)?.as_array())
        .map(|items| items.iter().filter_map(link_from).collect())
        .unwrap_or_default()
}

fn link_from(item: &Value) -> Option<CardLink> {
    Some(CardLink {
        title: item.get("title")?.as_str()?.to_string(),
        url: item.get("url")?.as_str()?.to_string(),
    })
}
