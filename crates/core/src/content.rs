//! Draft / version content payload and its shape validation.
//!
//! Content is deliberately open-ended: sections are arbitrary JSON objects and
//! counters are a flat name -> number/string mapping. Only the *shape* is
//! checked here; the meaning of individual section fields belongs to the
//! editing surface.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// A single page section: an open-ended key-value record.
pub type Section = Map<String, Value>;

pub const FIELD_SECTIONS: &str = "sections";
pub const FIELD_COUNTERS: &str = "counters";
pub const FIELD_HIDDEN_SECTION_IDS: &str = "hidden_section_ids";

/// All top-level fields accepted in a content payload.
pub const CONTENT_FIELDS: &[&str] = &[FIELD_SECTIONS, FIELD_COUNTERS, FIELD_HIDDEN_SECTION_IDS];

/// The content carried by a draft and frozen into every published version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftContent {
    pub sections: Vec<Section>,
    pub counters: Map<String, Value>,
    pub hidden_section_ids: BTreeSet<String>,
}

impl DraftContent {
    /// Parse and shape-check a raw content payload.
    ///
    /// Missing fields default to empty; unknown top-level fields are rejected
    /// so a misspelled field never silently drops data. The whole payload is
    /// validated before anything is returned, so callers never see a
    /// partially-applied value.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        let obj = value
            .as_object()
            .ok_or_else(|| invalid("content must be a JSON object"))?;

        if let Some(unknown) = obj.keys().find(|k| !CONTENT_FIELDS.contains(&k.as_str())) {
            return Err(invalid(format!(
                "unknown content field '{}'. Valid fields: {}",
                unknown,
                CONTENT_FIELDS.join(", ")
            )));
        }

        let sections = match obj.get(FIELD_SECTIONS) {
            None => Vec::new(),
            Some(v) => parse_sections(v)?,
        };
        let counters = match obj.get(FIELD_COUNTERS) {
            None => Map::new(),
            Some(v) => parse_counters(v)?,
        };
        let hidden_section_ids = match obj.get(FIELD_HIDDEN_SECTION_IDS) {
            None => BTreeSet::new(),
            Some(v) => parse_hidden_ids(v)?,
        };

        Ok(Self {
            sections,
            counters,
            hidden_section_ids,
        })
    }

    /// Rebuild content from its three stored columns.
    pub fn from_parts(
        sections: &Value,
        counters: &Value,
        hidden_section_ids: Vec<String>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            sections: parse_sections(sections)?,
            counters: parse_counters(counters)?,
            hidden_section_ids: hidden_section_ids.into_iter().collect(),
        })
    }

    pub fn sections_value(&self) -> Value {
        Value::Array(self.sections.iter().cloned().map(Value::Object).collect())
    }

    pub fn counters_value(&self) -> Value {
        Value::Object(self.counters.clone())
    }

    pub fn hidden_section_ids_vec(&self) -> Vec<String> {
        self.hidden_section_ids.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.counters.is_empty() && self.hidden_section_ids.is_empty()
    }
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::InvalidContent(msg.into())
}

fn parse_sections(value: &Value) -> Result<Vec<Section>, CoreError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid("sections must be an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object()
                .cloned()
                .ok_or_else(|| invalid(format!("sections[{i}] must be an object")))
        })
        .collect()
}

fn parse_counters(value: &Value) -> Result<Map<String, Value>, CoreError> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("counters must be an object"))?;

    for (name, v) in obj {
        if !(v.is_number() || v.is_string()) {
            return Err(invalid(format!(
                "counter '{name}' must be a number or a string"
            )));
        }
    }
    Ok(obj.clone())
}

fn parse_hidden_ids(value: &Value) -> Result<BTreeSet<String>, CoreError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid("hidden_section_ids must be an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(format!("hidden_section_ids[{i}] must be a string")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
