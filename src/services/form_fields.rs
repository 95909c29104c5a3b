//! Parsers for list-valued admin form fields.
//!
//! Grammar accepted for both genre ids and tags:
//! - a JSON array (`[18, 35]`, `["heist", "noir"]`), or
//! - comma-separated tokens (`18, 35`, `heist, noir`).
//!
//! Tokens that do not parse are dropped; a bad token never fails the form.

use serde::Deserialize;
use serde_json::Value;

/// A list field that may arrive as one string or as a native JSON array
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListField {
    Text(String),
    Items(Vec<Value>),
}

impl Default for ListField {
    fn default() -> Self {
        ListField::Items(Vec::new())
    }
}

/// A numeric field that may arrive as a number or as text
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumberField {
    Number(f64),
    Text(String),
}

impl NumberField {
    pub fn as_f64(&self) -> Option<f64> {
        let value: Option<f64> = match self {
            NumberField::Number(n) => Some(*n),
            NumberField::Text(s) => s.trim().parse().ok(),
        };
        value.filter(|n| n.is_finite())
    }
}

/// Splits raw text into JSON-array items or comma-separated tokens
fn tokens(raw: &str) -> Vec<Value> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
            return items;
        }
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Value::String(t.to_string()))
        .collect()
}

fn genre_id(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn tag(value: &Value) -> Option<String> {
    let tag = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(tag).filter(|t| !t.is_empty())
}

/// Parses a genre-id list, dropping invalid tokens
pub fn parse_genre_ids(raw: &str) -> Vec<i32> {
    collect_genre_ids(tokens(raw))
}

/// Parses a tag list: trimmed, non-empty, first occurrence wins
pub fn parse_tags(raw: &str) -> Vec<String> {
    collect_tags(tokens(raw))
}

fn collect_genre_ids(items: Vec<Value>) -> Vec<i32> {
    items.iter().filter_map(genre_id).collect()
}

fn collect_tags(items: Vec<Value>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in items.iter().filter_map(tag) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }
    tags
}

impl ListField {
    pub fn genre_ids(self) -> Vec<i32> {
        match self {
            ListField::Text(raw) => parse_genre_ids(&raw),
            ListField::Items(items) => collect_genre_ids(items),
        }
    }

    pub fn tags(self) -> Vec<String> {
        match self {
            ListField::Text(raw) => parse_tags(&raw),
            ListField::Items(items) => collect_tags(items),
        }
    }
}
