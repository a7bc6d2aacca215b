//! crates/storyteller_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! Stories and pages are immutable value data once fetched from the remote service;
//! the field names follow the service's camelCase JSON shape.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque identifier issued by the remote service.
///
/// The service hands out either integers or strings, so both are accepted and
/// written back exactly as they were received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

/// Characters escaped when an id is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

impl ResourceId {
    /// The id as a single percent-encoded path segment.
    pub fn path_segment(&self) -> String {
        match self {
            ResourceId::Number(n) => n.to_string(),
            ResourceId::Text(s) => utf8_percent_encode(s, PATH_SEGMENT).to_string(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => f.pad(&n.to_string()),
            ResourceId::Text(s) => f.pad(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        ResourceId::Number(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::Text(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId::Text(value)
    }
}

impl FromStr for ResourceId {
    type Err = std::convert::Infallible;

    /// Canonical integers become a `Number`; anything else, including `007`
    /// and `+7`, stays `Text` so it is sent back as typed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => ResourceId::Number(n),
            _ => ResourceId::Text(s.to_string()),
        })
    }
}

/// A titled, ordered sequence of pages. `pages` is in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: ResourceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Summary listings may omit pages entirely.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<Page>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Story {
    /// The first page, used as the story's cover.
    pub fn cover_page(&self) -> Option<&Page> {
        self.pages.first()
    }
}

/// One unit of a story: text plus optional image and audio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// The authenticated identity returned by login, signup and guest login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Opaque bearer token issued by the remote service.
    pub token: String,
    /// The full response body, passed through unmodified.
    pub payload: serde_json::Value,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
