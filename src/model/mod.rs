//! Schedule model: normalized sessions, their speakers, and grouping.

pub mod group;

pub use group::GroupManager;

use crate::source::Fields;

use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Merged session fields, after inheritance from enclosing containers.
pub type SessionData = Fields;

#[derive(Debug, Clone, PartialEq)]
pub struct Speaker {
    id: String,
    data: Map<String, Value>,
}

impl Speaker {
    /// Bare strings (and other scalars) become `{ "name": ... }`.
    pub fn new(id: impl Into<String>, source: &Value) -> Self {
        let data = match source {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            Value::String(s) => single_name(s.clone()),
            other => single_name(other.to_string()),
        };
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// `data.name`, or the id if there is none.
    pub fn name(&self) -> &str {
        self.data
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.id)
    }
}

fn single_name(name: String) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("name".to_string(), Value::String(name));
    map
}

/// A validated session. Only ever built with a resolved `when`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: String,
    data: SessionData,
    when: DateTime<Tz>,
    speakers: Vec<Arc<Speaker>>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        data: SessionData,
        when: DateTime<Tz>,
        speakers: Vec<Arc<Speaker>>,
    ) -> Self {
        Self {
            id: id.into(),
            data,
            when,
            speakers,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn when(&self) -> &DateTime<Tz> {
        &self.when
    }

    pub fn speakers(&self) -> &[Arc<Speaker>] {
        &self.speakers
    }

    pub fn name(&self) -> &str {
        self.data.name.as_deref().unwrap_or("")
    }

    pub fn track(&self) -> &str {
        self.data.track.as_deref().unwrap_or("")
    }

    pub fn speaker_names(&self) -> Vec<&str> {
        self.speakers.iter().map(|s| s.name()).collect()
    }
}
