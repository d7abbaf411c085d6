//! Input layer: the `schedule.json` document and its session tree.
//!
//! JSON shape:
//! {
//!   "config": { "timezone": "Australia/Sydney" },
//!   "speakers": {
//!     "sam": "Sam Thorogood",                 // bare string => { "name": ... }
//!     "ada": { "name": "Ada", "bio": "..." }
//!   },
//!   "sessions": {                             // array or object, nests via "sessions"
//!     "day1": {
//!       "track": "Main",                      // inherited by every leaf below
//!       "sessions": [
//!         { "name": "Keynote", "when": "2016-05-18T09:00", "speakers": ["sam"] },
//!         ...
//!       ]
//!     }
//!   }
//! }
//!
//! The raw `sessions` value is ingested once into [`Container`]/[`Node`], so
//! the walk and the parser never have to probe JSON shapes again.

pub mod node;

pub use node::{Container, Fields, Node, Segment, ingest, render_path};

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleSource {
    /// Speaker id -> bare name or field map, in document order.
    #[serde(default)]
    pub speakers: Map<String, Value>,

    /// The nested session tree, still raw.
    #[serde(default)]
    pub sessions: Value,

    #[serde(default)]
    pub config: Config,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timezone: Option<String>,

    /// Other config keys; carried for callers, ignored by the parser.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduleSource {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
