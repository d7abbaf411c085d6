//! Deterministic, collision-free ids for sessions and speakers.
//!
//! Candidates are normalized and tried cumulatively: `talk`, then
//! `talk-keynote`, then `talk-keynote-day1`, ... If every compound is taken
//! the parts are joined with `_` and a counter is appended.

use crate::error::DuplicateIdError;

use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

static NOT_WORD_OR_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Lowercase, drop punctuation, trim, and join words with `sep`.
///
/// `flatten_id("PyCon: Keynote!", "-")` is `"pycon-keynote"`.
pub fn flatten_id(id: &str, sep: &str) -> String {
    let lower = id.to_lowercase();
    let stripped = NOT_WORD_OR_SPACE.replace_all(&lower, "");
    WHITESPACE_RUN
        .replace_all(stripped.trim(), sep)
        .into_owned()
}

/// Something offered to the allocator as a possible id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'a> {
    Text(&'a str),
    /// A structured value; its `id` then `name` are tried.
    Named {
        id: Option<&'a str>,
        name: Option<&'a str>,
    },
    /// Not a string; discarded.
    Absent,
}

impl<'a> Candidate<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Candidate::Text(s),
            Value::Object(map) => Candidate::Named {
                id: map.get("id").and_then(Value::as_str),
                name: map.get("name").and_then(Value::as_str),
            },
            _ => Candidate::Absent,
        }
    }

    fn push_strings(self, out: &mut Vec<&'a str>) {
        match self {
            Candidate::Text(s) => out.push(s),
            Candidate::Named { id, name } => out.extend(id.into_iter().chain(name)),
            Candidate::Absent => {}
        }
    }
}

impl<'a> From<&'a str> for Candidate<'a> {
    fn from(s: &'a str) -> Self {
        Candidate::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for Candidate<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Candidate::Absent, Candidate::Text)
    }
}

/// Tracks every id issued (or reserved) during one parsing run.
///
/// Not shared: each run owns its allocator.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    sep: String,
    join: String,
    fallback: String,
    taken: HashSet<String>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::with_tokens("-", "_", "unknown")
    }

    pub fn with_tokens(sep: &str, join: &str, fallback: &str) -> Self {
        Self {
            sep: sep.to_string(),
            join: join.to_string(),
            fallback: fallback.to_string(),
            taken: HashSet::new(),
        }
    }

    pub fn is_taken(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// Reserve `id` verbatim. Fails if it is already taken.
    pub fn must(&mut self, id: &str) -> Result<String, DuplicateIdError> {
        if !self.taken.insert(id.to_string()) {
            return Err(DuplicateIdError { id: id.to_string() });
        }
        Ok(id.to_string())
    }

    /// Allocate a fresh id from `candidates`, most preferred first.
    pub fn alloc(&mut self, candidates: &[Candidate<'_>]) -> String {
        let mut strings = Vec::new();
        for c in candidates {
            c.push_strings(&mut strings);
        }
        if strings.is_empty() {
            strings.push(self.fallback.as_str());
        }

        let mut parts: Vec<String> = Vec::new();
        let mut found = None;
        for s in strings {
            let part = flatten_id(s, &self.sep);
            if part.is_empty() {
                continue;
            }
            parts.push(part);

            let candidate = parts.join(&self.sep);
            if !self.taken.contains(&candidate) {
                found = Some(candidate);
                break;
            }
        }

        let id = match found {
            Some(id) => id,
            None => {
                // If all else fails, add 0, 1, 2, ... to the end.
                let failsafe = parts.join(&self.join);
                let mut suffix = 0u64;
                loop {
                    let candidate = format!("{}{}", failsafe, suffix);
                    if !self.taken.contains(&candidate) {
                        break candidate;
                    }
                    suffix += 1;
                }
            }
        };

        self.taken.insert(id.clone());
        id
    }
}
