//! Normalizes a `schedule.json` document into a [`GroupManager`].
//!
//! This performs, per run:
//! 1) Resolve `config.timezone` (fatal if missing or unknown).
//! 2) Reserve every top-level speaker id.
//! 3) Walk the session tree and, for each leaf, merge inherited fields,
//!    resolve speakers, allocate an id, resolve `when`, and validate.
//! 4) Report a summary and return the time-sorted sessions.
//!
//! Anything short of a fatal error is reported to the sink and the offending
//! leaf is skipped; the run always continues.

pub mod when;


use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ScheduleError;
use crate::ids::{Candidate, IdAllocator};
use crate::model::{GroupManager, Session, SessionData, Speaker};
use crate::source::{self, Node, ScheduleSource, render_path};
use crate::walk::{LeafContext, walk};

use chrono_tz::Tz;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Key under which containers nest their children.
pub const SUB_KEY: &str = "sessions";

/// A successful parse: the schedule plus everything reported along the way.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub schedule: GroupManager,
    pub timezone: Tz,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    /// Distinct speakers referenced by kept sessions.
    pub fn speakers(&self) -> usize {
        let mut seen = HashSet::new();
        for session in self.schedule.iter() {
            for speaker in session.speakers() {
                seen.insert(speaker.id().to_string());
            }
        }
        seen.len()
    }
}

/// Parse `source`, collecting diagnostics into the result.
pub fn parse(source: &ScheduleSource) -> Result<Parsed, ScheduleError> {
    let mut diagnostics = Vec::new();
    let (schedule, timezone) = parse_with(source, &mut diagnostics)?;
    Ok(Parsed {
        schedule,
        timezone,
        diagnostics,
    })
}

/// Parse `source`, handing every diagnostic to `sink` as it happens.
pub fn parse_with<S: DiagnosticSink>(
    source: &ScheduleSource,
    sink: &mut S,
) -> Result<(GroupManager, Tz), ScheduleError> {
    let tz = when::resolve_timezone(source.config.timezone.as_deref())?;
    sink.info(format!("Using timezone: {}", tz.name()));

    let mut run = Run::new(tz);
    for (id, data) in &source.speakers {
        run.ids.must(id)?;
        run.speakers
            .insert(id.clone(), Arc::new(Speaker::new(id.clone(), data)));
    }

    let tree = source::ingest(&source.sessions, SUB_KEY, sink)?;
    let leaves = walk(&tree);

    let mut sessions = Vec::with_capacity(leaves.len());
    for leaf in &leaves {
        if let Some(session) = run.session(leaf, sink) {
            sessions.push(Arc::new(session));
        }
    }

    tracing::debug!(
        leaves = leaves.len(),
        kept = sessions.len(),
        ids = run.ids.len(),
        speakers = run.speakers.len(),
        "parsed schedule"
    );

    let schedule = GroupManager::new(sessions);
    sink.info(format!(
        "Found {} sessions on {} days",
        schedule.len(),
        schedule.dates()
    ));
    Ok((schedule, tz))
}

/// State owned by one parse: the id allocator and the speaker table.
struct Run {
    tz: Tz,
    ids: IdAllocator,
    speakers: HashMap<String, Arc<Speaker>>,
}

impl Run {
    fn new(tz: Tz) -> Self {
        Self {
            tz,
            ids: IdAllocator::new(),
            speakers: HashMap::new(),
        }
    }

    fn session<S: DiagnosticSink>(
        &mut self,
        leaf: &LeafContext<'_>,
        sink: &mut S,
    ) -> Option<Session> {
        let path = render_path(&leaf.path);
        let data = merge(leaf, sink);

        let speakers = data
            .speakers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|entry| self.speaker(entry))
            .collect::<Vec<_>>();

        // Leaf first, then each ancestor: (key segment, id, name).
        let mut candidates = Vec::with_capacity(leaf.chain.len() * 3);
        for link in leaf.chain.iter().rev() {
            let segment = link.path.last().and_then(|s| s.as_key());
            candidates.push(Candidate::from(segment));
            candidates.push(Candidate::from(link.node.id()));
            candidates.push(Candidate::from(link.node.name()));
        }
        let id = self.ids.alloc(&candidates);

        let raw_when = data.when.clone().unwrap_or(Value::Null);
        let resolved = when::resolve(&raw_when, self.tz);

        if data.name.as_deref().unwrap_or("").is_empty() {
            sink.drop_entity("Ignoring session with empty name", path);
            return None;
        }
        let Some(when) = resolved else {
            let shown = match &raw_when {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            sink.drop_entity(format!("Invalid date; ignoring session: {}", shown), path);
            return None;
        };

        Some(Session::new(id, data, when, speakers))
    }

    /// Known ids resolve to the shared speaker; anything else becomes a new one.
    fn speaker(&mut self, entry: &Value) -> Arc<Speaker> {
        if let Some(known) = entry.as_str().and_then(|id| self.speakers.get(id)) {
            return Arc::clone(known);
        }
        let id = self.ids.alloc(&[Candidate::from_value(entry)]);
        let speaker = Arc::new(Speaker::new(id.clone(), entry));
        self.speakers.insert(id, Arc::clone(&speaker));
        speaker
    }
}

/// Merge every node on the chain, deeper nodes winning. Unknown keys are
/// reported at the node that carries them.
fn merge<S: DiagnosticSink>(leaf: &LeafContext<'_>, sink: &mut S) -> SessionData {
    let mut data = SessionData::default();
    for link in &leaf.chain {
        match link.node {
            Node::Entry { fields, extra, .. } => {
                for (key, _) in extra {
                    sink.warn("Unknown field", format!("{}/{}", render_path(&link.path), key));
                }
                data.overlay(fields);
            }
            Node::Scalar(value) => {
                sink.warn(
                    format!("Session entry is not an object: {}", value),
                    render_path(&link.path),
                );
            }
        }
    }
    data
}
