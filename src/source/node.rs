//! Tagged container tree built from the raw `sessions` value.

use crate::diagnostics::DiagnosticSink;
use crate::error::ScheduleError;

use serde_json::Value;
use std::fmt;

/// A child's key within its parent container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Index(usize),
    Key(String),
}

impl Segment {
    /// Property names are id candidates; array indices are not.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{}", i),
            Segment::Key(k) => f.write_str(k),
        }
    }
}

/// Render a path as it appears in diagnostics: `sessions/day1/0`.
pub fn render_path(path: &[Segment]) -> String {
    let mut out = String::from("sessions");
    for seg in path {
        out.push('/');
        out.push_str(&seg.to_string());
    }
    out
}

/// Either an ordered sequence or a keyed map, decided at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum Container<T> {
    Seq(Vec<T>),
    Map(Vec<(String, T)>),
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Container::Seq(Vec::new())
    }
}

impl<T> Container<T> {
    pub fn len(&self) -> usize {
        match self {
            Container::Seq(v) => v.len(),
            Container::Map(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children in container order, each with its segment.
    pub fn children(&self) -> Vec<(Segment, &T)> {
        match self {
            Container::Seq(v) => v
                .iter()
                .enumerate()
                .map(|(i, t)| (Segment::Index(i), t))
                .collect(),
            Container::Map(v) => v
                .iter()
                .map(|(k, t)| (Segment::Key(k.clone()), t))
                .collect(),
        }
    }
}

/// Recognized, mergeable session fields. `None` means the key was not present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    pub name: Option<String>,
    pub when: Option<Value>,
    pub speakers: Option<Vec<Value>>,
    pub abstract_text: Option<String>,
    pub process: Option<Value>,
    pub track: Option<String>,
}

impl Fields {
    /// Copy every field present in `other` over `self`.
    pub fn overlay(&mut self, other: &Fields) {
        if let Some(v) = &other.name {
            self.name = Some(v.clone());
        }
        if let Some(v) = &other.when {
            self.when = Some(v.clone());
        }
        if let Some(v) = &other.speakers {
            self.speakers = Some(v.clone());
        }
        if let Some(v) = &other.abstract_text {
            self.abstract_text = Some(v.clone());
        }
        if let Some(v) = &other.process {
            self.process = Some(v.clone());
        }
        if let Some(v) = &other.track {
            self.track = Some(v.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A JSON object. `children` is its sub-container, if it has one.
    /// `id` and `label` hold the node's own `id`/`name` only when they are
    /// JSON strings; they are the node's id candidates.
    Entry {
        id: Option<String>,
        label: Option<String>,
        fields: Fields,
        extra: Vec<(String, Value)>,
        children: Option<Container<Node>>,
    },
    /// Anything that is not an object; always a leaf.
    Scalar(Value),
}

impl Node {
    pub fn children(&self) -> Option<&Container<Node>> {
        match self {
            Node::Entry { children, .. } => children.as_ref(),
            Node::Scalar(_) => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Node::Entry { id, .. } => id.as_deref(),
            Node::Scalar(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Entry { label, .. } => label.as_deref(),
            Node::Scalar(_) => None,
        }
    }
}

/// Ingest the raw `sessions` value. `null` is an empty tree; any other
/// non-container root is fatal.
pub fn ingest<S: DiagnosticSink>(
    root: &Value,
    sub_key: &str,
    sink: &mut S,
) -> Result<Container<Node>, ScheduleError> {
    match root {
        Value::Null => Ok(Container::default()),
        Value::Array(_) | Value::Object(_) => {
            let mut path = Vec::new();
            Ok(ingest_container(root, sub_key, &mut path, sink).unwrap_or_default())
        }
        other => Err(ScheduleError::MalformedSessions(kind(other).to_string())),
    }
}

fn ingest_container<S: DiagnosticSink>(
    value: &Value,
    sub_key: &str,
    path: &mut Vec<Segment>,
    sink: &mut S,
) -> Option<Container<Node>> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                path.push(Segment::Index(i));
                out.push(ingest_node(item, sub_key, path, sink));
                path.pop();
            }
            Some(Container::Seq(out))
        }
        Value::Object(map) => {
            let mut out = Vec::with_capacity(map.len());
            for (k, item) in map {
                path.push(Segment::Key(k.clone()));
                out.push((k.clone(), ingest_node(item, sub_key, path, sink)));
                path.pop();
            }
            Some(Container::Map(out))
        }
        _ => None,
    }
}

fn ingest_node<S: DiagnosticSink>(
    value: &Value,
    sub_key: &str,
    path: &mut Vec<Segment>,
    sink: &mut S,
) -> Node {
    let Value::Object(map) = value else {
        return Node::Scalar(value.clone());
    };

    let mut id = None;
    let mut label = None;
    let mut fields = Fields::default();
    let mut extra = Vec::new();
    let mut children = None;

    for (key, v) in map {
        if key == sub_key {
            path.push(Segment::Key(key.clone()));
            let sub = ingest_container(v, sub_key, path, sink);
            path.pop();
            if sub.is_none() {
                sink.warn(
                    format!("Malformed field, expected an array or object: {}", v),
                    format!("{}/{}", render_path(path), key),
                );
            }
            children = Some(sub.unwrap_or_default());
            continue;
        }

        match key.as_str() {
            "id" => id = id_field(key, v, path, sink),
            "name" => {
                label = v.as_str().map(str::to_string);
                fields.name = string_field(key, v, path, sink);
            }
            "track" => fields.track = string_field(key, v, path, sink),
            "abstract" => fields.abstract_text = string_field(key, v, path, sink),
            "when" => fields.when = Some(v.clone()),
            "process" => fields.process = Some(v.clone()),
            "speakers" => {
                fields.speakers = Some(match v {
                    Value::Array(items) => items.clone(),
                    Value::Null => Vec::new(),
                    single => vec![single.clone()],
                })
            }
            // `sessions` when it is not the configured sub-key.
            "sessions" => {}
            _ => extra.push((key.clone(), v.clone())),
        }
    }

    Node::Entry {
        id,
        label,
        fields,
        extra,
        children,
    }
}

/// Strings pass through. `null`, `0` and `false` are present-but-empty;
/// other numbers and `true` are stringified. Arrays/objects are rejected.
fn string_field<S: DiagnosticSink>(
    key: &str,
    value: &Value,
    path: &[Segment],
    sink: &mut S,
) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Bool(false) => Some(String::new()),
        Value::Number(n) if n.as_f64() == Some(0.0) => Some(String::new()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => {
            malformed(key, path, sink);
            None
        }
    }
}

/// Only strings name a node; any other scalar is no id at all.
fn id_field<S: DiagnosticSink>(
    key: &str,
    value: &Value,
    path: &[Segment],
    sink: &mut S,
) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => {
            malformed(key, path, sink);
            None
        }
        _ => None,
    }
}

fn malformed<S: DiagnosticSink>(key: &str, path: &[Segment], sink: &mut S) {
    sink.warn(
        "Malformed field, expected a string",
        format!("{}/{}", render_path(path), key),
    );
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
