//! Graded findings reported while parsing a schedule.
//!
//! The parser never keeps a log of its own: every finding is handed to a
//! [`DiagnosticSink`] supplied by the caller. Fatal conditions are not
//! diagnostics, they are [`crate::error::ScheduleError`]s.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "i8")]
pub enum Severity {
    /// The entity was excluded from the output.
    Drop,
    /// The entity was kept, but something about it looks off.
    Warn,
    /// Informational, e.g. the final summary.
    Info,
}

impl Severity {
    pub fn level(self) -> i8 {
        match self {
            Severity::Drop => -1,
            Severity::Warn => 0,
            Severity::Info => 1,
        }
    }

    /// Drops and warnings; what a strict caller escalates.
    pub fn is_problem(self) -> bool {
        self.level() <= 0
    }
}

impl From<Severity> for i8 {
    fn from(severity: Severity) -> i8 {
        severity.level()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            path: None,
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(path) = &self.path {
            write!(f, " {}", path)?;
        }
        Ok(())
    }
}

/// Receives every diagnostic produced during a parse.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn drop_entity(&mut self, message: impl Into<String>, path: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Drop, message).at(path));
    }

    fn warn(&mut self, message: impl Into<String>, path: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Warn, message).at(path));
    }

    fn info(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Info, message));
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Forwards each diagnostic as a `tracing` event, then to the inner sink.
pub struct TracingSink<S> {
    inner: S,
}

impl<S: DiagnosticSink> TracingSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DiagnosticSink> DiagnosticSink for TracingSink<S> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let path = diagnostic.path.as_deref().unwrap_or("");
        match diagnostic.severity {
            Severity::Drop => tracing::warn!(path, "dropped: {}", diagnostic.message),
            Severity::Warn => tracing::warn!(path, "{}", diagnostic.message),
            Severity::Info => tracing::info!(path, "{}", diagnostic.message),
        }
        self.inner.report(diagnostic);
    }
}

/// Render diagnostics as an audit list, one line each.
///
/// Example:
/// ✘ Invalid date; ignoring session: tomorrow sessions/day1/0
/// ? Unknown field sessions/day1/0/foo
/// ✓ Found 12 sessions on 2 days
pub fn render_audits(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        let code = match d.severity {
            Severity::Drop => '✘',
            Severity::Warn => '?',
            Severity::Info => '✓',
        };
        out.push(code);
        out.push(' ');
        out.push_str(&d.to_string());
        out.push('\n');
    }
    out
}

/// Count diagnostics a strict caller would escalate.
pub fn problems(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity.is_problem())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn severity_orders_drop_before_info() {
        assert!(Severity::Drop < Severity::Warn);
        assert!(Severity::Warn < Severity::Info);
        assert_eq!(Severity::Drop.level(), -1);
        assert!(Severity::Warn.is_problem());
        assert!(!Severity::Info.is_problem());
    }

    #[test]
    fn audits_render_code_message_and_path() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.drop_entity("Ignoring session with empty name", "sessions/0");
        sink.warn("Unknown field", "sessions/0/foo");
        sink.info("Found 0 sessions on 0 days");

        assert_eq!(
            render_audits(&sink),
            "✘ Ignoring session with empty name sessions/0\n\
             ? Unknown field sessions/0/foo\n\
             ✓ Found 0 sessions on 0 days\n"
        );
        assert_eq!(problems(&sink), 2);
    }

    #[test]
    fn tracing_sink_passes_everything_through() {
        let mut sink = TracingSink::new(Vec::new());
        sink.info("hello");
        sink.warn("odd", "sessions/a");
        let inner = sink.into_inner();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[1].path.as_deref(), Some("sessions/a"));
    }

    #[test]
    fn severity_serializes_as_level() {
        let d = Diagnostic::new(Severity::Drop, "gone");
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            serde_json::json!({"severity": -1, "message": "gone"})
        );
    }
}
