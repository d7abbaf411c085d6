use crate::Result;
use crate::report::{ScheduleReport, SessionView};

use std::fmt::Write;

/// Render a plain-text listing, one block per day and track.
///
/// Example:
///  Wed 2016-05-18
///    (no track)
///      09:00  Keynote  [Sam]
///    Web
///      10:00  Web Things
pub fn render_listing(report: &ScheduleReport) -> Result<String> {
    let mut out = String::new();
    for day in &report.days {
        writeln!(out, "\n {} {}", day.weekday, day.date)?;
        for track in &day.tracks {
            let title = if track.track.is_empty() {
                "(no track)"
            } else {
                track.track.as_str()
            };
            writeln!(out, "   {}", title)?;
            for session in &track.sessions {
                writeln!(out, "     {}", session_line(session))?;
            }
        }
    }
    Ok(out)
}

fn session_line(session: &SessionView) -> String {
    let mut line = format!("{}  {}", session.time, session.name);
    if !session.speakers.is_empty() {
        line.push_str(&format!("  [{}]", session.speakers.join(", ")));
    }
    line
}
