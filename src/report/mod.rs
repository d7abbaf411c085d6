//! Report model: the parsed schedule as days -> tracks -> sessions.
//!
//! Everything here is `Serialize` so the `report` command can write it out
//! as JSON and the text listing can render from the same data.

use crate::model::{GroupManager, Session};
use crate::parser::Parsed;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: String,
    pub name: String,
    pub track: String,
    /// RFC 3339, with the schedule's offset.
    pub when: String,
    /// Local `HH:MM`.
    pub time: String,
    pub speakers: Vec<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackView {
    /// Empty for sessions without a track.
    pub track: String,
    pub sessions: Vec<SessionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: String,
    pub weekday: String,
    pub tracks: Vec<TrackView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub sessions: usize,
    pub days: usize,
    pub tracks: usize,
    pub speakers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub timezone: String,
    pub totals: TotalsView,
    pub days: Vec<DayView>,
}

pub fn build_report(parsed: &Parsed) -> ScheduleReport {
    let schedule = &parsed.schedule;

    let days: Vec<DayView> = schedule
        .by_date()
        .into_iter()
        .map(|(date, group)| day_view(date, &group))
        .collect();

    ScheduleReport {
        timezone: parsed.timezone.name().to_string(),
        totals: TotalsView {
            sessions: schedule.len(),
            days: days.len(),
            tracks: schedule.by_track().len(),
            speakers: parsed.speakers(),
        },
        days,
    }
}

fn day_view(date: String, group: &GroupManager) -> DayView {
    let weekday = group
        .iter()
        .next()
        .map(|s| s.when().format("%a").to_string())
        .unwrap_or_default();

    let tracks = group
        .by_track()
        .into_iter()
        .map(|(track, sessions)| TrackView {
            track,
            sessions: sessions.iter().map(|s| session_view(s)).collect(),
        })
        .collect();

    DayView {
        date,
        weekday,
        tracks,
    }
}

fn session_view(session: &Session) -> SessionView {
    SessionView {
        id: session.id().to_string(),
        name: session.name().to_string(),
        track: session.track().to_string(),
        when: session.when().to_rfc3339(),
        time: session.when().format("%H:%M").to_string(),
        speakers: session
            .speaker_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        abstract_text: session
            .data()
            .abstract_text
            .clone()
            .filter(|s| !s.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::source::ScheduleSource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parsed() -> Parsed {
        let source: ScheduleSource = serde_json::from_value(json!({
            "config": {"timezone": "Europe/Berlin"},
            "speakers": {"sam": "Sam"},
            "sessions": {
                "wed": {"sessions": [
                    {"name": "Keynote", "when": "2016-05-18T09:00", "speakers": ["sam"]},
                    {"name": "Web", "track": "Web", "when": "2016-05-18T10:00",
                     "abstract": "Things"},
                ]},
                "thu": {"sessions": [
                    {"name": "Closing", "when": "2016-05-19T17:00"},
                ]},
            },
        }))
        .unwrap();
        parse(&source).unwrap()
    }

    #[test]
    fn report_groups_by_day_then_track() {
        let report = build_report(&parsed());

        assert_eq!(report.timezone, "Europe/Berlin");
        assert_eq!(report.totals.sessions, 3);
        assert_eq!(report.totals.days, 2);
        assert_eq!(report.totals.tracks, 2);
        assert_eq!(report.totals.speakers, 1);

        let wed = &report.days[0];
        assert_eq!(wed.date, "2016-05-18");
        assert_eq!(wed.weekday, "Wed");
        let tracks: Vec<&str> = wed.tracks.iter().map(|t| t.track.as_str()).collect();
        assert_eq!(tracks, vec!["", "Web"]);
        assert_eq!(wed.tracks[0].sessions[0].speakers, vec!["Sam"]);
        assert_eq!(wed.tracks[0].sessions[0].time, "09:00");
    }

    #[test]
    fn report_serializes_abstract_only_when_present() {
        let report = build_report(&parsed());
        let value = serde_json::to_value(&report).unwrap();
        let web = &value["days"][0]["tracks"][1]["sessions"][0];
        assert_eq!(web["abstract"], json!("Things"));
        assert_eq!(web["when"], json!("2016-05-18T10:00:00+02:00"));

        let keynote = &value["days"][0]["tracks"][0]["sessions"][0];
        assert!(keynote.get("abstract").is_none());
    }
}
