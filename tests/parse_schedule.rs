use pretty_assertions::assert_eq;
use schedule_json::report::build_report;
use schedule_json::{ScheduleSource, Severity, parse};

const FIXTURE: &str = include_str!("fixtures/schedule.json");

fn parsed() -> schedule_json::Parsed {
    let source = ScheduleSource::from_json(FIXTURE).unwrap();
    parse(&source).unwrap()
}

#[test]
fn fixture_keeps_valid_sessions_in_time_order() {
    let parsed = parsed();
    let ids: Vec<String> = parsed
        .schedule
        .iter()
        .map(|s| s.id().to_string())
        .collect();
    assert_eq!(
        ids,
        vec![
            "registration",
            "keynote",
            "service-workers",
            "push",
            "keynote-keynote",
        ]
    );
}

#[test]
fn fixture_reports_drops_warnings_and_summary() {
    let parsed = parsed();
    let lines: Vec<(i8, String)> = parsed
        .diagnostics
        .iter()
        .map(|d| (d.severity.level(), d.to_string()))
        .collect();

    assert_eq!(
        lines,
        vec![
            (1, "Using timezone: Australia/Sydney".to_string()),
            (-1, "Invalid date; ignoring session: sometime sessions/day2/party".to_string()),
            (-1, "Ignoring session with empty name sessions/day2/mystery".to_string()),
            (0, "Unknown field sessions/day1/web/1/room".to_string()),
            (1, "Found 5 sessions on 2 days".to_string()),
        ]
    );
    assert_eq!(
        parsed
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Drop)
            .count(),
        2
    );
}

#[test]
fn groups_partition_every_session_exactly_once() {
    let parsed = parsed();
    let schedule = &parsed.schedule;

    for groups in [schedule.by_date(), schedule.by_track()] {
        let mut seen: Vec<String> = groups
            .values()
            .flat_map(|g| g.iter().map(|s| s.id().to_string()))
            .collect();
        let mut all: Vec<String> = schedule.iter().map(|s| s.id().to_string()).collect();
        seen.sort();
        all.sort();
        assert_eq!(seen, all);
    }

    let tracks: Vec<String> = schedule.by_track().into_keys().collect();
    assert_eq!(tracks, vec!["".to_string(), "Web".to_string()]);
}

#[test]
fn report_lists_speakers_by_name() {
    let report = build_report(&parsed());
    assert_eq!(report.totals.sessions, 5);
    assert_eq!(report.totals.days, 2);
    assert_eq!(report.totals.speakers, 3);

    let keynote = &report.days[0].tracks[0].sessions[1];
    assert_eq!(keynote.name, "Keynote");
    assert_eq!(keynote.speakers, vec!["Sam Thorogood", "Ada Lovelace"]);
    assert_eq!(keynote.when, "2016-05-18T09:00:00+10:00");

    let workers = &report.days[0].tracks[1].sessions[0];
    assert_eq!(workers.speakers, vec!["Grace Hopper"]);
}
