//! Time-ordered session collections and keyed partitions of them.

use crate::model::Session;

use std::collections::BTreeMap;
use std::sync::Arc;

/// Keyed child groups, keys ascending.
pub type Groups = BTreeMap<String, GroupManager>;

/// An immutable, time-sorted set of sessions.
///
/// Construction copies the input and sorts it by `when`; ties keep their
/// input order. Grouping never touches the parent.
#[derive(Debug, Clone, Default)]
pub struct GroupManager {
    sessions: Vec<Arc<Session>>,
}

impl GroupManager {
    pub fn new<I>(sessions: I) -> Self
    where
        I: IntoIterator<Item = Arc<Session>>,
    {
        let mut sessions: Vec<Arc<Session>> = sessions.into_iter().collect();
        // `sort_by` is stable.
        sessions.sort_by(|a, b| a.when().cmp(b.when()));
        Self { sessions }
    }

    /// A copy of every session, in time order.
    pub fn all(&self) -> Vec<Arc<Session>> {
        self.sessions.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Session>> {
        self.sessions.iter()
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Session, usize),
    {
        for (i, session) in self.sessions.iter().enumerate() {
            f(session, i);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Partition by `key`. An empty key is its own group.
    pub fn by<F>(&self, key: F) -> Groups
    where
        F: Fn(&Session) -> String,
    {
        let mut raw: BTreeMap<String, Vec<Arc<Session>>> = BTreeMap::new();
        for session in &self.sessions {
            raw.entry(key(session)).or_default().push(Arc::clone(session));
        }
        raw.into_iter()
            .map(|(k, group)| (k, GroupManager::new(group)))
            .collect()
    }

    /// Group by local calendar date, `YYYY-MM-DD`.
    pub fn by_date(&self) -> Groups {
        self.by(|s| s.when().format("%Y-%m-%d").to_string())
    }

    pub fn by_track(&self) -> Groups {
        self.by(|s| s.track().to_string())
    }

    /// Number of distinct calendar dates.
    pub fn dates(&self) -> usize {
        self.by_date().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Session, SessionData};
    use chrono::TimeZone;
    use chrono_tz::Tz;
    use pretty_assertions::assert_eq;

    fn session(id: &str, track: Option<&str>, day: u32, hour: u32) -> Arc<Session> {
        let tz: Tz = "Europe/Berlin".parse().unwrap();
        let when = tz.with_ymd_and_hms(2016, 5, day, hour, 0, 0).unwrap();
        let data = SessionData {
            name: Some(id.to_uppercase()),
            track: track.map(str::to_string),
            ..SessionData::default()
        };
        Arc::new(Session::new(id, data, when, Vec::new()))
    }

    fn ids(group: &GroupManager) -> Vec<String> {
        group.iter().map(|s| s.id().to_string()).collect()
    }

    #[test]
    fn sessions_are_sorted_by_time_and_ties_keep_order() {
        let group = GroupManager::new(vec![
            session("late", None, 19, 10),
            session("tie-a", None, 18, 9),
            session("early", None, 18, 8),
            session("tie-b", None, 18, 9),
        ]);
        assert_eq!(ids(&group), vec!["early", "tie-a", "tie-b", "late"]);
    }

    #[test]
    fn all_is_a_copy() {
        let group = GroupManager::new(vec![session("a", None, 18, 9)]);
        let mut copy = group.all();
        copy.clear();
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn for_each_visits_in_order_with_index() {
        let group = GroupManager::new(vec![session("b", None, 18, 10), session("a", None, 18, 9)]);
        let mut seen = Vec::new();
        group.for_each(|s, i| seen.push(format!("{}:{}", i, s.id())));
        assert_eq!(seen, vec!["0:a", "1:b"]);
    }

    #[test]
    fn by_track_partitions_with_sorted_keys() {
        let group = GroupManager::new(vec![
            session("web", Some("Web"), 18, 11),
            session("open", None, 18, 9),
            session("android", Some("Android"), 18, 10),
            session("web2", Some("Web"), 18, 10),
        ]);

        let tracks = group.by_track();
        let keys: Vec<&str> = tracks.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["", "Android", "Web"]);
        assert_eq!(ids(&tracks["Web"]), vec!["web2", "web"]);

        let total: usize = tracks.values().map(GroupManager::len).sum();
        assert_eq!(total, group.len());
        for (key, child) in &tracks {
            assert!(child.iter().all(|s| s.track() == key));
        }
        // Grouping leaves the parent alone.
        assert_eq!(ids(&group), vec!["open", "android", "web2", "web"]);
    }

    #[test]
    fn by_date_uses_local_calendar_date() {
        let group = GroupManager::new(vec![
            session("d2", None, 19, 0),
            session("d1", None, 18, 23),
            session("d1b", None, 18, 9),
        ]);
        let days = group.by_date();
        let keys: Vec<&str> = days.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2016-05-18", "2016-05-19"]);
        assert_eq!(ids(&days["2016-05-18"]), vec!["d1b", "d1"]);
        assert_eq!(group.dates(), 2);
    }

    #[test]
    fn custom_key_function() {
        let group = GroupManager::new(vec![
            session("morning", None, 18, 9),
            session("evening", None, 18, 19),
        ]);
        let halves = group.by(|s| {
            if s.when().format("%H").to_string() < "12".to_string() {
                "am".to_string()
            } else {
                "pm".to_string()
            }
        });
        assert_eq!(ids(&halves["am"]), vec!["morning"]);
        assert_eq!(ids(&halves["pm"]), vec!["evening"]);
    }
}
