//! Shared predicates behind every list endpoint: case-insensitive text search
//! over a fixed field set, exact-match facet filters, and the upcoming/past
//! partition for events. Active predicates always combine with AND.

use chrono::{DateTime, Utc};

/// Matches when ANY field contains the term, case-insensitively. An empty or
/// whitespace-only term matches everything.
pub fn text_match(term: &str, fields: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}

/// Exact-match facet filter. `None` and `"all"` select everything.
pub fn facet_match(selected: Option<&str>, value: &str) -> bool {
    match selected {
        None => true,
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("all") => true,
        Some(s) => s == value,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    Upcoming,
    Past,
    All,
}

impl EventScope {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("upcoming") => EventScope::Upcoming,
            Some("past") => EventScope::Past,
            _ => EventScope::All,
        }
    }

    /// Wall-clock partition at request time: upcoming is `date >= now`.
    pub fn includes(self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            EventScope::Upcoming => date >= now,
            EventScope::Past => date < now,
            EventScope::All => true,
        }
    }
}

/// Funding progress for display, as a whole percentage clamped to [0, 100].
pub fn progress_percent(raised: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (raised / target * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn text_match_is_case_insensitive_and_any_field() {
        assert!(text_match("WATER", &["Clean water initiative", "Kenya"]));
        assert!(text_match("kenya", &["Clean water initiative", "Kenya"]));
        assert!(!text_match("school", &["Clean water initiative", "Kenya"]));
        assert!(text_match("", &["anything"]));
        assert!(text_match("   ", &["anything"]));
    }

    #[test]
    fn facet_all_and_none_match_everything() {
        assert!(facet_match(None, "education"));
        assert!(facet_match(Some("all"), "education"));
        assert!(facet_match(Some(""), "education"));
        assert!(facet_match(Some("education"), "education"));
        assert!(!facet_match(Some("health"), "education"));
    }

    #[test]
    fn search_and_facet_compose_with_and_semantics() {
        let rows = [
            ("Clean Water", "health"),
            ("Water Polo Camp", "sports"),
            ("Rural Clinics", "health"),
        ];
        let matched: Vec<&str> = rows
            .iter()
            .copied()
            .filter(|&(title, cat)| {
                text_match("water", &[title]) && facet_match(Some("health"), cat)
            })
            .map(|(title, _)| title)
            .collect();
        assert_eq!(matched, vec!["Clean Water"]);
    }

    #[test]
    fn event_scope_partitions_on_wall_clock() {
        let now = Utc::now();
        let tomorrow = now + Duration::days(1);
        let yesterday = now - Duration::days(1);

        assert!(EventScope::Upcoming.includes(tomorrow, now));
        assert!(!EventScope::Upcoming.includes(yesterday, now));
        assert!(EventScope::Past.includes(yesterday, now));
        assert!(!EventScope::Past.includes(tomorrow, now));
        assert!(EventScope::All.includes(yesterday, now));
        // Boundary: an event exactly at "now" counts as upcoming.
        assert!(EventScope::Upcoming.includes(now, now));
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_percent(2500.0, 10000.0), 25.0);
        assert_eq!(progress_percent(12000.0, 10000.0), 100.0);
        assert_eq!(progress_percent(0.0, 10000.0), 0.0);
        assert_eq!(progress_percent(100.0, 0.0), 0.0);
    }
}
