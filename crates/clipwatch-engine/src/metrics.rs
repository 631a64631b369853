//! Growth and per-hour velocity between two observations of the same video.

use chrono::NaiveDateTime;

use clipwatch_core::{Observation, TIMESTAMP_FORMAT};

use crate::count::coerce_count;

/// Full-precision deltas for one matched pair.
///
/// Velocities here are unrounded; display rounding happens when the scored
/// record is assembled, so the score itself works from full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MetricDeltas {
    pub views_growth: i64,
    pub likes_growth: i64,
    pub comments_growth: i64,
    pub views_velocity: f64,
    pub likes_velocity: f64,
    pub comments_velocity: f64,
}

/// Compute growth and velocity for a current observation against its matched
/// prior observation.
///
/// Growth is a signed difference — counts can appear to shrink when upstream
/// scraping misreads a page, and that is surfaced rather than clamped. All
/// three velocities collapse to 0 when the elapsed time is non-positive or
/// either timestamp fails to parse.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn compute_deltas(current: &Observation, prior: &Observation) -> MetricDeltas {
    let views_growth = coerce_count(current.views.as_ref()) - coerce_count(prior.views.as_ref());
    let likes_growth = coerce_count(current.likes.as_ref()) - coerce_count(prior.likes.as_ref());
    let comments_growth =
        coerce_count(current.comments.as_ref()) - coerce_count(prior.comments.as_ref());

    let hours = elapsed_hours(&prior.collected_at, &current.collected_at);
    let velocity = |growth: i64| match hours {
        Some(h) if h > 0.0 => growth as f64 / h,
        _ => 0.0,
    };

    MetricDeltas {
        views_growth,
        likes_growth,
        comments_growth,
        views_velocity: velocity(views_growth),
        likes_velocity: velocity(likes_growth),
        comments_velocity: velocity(comments_growth),
    }
}

/// Hours elapsed from `prior` to `current`, or `None` when either side fails
/// to parse.
#[allow(clippy::cast_precision_loss)]
fn elapsed_hours(prior: &str, current: &str) -> Option<f64> {
    let prior = parse_timestamp(prior)?;
    let current = parse_timestamp(current)?;
    let seconds = (current - prior).num_seconds();
    Some(seconds as f64 / 3600.0)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Some(ts);
    }
    // Externally collected batches occasionally carry RFC 3339 timestamps.
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Round to 2 decimal places for the output representation.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use clipwatch_core::RawCount;

    use super::*;

    fn obs(views: i64, likes: i64, comments: i64, collected_at: &str) -> Observation {
        Observation {
            platform: "youtube".to_string(),
            video_id: "a".to_string(),
            collected_at: collected_at.to_string(),
            query: "test".to_string(),
            title: None,
            url: None,
            author: None,
            publish_time: None,
            views: Some(RawCount::Number(views)),
            likes: Some(RawCount::Number(likes)),
            comments: Some(RawCount::Number(comments)),
            shares: None,
        }
    }

    #[test]
    fn growth_and_velocity_over_ten_hours() {
        let prior = obs(1000, 50, 10, "2024-01-01 00:00:00");
        let current = obs(1100, 60, 12, "2024-01-01 10:00:00");
        let deltas = compute_deltas(&current, &prior);
        assert_eq!(deltas.views_growth, 100);
        assert_eq!(deltas.likes_growth, 10);
        assert_eq!(deltas.comments_growth, 2);
        assert!((deltas.views_velocity - 10.0).abs() < f64::EPSILON);
        assert!((deltas.likes_velocity - 1.0).abs() < f64::EPSILON);
        assert!((deltas.comments_velocity - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn equal_timestamps_zero_all_velocities() {
        let prior = obs(1000, 50, 10, "2024-01-01 00:00:00");
        let current = obs(2000, 80, 20, "2024-01-01 00:00:00");
        let deltas = compute_deltas(&current, &prior);
        assert_eq!(deltas.views_growth, 1000);
        assert_eq!(deltas.views_velocity, 0.0);
        assert_eq!(deltas.likes_velocity, 0.0);
        assert_eq!(deltas.comments_velocity, 0.0);
    }

    #[test]
    fn inverted_timestamps_zero_all_velocities() {
        let prior = obs(1000, 50, 10, "2024-01-02 00:00:00");
        let current = obs(2000, 80, 20, "2024-01-01 00:00:00");
        let deltas = compute_deltas(&current, &prior);
        assert_eq!(deltas.views_velocity, 0.0);
    }

    #[test]
    fn unparsable_timestamp_keeps_growth_but_zeroes_velocity() {
        let prior = obs(1000, 50, 10, "yesterday-ish");
        let current = obs(1100, 60, 12, "2024-01-01 10:00:00");
        let deltas = compute_deltas(&current, &prior);
        assert_eq!(deltas.views_growth, 100);
        assert_eq!(deltas.views_velocity, 0.0);
    }

    #[test]
    fn negative_growth_is_not_clamped() {
        let prior = obs(2000, 100, 20, "2024-01-01 00:00:00");
        let current = obs(1000, 50, 10, "2024-01-01 10:00:00");
        let deltas = compute_deltas(&current, &prior);
        assert_eq!(deltas.views_growth, -1000);
        assert!((deltas.views_velocity - -100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_numeric_counts_coerce_before_subtraction() {
        let mut prior = obs(0, 0, 0, "2024-01-01 00:00:00");
        prior.views = Some(RawCount::Text("N/A".to_string()));
        let mut current = obs(0, 0, 0, "2024-01-01 01:00:00");
        current.views = Some(RawCount::Text("1.5K".to_string()));
        let deltas = compute_deltas(&current, &prior);
        assert_eq!(deltas.views_growth, 1500);
        assert!((deltas.views_velocity - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let prior = obs(0, 0, 0, "2024-01-01T00:00:00Z");
        let current = obs(3600, 0, 0, "2024-01-01T01:00:00Z");
        let deltas = compute_deltas(&current, &prior);
        assert!((deltas.views_velocity - 3600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert!((round2(1.0 / 3.0) - 0.33).abs() < 1e-12);
        assert!((round2(10.0 / 3.0) - 3.33).abs() < 1e-12);
        assert!((round2(-0.125) - -0.13).abs() < 1e-12);
        assert_eq!(round2(5.0), 5.0);
    }
}
