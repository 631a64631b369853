//! Virality scoring and ranking.
//!
//! Two paths produce `viral_score`:
//!
//! - **warm** — a prior observation of the same video exists, so the score is
//!   a weighted blend of per-hour growth velocities;
//! - **cold** — first sighting (or no usable history at all), so the score
//!   falls back to a weighted magnitude estimate boosted by the like/view
//!   engagement ratio.
//!
//! The two scales differ on purpose and are ranked together anyway; the only
//! promise is "higher is more viral" within one batch.

use clipwatch_core::{Observation, ScoredObservation};

use crate::count::coerce_count;
use crate::metrics::{compute_deltas, round2, MetricDeltas};

/// Warm-path velocity weights: view growth rate dominates the signal, likes
/// next, comments least.
const VIEWS_VELOCITY_WEIGHT: f64 = 0.5;
const LIKES_VELOCITY_WEIGHT: f64 = 0.3;
const COMMENTS_VELOCITY_WEIGHT: f64 = 0.2;

/// Cold-path action weights: an explicit like or comment is a stronger
/// per-unit virality signal than a view.
const LIKE_ACTION_WEIGHT: i64 = 10;
const COMMENT_ACTION_WEIGHT: i64 = 20;
const ACTIONS_SCALE: f64 = 10_000.0;
const ENGAGEMENT_DAMPING: f64 = 10.0;

/// Score every observation in `current` against the most recent prior batch
/// and return them ranked by `viral_score`, highest first.
///
/// An empty `previous` batch routes every observation through the cold path.
/// The sort is stable, so equal scores keep their input order and the output
/// is deterministic for fixed inputs.
#[must_use]
pub fn score_and_rank(current: &[Observation], previous: &[Observation]) -> Vec<ScoredObservation> {
    let mut scored: Vec<ScoredObservation> = current
        .iter()
        .map(|obs| match find_prior(obs, previous) {
            Some(prior) => warm_scored(obs, prior),
            None => cold_scored(obs),
        })
        .collect();
    scored.sort_by(|a, b| b.viral_score.total_cmp(&a.viral_score));
    scored
}

/// Prior observation of the same video: exact equality on both `video_id`
/// and `platform`, first match wins.
fn find_prior<'a>(current: &Observation, previous: &'a [Observation]) -> Option<&'a Observation> {
    previous
        .iter()
        .find(|prior| prior.identity() == current.identity())
}

fn warm_scored(obs: &Observation, prior: &Observation) -> ScoredObservation {
    let deltas = compute_deltas(obs, prior);
    // Score from full-precision velocities; the rounded copies below are the
    // display representation.
    let score = VIEWS_VELOCITY_WEIGHT * deltas.views_velocity
        + LIKES_VELOCITY_WEIGHT * deltas.likes_velocity
        + COMMENTS_VELOCITY_WEIGHT * deltas.comments_velocity;

    let MetricDeltas {
        views_growth,
        likes_growth,
        comments_growth,
        views_velocity,
        likes_velocity,
        comments_velocity,
    } = deltas;

    ScoredObservation {
        observation: obs.clone(),
        views_growth,
        likes_growth,
        comments_growth,
        views_velocity: round2(views_velocity),
        likes_velocity: round2(likes_velocity),
        comments_velocity: round2(comments_velocity),
        viral_score: round2(score),
    }
}

#[allow(clippy::cast_precision_loss)]
fn cold_scored(obs: &Observation) -> ScoredObservation {
    let views = coerce_count(obs.views.as_ref());
    let likes = coerce_count(obs.likes.as_ref());
    let comments = coerce_count(obs.comments.as_ref());

    let actions_sum = views
        .saturating_add(LIKE_ACTION_WEIGHT.saturating_mul(likes))
        .saturating_add(COMMENT_ACTION_WEIGHT.saturating_mul(comments));
    let engagement = if views > 0 {
        100.0 * likes as f64 / views as f64
    } else {
        0.0
    };
    let score = (actions_sum as f64 / ACTIONS_SCALE) * (1.0 + engagement / ENGAGEMENT_DAMPING);

    ScoredObservation {
        observation: obs.clone(),
        views_growth: 0,
        likes_growth: 0,
        comments_growth: 0,
        views_velocity: 0.0,
        likes_velocity: 0.0,
        comments_velocity: 0.0,
        viral_score: round2(score),
    }
}

#[cfg(test)]
mod tests {
    use clipwatch_core::RawCount;

    use super::*;

    fn obs(
        platform: &str,
        video_id: &str,
        views: impl Into<RawCount>,
        likes: impl Into<RawCount>,
        comments: impl Into<RawCount>,
        collected_at: &str,
    ) -> Observation {
        Observation {
            platform: platform.to_string(),
            video_id: video_id.to_string(),
            collected_at: collected_at.to_string(),
            query: "test".to_string(),
            title: None,
            url: None,
            author: None,
            publish_time: None,
            views: Some(views.into()),
            likes: Some(likes.into()),
            comments: Some(comments.into()),
            shares: None,
        }
    }

    #[test]
    fn cold_path_with_empty_history() {
        let current = vec![obs("P", "a", 1000, 50, 10, "2024-01-01 00:00:00")];
        let ranked = score_and_rank(&current, &[]);
        assert_eq!(ranked.len(), 1);
        let r = &ranked[0];
        assert_eq!(r.views_growth, 0);
        assert_eq!(r.likes_growth, 0);
        assert_eq!(r.comments_growth, 0);
        assert_eq!(r.views_velocity, 0.0);
        assert_eq!(r.likes_velocity, 0.0);
        assert_eq!(r.comments_velocity, 0.0);
        // (1000 + 500 + 200)/10000 * (1 + 5/10) = 0.17 * 1.5
        assert!((r.viral_score - 0.26).abs() < 1e-9, "got {}", r.viral_score);
    }

    #[test]
    fn warm_path_growth_velocity_and_score() {
        let previous = vec![obs("P", "a", 1000, 50, 10, "2024-01-01 00:00:00")];
        let current = vec![obs("P", "a", 1100, 60, 12, "2024-01-01 10:00:00")];
        let ranked = score_and_rank(&current, &previous);
        let r = &ranked[0];
        assert_eq!(r.views_growth, 100);
        assert_eq!(r.likes_growth, 10);
        assert_eq!(r.comments_growth, 2);
        assert!((r.views_velocity - 10.0).abs() < 1e-9);
        assert!((r.likes_velocity - 1.0).abs() < 1e-9);
        assert!((r.comments_velocity - 0.2).abs() < 1e-9);
        // 0.5*10 + 0.3*1 + 0.2*0.2 = 5.34
        assert!((r.viral_score - 5.34).abs() < 1e-9, "got {}", r.viral_score);
    }

    #[test]
    fn equal_timestamps_do_not_divide_by_zero() {
        let previous = vec![obs("P", "a", 1000, 50, 10, "2024-01-01 00:00:00")];
        let current = vec![obs("P", "a", 9999, 99, 99, "2024-01-01 00:00:00")];
        let ranked = score_and_rank(&current, &previous);
        let r = &ranked[0];
        assert_eq!(r.views_growth, 8999);
        assert_eq!(r.views_velocity, 0.0);
        assert_eq!(r.viral_score, 0.0);
    }

    #[test]
    fn matching_requires_platform_and_video_id() {
        // Same video_id on another platform must not match — it goes cold.
        let previous = vec![obs("tiktok", "a", 1000, 50, 10, "2024-01-01 00:00:00")];
        let current = vec![obs("youtube", "a", 1000, 50, 10, "2024-01-01 10:00:00")];
        let ranked = score_and_rank(&current, &previous);
        assert_eq!(ranked[0].views_growth, 0);
        assert!(ranked[0].viral_score > 0.0);
    }

    #[test]
    fn non_numeric_record_scores_zero_without_panicking() {
        let current = vec![obs("P", "a", "N/A", "N/A", "N/A", "2024-01-01 00:00:00")];
        let ranked = score_and_rank(&current, &[]);
        assert_eq!(ranked[0].viral_score, 0.0);
    }

    #[test]
    fn mixed_batch_ranks_descending() {
        let previous = vec![obs("P", "hot", 1000, 0, 0, "2024-01-01 00:00:00")];
        let current = vec![
            obs("P", "cold", 1000, 0, 0, "2024-01-01 01:00:00"),
            obs("P", "hot", 101_000, 0, 0, "2024-01-01 01:00:00"),
        ];
        let ranked = score_and_rank(&current, &previous);
        // hot: warm path, 100k views/hour -> 50000.0; cold: 1000/10000 = 0.1
        assert_eq!(ranked[0].observation.video_id, "hot");
        assert!((ranked[0].viral_score - 50_000.0).abs() < 1e-9);
        assert_eq!(ranked[1].observation.video_id, "cold");
        assert!(ranked[0].viral_score > ranked[1].viral_score);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let current = vec![
            obs("P", "first", 1000, 50, 10, "2024-01-01 00:00:00"),
            obs("P", "second", 1000, 50, 10, "2024-01-01 00:00:00"),
            obs("P", "third", 2000, 0, 0, "2024-01-01 00:00:00"),
        ];
        let ranked = score_and_rank(&current, &[]);
        // first/second tie at 0.26; third scores 0.2.
        assert_eq!(ranked[0].observation.video_id, "first");
        assert_eq!(ranked[1].observation.video_id, "second");
        assert_eq!(ranked[2].observation.video_id, "third");
    }

    #[test]
    fn output_is_deterministic() {
        let previous = vec![
            obs("P", "a", 1000, 50, 10, "2024-01-01 00:00:00"),
            obs("Q", "b", 500, 5, 1, "2024-01-01 00:00:00"),
        ];
        let current = vec![
            obs("P", "a", 1100, 60, 12, "2024-01-01 10:00:00"),
            obs("Q", "b", 700, 9, 1, "2024-01-01 10:00:00"),
            obs("P", "c", 300, 2, 0, "2024-01-01 10:00:00"),
        ];
        let once = score_and_rank(&current, &previous);
        let twice = score_and_rank(&current, &previous);
        assert_eq!(once, twice);
    }

    #[test]
    fn negative_growth_produces_negative_score() {
        let previous = vec![obs("P", "a", 2000, 100, 20, "2024-01-01 00:00:00")];
        let current = vec![obs("P", "a", 1000, 50, 10, "2024-01-01 10:00:00")];
        let ranked = score_and_rank(&current, &previous);
        assert_eq!(ranked[0].views_growth, -1000);
        assert!(ranked[0].viral_score < 0.0);
    }

    #[test]
    fn cold_path_zero_views_has_zero_engagement() {
        let current = vec![obs("P", "a", 0, 100, 0, "2024-01-01 00:00:00")];
        let ranked = score_and_rank(&current, &[]);
        // actions = 1000, engagement = 0 -> 1000/10000 = 0.1
        assert!((ranked[0].viral_score - 0.1).abs() < 1e-9);
    }
}
