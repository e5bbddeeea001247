use chrono::{DateTime, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;
const RECENCY_WINDOW_DAYS: f64 = 100.0;

/// Ranking snapshot for a roadmap item linked to feedback.
///
/// Ten points per vote plus a recency boost of up to ten points that decays
/// linearly over the first hundred days. Ages below one day count as one day.
pub fn priority_score(vote_count: i32, created_at: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
    let age_ms = (now - created_at).num_milliseconds() as f64;
    let age_days = (age_ms / MS_PER_DAY).max(1.0);

    let vote_score = f64::from(vote_count) * 10.0;
    let recency_boost = (RECENCY_WINDOW_DAYS - age_days).max(0.0) / 10.0;

    (vote_score + recency_boost).round() as i32
}
