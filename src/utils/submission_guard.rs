use moka::future::Cache;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Leave submissions per login session, keyed by the access token's jti.
/// A fresh login or a token refresh mints a new jti, so the count starts
/// over — the cap is an abuse guard, not a durable quota.
static SUBMISSION_COUNTS: Lazy<Cache<String, Arc<AtomicU32>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(86400)) // outlives any access token
        .build()
});

/// Submissions recorded for this session so far.
pub async fn count(session_jti: &str) -> u32 {
    match SUBMISSION_COUNTS.get(session_jti).await {
        Some(counter) => counter.load(Ordering::Relaxed),
        None => 0,
    }
}

/// Record one successful submission; returns the new count.
pub async fn increment(session_jti: &str) -> u32 {
    let counter = SUBMISSION_COUNTS
        .get_with(session_jti.to_owned(), async { Arc::new(AtomicU32::new(0)) })
        .await;

    counter.fetch_add(1, Ordering::Relaxed) + 1
}

#[cfg(test)]
mod tests {
    use super::{count, increment};

    #[actix_web::test]
    async fn counts_start_at_zero() {
        assert_eq!(count("guard-jti-fresh").await, 0);
    }

    #[actix_web::test]
    async fn increments_accumulate_per_session() {
        for expected in 1..=10 {
            assert_eq!(increment("guard-jti-a").await, expected);
        }
        assert_eq!(count("guard-jti-a").await, 10);

        // other sessions are unaffected
        assert_eq!(count("guard-jti-b").await, 0);
        assert_eq!(increment("guard-jti-b").await, 1);
    }
}
