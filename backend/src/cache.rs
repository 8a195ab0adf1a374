//! Read-through cache for upstream responses
//!
//! Keys are `prefix:lowercased-city`, so lookups are case-insensitive on the
//! city name. A live entry is returned verbatim; expiry is the only
//! staleness control. Concurrent misses on the same key may each invoke the
//! compute function, with the last write winning.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Shared in-process cache, cheap to clone across handlers.
#[derive(Clone, Default)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_key(prefix: &str, city: &str) -> String {
        format!("{}:{}", prefix, city.to_lowercase())
    }

    /// Return the live entry under `prefix:city`, or invoke `compute`, store
    /// its result with `expires_at = now + ttl`, and return it. A failed
    /// compute propagates without being cached.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        prefix: &str,
        city: &str,
        ttl: Duration,
        compute: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let key = Self::cache_key(prefix, city);

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if Instant::now() < entry.expires_at {
                    if let Ok(value) = serde_json::from_value(entry.value.clone()) {
                        tracing::debug!(key = %key, "cache hit");
                        return Ok(value);
                    }
                }
            }
        }

        tracing::debug!(key = %key, "cache miss");
        let value = compute().await?;
        let stored = serde_json::to_value(&value)
            .map_err(|e| AppError::Internal(format!("cache serialization failed: {e}")))?;

        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                value: stored,
                expires_at: Instant::now() + ttl,
            },
        );

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(600);

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test]
    async fn test_second_lookup_within_ttl_skips_compute() {
        let cache = ResponseCache::new();
        let calls = counter();

        for _ in 0..2 {
            let calls = calls.clone();
            let value: f64 = cache
                .get_or_compute("current_weather", "Moscow", TTL, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, AppError>(21.5)
                })
                .await
                .unwrap();
            assert_eq!(value, 21.5);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_city_casing_shares_one_entry() {
        let cache = ResponseCache::new();
        let calls = counter();

        for city in ["London", "LONDON", "london"] {
            let calls = calls.clone();
            let _: f64 = cache
                .get_or_compute("current_weather", city, TTL, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, AppError>(17.0)
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            ResponseCache::cache_key("current_weather", "London"),
            "current_weather:london"
        );
    }

    #[tokio::test]
    async fn test_prefixes_do_not_collide() {
        let cache = ResponseCache::new();
        let calls = counter();

        for prefix in ["current_weather", "forecast"] {
            let calls = calls.clone();
            let _: f64 = cache
                .get_or_compute(prefix, "Moscow", TTL, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, AppError>(21.5)
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_recomputes() {
        let cache = ResponseCache::new();
        let calls = counter();

        for _ in 0..2 {
            let calls = calls.clone();
            let _: f64 = cache
                .get_or_compute(
                    "current_weather",
                    "Moscow",
                    Duration::ZERO,
                    move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, AppError>(21.5)
                    },
                )
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_compute_is_not_cached() {
        let cache = ResponseCache::new();
        let calls = counter();

        let failing = calls.clone();
        let result: AppResult<f64> = cache
            .get_or_compute("current_weather", "Moscow", TTL, move || async move {
                failing.fetch_add(1, Ordering::SeqCst);
                Err(AppError::Internal("upstream down".into()))
            })
            .await;
        assert!(result.is_err());

        let succeeding = calls.clone();
        let value: f64 = cache
            .get_or_compute("current_weather", "Moscow", TTL, move || async move {
                succeeding.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AppError>(21.5)
            })
            .await
            .unwrap();

        assert_eq!(value, 21.5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forecast_map_round_trips() {
        use chrono::NaiveDate;
        use shared::models::ForecastDay;
        use std::collections::BTreeMap;

        let cache = ResponseCache::new();
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let mut days = BTreeMap::new();
        days.insert(
            date,
            ForecastDay {
                date,
                min_temperature: 10.0,
                max_temperature: 20.0,
            },
        );

        let stored = days.clone();
        let first: BTreeMap<NaiveDate, ForecastDay> = cache
            .get_or_compute("forecast", "Moscow", TTL, move || async move {
                Ok::<_, AppError>(stored)
            })
            .await
            .unwrap();
        let second: BTreeMap<NaiveDate, ForecastDay> = cache
            .get_or_compute("forecast", "Moscow", TTL, move || async move {
                Err(AppError::Internal("cached entry should be served".into()))
            })
            .await
            .unwrap();

        assert_eq!(first, days);
        assert_eq!(second, days);
    }
}
