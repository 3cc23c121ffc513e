//! Lookup metrics for text resolution.
//!
//! Every `resolve_text` call records exactly one outcome: a direct hit in
//! the current language, a fallback hit in another language, or a miss.
//! The counters are atomics so lookups only need `&self`.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-resolver lookup counters.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Texts found in the current language
    hits: AtomicUsize,

    /// Texts found only in another supported language
    fallbacks: AtomicUsize,

    /// Lookups that produced the missing placeholder
    misses: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let fallbacks = self.fallbacks();
        let misses = self.misses();
        let lookups = hits + fallbacks + misses;

        let percentage = |count: usize| {
            if lookups > 0 {
                (count as f64 / lookups as f64) * 100.0
            } else {
                0.0
            }
        };

        MetricsReport {
            lookups,
            hits,
            fallbacks,
            misses,
            hit_rate: percentage(hits),
            fallback_rate: percentage(fallbacks),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of lookup statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub lookups: usize,
    pub hits: usize,
    pub fallbacks: usize,
    pub misses: usize,

    /// Direct hit rate as a percentage (0-100)
    pub hit_rate: f64,

    /// Fallback rate as a percentage (0-100)
    pub fallback_rate: f64,
}
