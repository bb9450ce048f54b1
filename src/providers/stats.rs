//! Per-provider call accounting for the admin surface.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    failures: AtomicU64,
    retries: AtomicU64,
}

/// Snapshot of one provider's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSnapshot {
    pub provider: String,
    pub requests: u64,
    pub failures: u64,
    pub retries: u64,
}

/// Thread-safe counters keyed by provider name.
///
/// Lives for the whole process so numbers survive config reloads.
#[derive(Debug, Default)]
pub struct ProviderStats {
    inner: DashMap<&'static str, Counters>,
}

impl ProviderStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, provider: &'static str) {
        self.inner.entry(provider).or_default().requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, provider: &'static str) {
        self.inner.entry(provider).or_default().failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self, provider: &'static str) {
        self.inner.entry(provider).or_default().retries.fetch_add(1, Ordering::Relaxed);
    }

    /// All providers seen so far, sorted by name.
    pub fn snapshot(&self) -> Vec<ProviderSnapshot> {
        let mut out: Vec<_> = self
            .inner
            .iter()
            .map(|entry| ProviderSnapshot {
                provider: entry.key().to_string(),
                requests: entry.value().requests.load(Ordering::Relaxed),
                failures: entry.value().failures.load(Ordering::Relaxed),
                retries: entry.value().retries.load(Ordering::Relaxed),
            })
            .collect();
        out.sort_by(|a, b| a.provider.cmp(&b.provider));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_provider() {
        let stats = ProviderStats::new();
        stats.record_request("tmdb");
        stats.record_request("tmdb");
        stats.record_failure("tmdb");
        stats.record_request("pexels");
        stats.record_retry("pexels");

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].provider, "pexels");
        assert_eq!(snapshot[0].retries, 1);
        assert_eq!(snapshot[1].requests, 2);
        assert_eq!(snapshot[1].failures, 1);
    }
}
