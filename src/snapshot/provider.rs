//! Metrics snapshot providers
//!
//! The chat pipeline reads metrics through [`MetricsSnapshotProvider`], which
//! never fails. Fallible data sources implement [`SnapshotSource`] and are
//! wrapped by [`SafeSnapshotProvider`], which substitutes a zeroed snapshot
//! when the source errors.

use super::models::MetricsSnapshot;
use crate::metrics::METRICS;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Snapshot source errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot source unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Infallible, concurrently readable metrics snapshot provider
#[async_trait]
pub trait MetricsSnapshotProvider: Send + Sync {
    /// Read a fresh snapshot for the current request
    async fn snapshot(&self) -> MetricsSnapshot;
}

/// A data source that may fail to produce a snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    fn name(&self) -> &str;
    async fn load(&self) -> Result<MetricsSnapshot, SnapshotError>;
}

/// Provider serving one fixed snapshot
#[derive(Debug, Clone)]
pub struct StaticSnapshotProvider {
    snapshot: MetricsSnapshot,
}

impl StaticSnapshotProvider {
    pub fn new(snapshot: MetricsSnapshot) -> Self {
        Self {
            snapshot: snapshot.sanitized(),
        }
    }
}

#[async_trait]
impl MetricsSnapshotProvider for StaticSnapshotProvider {
    async fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot.clone()
    }
}

/// Wraps a fallible source and falls back to a zeroed snapshot on error
pub struct SafeSnapshotProvider<S> {
    source: S,
}

impl<S: SnapshotSource> SafeSnapshotProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: SnapshotSource> MetricsSnapshotProvider for SafeSnapshotProvider<S> {
    async fn snapshot(&self) -> MetricsSnapshot {
        match self.source.load().await {
            Ok(snapshot) => {
                debug!("Loaded metrics snapshot from {}", self.source.name());
                snapshot.sanitized()
            }
            Err(e) => {
                warn!(
                    "Metrics source {} failed, using zeroed snapshot: {}",
                    self.source.name(),
                    e
                );
                METRICS.record_snapshot_fallback();
                MetricsSnapshot::empty()
            }
        }
    }
}

/// Reads a JSON-encoded snapshot from disk on every request, off the worker thread
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotSource {
    path: PathBuf,
    label: String,
}

impl JsonFileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSnapshotSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn load(&self) -> Result<MetricsSnapshot, SnapshotError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        if raw.trim().is_empty() {
            return Err(SnapshotError::Unavailable(format!(
                "{} is empty",
                self.label
            )));
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Segment;

    struct BrokenSource;

    #[async_trait]
    impl SnapshotSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn load(&self) -> Result<MetricsSnapshot, SnapshotError> {
            Err(SnapshotError::Unavailable("database offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_safe_provider_substitutes_zeroed_snapshot() {
        let provider = SafeSnapshotProvider::new(BrokenSource);
        let snapshot = provider.snapshot().await;
        assert_eq!(snapshot, MetricsSnapshot::empty());
    }

    #[tokio::test]
    async fn test_static_provider_returns_sanitized_copy() {
        let provider =
            StaticSnapshotProvider::new(MetricsSnapshot::from_breakdown(1, 1, 1, 1).with_revenue(-1.0));
        let snapshot = provider.snapshot().await;
        assert_eq!(snapshot.customer_count, 4);
        assert_eq!(snapshot.total_revenue, 0.0);
    }

    #[tokio::test]
    async fn test_json_file_source_round_trip() {
        let path = std::env::temp_dir().join(format!("snapshot-{}.json", uuid::Uuid::new_v4()));
        let snapshot = MetricsSnapshot::from_breakdown(10, 20, 5, 5)
            .with_revenue(5000.0)
            .with_segment(Segment::new("w", "Weekend Shoppers", 12).with_patterns(["weekend"]));
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let provider = SafeSnapshotProvider::new(JsonFileSnapshotSource::new(&path));
        assert_eq!(provider.snapshot().await, snapshot);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_empty_file_falls_back() {
        let path = std::env::temp_dir().join(format!("snapshot-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "  \n").unwrap();

        let source = JsonFileSnapshotSource::new(&path);
        assert!(matches!(source.load().await, Err(SnapshotError::Unavailable(_))));
        assert_eq!(SafeSnapshotProvider::new(source).snapshot().await, MetricsSnapshot::empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_falls_back() {
        let provider = SafeSnapshotProvider::new(JsonFileSnapshotSource::new(
            "/nonexistent/chat-engine/snapshot.json",
        ));
        assert_eq!(provider.snapshot().await.customer_count, 0);
    }
}
