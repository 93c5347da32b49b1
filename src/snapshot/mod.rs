//! Business metrics snapshot consumed by the chat pipeline

pub mod models;
pub mod provider;

pub use models::{MetricsSnapshot, Segment};
pub use provider::{
    JsonFileSnapshotSource, MetricsSnapshotProvider, SafeSnapshotProvider, SnapshotError,
    SnapshotSource, StaticSnapshotProvider,
};
