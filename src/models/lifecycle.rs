// ARCHITECTURE: Model Lifecycle Manager - Versioned Snapshots with Atomic Reload
//
// DESIGN:
// The manager owns exactly one piece of shared mutable state: the reference
// to the current `ModelArtifact`. Everything else is immutable.
//
// CONCURRENCY:
// - `current` is an `ArcSwapOption`: readers take a lock-free snapshot
//   (`load_full`) and keep it for the whole request, so a reload that lands
//   mid-request cannot change the model underneath them.
// - Reload reads and deserializes the artifact on a blocking worker into a
//   local value, outside any lock visible to readers. Publication is a single
//   pointer swap.
// - `reload_lock` serializes reloads. An overlapping reload is rejected with
//   `ReloadError::InProgress` rather than queued.
//
// LIFETIME:
// A superseded artifact is dropped when the last in-flight request holding
// its `Arc` finishes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use super::artifact::ModelArtifact;
use super::loader;
use crate::error::{LoadError, ReloadError};

pub struct ModelLifecycleManager {
    /// Configured artifact location; reload always re-reads this path.
    model_path: PathBuf,

    /// Currently published snapshot. `None` only before the first successful load.
    current: ArcSwapOption<ModelArtifact>,

    /// Held for the full load-and-publish sequence of one reload.
    reload_lock: Mutex<()>,

    stats: RwLock<ReloadStats>,
}

/// Counters for reload activity since process start.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReloadStats {
    pub attempted: u64,
    pub successful: u64,
    pub failed: u64,
    pub rejected: u64,
    pub last_reload_duration_ms: Option<u64>,
    pub last_reload_at: Option<String>,
    pub last_error: Option<String>,
}

/// Result of a successful reload.
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    pub artifact: Arc<ModelArtifact>,
    pub previous_version: Option<String>,
    pub duration_ms: u64,
}

impl ModelLifecycleManager {
    /// Create a manager with nothing published yet.
    ///
    /// Serving processes should use [`ModelLifecycleManager::initialize`];
    /// this constructor exists for callers that tolerate an empty manager.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            current: ArcSwapOption::empty(),
            reload_lock: Mutex::new(()),
            stats: RwLock::new(ReloadStats::default()),
        }
    }

    /// Create a manager and eagerly load the configured artifact.
    ///
    /// Fails if the artifact cannot be loaded, so a process never comes up
    /// serving a model it does not have.
    pub async fn initialize(model_path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let manager = Self::new(model_path);
        let artifact = manager.load().await?;
        manager.current.store(Some(Arc::new(artifact)));
        Ok(manager)
    }

    /// Read and deserialize the configured artifact without publishing it.
    pub async fn load(&self) -> Result<ModelArtifact, LoadError> {
        let path = self.model_path.clone();
        match tokio::task::spawn_blocking(move || loader::load(&path)).await {
            Ok(result) => result,
            Err(join_error) => Err(LoadError::corrupt(
                self.model_path.clone(),
                format!("loader task failed: {join_error}"),
            )),
        }
    }

    /// Snapshot of the artifact currently in effect. Never blocks.
    pub fn current_artifact(&self) -> Option<Arc<ModelArtifact>> {
        self.current.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Re-load the configured path and publish the result.
    ///
    /// On failure the previously published artifact stays current; only the
    /// caller of `reload` sees the error.
    pub async fn reload(&self) -> Result<ReloadOutcome, ReloadError> {
        let _guard = match self.reload_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("⏳ Reload rejected: another reload is in progress");
                self.stats.write().await.rejected += 1;
                return Err(ReloadError::InProgress);
            }
        };

        let start = Instant::now();
        tracing::info!("🔄 Reloading model from {}", self.model_path.display());

        let artifact = match self.load().await {
            Ok(artifact) => Arc::new(artifact),
            Err(e) => {
                let elapsed = start.elapsed().as_millis() as u64;
                let current = self.current_version().unwrap_or_else(|| "none".to_string());
                tracing::error!(
                    current_version = %current,
                    "❌ Model reload failed after {}ms, keeping current model: {}",
                    elapsed,
                    e
                );
                let mut stats = self.stats.write().await;
                stats.attempted += 1;
                stats.failed += 1;
                stats.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        // Stats are updated in the same step as the publish: a reload dropped
        // before this point is counted nowhere, one past it is fully counted.
        let mut stats = self.stats.write().await;

        // ATOMIC SWITCH: single pointer swap, readers see old or new, never a mix.
        let previous = self.current.swap(Some(artifact.clone()));
        let previous_version = previous.map(|p| p.version().to_string());
        let duration_ms = start.elapsed().as_millis() as u64;

        stats.attempted += 1;
        stats.successful += 1;
        stats.last_reload_duration_ms = Some(duration_ms);
        stats.last_reload_at = Some(chrono::Utc::now().to_rfc3339());
        stats.last_error = None;
        drop(stats);

        tracing::info!(
            model_version = %artifact.version(),
            previous_version = previous_version.as_deref().unwrap_or("none"),
            "✅ Model reloaded in {}ms",
            duration_ms
        );

        Ok(ReloadOutcome {
            artifact,
            previous_version,
            duration_ms,
        })
    }

    pub fn current_version(&self) -> Option<String> {
        self.current.load_full().map(|a| a.version().to_string())
    }

    pub async fn reload_stats(&self) -> ReloadStats {
        self.stats.read().await.clone()
    }
}
