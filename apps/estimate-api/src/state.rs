//! # Catalog Snapshot Store
//!
//! Holds the live rule catalog and swaps it atomically on reload.
//!
//! ## Snapshot Swap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request ──► read lock ──► clone Arc<CatalogSnapshot> ──► unlock        │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                      price against that snapshot only                   │
//! │                                                                         │
//! │  reload ──► load rules/ off to the side (no lock held)                  │
//! │               │ ok                          │ error                     │
//! │               ▼                             ▼                           │
//! │        write lock, replace Arc        keep current snapshot             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! In-flight requests keep the `Arc` they cloned, so a reload never mixes
//! old and new rules within one request.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use inkquote_core::catalog::CatalogSummary;
use inkquote_core::{RuleCatalog, TaxRate};
use inkquote_rules::{RuleDirectory, RulesError};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;

/// One immutable, fully-validated catalog.
#[derive(Debug)]
pub struct CatalogSnapshot {
    /// Fresh for every successful load.
    pub revision: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub catalog: RuleCatalog,
}

impl CatalogSnapshot {
    pub fn new(catalog: RuleCatalog) -> Self {
        CatalogSnapshot {
            revision: Uuid::new_v4(),
            loaded_at: Utc::now(),
            catalog,
        }
    }

    pub fn status(&self) -> SnapshotStatus {
        SnapshotStatus {
            status: "ok",
            catalog_revision: self.revision,
            loaded_at: self.loaded_at,
            catalog: self.catalog.summary(),
        }
    }
}

/// Body of `/health` and `/rules/reload`.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStatus {
    pub status: &'static str,
    pub catalog_revision: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub catalog: CatalogSummary,
}

/// The live catalog plus the directory it reloads from.
#[derive(Debug)]
pub struct CatalogStore {
    rules_dir: PathBuf,
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    /// Loads the initial catalog. Fails if the rule tables are unusable.
    pub fn open(rules_dir: impl Into<PathBuf>) -> Result<Self, RulesError> {
        let rules_dir = rules_dir.into();
        let catalog = RuleDirectory::new(&rules_dir).load_catalog()?;
        Ok(Self::with_catalog(rules_dir, catalog))
    }

    /// Wraps an already-built catalog.
    pub fn with_catalog(rules_dir: impl Into<PathBuf>, catalog: RuleCatalog) -> Self {
        let snapshot = CatalogSnapshot::new(catalog);
        info!(revision = %snapshot.revision, "Catalog snapshot installed");
        CatalogStore {
            rules_dir: rules_dir.into(),
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// The snapshot to price one request against.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Re-reads the rule directory and swaps in the new catalog.
    ///
    /// On error the current snapshot stays in place.
    pub async fn reload(&self) -> Result<Arc<CatalogSnapshot>, ReloadError> {
        let dir = self.rules_dir.clone();
        let loaded = tokio::task::spawn_blocking(move || RuleDirectory::new(dir).load_catalog())
            .await
            .map_err(|e| ReloadError::Aborted(e.to_string()))?;

        let catalog = match loaded {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, dir = %self.rules_dir.display(), "Rule reload failed, keeping current catalog");
                return Err(ReloadError::Rules(e));
            }
        };

        let snapshot = Arc::new(CatalogSnapshot::new(catalog));
        let previous = {
            let mut current = self.current.write().await;
            std::mem::replace(&mut *current, Arc::clone(&snapshot))
        };

        info!(
            previous = %previous.revision,
            revision = %snapshot.revision,
            "Rule catalog reloaded"
        );
        Ok(snapshot)
    }
}

/// Why a reload did not install a new catalog.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("Rule reload aborted: {0}")]
    Aborted(String),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub tax_rate: TaxRate,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogStore>, config: &ServerConfig) -> Self {
        AppState {
            catalog,
            tax_rate: config.tax_rate(),
        }
    }
}
