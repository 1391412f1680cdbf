//! Compute-once catalog cache
//!
//! One cache per asset collection. The first listing request scans the
//! root; every later request gets the same value until the process exits.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{build_catalog, Catalog, CatalogError, FilterRule};
use crate::logger;

/// Lazily built, never refreshed catalog of one asset root
pub struct CatalogCache {
    root: PathBuf,
    rule: FilterRule,
    sort: bool,
    cell: OnceCell<Arc<Catalog>>,
}

impl CatalogCache {
    pub fn new(root: PathBuf, rule: FilterRule, sort: bool) -> Self {
        Self {
            root,
            rule,
            sort,
            cell: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn rule(&self) -> FilterRule {
        self.rule
    }

    /// Return the cached catalog, scanning the root on first use.
    ///
    /// Concurrent first callers wait on a single build. A failed build
    /// leaves the cache empty so a later call scans again.
    pub async fn get(&self) -> Result<Arc<Catalog>, CatalogError> {
        let catalog = self
            .cell
            .get_or_try_init(|| async {
                let catalog = build_catalog(&self.root, self.rule, self.sort).await?;
                logger::log_catalog_built(self.rule.name(), &self.root, catalog.folders.len());
                Ok::<_, CatalogError>(Arc::new(catalog))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    /// The cached catalog, if it has been built
    pub fn cached(&self) -> Option<Arc<Catalog>> {
        self.cell.get().cloned()
    }
}
