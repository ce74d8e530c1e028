//! Locating, loading and caching documentation files per module.
//!
//! Discovery order for a module:
//!
//! 1. `<module location>.xml` next to the module file (same stem)
//! 2. `<search dir>/<module stem>.xml` for each configured search directory
//!
//! Each module is loaded at most once per [`DocCache`]; failures are cached
//! as "no documentation" as well.

use crate::error::StoreError;
use crate::metadata::ModuleId;
use crate::store::DocumentationStore;
use dashmap::DashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// Source of per-module documentation stores.
pub trait DocProvider {
    fn documentation(&self, module: &ModuleId) -> Option<Arc<DocumentationStore>>;
}

/// Finds and parses documentation files. No caching.
#[derive(Debug, Default, Clone)]
pub struct DocLoader {
    search_dirs: Vec<PathBuf>,
}

impl DocLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// First existing documentation file for `module`.
    pub fn locate(&self, module: &ModuleId) -> Option<PathBuf> {
        let sidecar = module
            .location
            .as_deref()
            .map(|location| location.with_extension("xml"));
        let file_name = format!("{}.xml", module.stem());
        sidecar
            .into_iter()
            .chain(self.search_dirs.iter().map(|dir| dir.join(&file_name)))
            .find(|candidate| candidate.is_file())
    }

    /// Load the documentation for `module`. `Ok(None)` when no file exists.
    pub fn load(&self, module: &ModuleId) -> Result<Option<DocumentationStore>, StoreError> {
        match self.locate(module) {
            Some(path) => load_file(&path).map(Some),
            None => Ok(None),
        }
    }
}

/// Parse one documentation file, following a single `redirect`.
pub fn load_file(path: &Path) -> Result<DocumentationStore, StoreError> {
    let store = read_store(path)?;
    let Some(target) = store.redirect() else {
        return Ok(store);
    };

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let target = base.join(target);
    debug!(from = %path.display(), to = %target.display(), "following documentation redirect");
    let redirected = read_store(&target)?;
    if redirected.redirect().is_some() {
        return Err(StoreError::RedirectLoop(target));
    }
    Ok(redirected)
}

fn read_store(path: &Path) -> Result<DocumentationStore, StoreError> {
    let xml = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DocumentationStore::parse(&xml)
        .map(|store| store.with_source(path))
        .map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Load-once, shared cache of documentation stores keyed by module.
///
/// Safe to share between threads; concurrent first requests for the same
/// module load it once.
#[derive(Debug, Default)]
pub struct DocCache {
    loader: DocLoader,
    modules: DashMap<ModuleId, Option<Arc<DocumentationStore>>>,
}

static GLOBAL: LazyLock<DocCache> = LazyLock::new(|| DocCache::new(DocLoader::new()));

impl DocCache {
    pub fn new(loader: DocLoader) -> Self {
        Self {
            loader,
            modules: DashMap::new(),
        }
    }

    /// Process-wide cache using sidecar discovery only.
    pub fn global() -> &'static DocCache {
        &GLOBAL
    }

    pub fn loader(&self) -> &DocLoader {
        &self.loader
    }

    /// Seed the cache with an already built store, bypassing discovery.
    pub fn preload(&self, module: ModuleId, store: DocumentationStore) {
        self.modules.insert(module, Some(Arc::new(store)));
    }

    /// Number of modules looked up so far, hits and misses alike.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn load(&self, module: &ModuleId) -> Option<Arc<DocumentationStore>> {
        match self.loader.load(module) {
            Ok(Some(store)) => {
                debug!(
                    module = %module,
                    path = ?store.source(),
                    members = store.len(),
                    "loaded documentation"
                );
                Some(Arc::new(store))
            }
            Ok(None) => {
                debug!(module = %module, "no documentation file");
                None
            }
            Err(err) => {
                warn!(module = %module, error = %err, "ignoring documentation file");
                None
            }
        }
    }
}

impl DocProvider for DocCache {
    fn documentation(&self, module: &ModuleId) -> Option<Arc<DocumentationStore>> {
        if let Some(hit) = self.modules.get(module) {
            return hit.value().clone();
        }
        self.modules
            .entry(module.clone())
            .or_insert_with(|| self.load(module))
            .value()
            .clone()
    }
}
