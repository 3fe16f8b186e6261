//! Transitive dependency resolution
//!
//! Breadth-first worklist over the registry: every package name is fetched at
//! most once, and the set of names discovered (excluding the root) is the
//! answer. Pending entries are expanded in rounds on a bounded thread pool;
//! discovered edges are merged by the driving thread in round order, so the
//! result does not depend on the pool size.

use crate::registry::{EdgeFilter, Registry, RegistryError};
use crate::version::{LATEST, PackageRef};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to fetch dependencies for {package}: {source}")]
    Root {
        package: PackageRef,
        #[source]
        source: RegistryError,
    },

    #[error("Cancelled after discovering {partial} dependencies")]
    Cancelled { partial: usize },

    #[error("Failed to start fetch workers: {0}")]
    WorkerPool(String),
}

/// Traversal settings, fixed for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub skip_peer: bool,
    pub skip_optional: bool,
    /// Maximum number of fetches in flight
    pub jobs: usize,
    /// Retry a failed non-root fetch once with `latest`
    pub fallback_to_latest: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            skip_peer: false,
            skip_optional: false,
            jobs: 1,
            fallback_to_latest: false,
        }
    }
}

impl ResolveOptions {
    fn edge_filter(&self) -> EdgeFilter {
        EdgeFilter {
            skip_peer: self.skip_peer,
            skip_optional: self.skip_optional,
        }
    }
}

/// A dependency whose own dependencies could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub package: PackageRef,
    pub error: RegistryError,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The root after alias unpacking
    pub root: PackageRef,
    failures: Vec<Failure>,
    visited: HashMap<String, String>,
    order: Vec<String>,
}

impl Resolution {
    /// Number of distinct transitive dependencies
    pub fn count(&self) -> usize {
        self.visited.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.visited.contains_key(name)
    }

    /// Specifier the dependency was first discovered with
    pub fn specifier(&self, name: &str) -> Option<&str> {
        self.visited.get(name).map(String::as_str)
    }

    /// Dependency names in discovery order
    pub fn discovered(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Dependencies that were counted but not expanded
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Dependency names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.discovered().collect();
        names.sort_unstable();
        names
    }
}

/// Visited set plus the queue of entries not yet expanded
struct Traversal {
    root: String,
    visited: HashMap<String, String>,
    order: Vec<String>,
    pending: VecDeque<PackageRef>,
    failures: Vec<Failure>,
}

impl Traversal {
    fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            visited: HashMap::new(),
            order: Vec::new(),
            pending: VecDeque::new(),
            failures: Vec::new(),
        }
    }

    /// Record newly discovered names; names already seen keep their first specifier
    fn merge(&mut self, edges: BTreeMap<String, String>) {
        for (name, specifier) in edges {
            let package = PackageRef::new(name, specifier).unalias();

            if package.name == self.root {
                continue;
            }
            if let Some(existing) = self.visited.get(&package.name) {
                if *existing != package.specifier {
                    debug!(
                        name = %package.name,
                        kept = %existing,
                        ignored = %package.specifier,
                        "already discovered"
                    );
                }
                continue;
            }

            self.visited
                .insert(package.name.clone(), package.specifier.clone());
            self.order.push(package.name.clone());
            self.pending.push_back(package);
        }
    }

    fn into_resolution(self, root: PackageRef) -> Resolution {
        Resolution {
            root,
            failures: self.failures,
            visited: self.visited,
            order: self.order,
        }
    }
}

/// Result of expanding one pending entry
enum Expansion {
    Edges(BTreeMap<String, String>),
    Failed(RegistryError),
    Cancelled,
}

/// Drives the traversal for one registry
pub struct Resolver<R> {
    registry: R,
    options: ResolveOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl<R: Registry> Resolver<R> {
    pub fn new(registry: R, options: ResolveOptions) -> Self {
        Self {
            registry,
            options,
            cancel: None,
        }
    }

    /// Abandon the run once `flag` is set.
    ///
    /// The flag is checked before each fetch and between rounds. Requests
    /// already in flight are not interrupted; they complete or run until the
    /// registry client's timeout, after which the run returns
    /// [`ResolveError::Cancelled`].
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Resolve every package transitively required by `name@specifier`.
    ///
    /// Failing to fetch the root aborts the run. Failures further down are
    /// logged and collected in [`Resolution::failures`]; the affected package
    /// still counts, its own dependencies are just not explored.
    pub fn resolve(&self, name: &str, specifier: &str) -> Result<Resolution, ResolveError> {
        let root = PackageRef::new(name, specifier).unalias();
        let mut traversal = Traversal::new(&root.name);

        if self.is_cancelled() {
            return Err(ResolveError::Cancelled { partial: 0 });
        }

        info!("Fetching dependencies for {}", root);
        let version = root.lookup_version();
        let metadata = self
            .registry
            .fetch_metadata(&root.name, &version)
            .map_err(|source| ResolveError::Root {
                package: root.clone(),
                source,
            })?;
        traversal.merge(metadata.edges(self.options.edge_filter()));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs.max(1))
            .build()
            .map_err(|e| ResolveError::WorkerPool(e.to_string()))?;

        while !traversal.pending.is_empty() {
            let batch: Vec<PackageRef> = traversal.pending.drain(..).collect();
            debug!(size = batch.len(), "expanding batch");

            let results: Vec<(PackageRef, Expansion)> = pool.install(|| {
                batch
                    .into_par_iter()
                    .map(|package| {
                        let expansion = self.expand(&package);
                        (package, expansion)
                    })
                    .collect()
            });

            let mut cancelled = false;
            for (package, expansion) in results {
                match expansion {
                    Expansion::Edges(edges) => traversal.merge(edges),
                    Expansion::Failed(error) => {
                        if error.is_not_found() {
                            warn!("Package {} does not exist", package);
                        } else {
                            warn!("Error fetching dependencies for {}: {}", package, error);
                        }
                        traversal.failures.push(Failure { package, error });
                    }
                    Expansion::Cancelled => cancelled = true,
                }
            }

            if cancelled || self.is_cancelled() {
                return Err(ResolveError::Cancelled {
                    partial: traversal.visited.len(),
                });
            }
        }

        Ok(traversal.into_resolution(root))
    }

    /// Fetch one dependency's metadata and return the edges to follow
    fn expand(&self, package: &PackageRef) -> Expansion {
        if self.is_cancelled() {
            return Expansion::Cancelled;
        }

        info!("Fetching dependencies for {}", package);
        let version = package.lookup_version();
        let filter = self.options.edge_filter();

        match self.registry.fetch_metadata(&package.name, &version) {
            Ok(metadata) => Expansion::Edges(metadata.edges(filter)),
            Err(error) if self.options.fallback_to_latest && version != LATEST => {
                debug!(package = %package, %error, "retrying with latest");
                match self.registry.fetch_metadata(&package.name, LATEST) {
                    Ok(metadata) => Expansion::Edges(metadata.edges(filter)),
                    Err(_) => Expansion::Failed(error),
                }
            }
            Err(error) => Expansion::Failed(error),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}
