//! Filter engine
//!
//! [`Catalog`] owns one company collection together with the text index
//! built from it. Searching resolves the free-text query through the index
//! (or takes the whole collection), then keeps the companies that satisfy
//! every structured predicate.
//!
//! [`SharedCatalog`] is the swap point for long-lived holders such as the
//! HTTP service: a refresh builds a complete new catalog, index included,
//! and only then replaces the old one. Readers holding a snapshot keep using
//! it until they drop it.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::{Company, FilterOptions};
use crate::error::Result;
use crate::search::filters::{FilterSpec, apply_predicates};
use crate::search::index::{IndexOptions, TextIndex};

/// One-shot search over a borrowed collection.
///
/// Builds a temporary index when the spec carries a text query. Long-lived
/// callers should hold a [`Catalog`] instead so the index is reused.
pub fn search(companies: &[Company], spec: &FilterSpec) -> Result<Vec<Company>> {
    Catalog::new(companies.to_vec(), IndexOptions::default()).search(spec)
}

/// A company collection plus its lazily built text index.
pub struct Catalog {
    companies: Arc<[Company]>,
    positions: HashMap<u64, usize>,
    fingerprint: String,
    options: IndexOptions,
    index: OnceLock<TextIndex>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("companies", &self.companies.len())
            .field("fingerprint", &self.fingerprint)
            .field("indexed", &self.index.get().is_some())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Take ownership of a collection. When ids repeat, the first record
    /// wins and later ones are dropped.
    pub fn new(companies: Vec<Company>, options: IndexOptions) -> Self {
        let mut positions = HashMap::with_capacity(companies.len());
        let mut unique = Vec::with_capacity(companies.len());
        for company in companies {
            if positions.contains_key(&company.id) {
                warn!(id = company.id, name = %company.name, "duplicate company id dropped");
                continue;
            }
            positions.insert(company.id, unique.len());
            unique.push(company);
        }

        let fingerprint = fingerprint(&unique);
        Self {
            companies: unique.into(),
            positions,
            fingerprint,
            options,
            index: OnceLock::new(),
        }
    }

    /// Like [`Catalog::new`], with the text index built up front.
    pub fn with_index(companies: Vec<Company>, options: IndexOptions) -> Result<Self> {
        let catalog = Self::new(companies, options);
        catalog.text_index()?;
        Ok(catalog)
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// SHA-256 over the collection contents, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub const fn index_options(&self) -> &IndexOptions {
        &self.options
    }

    pub fn get(&self, id: u64) -> Option<&Company> {
        self.positions.get(&id).map(|&pos| &self.companies[pos])
    }

    /// Facet values present in this collection.
    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_companies(&self.companies)
    }

    /// The text index, built on first use.
    pub fn text_index(&self) -> Result<&TextIndex> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let built = TextIndex::build(&self.companies, self.options)?;
        info!(
            companies = self.companies.len(),
            fingerprint = %&self.fingerprint[..12],
            "text index built"
        );
        // A concurrent builder may have won; either index is equivalent.
        Ok(self.index.get_or_init(|| built))
    }

    /// Companies matching `spec`.
    ///
    /// With a text query the result follows index rank; otherwise it follows
    /// collection order. Index hits whose id is no longer in the collection
    /// are skipped.
    pub fn search(&self, spec: &FilterSpec) -> Result<Vec<Company>> {
        let candidates = match spec.text_query() {
            Some(text) => self.resolve_text(text)?,
            None => self.companies.to_vec(),
        };
        let candidate_count = candidates.len();
        let results = apply_predicates(candidates, spec);
        debug!(
            candidates = candidate_count,
            results = results.len(),
            "filter engine pass"
        );
        Ok(results)
    }

    fn resolve_text(&self, text: &str) -> Result<Vec<Company>> {
        let ids = self.text_index()?.query(text);
        let mut candidates = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(id) {
                Some(company) => candidates.push(company.clone()),
                None => debug!(id, "stale index id skipped"),
            }
        }
        Ok(candidates)
    }
}

fn fingerprint(companies: &[Company]) -> String {
    let mut hasher = Sha256::new();
    for company in companies {
        match serde_json::to_vec(company) {
            Ok(bytes) => hasher.update(&bytes),
            Err(_) => hasher.update(company.id.to_le_bytes()),
        }
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Shared, swappable catalog for concurrent readers.
#[derive(Debug)]
pub struct SharedCatalog {
    current: RwLock<Arc<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The catalog as of now. Later refreshes do not affect it.
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read())
    }

    /// Replace the collection. The new index is fully built before the swap;
    /// an unchanged collection keeps the current catalog and index.
    ///
    /// Returns `true` when the catalog was replaced.
    pub fn refresh(&self, companies: Vec<Company>) -> Result<bool> {
        let current = self.snapshot();
        let candidate = Catalog::new(companies, *current.index_options());
        if candidate.fingerprint() == current.fingerprint() {
            debug!("collection unchanged, keeping current index");
            return Ok(false);
        }

        candidate.text_index()?;
        let count = candidate.len();
        *self.current.write() = Arc::new(candidate);
        info!(companies = count, "catalog swapped");
        Ok(true)
    }
}
