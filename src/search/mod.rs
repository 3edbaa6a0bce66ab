//! Filter-and-rank query engine
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │              FilterSpec (search text + predicates)             │
//! └────────────────────────────────────────────────────────────────┘
//!                     │                          │
//!                     ▼                          │
//! ┌──────────────────────────────┐               │
//! │        TextIndex             │  no text:     │
//! │  (tantivy prefix + fuzzy)    │  whole        │
//! └──────────────────────────────┘  collection   │
//!                     │                          │
//!                     └──────────┬───────────────┘
//!                                ▼
//!                ┌───────────────────────────────┐
//!                │  candidate set ∩ predicates   │
//!                │        (filters.rs)           │
//!                └───────────────────────────────┘
//!                                │
//!                                ▼
//!                 results (optionally sort.rs)
//! ```

pub mod engine;
pub mod filters;
pub mod index;
pub mod sort;

pub use engine::{Catalog, SharedCatalog, search};
pub use filters::{
    COUNT_CEILING, FilterSpec, Range, RevenueBound, RevenueUnit, TechCondition, TechnologyFilter,
    TechnologySets, apply_predicates,
};
pub use index::{IndexHit, IndexOptions, TextIndex};
pub use sort::{Page, SortDirection, SortKey, SortSpec, paginate, sort_companies};
