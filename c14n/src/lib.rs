//! This crate is part of [Isocanon],
//! an iso-canonicalization toolkit for [RDF] datasets in Rust.
//!
//! This crate computes iso-canonical forms:
//! given a dataset `G` containing named graphs and blank nodes,
//! [`canonicalize`](isocan::canonicalize) produces a dataset isomorphic to `G`
//! in which every blank node carries a deterministic label
//! derived solely from the structure of `G`,
//! so that any two isomorphic datasets produce byte-identical canonical forms
//! (see [`normalize`](isocan::normalize)).
//! This enables stable hashing, signing, diffing
//! and equality testing of RDF datasets.
//!
//! The algorithm is the iso-canonical labelling described in:
//!
//!   Aidan Hogan.
//!   Canonical Forms for Isomorphic and Equivalent RDF Graphs:
//!   Algorithms for Leaning and Labelling Blank Nodes.
//!   ACM Transactions on the Web 11(4), 2017.
//!   <https://doi.org/10.1145/3068333>
//!
//! extended from triples to quads with positional role markers.
//!
//! [Isocanon]: https://docs.rs/isocanon-c14n/latest/isocanon_c14n/
//! [RDF]: https://www.w3.org/TR/rdf11-primer/
#![deny(missing_docs)]

use std::io;

pub mod hash;
pub mod isocan;
pub mod table;

pub use isocan::{canonicalize, canonicalize_with, isomorphic, normalize, normalize_with};

/// Errors that can be raised during canonicalization.
///
/// All of them are fatal: partial results are never returned.
#[derive(Debug, thiserror::Error)]
pub enum C14nError {
    /// I/O error while writing the canonical form.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The iterative hasher exceeded its iteration bound without reaching a
    /// fixed point, indicating a collision in the bag combiner.
    #[error("suspected hash collision: {0}")]
    HashCollision(String),
    /// The distinguish search was cut off by the configured branch budget
    /// before certifying a minimum.
    #[error("computation budget exceeded: {0}")]
    BudgetExceeded(String),
    /// An internal invariant was violated; this is a bug.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// Ensure that `env_logger` is initialized at most once across all tests.
#[cfg(test)]
pub(crate) fn test_setup() {
    TEST_SETUP.call_once(env_logger::init);
}

#[cfg(test)]
static TEST_SETUP: std::sync::Once = std::sync::Once::new();
