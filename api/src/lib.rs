//! This crate is part of [Isocanon],
//! an iso-canonicalization toolkit for [RDF] datasets in Rust.
//!
//! This crate provides the data model shared by the Isocanon crates:
//! [`Term`], [`Quad`] and [`Dataset`],
//! together with their canonical [N-Quads] rendering,
//! the dataset ordering used to select minimal candidates,
//! and the blank-node relabeling primitive.
//!
//! The canonicalization algorithms themselves live in `isocanon-c14n`.
//!
//! [Isocanon]: https://docs.rs/isocanon-c14n/latest/isocanon_c14n/
//! [RDF]: https://www.w3.org/TR/rdf11-primer/
//! [N-Quads]: https://www.w3.org/TR/n-quads/
#![deny(missing_docs)]

pub mod dataset;
pub mod quad;
pub mod term;

pub use dataset::{Dataset, CANONICAL_PREFIX};
pub use quad::{MalformedQuad, Quad};
pub use term::{BnodeId, InvalidBnodeId, Term};
