//! I provide the implementation of the iso-canonical labelling algorithm:
//! an iterative refinement of blank-node hashes up to a fixed point,
//! backed by a recursive distinguish search
//! that breaks the symmetries the refinement cannot.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::io;

use isocanon_api::{BnodeId, Dataset, Term};

use crate::hash::{hash_term, hash_tuple, BagFunction, HashFunction, Sha256, SortedTuple};
use crate::table::HashTable;
use crate::C14nError;

/// Role marker mixed into the neighbourhood hash contributed to a blank node
/// used as subject.
const SUBJECT_MARKER: u8 = b'+';
/// Role marker for a blank node used as object.
const OBJECT_MARKER: u8 = b'-';
/// Role marker for a blank node used as graph name.
const GRAPH_MARKER: u8 = b'.';
/// Marker mixed in when the distinguish search forcibly splits a blank node.
const SPLIT_MARKER: u8 = b'@';

/// The default value of `branch_budget` in [`canonicalize`] and [`normalize`].
///
/// The distinguish search is worst-case factorial in the size of the largest
/// symmetric blank-node group; the budget cuts it off on hostile inputs
/// (raising [`C14nError::BudgetExceeded`]) while leaving room for any
/// realistic dataset, whose first hashing pass is almost always trivial.
pub const DEFAULT_BRANCH_BUDGET: usize = 4096;

/// Return a dataset isomorphic to `dataset`
/// in which every blank node carries its canonical label `c14n_<k>`,
/// using the [SHA-256](Sha256) hash function,
/// the [`SortedTuple`] bag combiner,
/// and the [`DEFAULT_BRANCH_BUDGET`].
///
/// See also [`canonicalize_with`], [`normalize`].
pub fn canonicalize(dataset: &Dataset) -> Result<Dataset, C14nError> {
    canonicalize_with::<Sha256, SortedTuple>(dataset, DEFAULT_BRANCH_BUDGET)
}

/// Return a dataset isomorphic to `dataset` with canonical blank-node labels,
/// generic over the [hash function](HashFunction) `H`
/// and the [bag combiner](BagFunction) `B`.
///
/// Both type parameters are part of the canonical output contract:
/// the byte-exact canonical form is only stable across runs using the same
/// `H` and `B`.
///
/// `branch_budget` bounds the number of branches explored by the distinguish
/// search; when it is exhausted, [`C14nError::BudgetExceeded`] is raised and
/// no partial result is returned.
pub fn canonicalize_with<H: HashFunction, B: BagFunction>(
    dataset: &Dataset,
    branch_budget: usize,
) -> Result<Dataset, C14nError> {
    let table = hash_bnodes::<H, B>(dataset, None)?;
    if table.is_trivial() {
        Ok(dataset.relabel(&table.ordered_blank_ids()))
    } else {
        let mut budget = branch_budget;
        distinguish::<H, B>(dataset, &table, None, &mut budget)?.ok_or_else(|| {
            C14nError::InternalInvariant("distinguish returned no candidate".to_string())
        })
    }
}

/// Write into `w` the canonical byte stream of `dataset`:
/// its canonical N-Quads lines in byte-wise lexicographic order,
/// each terminated by LF (including the last).
///
/// Uses the [SHA-256](Sha256) hash function,
/// the [`SortedTuple`] bag combiner,
/// and the [`DEFAULT_BRANCH_BUDGET`].
///
/// See also [`normalize_with`].
pub fn normalize<W: io::Write>(dataset: &Dataset, w: W) -> Result<(), C14nError> {
    normalize_with::<Sha256, SortedTuple, W>(dataset, w, DEFAULT_BRANCH_BUDGET)
}

/// Write into `w` the canonical byte stream of `dataset`,
/// generic over the [hash function](HashFunction) `H`
/// and the [bag combiner](BagFunction) `B`.
///
/// See also [`canonicalize_with`].
pub fn normalize_with<H: HashFunction, B: BagFunction, W: io::Write>(
    dataset: &Dataset,
    mut w: W,
    branch_budget: usize,
) -> Result<(), C14nError> {
    let canonical = canonicalize_with::<H, B>(dataset, branch_budget)?;
    for line in canonical.sorted_nquads() {
        w.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Computes whether two datasets are isomorphic,
/// i.e. whether they differ only by a bijective renaming of blank nodes,
/// by comparing their canonical byte streams.
pub fn isomorphic(d1: &Dataset, d2: &Dataset) -> Result<bool, C14nError> {
    Ok(canonicalize(d1)?.sorted_nquads() == canonicalize(d2)?.sorted_nquads())
}

/// Iteratively refine the blank-node hashes of `dataset` until the partition
/// they induce reaches a fixed point.
///
/// When `init` is absent, the table is initialized by mapping every blank
/// node to [`HashFunction::zero`] and every other term to its
/// [term hash](hash_term). The distinguish search re-enters with perturbed
/// tables instead.
///
/// Each iteration mixes into every blank node, commutatively, one
/// neighbourhood hash per quad it appears in: the hashes of the other
/// relevant positions (from the previous iteration) followed by a role
/// marker identifying the position held by the blank node.
///
/// The refinement only ever splits equivalence classes, so for `n` blank
/// nodes the fixed point is reached in at most `n` iterations; not reaching
/// it within `2n` indicates a collision in the bag combiner, reported as
/// [`C14nError::HashCollision`].
pub fn hash_bnodes<H: HashFunction, B: BagFunction>(
    dataset: &Dataset,
    init: Option<HashTable<H>>,
) -> Result<HashTable<H>, C14nError> {
    let mut table = init.unwrap_or_else(|| initial_table(dataset));
    let max_iterations = 2 * dataset.blank_node_count() + 1;
    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > max_iterations {
            return Err(C14nError::HashCollision(format!(
                "no fixed point after {max_iterations} iterations; \
                 the bag combiner most likely collided"
            )));
        }
        let prev = table;
        let mut bag: BTreeMap<BnodeId, Vec<H::Output>> = BTreeMap::new();
        for quad in dataset.quads() {
            if let Term::BlankNode(id) = quad.s() {
                let mut parts = vec![current(&prev, quad.o())?, current(&prev, quad.p())?];
                if let Some(g) = quad.g() {
                    parts.push(current(&prev, g)?);
                }
                bag.entry(id.clone())
                    .or_default()
                    .push(marked_tuple::<H>(&parts, SUBJECT_MARKER));
            }
            if let Term::BlankNode(id) = quad.o() {
                let mut parts = vec![current(&prev, quad.s())?, current(&prev, quad.p())?];
                if let Some(g) = quad.g() {
                    parts.push(current(&prev, g)?);
                }
                bag.entry(id.clone())
                    .or_default()
                    .push(marked_tuple::<H>(&parts, OBJECT_MARKER));
            }
            if let Some(Term::BlankNode(id)) = quad.g() {
                let parts = [
                    current(&prev, quad.s())?,
                    current(&prev, quad.p())?,
                    current(&prev, quad.o())?,
                ];
                bag.entry(id.clone())
                    .or_default()
                    .push(marked_tuple::<H>(&parts, GRAPH_MARKER));
            }
        }
        let mut next = prev.clone();
        for (id, mut contributions) in bag {
            let term = Term::BlankNode(id);
            let prior = current(&prev, &term)?;
            next.set_hash(term, B::combine::<H>(&prior, &mut contributions));
        }
        let fixed = next.is_fixed_point(&prev);
        table = next;
        if fixed {
            debug_assert!({
                log::trace!(
                    "hash-bnodes: fixed point after {} iteration(s), {} class(es)",
                    iterations,
                    table.blank_node_partition().len()
                );
                true
            });
            return Ok(table);
        }
    }
}

/// Break the symmetries left by a non-trivial fixed point:
/// pick the lowest non-trivial group of the partition,
/// forcibly distinguish each of its blank nodes in turn,
/// re-run the hasher on the perturbed table,
/// and recurse until trivial,
/// keeping the smallest candidate dataset found at the leaves.
fn distinguish<H: HashFunction, B: BagFunction>(
    dataset: &Dataset,
    table: &HashTable<H>,
    mut minimum: Option<Dataset>,
    budget: &mut usize,
) -> Result<Option<Dataset>, C14nError> {
    let group = table
        .blank_node_partition()
        .into_iter()
        .map(|(_, group)| group)
        .find(|group| group.len() > 1)
        .ok_or_else(|| {
            C14nError::InternalInvariant("distinguish invoked on a trivial hash table".to_string())
        })?;
    for id in group {
        if *budget == 0 {
            return Err(C14nError::BudgetExceeded(
                "the distinguish search exhausted its branch budget".to_string(),
            ));
        }
        *budget -= 1;
        let term = Term::BlankNode(id);
        // each branch must start from its own copy: the hasher mutates
        let mut split = table.clone();
        let marked = marked_tuple::<H>(&[current(table, &term)?], SPLIT_MARKER);
        debug_assert!({
            log::trace!("distinguish: splitting {} -> {}", term, hex(&marked));
            true
        });
        split.set_hash(term, marked);
        let refined = hash_bnodes::<H, B>(dataset, Some(split))?;
        if refined.is_trivial() {
            let candidate = dataset.relabel(&refined.ordered_blank_ids());
            minimum = match minimum {
                Some(best) if !candidate.is_smaller(&best) => Some(best),
                _ => Some(candidate),
            };
        } else {
            minimum = distinguish::<H, B>(dataset, &refined, minimum, budget)?;
        }
    }
    Ok(minimum)
}

/// The initial hash table of a dataset:
/// every blank node at zero, every other term at its term hash.
fn initial_table<H: HashFunction>(dataset: &Dataset) -> HashTable<H> {
    let mut table = HashTable::new();
    for term in dataset.terms() {
        let value = match term {
            Term::BlankNode(_) => H::zero(),
            other => hash_term::<H>(Some(other)),
        };
        table.set_hash(term.clone(), value);
    }
    table
}

/// Tuple hash of `values` followed by a single-byte role marker.
fn marked_tuple<H: HashFunction>(values: &[H::Output], marker: u8) -> H::Output {
    let mut parts: Vec<&[u8]> = values.iter().map(AsRef::as_ref).collect();
    let marker = [marker];
    parts.push(&marker);
    hash_tuple::<H>(&parts)
}

/// The current hash of `term`, which the table is required to know.
fn current<H: HashFunction>(table: &HashTable<H>, term: &Term) -> Result<H::Output, C14nError> {
    table.get_hash(term).ok_or_else(|| {
        C14nError::InternalInvariant(format!("term {term} is missing from the hash table"))
    })
}

fn hex(hash: &impl AsRef<[u8]>) -> String {
    let mut digest = String::with_capacity(2 * hash.as_ref().len());
    for b in hash.as_ref() {
        write!(&mut digest, "{b:02x}").unwrap();
    }
    digest
}
