//! I define [`HashTable`],
//! the mutable mapping from terms to their current hash values,
//! with the partition views over blank nodes
//! used by the fixed-point test and the distinguish search.
use std::collections::{BTreeMap, BTreeSet};

use isocanon_api::{BnodeId, Term};

use crate::hash::HashFunction;

/// A mutable mapping from [`Term`]s to hash values.
///
/// Blank nodes and non-blank terms are stored uniformly;
/// the blank-node partition views are rebuilt on demand from the single
/// forward store, which keeps [`clone`](Clone::clone)s
/// (one per distinguish branch) as small as possible.
pub struct HashTable<H: HashFunction> {
    map: BTreeMap<Term, H::Output>,
}

impl<H: HashFunction> Clone for HashTable<H> {
    fn clone(&self) -> Self {
        HashTable {
            map: self.map.clone(),
        }
    }
}

impl<H: HashFunction> Default for HashTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashFunction> HashTable<H> {
    /// An empty table.
    pub fn new() -> Self {
        HashTable {
            map: BTreeMap::new(),
        }
    }

    /// Set the current hash value of `term`.
    pub fn set_hash(&mut self, term: Term, value: H::Output) {
        self.map.insert(term, value);
    }

    /// The current hash value of `term`, if any.
    pub fn get_hash(&self, term: &Term) -> Option<H::Output> {
        self.map.get(term).copied()
    }

    /// The groups of blank nodes currently sharing a hash value,
    /// ordered by ascending group size, then by ascending hash value.
    /// Within a group, blank nodes are in ascending identifier order.
    pub fn blank_node_partition(&self) -> Vec<(H::Output, Vec<BnodeId>)> {
        let mut groups: BTreeMap<H::Output, Vec<BnodeId>> = BTreeMap::new();
        for (term, value) in &self.map {
            if let Term::BlankNode(id) = term {
                groups.entry(*value).or_default().push(id.clone());
            }
        }
        let mut partition: Vec<_> = groups.into_iter().collect();
        partition.sort_unstable_by(|(h1, g1), (h2, g2)| {
            g1.len().cmp(&g2.len()).then_with(|| h1.cmp(h2))
        });
        partition
    }

    /// True iff no two blank nodes share a hash value.
    pub fn is_trivial(&self) -> bool {
        self.blank_node_partition()
            .iter()
            .all(|(_, group)| group.len() == 1)
    }

    /// True iff the "same hash" equivalence relation over blank nodes is
    /// identical in `self` and `previous` (or `self` is trivial).
    ///
    /// The relation is compared, not the raw hash values:
    /// cyclic blank-node structures stabilize as equivalence classes
    /// while the values keep changing from iteration to iteration.
    pub fn is_fixed_point(&self, previous: &Self) -> bool {
        self.is_trivial() || self.bnode_classes() == previous.bnode_classes()
    }

    /// The blank-node identifiers sorted by ascending current hash value.
    ///
    /// Once the table is trivial, this order defines the canonical labels.
    pub fn ordered_blank_ids(&self) -> Vec<BnodeId> {
        let mut ids: Vec<(H::Output, BnodeId)> = self
            .map
            .iter()
            .filter_map(|(term, value)| match term {
                Term::BlankNode(id) => Some((*value, id.clone())),
                _ => None,
            })
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    fn bnode_classes(&self) -> BTreeSet<BTreeSet<BnodeId>> {
        self.blank_node_partition()
            .into_iter()
            .map(|(_, group)| group.into_iter().collect())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hash::Sha256;

    fn bnode(id: &str) -> Term {
        Term::BlankNode(BnodeId::new_unchecked(id))
    }

    fn value(first: u8) -> [u8; 32] {
        let mut v = [0u8; 32];
        v[0] = first;
        v
    }

    #[test]
    fn set_and_get() {
        let mut table = HashTable::<Sha256>::new();
        assert_eq!(table.get_hash(&bnode("a")), None);
        table.set_hash(bnode("a"), value(1));
        assert_eq!(table.get_hash(&bnode("a")), Some(value(1)));
        table.set_hash(bnode("a"), value(2));
        assert_eq!(table.get_hash(&bnode("a")), Some(value(2)));
    }

    #[test]
    fn clones_are_independent() {
        let mut table = HashTable::<Sha256>::new();
        table.set_hash(bnode("a"), value(1));
        let mut copy = table.clone();
        copy.set_hash(bnode("a"), value(2));
        assert_eq!(table.get_hash(&bnode("a")), Some(value(1)));
        assert_eq!(copy.get_hash(&bnode("a")), Some(value(2)));
    }

    #[test]
    fn partition_is_sorted_by_size_then_hash() {
        let mut table = HashTable::<Sha256>::new();
        table.set_hash(bnode("a"), value(9));
        table.set_hash(bnode("b"), value(3));
        table.set_hash(bnode("c"), value(3));
        table.set_hash(bnode("d"), value(1));
        table.set_hash(bnode("e"), value(1));
        table.set_hash(bnode("f"), value(1));
        let partition = table.blank_node_partition();
        let sizes: Vec<_> = partition.iter().map(|(_, g)| g.len()).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
        assert_eq!(partition[0].0, value(9));
        assert_eq!(partition[1].0, value(3));
        assert_eq!(partition[2].0, value(1));
        let ids: Vec<_> = partition[2].1.iter().map(|id| id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["d", "e", "f"]);
    }

    #[test]
    fn partition_ignores_non_blank_terms() {
        let mut table = HashTable::<Sha256>::new();
        table.set_hash(Term::iri("tag:a"), value(1));
        table.set_hash(bnode("b"), value(1));
        let partition = table.blank_node_partition();
        assert_eq!(partition.len(), 1);
        assert_eq!(partition[0].1.len(), 1);
        assert!(table.is_trivial());
    }

    #[test]
    fn trivial_iff_all_groups_are_singletons() {
        let mut table = HashTable::<Sha256>::new();
        table.set_hash(bnode("a"), value(1));
        table.set_hash(bnode("b"), value(2));
        assert!(table.is_trivial());
        table.set_hash(bnode("b"), value(1));
        assert!(!table.is_trivial());
    }

    #[test]
    fn empty_table_is_trivial() {
        let table = HashTable::<Sha256>::new();
        assert!(table.is_trivial());
        assert!(table.ordered_blank_ids().is_empty());
    }

    #[test]
    fn fixed_point_compares_the_relation_not_the_values() {
        // same classes {a, b} / {c}, different hash values
        let mut t1 = HashTable::<Sha256>::new();
        t1.set_hash(bnode("a"), value(1));
        t1.set_hash(bnode("b"), value(1));
        t1.set_hash(bnode("c"), value(2));
        let mut t2 = HashTable::<Sha256>::new();
        t2.set_hash(bnode("a"), value(7));
        t2.set_hash(bnode("b"), value(7));
        t2.set_hash(bnode("c"), value(8));
        assert!(t1.is_fixed_point(&t2));
        // splitting {a, b} changes the relation
        t2.set_hash(bnode("b"), value(9));
        assert!(!t1.is_fixed_point(&t2));
        // ... but a trivial table is always a fixed point
        assert!(t2.is_fixed_point(&t1));
    }

    #[test]
    fn ordered_blank_ids_follow_hash_order() {
        let mut table = HashTable::<Sha256>::new();
        table.set_hash(bnode("a"), value(3));
        table.set_hash(bnode("b"), value(1));
        table.set_hash(bnode("c"), value(2));
        let ids: Vec<_> = table
            .ordered_blank_ids()
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }
}
