//! I define the [`HashFunction`] trait and the standard hash functions,
//! as well as the hash primitives used by the canonicalization algorithms:
//! term hashing, the order-dependent tuple hash,
//! and the commutative-associative [`BagFunction`] combiners.
use isocanon_api::Term;
use sha2::Digest;

/// Abstraction of the hash function used by the canonicalization algorithms.
pub trait HashFunction {
    /// Output of the hash function; usually `[u8; N]`.
    ///
    /// Equality is byte-wise;
    /// the order is byte-wise lexicographic
    /// (big-endian unsigned integer interpretation).
    type Output: AsRef<[u8]> + AsMut<[u8]> + Copy + Eq + Ord;

    /// Start the computation of a hash
    fn initialize() -> Self;

    /// Update internal state by hashing `data`
    fn update(&mut self, data: impl AsRef<[u8]>);

    /// Return the hash
    fn finalize(self) -> Self::Output;

    /// The all-zero hash value,
    /// used as the initial hash of every blank node
    /// and as the hash of the absent graph name.
    fn zero() -> Self::Output;
}

/// The [SHA-256](https://en.wikipedia.org/wiki/SHA-2) [`HashFunction`]
pub struct Sha256(sha2::Sha256);

impl HashFunction for Sha256 {
    type Output = [u8; 32];

    fn initialize() -> Self {
        Sha256(sha2::Sha256::new())
    }

    fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data.as_ref());
    }

    fn finalize(self) -> Self::Output {
        self.0.finalize().into()
    }

    fn zero() -> Self::Output {
        [0; 32]
    }
}

/// The [SHA-384](https://en.wikipedia.org/wiki/SHA-2) [`HashFunction`]
pub struct Sha384(sha2::Sha384);

impl HashFunction for Sha384 {
    type Output = [u8; 48];

    fn initialize() -> Self {
        Sha384(sha2::Sha384::new())
    }

    fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data.as_ref());
    }

    fn finalize(self) -> Self::Output {
        self.0.finalize().into()
    }

    fn zero() -> Self::Output {
        [0; 48]
    }
}

/// Hash a single term by the UTF-8 bytes of its canonical N-Quads form.
///
/// `None` (the absent graph name) hashes to [`HashFunction::zero`].
pub fn hash_term<H: HashFunction>(term: Option<&Term>) -> H::Output {
    match term {
        None => H::zero(),
        Some(term) => {
            let mut hasher = H::initialize();
            hasher.update(term.to_string());
            hasher.finalize()
        }
    }
}

/// Order-dependent tuple hash: the hash of the separator-free concatenation
/// of `parts`.
///
/// Unambiguity is the caller's responsibility:
/// every call site must fix the arity and the role of each slot.
/// The canonicalization algorithms do so by always passing fixed-width hash
/// values followed by a single-byte role marker.
pub fn hash_tuple<H: HashFunction>(parts: &[&[u8]]) -> H::Output {
    let mut hasher = H::initialize();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// Commutative-associative combination of the hash contributions collected
/// for one blank node during an iteration of the hasher.
///
/// The chosen realization is part of the canonical output contract:
/// the same combiner must be used consistently throughout a run.
pub trait BagFunction {
    /// Combine `prior` (the blank node's hash from the previous iteration)
    /// with the accumulated `contributions`.
    ///
    /// The result must not depend on the order in which contributions were
    /// accumulated.
    fn combine<H: HashFunction>(prior: &H::Output, contributions: &mut [H::Output]) -> H::Output;
}

/// [`BagFunction`] combining hash values by element-wise addition modulo 255.
///
/// Retained for compatibility with the modular-sum variant of the algorithm.
/// Known weakness: collisions under permutation are possible for adversarial
/// inputs, forcing needless distinguish branching; prefer [`SortedTuple`].
pub struct ModularSum;

impl BagFunction for ModularSum {
    fn combine<H: HashFunction>(prior: &H::Output, contributions: &mut [H::Output]) -> H::Output {
        let mut acc = *prior;
        for contribution in contributions.iter() {
            for (a, b) in acc.as_mut().iter_mut().zip(contribution.as_ref()) {
                *a = ((u16::from(*a) + u16::from(*b)) % 255) as u8;
            }
        }
        acc
    }
}

/// [`BagFunction`] hashing the sorted contributions after the prior hash.
///
/// Commutative-associative by construction,
/// and collision-resistant to the strength of the underlying hash function.
pub struct SortedTuple;

impl BagFunction for SortedTuple {
    fn combine<H: HashFunction>(prior: &H::Output, contributions: &mut [H::Output]) -> H::Output {
        contributions.sort_unstable();
        let mut hasher = H::initialize();
        hasher.update(prior);
        for contribution in contributions.iter() {
            hasher.update(contribution);
        }
        hasher.finalize()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_all_zero_bytes() {
        assert_eq!(Sha256::zero(), [0u8; 32]);
        assert_eq!(Sha384::zero(), [0u8; 48]);
        assert_eq!(hash_term::<Sha256>(None), Sha256::zero());
    }

    #[test]
    fn term_hash_is_deterministic() {
        let t1 = Term::iri("tag:a");
        let t2 = Term::iri("tag:a");
        let t3 = Term::iri("tag:b");
        assert_eq!(hash_term::<Sha256>(Some(&t1)), hash_term::<Sha256>(Some(&t2)));
        assert_ne!(hash_term::<Sha256>(Some(&t1)), hash_term::<Sha256>(Some(&t3)));
    }

    #[test]
    fn tuple_hash_is_order_dependent() {
        let a = hash_term::<Sha256>(Some(&Term::iri("tag:a")));
        let b = hash_term::<Sha256>(Some(&Term::iri("tag:b")));
        let ab = hash_tuple::<Sha256>(&[a.as_ref(), b.as_ref()]);
        let ba = hash_tuple::<Sha256>(&[b.as_ref(), a.as_ref()]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn sorted_tuple_is_commutative() {
        let a = hash_term::<Sha256>(Some(&Term::iri("tag:a")));
        let b = hash_term::<Sha256>(Some(&Term::iri("tag:b")));
        let c = hash_term::<Sha256>(Some(&Term::iri("tag:c")));
        let prior = Sha256::zero();
        let h1 = SortedTuple::combine::<Sha256>(&prior, &mut [a, b, c]);
        let h2 = SortedTuple::combine::<Sha256>(&prior, &mut [c, a, b]);
        assert_eq!(h1, h2);
    }

    #[test]
    fn modular_sum_is_commutative() {
        let a = hash_term::<Sha256>(Some(&Term::iri("tag:a")));
        let b = hash_term::<Sha256>(Some(&Term::iri("tag:b")));
        let c = hash_term::<Sha256>(Some(&Term::iri("tag:c")));
        let prior = hash_term::<Sha256>(Some(&Term::iri("tag:p")));
        let h1 = ModularSum::combine::<Sha256>(&prior, &mut [a, b, c]);
        let h2 = ModularSum::combine::<Sha256>(&prior, &mut [b, c, a]);
        assert_eq!(h1, h2);
    }

    #[test]
    fn modular_sum_wraps_at_255() {
        let mut x = [0u8; 32];
        x[0] = 254;
        let mut y = [0u8; 32];
        y[0] = 2;
        let combined = ModularSum::combine::<Sha256>(&x, &mut [y]);
        assert_eq!(combined[0], 1);
    }
}
