//! Composable chains of relations and paths of composables.
//!
//! A [`Composable`] wraps an ordered, non-empty sequence of atomic relations
//! together with the aggregate relation they amount to. A [`Path`] is a
//! mutable sequence of composables whose contiguous sub-ranges can be merged
//! in place:
//!
//! ```text
//! «a» «b» «c» «d» «e»   --compose [1, 3)-->   «a» «b c» «d» «e»
//! ```
//!
//! Merging never changes the aggregate relation of the whole path.

use std::fmt;
use std::hash::{Hash, Hasher};

use ilkgen_robot::Relation;

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// A contiguous range of path items, as start offset and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: usize,
    pub size: usize,
}

impl Interval {
    pub const fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    /// One past the last index of the range.
    pub const fn end(&self) -> usize {
        self.start + self.size
    }
}

// ---------------------------------------------------------------------------
// Composable
// ---------------------------------------------------------------------------

/// An ordered chain of atomic relations and the relation it amounts to.
///
/// Equality and hashing only look at the atoms.
#[derive(Debug, Clone)]
pub struct Composable<R> {
    atoms: Vec<R>,
    relation: R,
}

impl<R: Relation> Composable<R> {
    /// A composable made of a single atomic relation.
    pub fn new(relation: R) -> Self {
        Self {
            atoms: vec![relation.clone()],
            relation,
        }
    }

    /// The atomic relations, in concatenation order.
    pub fn atoms(&self) -> &[R] {
        &self.atoms
    }

    /// The aggregate relation.
    pub const fn relation(&self) -> &R {
        &self.relation
    }

    /// Concatenate `self` with each of `others`, in argument order.
    pub fn compose(&self, others: &[Self]) -> Self {
        let mut atoms = self.atoms.clone();
        let mut relation = self.relation.clone();
        for other in others {
            atoms.extend(other.atoms.iter().cloned());
            relation = relation.compose(&other.relation);
        }
        Self { atoms, relation }
    }

    /// Compose a whole sequence into one item; `None` if empty.
    ///
    /// When `R::PAIRWISE_SWAP` is set each item is composed with the
    /// accumulation of the items before it, so the result reads
    /// `item[n] ∘ (item[n-1] ∘ (... ∘ item[0]))`.
    pub fn compose_all(items: &[Self]) -> Option<Self> {
        let (first, rest) = items.split_first()?;
        if R::PAIRWISE_SWAP {
            Some(rest.iter().fold(first.clone(), |acc, item| {
                item.compose(std::slice::from_ref(&acc))
            }))
        } else {
            Some(first.compose(rest))
        }
    }
}

impl<R: PartialEq> PartialEq for Composable<R> {
    fn eq(&self, other: &Self) -> bool {
        self.atoms == other.atoms
    }
}

impl<R: Eq> Eq for Composable<R> {}

impl<R: Hash> Hash for Composable<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.atoms.hash(state);
    }
}

impl<R: fmt::Display> fmt::Display for Composable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("«")?;
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{atom}")?;
        }
        f.write_str("»")
    }
}

// ---------------------------------------------------------------------------
// BinaryComposition
// ---------------------------------------------------------------------------

/// One primitive composition step: `result = arg1 ∘ arg2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryComposition<R> {
    pub arg1: R,
    pub arg2: R,
    pub result: R,
}

/// Break a chain of composables into primitive binary steps, left to right.
///
/// Without swap the accumulated relation is the first argument; with
/// `R::PAIRWISE_SWAP` the later item is.
pub fn binary_steps<R: Relation>(items: &[Composable<R>]) -> Vec<BinaryComposition<R>> {
    let Some((first, rest)) = items.split_first() else {
        return Vec::new();
    };
    let mut acc = first.relation().clone();
    let mut steps = Vec::with_capacity(rest.len());
    for item in rest {
        let next = item.relation().clone();
        let (arg1, arg2) = if R::PAIRWISE_SWAP {
            (next, acc)
        } else {
            (acc, next)
        };
        let result = arg1.compose(&arg2);
        acc = result.clone();
        steps.push(BinaryComposition { arg1, arg2, result });
    }
    steps
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// A mutable sequence of composables, with a merged flag per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<R> {
    items: Vec<Composable<R>>,
    merged: Vec<bool>,
}

impl<R: Relation> Path<R> {
    pub fn new(items: Vec<Composable<R>>) -> Self {
        let merged = vec![false; items.len()];
        Self { items, merged }
    }

    /// A path of atomic composables, one per relation.
    pub fn from_relations(relations: impl IntoIterator<Item = R>) -> Self {
        Self::new(relations.into_iter().map(Composable::new).collect())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Composable<R>] {
        &self.items
    }

    /// Whether slot `index` holds the result of a merge.
    pub fn is_merged(&self, index: usize) -> bool {
        self.merged.get(index).copied().unwrap_or(false)
    }

    /// The relation the whole path amounts to; `None` if empty.
    pub fn relation(&self) -> Option<R> {
        Composable::compose_all(&self.items).map(|c| c.relation)
    }

    /// Replace the items in `interval` with their composition.
    ///
    /// Returns `false`, leaving the path untouched, if the interval is empty
    /// or does not fit in the path.
    pub fn compose_sub_path(&mut self, interval: Interval) -> bool {
        if interval.size == 0 || interval.end() > self.items.len() {
            return false;
        }
        let range = interval.start..interval.end();
        let Some(composite) = Composable::compose_all(&self.items[range.clone()]) else {
            return false;
        };
        self.items.splice(range.clone(), [composite]);
        self.merged.splice(range, [true]);
        true
    }

    /// The maximal runs of items not yet merged, left to right.
    pub fn uncomposed_runs(&self) -> Vec<Interval> {
        let mut runs = Vec::new();
        let mut i = 0;
        while i < self.merged.len() {
            while i < self.merged.len() && self.merged[i] {
                i += 1;
            }
            let start = i;
            while i < self.merged.len() && !self.merged[i] {
                i += 1;
            }
            if i > start {
                runs.push(Interval::new(start, i - start));
            }
        }
        runs
    }

    /// Primitive binary steps composing the whole path.
    pub fn binary_steps(&self) -> Vec<BinaryComposition<R>> {
        binary_steps(&self.items)
    }
}

impl<R: fmt::Display> fmt::Display for Path<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
