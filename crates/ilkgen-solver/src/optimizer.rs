//! Greedy sharing of common sub-sequences across paths.
//!
//! Each pass takes every path in turn and narrows it down to the longest
//! run of items it shares with each other path, one after the other. Being
//! shared by more paths wins over being longer: for the paths `bc`, `abc`,
//! `bcdef` and `cdef` the first composition is `bc`, not `cdef`.
//!
//! The search is greedy and depends on the order of the paths, so the
//! result is deterministic but not guaranteed to have the fewest operations.

use std::fmt;

use tracing::debug;

use ilkgen_robot::Relation;

use crate::compose::{BinaryComposition, Composable, Interval, Path, binary_steps};

// ---------------------------------------------------------------------------
// Longest match
// ---------------------------------------------------------------------------

/// A block `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Longest common contiguous block of `a` and `b`.
///
/// Ties go to the block starting first in `a`, then first in `b`. Without
/// any common element the result is `(0, 0, 0)`.
pub fn longest_match<T: PartialEq>(a: &[T], b: &[T]) -> Match {
    let mut best = Match { a: 0, b: 0, size: 0 };
    // run[j + 1]: length of the common block ending at a[i - 1], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    let mut run = vec![0usize; b.len() + 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            run[j + 1] = if x == y { prev[j] + 1 } else { 0 };
            let k = run[j + 1];
            if k > best.size {
                best = Match {
                    a: i + 1 - k,
                    b: j + 1 - k,
                    size: k,
                };
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }
    best
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// A path taking part in a composition, and where the shared items sit in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Involved {
    /// Index of the path in the slice handed to the optimizer.
    pub path: usize,
    pub interval: Interval,
}

/// A run of composables shared by one or more paths, to be merged in each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition<R> {
    involved: Vec<Involved>,
    composables: Vec<Composable<R>>,
}

impl<R: Relation> Composition<R> {
    /// A candidate covering `interval` of `path`, the path at index `index`.
    pub fn new(index: usize, path: &Path<R>, interval: Interval) -> Self {
        Self {
            involved: vec![Involved {
                path: index,
                interval,
            }],
            composables: path.items()[interval.start..interval.end()].to_vec(),
        }
    }

    /// Narrow down to `sub`, relative to the current composables.
    pub fn shrink(&mut self, sub: Interval) {
        for inv in &mut self.involved {
            inv.interval = Interval::new(inv.interval.start + sub.start, sub.size);
        }
        self.composables.truncate(sub.end());
        self.composables.drain(..sub.start);
    }

    pub fn add_involved(&mut self, path: usize, interval: Interval) {
        self.involved.push(Involved { path, interval });
    }

    pub fn involved(&self) -> &[Involved] {
        &self.involved
    }

    pub fn composables(&self) -> &[Composable<R>] {
        &self.composables
    }

    /// The relation produced by the composition.
    pub fn result(&self) -> Option<R> {
        Composable::compose_all(&self.composables).map(|c| c.relation().clone())
    }

    /// Primitive binary steps performing the composition.
    pub fn binary_compositions(&self) -> Vec<BinaryComposition<R>> {
        binary_steps(&self.composables)
    }

    fn apply(&self, paths: &mut [Path<R>]) {
        for inv in &self.involved {
            paths[inv.path].compose_sub_path(inv.interval);
        }
    }
}

impl<R: fmt::Display> fmt::Display for Composition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.composables.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// One sharing pass over `paths`, in slice order.
///
/// Every accepted composition has already been applied to its paths.
pub fn find_composes<R: Relation>(paths: &mut [Path<R>]) -> Vec<Composition<R>> {
    let order: Vec<usize> = (0..paths.len()).collect();
    find_composes_in(paths, &order)
}

fn find_composes_in<R: Relation>(paths: &mut [Path<R>], order: &[usize]) -> Vec<Composition<R>> {
    let mut found = Vec::new();
    let Some((_, candidates)) = order.split_last() else {
        return found;
    };

    for &p in candidates {
        let len = paths[p].len();
        if len <= 1 {
            continue;
        }
        let mut composition = Composition::new(p, &paths[p], Interval::new(0, len));
        for &other in order {
            if other == p {
                continue;
            }
            let overlap = longest_match(composition.composables(), paths[other].items());
            if overlap.size > 1 {
                composition.shrink(Interval::new(overlap.a, overlap.size));
                composition.add_involved(other, Interval::new(overlap.b, overlap.size));
            }
        }

        if composition.involved().len() > 1 {
            composition.apply(paths);
            debug!(
                shared = %composition,
                paths = composition.involved().len(),
                "shared sub-path composed"
            );
            found.push(composition);
        }
    }
    found
}

/// Reduce every path to a single item, sharing as much work as possible.
///
/// Paths are visited shortest first (stable on ties). Sharing passes repeat
/// until one finds nothing; whatever is left unmerged in a path is then
/// composed on its own. Compositions come back in the order they were made.
pub fn all_composes<R: Relation>(paths: &mut [Path<R>]) -> Vec<Composition<R>> {
    let mut order: Vec<usize> = (0..paths.len()).collect();
    order.sort_by_key(|&i| paths[i].len());

    let mut all = Vec::new();
    let mut pass = 0usize;
    loop {
        let found = find_composes_in(paths, &order);
        pass += 1;
        debug!(pass, found = found.len(), "sharing pass done");
        if found.is_empty() {
            break;
        }
        all.extend(found);
    }

    for &p in &order {
        let len = paths[p].len();
        if len > 1 {
            let whole = Interval::new(0, len);
            let composition = Composition::new(p, &paths[p], whole);
            paths[p].compose_sub_path(whole);
            debug!(rest = %composition, "remaining path composed");
            all.push(composition);
        }
    }
    all
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
