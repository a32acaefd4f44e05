//! Live sub-path views into container paths.
//!
//! A sub-path is a path that also mirrors every merge into the path it was
//! cut from. Paths live in a [`PathArena`] and refer to their container by
//! id, so the mirroring walks up the arena instead of holding references.
//!
//! A merge in a container moves down the offset of every view starting at or
//! after the end of the merged range. Views starting inside the merged range
//! are left as they are and no longer line up with their container.

use tracing::debug;

use ilkgen_robot::Relation;

use crate::compose::{Interval, Path};

/// Handle of a path stored in a [`PathArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathId(usize);

#[derive(Debug, Clone)]
struct Node<R> {
    path: Path<R>,
    container: Option<PathId>,
    /// Index in the container of this path's first item.
    offset: usize,
    views: Vec<PathId>,
}

/// Owner of a family of paths and the sub-path views cut from them.
#[derive(Debug, Clone)]
pub struct PathArena<R> {
    nodes: Vec<Node<R>>,
}

impl<R> Default for PathArena<R> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<R: Relation> PathArena<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a top-level path.
    pub fn insert(&mut self, path: Path<R>) -> PathId {
        self.push(Node {
            path,
            container: None,
            offset: 0,
            views: Vec::new(),
        })
    }

    fn push(&mut self, node: Node<R>) -> PathId {
        self.nodes.push(node);
        PathId(self.nodes.len() - 1)
    }

    pub fn path(&self, id: PathId) -> &Path<R> {
        &self.nodes[id.0].path
    }

    /// The path `id` was cut from, if it is a view.
    pub fn container(&self, id: PathId) -> Option<PathId> {
        self.nodes[id.0].container
    }

    /// Where the view `id` starts in its container.
    pub fn offset(&self, id: PathId) -> usize {
        self.nodes[id.0].offset
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cut a view for every maximal run of unmerged items of `id`.
    pub fn uncomposed_paths(&mut self, id: PathId) -> Vec<PathId> {
        let runs = self.nodes[id.0].path.uncomposed_runs();
        let mut views = Vec::with_capacity(runs.len());
        for run in runs {
            let items = self.nodes[id.0].path.items()[run.start..run.end()].to_vec();
            let view = self.push(Node {
                path: Path::new(items),
                container: Some(id),
                offset: run.start,
                views: Vec::new(),
            });
            self.nodes[id.0].views.push(view);
            views.push(view);
        }
        views
    }

    /// Merge `interval` of path `id`, then mirror the merge into every
    /// container up the chain.
    ///
    /// Returns `false` if the interval did not apply to `id`.
    pub fn compose_sub_path(&mut self, id: PathId, interval: Interval) -> bool {
        let mut current = id;
        let mut interval = interval;
        let mut applied = false;
        loop {
            if !self.nodes[current.0].path.compose_sub_path(interval) {
                return applied;
            }
            applied = true;
            self.shift_views(current, interval);

            let node = &self.nodes[current.0];
            match node.container {
                Some(container) => {
                    interval = Interval::new(interval.start + node.offset, interval.size);
                    current = container;
                }
                None => return applied,
            }
        }
    }

    fn shift_views(&mut self, id: PathId, merged: Interval) {
        let views = self.nodes[id.0].views.clone();
        for view in views {
            let node = &mut self.nodes[view.0];
            if node.offset >= merged.end() {
                node.offset -= merged.size - 1;
            } else if node.offset > merged.start {
                debug!(
                    offset = node.offset,
                    start = merged.start,
                    size = merged.size,
                    "sub-path view starts inside a merged range"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
