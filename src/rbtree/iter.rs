// This file is part of segment-sweep.
//
// segment-sweep is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public
// License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option)
// any later version.
//
// segment-sweep is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General
// Public License along with segment-sweep. If not, see
// <https://www.gnu.org/licenses/>.

//! In-order iteration over a [`RedBlackTree`].

use super::{NodeId, RedBlackTree, LEFT, RIGHT};
use alloc::vec::Vec;
use core::{
    cmp::Ordering::{Greater, Less},
    iter::FusedIterator,
    ops::Bound,
};

/// The limits of a range, together with the context needed to compare
/// against them.
pub(super) struct Bounds<'a, K, C> {
    pub(super) ctx: &'a C,
    pub(super) lower: Bound<&'a K>,
    pub(super) upper: Bound<&'a K>,
}

impl<'a, K, C> Clone for Bounds<'a, K, C> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx,
            lower: self.lower,
            upper: self.upper,
        }
    }
}

/// A lazy iterator over a range of entries of a [`RedBlackTree`].
///
/// Cloning the iterator gives an independent cursor at the same position,
/// so a range can be walked more than once.
pub struct Range<'a, K, V, C> {
    tree: &'a RedBlackTree<K, V, C>,
    /// Nodes whose entry has not been yielded yet, next one on top.
    stack: Vec<NodeId>,
    bounds: Option<Bounds<'a, K, C>>,
    reverse: bool,
}

impl<'a, K, V, C> Range<'a, K, V, C> {
    pub(super) fn new(
        tree: &'a RedBlackTree<K, V, C>,
        bounds: Option<Bounds<'a, K, C>>,
        reverse: bool,
    ) -> Self {
        let mut range = Self {
            tree,
            stack: Vec::new(),
            bounds,
            reverse,
        };
        range.seek();
        range
    }

    /// The direction we walk towards first.
    fn near(&self) -> usize {
        if self.reverse {
            RIGHT
        } else {
            LEFT
        }
    }

    /// Is `key` at or past the bound we start from?
    fn after_start(&self, key: &K) -> bool {
        let Some(bounds) = &self.bounds else {
            return true;
        };
        let compare = self.tree.compare;

        if self.reverse {
            satisfies_upper(compare, bounds.ctx, bounds.upper, key)
        } else {
            satisfies_lower(compare, bounds.ctx, bounds.lower, key)
        }
    }

    /// Is `key` before the bound we stop at?
    fn before_end(&self, key: &K) -> bool {
        let Some(bounds) = &self.bounds else {
            return true;
        };
        let compare = self.tree.compare;

        if self.reverse {
            satisfies_lower(compare, bounds.ctx, bounds.lower, key)
        } else {
            satisfies_upper(compare, bounds.ctx, bounds.upper, key)
        }
    }

    /// Push the path to the first entry in range.
    fn seek(&mut self) {
        let near = self.near();
        let tree = self.tree;
        let mut node = tree.root;

        while let Some(id) = node {
            let current = tree.node(id);
            if self.after_start(&current.key) {
                self.stack.push(id);
                node = current.link[near];
            } else {
                node = current.link[1 - near];
            }
        }
    }

    /// Push `node` and every node on its near spine.
    fn descend(&mut self, mut node: Option<NodeId>) {
        let near = self.near();
        let tree = self.tree;
        while let Some(id) = node {
            self.stack.push(id);
            node = tree.node(id).link[near];
        }
    }
}

fn satisfies_lower<K, C>(
    compare: super::Comparator<K, C>,
    ctx: &C,
    bound: Bound<&K>,
    key: &K,
) -> bool {
    match bound {
        Bound::Unbounded => true,
        Bound::Included(bound) => compare(ctx, bound, key) != Greater,
        Bound::Excluded(bound) => compare(ctx, bound, key) == Less,
    }
}

fn satisfies_upper<K, C>(
    compare: super::Comparator<K, C>,
    ctx: &C,
    bound: Bound<&K>,
    key: &K,
) -> bool {
    match bound {
        Bound::Unbounded => true,
        Bound::Included(bound) => compare(ctx, bound, key) != Less,
        Bound::Excluded(bound) => compare(ctx, bound, key) == Greater,
    }
}

impl<'a, K, V, C> Iterator for Range<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(id);

        if !self.before_end(&node.key) {
            // everything left on the stack is further along
            self.stack.clear();
            return None;
        }

        let far = 1 - self.near();
        self.descend(node.link[far]);

        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.tree.len()))
    }
}

impl<'a, K, V, C> FusedIterator for Range<'a, K, V, C> {}

impl<'a, K, V, C> Clone for Range<'a, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            bounds: self.bounds.clone(),
            reverse: self.reverse,
        }
    }
}
