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

//! A red-black tree whose ordering is supplied from the outside.
//!
//! The sweep needs two ordered maps: one with a fixed order (the event
//! queue) and one whose order depends on where the sweep currently is
//! (the sweep status). Both are served by [`RedBlackTree`], which takes a
//! plain comparator function at construction and a context value on every
//! operation that compares keys. The comparator is always called as
//! `compare(ctx, probe, stored)`, where the probe is the key supplied by
//! the caller and need not be stored in the tree.
//!
//! Nodes live in an arena and refer to each other by index. Entries never
//! move between nodes, so a [`Handle`] stays valid until its entry is
//! removed, and entries can be removed or stepped from through their
//! handle without comparing keys at all.

mod iter;

pub use iter::Range;

use alloc::vec::Vec;
use core::{
    cmp::Ordering::{self, Equal, Greater, Less},
    fmt, mem,
    ops::Bound,
};

/// Compares a probe key against a stored key in some context.
pub type Comparator<K, C> = fn(&C, &K, &K) -> Ordering;

/// An error returned by a tree operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeError {
    /// The key was not present in the tree.
    NotFound,
    /// The tree had no entries.
    EmptyTree,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::NotFound => write!(f, "key not found in tree"),
            TreeError::EmptyTree => write!(f, "tree is empty"),
        }
    }
}

/// Refers to one entry of a [`RedBlackTree`].
///
/// The handle is invalidated when its entry is removed; after that the
/// slot may be reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(NodeId);

type NodeId = usize;

const LEFT: usize = 0;
const RIGHT: usize = 1;

const DANGLING: &str = "node index refers to a freed slot";

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    red: bool,
    parent: Option<NodeId>,
    link: [Option<NodeId>; 2],
}

/// A balanced ordered map keyed through an injected comparator.
pub struct RedBlackTree<K, V, C> {
    /// Node slots; `None` marks a slot on the free list.
    nodes: Vec<Option<Node<K, V>>>,
    /// Slots that can be reused by the next insertion.
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
    compare: Comparator<K, C>,
}

impl<K, V, C> RedBlackTree<K, V, C> {
    /// Create an empty tree ordered by `compare`.
    pub fn new(compare: Comparator<K, C>) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            compare,
        }
    }

    /// The number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the tree empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// The entry with the smallest key.
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root
            .map(|root| self.extreme(root, LEFT))
            .map(|id| self.entry(id))
    }

    /// The entry with the largest key.
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root
            .map(|root| self.extreme(root, RIGHT))
            .map(|id| self.entry(id))
    }

    /// The handle of the entry with the smallest key.
    pub fn first(&self) -> Option<Handle> {
        self.root.map(|root| Handle(self.extreme(root, LEFT)))
    }

    /// The handle of the entry with the largest key.
    pub fn last(&self) -> Option<Handle> {
        self.root.map(|root| Handle(self.extreme(root, RIGHT)))
    }

    /// Remove and return the entry with the smallest key.
    pub fn pop_min(&mut self) -> Result<(K, V), TreeError> {
        let first = self.first().ok_or(TreeError::EmptyTree)?;
        self.remove_at(first)
    }

    /// Remove and return the entry with the largest key.
    pub fn pop_max(&mut self) -> Result<(K, V), TreeError> {
        let last = self.last().ok_or(TreeError::EmptyTree)?;
        self.remove_at(last)
    }

    /// The entry a handle refers to, if it is still in the tree.
    pub fn get_at(&self, handle: Handle) -> Option<(&K, &V)> {
        self.nodes
            .get(handle.0)
            .and_then(Option::as_ref)
            .map(|node| (&node.key, &node.value))
    }

    /// The handle of the entry right after the given one.
    pub fn next_at(&self, handle: Handle) -> Option<Handle> {
        self.live(handle)?;
        self.step(handle.0, RIGHT).map(Handle)
    }

    /// The handle of the entry right before the given one.
    pub fn prev_at(&self, handle: Handle) -> Option<Handle> {
        self.live(handle)?;
        self.step(handle.0, LEFT).map(Handle)
    }

    /// Remove the entry a handle refers to.
    pub fn remove_at(&mut self, handle: Handle) -> Result<(K, V), TreeError> {
        self.live(handle).ok_or(TreeError::NotFound)?;
        self.delete(handle.0);
        Ok(self.release(handle.0))
    }

    /// Iterate over every entry in ascending order.
    pub fn iter(&self) -> Range<'_, K, V, C> {
        Range::new(self, None, false)
    }

    fn live(&self, handle: Handle) -> Option<&Node<K, V>> {
        self.nodes.get(handle.0).and_then(Option::as_ref)
    }

    fn node(&self, id: NodeId) -> &Node<K, V> {
        self.nodes[id].as_ref().expect(DANGLING)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.nodes[id].as_mut().expect(DANGLING)
    }

    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.node(id);
        (&node.key, &node.value)
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.map_or(false, |id| self.node(id).red)
    }

    fn paint(&mut self, id: Option<NodeId>, red: bool) {
        if let Some(id) = id {
            self.node_mut(id).red = red;
        }
    }

    fn set_parent(&mut self, id: Option<NodeId>, parent: Option<NodeId>) {
        if let Some(id) = id {
            self.node_mut(id).parent = parent;
        }
    }

    /// Which side of its parent a node hangs from.
    fn side_of(&self, parent: NodeId, child: Option<NodeId>) -> usize {
        if self.node(parent).link[LEFT] == child {
            LEFT
        } else {
            RIGHT
        }
    }

    /// Walk from `id` as far as possible towards `dir`.
    fn extreme(&self, mut id: NodeId, dir: usize) -> NodeId {
        while let Some(next) = self.node(id).link[dir] {
            id = next;
        }
        id
    }

    /// The in-order neighbour of `id` in direction `dir`.
    fn step(&self, id: NodeId, dir: usize) -> Option<NodeId> {
        if let Some(child) = self.node(id).link[dir] {
            return Some(self.extreme(child, 1 - dir));
        }

        let mut node = id;
        let mut parent = self.node(id).parent;
        while let Some(up) = parent {
            if self.node(up).link[dir] != Some(node) {
                return Some(up);
            }
            node = up;
            parent = self.node(up).parent;
        }

        None
    }

    fn alloc(&mut self, key: K, value: V, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            key,
            value,
            red: true,
            parent,
            link: [None, None],
        };
        self.len += 1;

        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> (K, V) {
        let node = self.nodes[id].take().expect(DANGLING);
        self.free.push(id);
        self.len -= 1;
        (node.key, node.value)
    }

    /// Put `new` where `old` hangs from its parent.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, Some(old));
                self.node_mut(parent).link[side] = new;
            }
        }
    }

    /// Rotate the subtree at `x` so that its child opposite to `dir`
    /// takes its place, and `x` moves down towards `dir`.
    fn rotate(&mut self, x: NodeId, dir: usize) {
        let y = self.node(x).link[1 - dir].expect("rotation needs a child to lift");
        let inner = self.node(y).link[dir];

        self.node_mut(x).link[1 - dir] = inner;
        self.set_parent(inner, Some(x));

        let parent = self.node(x).parent;
        self.node_mut(y).parent = parent;
        self.replace_child(parent, x, Some(y));

        self.node_mut(y).link[dir] = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    /// Restore the red-black invariants after `z` was attached as a red leaf.
    fn insert_fixup(&mut self, mut z: NodeId) {
        while let Some(p) = self.node(z).parent.filter(|&p| self.node(p).red) {
            // a red node is never the root
            let Some(g) = self.node(p).parent else {
                break;
            };
            let side = self.side_of(g, Some(p));
            let uncle = self.node(g).link[1 - side];

            if self.is_red(uncle) {
                // colour flip, then continue from the grandparent
                self.node_mut(p).red = false;
                self.paint(uncle, false);
                self.node_mut(g).red = true;
                z = g;
                continue;
            }

            if self.node(p).link[1 - side] == Some(z) {
                // inner child, turn it into an outer one first
                z = p;
                self.rotate(z, side);
            }

            let p = self.node(z).parent.expect("lifted node has a parent");
            let g = self.node(p).parent.expect("lifted node has a grandparent");
            self.node_mut(p).red = false;
            self.node_mut(g).red = true;
            self.rotate(g, 1 - side);
        }

        let root = self.root;
        self.paint(root, false);
    }

    /// Unlink `z` from the tree, keeping it balanced. The slot itself is
    /// left for the caller to release.
    fn delete(&mut self, z: NodeId) {
        let [left, right] = self.node(z).link;
        let z_parent = self.node(z).parent;

        let mut removed_red = self.node(z).red;
        let x;
        let x_parent;

        match (left, right) {
            (None, _) | (_, None) => {
                x = left.or(right);
                x_parent = z_parent;
                self.replace_child(z_parent, z, x);
                self.set_parent(x, z_parent);
            }
            (Some(left), Some(right)) => {
                // splice out the in-order successor and put it in z's place
                let y = self.extreme(right, LEFT);
                removed_red = self.node(y).red;
                x = self.node(y).link[RIGHT];

                if y == right {
                    x_parent = Some(y);
                } else {
                    let y_parent = self.node(y).parent;
                    x_parent = y_parent;
                    self.replace_child(y_parent, y, x);
                    self.set_parent(x, y_parent);

                    self.node_mut(y).link[RIGHT] = Some(right);
                    self.node_mut(right).parent = Some(y);
                }

                self.replace_child(z_parent, z, Some(y));
                self.node_mut(y).parent = z_parent;
                self.node_mut(y).link[LEFT] = Some(left);
                self.node_mut(left).parent = Some(y);
                self.node_mut(y).red = self.node(z).red;
            }
        }

        if !removed_red {
            self.delete_fixup(x, x_parent);
        }
    }

    /// Restore black heights after a black node was removed above `x`.
    fn delete_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && !self.is_red(x) {
            let Some(p) = parent else {
                break;
            };
            let side = self.side_of(p, x);

            // the deficient side always has a sibling
            let Some(mut w) = self.node(p).link[1 - side] else {
                break;
            };

            if self.node(w).red {
                self.node_mut(w).red = false;
                self.node_mut(p).red = true;
                self.rotate(p, side);
                w = match self.node(p).link[1 - side] {
                    Some(w) => w,
                    None => break,
                };
            }

            let [near, far] = {
                let link = self.node(w).link;
                [link[side], link[1 - side]]
            };

            if !self.is_red(near) && !self.is_red(far) {
                self.node_mut(w).red = true;
                x = Some(p);
                parent = self.node(p).parent;
                continue;
            }

            if !self.is_red(far) {
                self.paint(near, false);
                self.node_mut(w).red = true;
                self.rotate(w, 1 - side);
                w = match self.node(p).link[1 - side] {
                    Some(w) => w,
                    None => break,
                };
            }

            self.node_mut(w).red = self.node(p).red;
            self.node_mut(p).red = false;
            let far = self.node(w).link[1 - side];
            self.paint(far, false);
            self.rotate(p, side);
            x = self.root;
            break;
        }

        self.paint(x, false);
    }
}

impl<K, V, C> RedBlackTree<K, V, C> {
    /// The handle of the entry whose key equals `key`.
    pub fn find(&self, ctx: &C, key: &K) -> Option<Handle> {
        let mut node = self.root;

        while let Some(id) = node {
            let current = self.node(id);
            match (self.compare)(ctx, key, &current.key) {
                Less => node = current.link[LEFT],
                Greater => node = current.link[RIGHT],
                Equal => return Some(Handle(id)),
            }
        }

        None
    }

    /// Get the value stored under a key equal to `key`.
    pub fn get(&self, ctx: &C, key: &K) -> Option<&V> {
        self.find(ctx, key).map(|Handle(id)| &self.node(id).value)
    }

    /// Get a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, ctx: &C, key: &K) -> Option<&mut V> {
        let Handle(id) = self.find(ctx, key)?;
        Some(&mut self.node_mut(id).value)
    }

    /// Is there a key equal to `key` in the tree?
    pub fn contains(&self, ctx: &C, key: &K) -> bool {
        self.find(ctx, key).is_some()
    }

    /// Insert an entry, returning the previous value if an equal key
    /// was already present. The stored key is kept in that case.
    pub fn insert(&mut self, ctx: &C, key: K, value: V) -> Option<V> {
        self.insert_full(ctx, key, value).1
    }

    /// Like [`insert`](Self::insert), but also returns the handle of the
    /// entry now holding the value.
    pub fn insert_full(&mut self, ctx: &C, key: K, value: V) -> (Handle, Option<V>) {
        let mut parent = None;
        let mut node = self.root;
        let mut dir = LEFT;

        while let Some(id) = node {
            dir = match (self.compare)(ctx, &key, &self.node(id).key) {
                Less => LEFT,
                Greater => RIGHT,
                Equal => {
                    let old = mem::replace(&mut self.node_mut(id).value, value);
                    return (Handle(id), Some(old));
                }
            };
            parent = Some(id);
            node = self.node(id).link[dir];
        }

        let id = self.alloc(key, value, parent);
        match parent {
            Some(parent) => self.node_mut(parent).link[dir] = Some(id),
            None => self.root = Some(id),
        }
        self.insert_fixup(id);

        (Handle(id), None)
    }

    /// Get the value under `key`, inserting the result of `default` first
    /// if the key is absent.
    pub fn get_or_insert_with(&mut self, ctx: &C, key: K, default: impl FnOnce() -> V) -> &mut V {
        let Handle(id) = match self.find(ctx, &key) {
            Some(handle) => handle,
            None => self.insert_full(ctx, key, default()).0,
        };

        &mut self.node_mut(id).value
    }

    /// Remove the entry with a key equal to `key`.
    pub fn remove(&mut self, ctx: &C, key: &K) -> Result<(K, V), TreeError> {
        let handle = self.find(ctx, key).ok_or(TreeError::NotFound)?;
        self.remove_at(handle)
    }

    /// The entry with the largest key strictly less than `probe`.
    ///
    /// `probe` does not need to be in the tree.
    pub fn predecessor(&self, ctx: &C, probe: &K) -> Option<(&K, &V)> {
        self.predecessor_at(ctx, probe)
            .map(|Handle(id)| self.entry(id))
    }

    /// The entry with the smallest key strictly greater than `probe`.
    ///
    /// `probe` does not need to be in the tree.
    pub fn successor(&self, ctx: &C, probe: &K) -> Option<(&K, &V)> {
        self.successor_at(ctx, probe)
            .map(|Handle(id)| self.entry(id))
    }

    /// The handle of the [`predecessor`](Self::predecessor) of `probe`.
    pub fn predecessor_at(&self, ctx: &C, probe: &K) -> Option<Handle> {
        self.nearest(ctx, probe, Greater, RIGHT)
    }

    /// The handle of the [`successor`](Self::successor) of `probe`.
    pub fn successor_at(&self, ctx: &C, probe: &K) -> Option<Handle> {
        self.nearest(ctx, probe, Less, LEFT)
    }

    /// Descend towards `probe`, remembering the last node that the probe
    /// compared as `beyond` against. That node is the nearest one on the
    /// other side.
    fn nearest(&self, ctx: &C, probe: &K, beyond: Ordering, dir: usize) -> Option<Handle> {
        let mut node = self.root;
        let mut best = None;

        while let Some(id) = node {
            let current = self.node(id);
            if (self.compare)(ctx, probe, &current.key) == beyond {
                best = Some(id);
                node = current.link[dir];
            } else {
                node = current.link[1 - dir];
            }
        }

        best.map(Handle)
    }

    /// Iterate over the entries between two bounds, ascending or, if
    /// `reverse` is set, descending.
    pub fn range<'a>(
        &'a self,
        ctx: &'a C,
        lower: Bound<&'a K>,
        upper: Bound<&'a K>,
        reverse: bool,
    ) -> Range<'a, K, V, C> {
        Range::new(self, Some(iter::Bounds { ctx, lower, upper }), reverse)
    }
}

#[cfg(test)]
impl<K, V, C> RedBlackTree<K, V, C> {
    /// Check the red-black invariants, returning the black height.
    pub(crate) fn check_invariants(&self) -> usize {
        assert!(!self.is_red(self.root), "root must be black");
        if let Some(root) = self.root {
            assert_eq!(self.node(root).parent, None, "root has a parent");
        }

        let height = self.black_height(self.root);
        let live = self.nodes.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(live, self.len, "length out of sync with live nodes");
        height
    }

    fn black_height(&self, id: Option<NodeId>) -> usize {
        let Some(id) = id else {
            return 1;
        };

        let node = self.node(id);
        for child in node.link.into_iter().flatten() {
            assert_eq!(self.node(child).parent, Some(id), "broken parent link");
        }
        if node.red {
            assert!(
                !self.is_red(node.link[LEFT]) && !self.is_red(node.link[RIGHT]),
                "red node with a red child"
            );
        }

        let left = self.black_height(node.link[LEFT]);
        let right = self.black_height(node.link[RIGHT]);
        assert_eq!(left, right, "unequal black height");

        left + usize::from(!node.red)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RedBlackTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
