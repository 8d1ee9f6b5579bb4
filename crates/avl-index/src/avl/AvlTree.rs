use std::fmt;

use tracing::debug;

use crate::error::AvlError;
use crate::types::KvNode;
use crate::util::{find, first, last, next};

use super::arena::{absorb, extract, vacate};
use super::types::AvlNode;
use super::util;

/// AVL tree map that owns its nodes.
///
/// Nodes live in a dense arena addressed by `u32` indices; the tree keeps
/// the root plus cached handles to its smallest and largest entries.
/// [`split`](Self::split) and [`join`](Self::join) move nodes between trees,
/// so every node has exactly one owning tree at a time.
pub struct AvlTree<K, V> {
    arena: Vec<AvlNode<K, V>>,
    root: Option<u32>,
    min: Option<u32>,
    max: Option<u32>,
}

impl<K, V> AvlTree<K, V>
where
    K: Ord,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Empty tree whose arena can take `capacity` entries without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Vec::with_capacity(capacity),
            root: None,
            min: None,
            max: None,
        }
    }

    fn from_parts(arena: Vec<AvlNode<K, V>>, root: Option<u32>) -> Self {
        let mut tree = Self {
            arena,
            root,
            min: None,
            max: None,
        };
        tree.update_min_max();
        tree
    }

    fn update_min_max(&mut self) {
        self.min = first(&self.arena, self.root);
        self.max = last(&self.arena, self.root);
    }

    fn find(&self, key: &K) -> Option<u32> {
        find(&self.arena, self.root, key)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        util::size(&self.arena, self.root)
    }

    /// Rank of the tree: height of the root, `-1` when empty.
    pub fn height(&self) -> i32 {
        util::height(&self.arena, self.root)
    }

    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|i| self.arena[i as usize].key())
    }

    /// Value stored under `key`.
    pub fn search(&self, key: &K) -> Option<&V> {
        self.find(key).map(|i| self.arena[i as usize].value())
    }

    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key)?;
        Some(self.arena[i as usize].value_mut())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Value of the smallest key.
    pub fn min(&self) -> Option<&V> {
        self.min.map(|i| self.arena[i as usize].value())
    }

    /// Value of the largest key.
    pub fn max(&self) -> Option<&V> {
        self.max.map(|i| self.arena[i as usize].value())
    }

    pub fn min_key(&self) -> Option<&K> {
        self.min.map(|i| self.arena[i as usize].key())
    }

    pub fn max_key(&self) -> Option<&K> {
        self.max.map(|i| self.arena[i as usize].key())
    }

    /// Inserts a new entry and returns the number of rotations it took
    /// (a double rotation counts as two).
    pub fn insert(&mut self, key: K, value: V) -> Result<usize, AvlError> {
        if self.contains(&key) {
            return Err(AvlError::DuplicateKey);
        }
        self.arena.push(AvlNode::new(key, value));
        let idx = (self.arena.len() - 1) as u32;
        let (root, ops) = util::insert(&mut self.arena, self.root, idx);
        self.root = Some(root);
        self.update_min_max();
        Ok(ops)
    }

    /// Removes the entry under `key` and returns the number of rotations it
    /// took.
    pub fn delete(&mut self, key: &K) -> Result<usize, AvlError> {
        let node = self.find(key).ok_or(AvlError::KeyNotFound)?;
        let root = self.root.expect("found node implies a root");
        let (root, ops) = util::remove(&mut self.arena, root, node);
        self.root = root;
        vacate(&mut self.arena, node, &mut [&mut self.root]);
        self.update_min_max();
        Ok(ops)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.min = None;
        self.max = None;
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            curr: self.min,
            remaining: self.size(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Splits the tree around `key` into `(lower, upper)`.
    ///
    /// `lower` holds every key below `key` and `upper` every key above it.
    /// The entry under `key` itself is dropped and `self` is left empty.
    /// `key` must be present; otherwise `self` is left untouched.
    pub fn split(&mut self, key: &K) -> Result<(Self, Self), AvlError> {
        let node = self
            .find(key)
            .ok_or(AvlError::PreconditionViolation("split key is not in the tree"))?;
        let mut arena = std::mem::take(self).arena;
        let (mut lower, mut upper) = util::split(&mut arena, node);
        vacate(&mut arena, node, &mut [&mut lower, &mut upper]);

        let lower_is_smaller = util::size(&arena, lower) <= util::size(&arena, upper);
        let (small, mut big) = if lower_is_smaller {
            (lower, upper)
        } else {
            (upper, lower)
        };
        let small = match small {
            Some(s) => Self::from_parts(extract(&mut arena, s, &mut [&mut big]), Some(0)),
            None => Self::new(),
        };
        let big = Self::from_parts(arena, big);
        debug!(small = small.size(), big = big.size(), "split into trees");

        Ok(if lower_is_smaller {
            (small, big)
        } else {
            (big, small)
        })
    }

    /// Moves every entry of `other` into this tree, through a new
    /// `(key, value)` entry.
    ///
    /// All keys of one tree must sort below `key` and all keys of the other
    /// above it. An empty side turns the join into a plain insert. On
    /// success `other` is left empty; on error neither tree changes.
    /// Returns `|rank(self) - rank(other)| + 1` with ranks taken before
    /// joining.
    ///
    /// The rebalancing is `O(|rank(self) - rank(other)| + 1)`, but the nodes of
    /// the smaller arena are physically moved, so the whole call costs
    /// `O(min(n, m))` on top of that.
    pub fn join(&mut self, key: K, value: V, other: &mut Self) -> Result<usize, AvlError> {
        let touched = (self.height() - other.height()).unsigned_abs() as usize + 1;
        if other.is_empty() {
            self.insert(key, value)?;
            return Ok(touched);
        }
        if self.is_empty() {
            other.insert(key, value)?;
            std::mem::swap(self, other);
            return Ok(touched);
        }

        let below = |t: &Self| t.max_key().is_some_and(|k| *k < key);
        let above = |t: &Self| t.min_key().is_some_and(|k| *k > key);
        let mut lower_is_self = if below(&*self) && above(&*other) {
            true
        } else if below(&*other) && above(&*self) {
            false
        } else {
            return Err(AvlError::PreconditionViolation(
                "join pivot does not separate the two trees",
            ));
        };

        // Keep the larger arena in place and append the smaller one.
        let mut other = std::mem::take(other);
        if other.arena.len() > self.arena.len() {
            std::mem::swap(self, &mut other);
            lower_is_self = !lower_is_self;
        }
        let other_root = other.root;
        let offset = absorb(&mut self.arena, other.arena);
        let other_root = other_root.map(|r| r + offset);

        self.arena.push(AvlNode::new(key, value));
        let pivot = (self.arena.len() - 1) as u32;
        let (lower, upper) = if lower_is_self {
            (self.root, other_root)
        } else {
            (other_root, self.root)
        };
        let (root, joined) = util::join(&mut self.arena, lower, pivot, upper);
        debug_assert_eq!(joined, touched);
        self.root = Some(root);
        self.update_min_max();
        Ok(touched)
    }

    /// Checks every structural invariant, including the cached extremes and
    /// that the arena holds no unreachable node.
    pub fn assert_valid(&self) -> Result<(), String>
    where
        K: fmt::Debug,
    {
        util::assert_avl_tree(&self.arena, self.root)?;
        if self.min != first(&self.arena, self.root) {
            return Err("Cached min is stale".to_string());
        }
        if self.max != last(&self.arena, self.root) {
            return Err("Cached max is stale".to_string());
        }
        if self.size() != self.arena.len() {
            return Err(format!(
                "Arena holds {} nodes but the tree reaches {}",
                self.arena.len(),
                self.size()
            ));
        }
        Ok(())
    }
}

impl<K: Ord, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&util::print(&self.arena, self.root, ""))
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a AvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator: starts at the cached minimum and follows successors.
pub struct Iter<'a, K, V> {
    arena: &'a [AvlNode<K, V>],
    curr: Option<u32>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.curr?;
        self.curr = next(self.arena, i);
        self.remaining -= 1;
        let node = &self.arena[i as usize];
        Some((&node.k, &node.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
