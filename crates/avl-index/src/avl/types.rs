use crate::types::{KvNode, Node};

/// One stored entry of an AVL tree.
///
/// Absent children are `None` links, which the AVL layer treats as the
/// virtual node (height `-1`, size `0`).
#[derive(Clone, Debug)]
pub struct AvlNode<K, V> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    pub v: V,
    /// Edges on the longest path down to a virtual node; a leaf has `0`.
    pub height: i32,
    /// Real nodes in the subtree rooted here, this one included.
    pub size: usize,
}

impl<K, V> AvlNode<K, V> {
    /// A detached leaf.
    pub fn new(k: K, v: V) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            k,
            v,
            height: 0,
            size: 1,
        }
    }
}

impl<K, V> Node for AvlNode<K, V> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl<K, V> KvNode<K, V> for AvlNode<K, V> {
    fn key(&self) -> &K {
        &self.k
    }

    fn value(&self) -> &V {
        &self.v
    }

    fn value_mut(&mut self) -> &mut V {
        &mut self.v
    }
}

/// AVL-specific node bookkeeping.
pub trait AvlNodeLike<K, V>: KvNode<K, V> {
    fn height(&self) -> i32;
    fn set_height(&mut self, height: i32);
    fn size(&self) -> usize;
    fn set_size(&mut self, size: usize);
}

impl<K, V> AvlNodeLike<K, V> for AvlNode<K, V> {
    fn height(&self) -> i32 {
        self.height
    }

    fn set_height(&mut self, height: i32) {
        self.height = height;
    }

    fn size(&self) -> usize {
        self.size
    }

    fn set_size(&mut self, size: usize) {
        self.size = size;
    }
}
