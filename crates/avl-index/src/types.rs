//! Node trait definitions.
//!
//! Each "pointer" is an `Option<u32>` index into a [`Vec`]-backed arena.
//! `None` stands for the virtual (sentinel) node: it has no identity and no
//! key, and the AVL layer gives it height `-1` and size `0`.

/// Parent/left/right links.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Key/value node interface used by map-like structures.
pub trait KvNode<K, V>: Node {
    fn key(&self) -> &K;
    fn value(&self) -> &V;
    fn value_mut(&mut self) -> &mut V;
}
