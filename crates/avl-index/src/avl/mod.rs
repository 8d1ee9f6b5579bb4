//! AVL tree with per-node height and size, split and join.

pub mod arena;
#[path = "AvlTree.rs"]
pub mod avl_tree;
pub mod types;
pub mod util;

pub use avl_tree::{AvlTree, Iter};
pub use types::{AvlNode, AvlNodeLike};
