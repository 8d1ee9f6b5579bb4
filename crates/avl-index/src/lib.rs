//! Self-balancing ordered key/value index.
//!
//! An AVL tree supporting search, insertion, deletion, ordered enumeration,
//! `split` (partition at a key into two trees) and `join` (merge two
//! key-disjoint trees around a pivot entry).
//!
//! Instead of raw pointers, parent and child links are `Option<u32>` indices
//! into an arena owned by the tree; `None` plays the role of the virtual
//! (sentinel) node with height `-1` and size `0`.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Node`] and [`KvNode`] link/entry traits |
//! | [`util`] | `first`, `last`, `next`, `prev`, `find` over any node arena |
//! | [`avl::types`] | [`AvlNode`] with height and size bookkeeping |
//! | [`avl::util`] | rotations, rebalance walks, arena-level insert, remove, split, join |
//! | [`avl::arena`] | moving nodes between arenas |
//! | [`avl::avl_tree`] | [`AvlTree`], the owning tree |
//!
//! ```
//! use avl_index::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for k in [10, 20, 5, 6] {
//!     tree.insert(k, k.to_string()).unwrap();
//! }
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![5, 6, 10, 20]);
//!
//! let (lower, upper) = tree.split(&10).unwrap();
//! assert!(tree.is_empty());
//! assert_eq!(lower.size(), 2);
//! assert_eq!(upper.min(), Some(&"20".to_string()));
//! ```

pub mod avl;
pub mod error;
pub mod types;
pub mod util;

pub use avl::{AvlNode, AvlNodeLike, AvlTree};
pub use error::AvlError;
pub use types::{KvNode, Node};
