use std::fmt::Debug;

use tracing::{debug, trace};

use crate::util::{first, get_l, get_p, get_r, last, next, set_p};

use super::types::AvlNodeLike;

/// Height of a link. The virtual node (`None`) has height `-1`.
#[inline]
pub fn height<K, V, N>(arena: &[N], link: Option<u32>) -> i32
where
    N: AvlNodeLike<K, V>,
{
    link.map_or(-1, |i| arena[i as usize].height())
}

/// Size of a link. The virtual node (`None`) has size `0`.
#[inline]
pub fn size<K, V, N>(arena: &[N], link: Option<u32>) -> usize
where
    N: AvlNodeLike<K, V>,
{
    link.map_or(0, |i| arena[i as usize].size())
}

/// Recomputes height and size of `i` from its current children only.
pub fn update_height_size<K, V, N>(arena: &mut [N], i: u32)
where
    N: AvlNodeLike<K, V>,
{
    let l = get_l(arena, i);
    let r = get_r(arena, i);
    let h = height(arena, l).max(height(arena, r)) + 1;
    let s = size(arena, l) + size(arena, r) + 1;
    let node = &mut arena[i as usize];
    node.set_height(h);
    node.set_size(s);
}

/// `height(left) - height(right)`.
#[inline]
pub fn balance_factor<K, V, N>(arena: &[N], i: u32) -> i32
where
    N: AvlNodeLike<K, V>,
{
    height(arena, get_l(arena, i)) - height(arena, get_r(arena, i))
}

/// Sets the left child of `i` and refreshes its height and size.
///
/// The child's parent link is left to the caller.
pub fn set_left<K, V, N>(arena: &mut [N], i: u32, child: Option<u32>)
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].set_l(child);
    update_height_size(arena, i);
}

/// Sets the right child of `i` and refreshes its height and size.
///
/// The child's parent link is left to the caller.
pub fn set_right<K, V, N>(arena: &mut [N], i: u32, child: Option<u32>)
where
    N: AvlNodeLike<K, V>,
{
    arena[i as usize].set_r(child);
    update_height_size(arena, i);
}

/// Resets `i` to a lone leaf with no links.
pub fn detach<K, V, N>(arena: &mut [N], i: u32)
where
    N: AvlNodeLike<K, V>,
{
    let node = &mut arena[i as usize];
    node.set_p(None);
    node.set_l(None);
    node.set_r(None);
    node.set_height(0);
    node.set_size(1);
}

fn replace_child<K, V, N>(arena: &mut [N], p: u32, old: u32, new: Option<u32>)
where
    N: AvlNodeLike<K, V>,
{
    if get_l(arena, p) == Some(old) {
        set_left(arena, p, new);
    } else {
        set_right(arena, p, new);
    }
}

/// Left rotation at `x`. Returns the root of the whole tree afterwards.
pub fn rotate_left<K, V, N>(arena: &mut [N], root: u32, x: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let y = get_r(arena, x).expect("left rotation needs a right child");
    let p = get_p(arena, x);
    let yl = get_l(arena, y);

    set_right(arena, x, yl);
    if let Some(yl) = yl {
        set_p(arena, yl, Some(x));
    }
    set_left(arena, y, Some(x));
    set_p(arena, x, Some(y));
    set_p(arena, y, p);

    match p {
        Some(p) => {
            replace_child(arena, p, x, Some(y));
            root
        }
        None => y,
    }
}

/// Right rotation at `x`. Returns the root of the whole tree afterwards.
pub fn rotate_right<K, V, N>(arena: &mut [N], root: u32, x: u32) -> u32
where
    N: AvlNodeLike<K, V>,
{
    let y = get_l(arena, x).expect("right rotation needs a left child");
    let p = get_p(arena, x);
    let yr = get_r(arena, y);

    set_left(arena, x, yr);
    if let Some(yr) = yr {
        set_p(arena, yr, Some(x));
    }
    set_right(arena, y, Some(x));
    set_p(arena, x, Some(y));
    set_p(arena, y, p);

    match p {
        Some(p) => {
            replace_child(arena, p, x, Some(y));
            root
        }
        None => y,
    }
}

/// Fixes a `+2`/`-2` imbalance at `x`, choosing single or double rotation
/// from the heavy child's balance factor. Returns `(root, rotations)`.
fn fix_imbalance<K, V, N>(arena: &mut [N], root: u32, x: u32, bf: i32) -> (u32, usize)
where
    N: AvlNodeLike<K, V>,
{
    if bf > 0 {
        let heavy = get_l(arena, x).expect("left-heavy node has a left child");
        if balance_factor(arena, heavy) >= 0 {
            trace!(node = x, bf, "single right rotation");
            (rotate_right(arena, root, x), 1)
        } else {
            trace!(node = x, bf, "left-right rotation");
            let root = rotate_left(arena, root, heavy);
            (rotate_right(arena, root, x), 2)
        }
    } else {
        let heavy = get_r(arena, x).expect("right-heavy node has a right child");
        if balance_factor(arena, heavy) <= 0 {
            trace!(node = x, bf, "single left rotation");
            (rotate_left(arena, root, x), 1)
        } else {
            trace!(node = x, bf, "right-left rotation");
            let root = rotate_right(arena, root, heavy);
            (rotate_left(arena, root, x), 2)
        }
    }
}

/// Walks from a freshly attached `node` to the root, refreshing every
/// height/size on the way and rotating wherever a parent reaches `±2`.
///
/// Returns `(root, rotations)`; a double rotation counts as two.
pub fn rebalance_after_insert<K, V, N>(arena: &mut [N], mut root: u32, node: u32) -> (u32, usize)
where
    N: AvlNodeLike<K, V>,
{
    let mut ops = 0;
    let mut curr = Some(node);
    while let Some(c) = curr {
        let Some(p) = get_p(arena, c) else {
            update_height_size(arena, c);
            break;
        };
        update_height_size(arena, c);
        update_height_size(arena, p);
        let pbf = balance_factor(arena, p);
        if pbf.abs() == 2 {
            let (r, n) = fix_imbalance(arena, root, p, pbf);
            root = r;
            ops += n;
        }
        curr = get_p(arena, c);
    }
    (root, ops)
}

/// Walks from `start` to the root after a node was unlinked below it.
///
/// Unlike the insert walk, the rotation shape is decided by the heavy
/// sibling subtree, and a balanced sibling gets a single rotation.
pub fn rebalance_after_delete<K, V, N>(arena: &mut [N], mut root: u32, start: u32) -> (u32, usize)
where
    N: AvlNodeLike<K, V>,
{
    let mut ops = 0;
    let mut curr = Some(start);
    while let Some(x) = curr {
        update_height_size(arena, x);
        let bf = balance_factor(arena, x);
        if bf.abs() == 2 {
            let (r, n) = fix_imbalance(arena, root, x, bf);
            root = r;
            ops += n;
        }
        curr = get_p(arena, x);
    }
    (root, ops)
}

/// Attaches the detached node `n` below `root` by key and rebalances.
///
/// The caller guarantees that `n`'s key is not already present. Returns
/// `(root, rotations)`.
pub fn insert<K, V, N>(arena: &mut [N], root: Option<u32>, n: u32) -> (u32, usize)
where
    K: Ord,
    N: AvlNodeLike<K, V>,
{
    let Some(root) = root else {
        return (n, 0);
    };

    let mut curr = root;
    loop {
        let go_left = arena[n as usize].key() < arena[curr as usize].key();
        let child = if go_left {
            get_l(arena, curr)
        } else {
            get_r(arena, curr)
        };
        match child {
            Some(child) => curr = child,
            None => {
                if go_left {
                    set_left(arena, curr, Some(n));
                } else {
                    set_right(arena, curr, Some(n));
                }
                set_p(arena, n, Some(curr));
                return rebalance_after_insert(arena, root, n);
            }
        }
    }
}

/// Unlinks `n` from the tree rooted at `root` and rebalances.
///
/// `n` stays in the arena as a detached leaf. Returns the new root (`None`
/// once the tree is empty) and the rotation count.
pub fn remove<K, V, N>(arena: &mut [N], root: u32, n: u32) -> (Option<u32>, usize)
where
    N: AvlNodeLike<K, V>,
{
    let p = get_p(arena, n);
    let l = get_l(arena, n);
    let r = get_r(arena, n);
    detach(arena, n);

    let (root, start) = match (l, r) {
        (None, None) => match p {
            None => return (None, 0),
            Some(p) => {
                replace_child(arena, p, n, None);
                (root, p)
            }
        },
        (Some(c), None) | (None, Some(c)) => {
            set_p(arena, c, p);
            match p {
                None => return (Some(c), 0),
                Some(p) => {
                    replace_child(arena, p, n, Some(c));
                    (root, p)
                }
            }
        }
        (Some(l), Some(r)) => {
            let s = first(arena, Some(r)).expect("right subtree is real");
            let sr = get_r(arena, s);
            let start = if s == r {
                sr.unwrap_or(s)
            } else {
                let sp = get_p(arena, s).expect("successor below the right child has a parent");
                set_left(arena, sp, sr);
                if let Some(sr) = sr {
                    set_p(arena, sr, Some(sp));
                }
                set_right(arena, s, Some(r));
                set_p(arena, r, Some(s));
                sr.unwrap_or(sp)
            };
            set_left(arena, s, Some(l));
            set_p(arena, l, Some(s));
            set_p(arena, s, p);
            let root = match p {
                Some(p) => {
                    replace_child(arena, p, n, Some(s));
                    root
                }
                None => s,
            };
            (root, start)
        }
    };

    let (root, ops) = rebalance_after_delete(arena, root, start);
    (Some(root), ops)
}

/// Joins `lower`, the `pivot` node and `upper` into one tree.
///
/// Every key under `lower` must sort below the pivot's key and every key
/// under `upper` above it; either side may be empty. The pivot's old links
/// are discarded. Returns the new root and the touched count
/// `|rank(lower) - rank(upper)| + 1`, ranks taken before joining.
pub fn join<K, V, N>(
    arena: &mut [N],
    lower: Option<u32>,
    pivot: u32,
    upper: Option<u32>,
) -> (u32, usize)
where
    N: AvlNodeLike<K, V>,
{
    let hl = height(arena, lower);
    let hu = height(arena, upper);
    let touched = (hl - hu).unsigned_abs() as usize + 1;
    detach(arena, pivot);

    let root = match (lower, upper) {
        (None, None) => pivot,
        (Some(l), None) => {
            let at = last(arena, Some(l)).expect("lower side is real");
            set_right(arena, at, Some(pivot));
            set_p(arena, pivot, Some(at));
            rebalance_after_insert(arena, l, pivot).0
        }
        (None, Some(u)) => {
            let at = first(arena, Some(u)).expect("upper side is real");
            set_left(arena, at, Some(pivot));
            set_p(arena, pivot, Some(at));
            rebalance_after_insert(arena, u, pivot).0
        }
        (Some(l), Some(u)) if (hl - hu).abs() <= 1 => {
            set_left(arena, pivot, Some(l));
            set_right(arena, pivot, Some(u));
            set_p(arena, l, Some(pivot));
            set_p(arena, u, Some(pivot));
            pivot
        }
        (Some(l), Some(u)) if hl > hu => {
            let mut curr = l;
            while height(arena, Some(curr)) - hu > 1 {
                curr = get_r(arena, curr).expect("right spine stays real above the shorter rank");
            }
            let cp = get_p(arena, curr).expect("descent stops below the taller root");
            set_left(arena, pivot, Some(curr));
            set_right(arena, pivot, Some(u));
            set_p(arena, curr, Some(pivot));
            set_p(arena, u, Some(pivot));
            set_p(arena, pivot, Some(cp));
            set_right(arena, cp, Some(pivot));
            rebalance_after_insert(arena, l, pivot).0
        }
        (Some(l), Some(u)) => {
            let mut curr = u;
            while height(arena, Some(curr)) - hl > 1 {
                curr = get_l(arena, curr).expect("left spine stays real above the shorter rank");
            }
            let cp = get_p(arena, curr).expect("descent stops below the taller root");
            set_left(arena, pivot, Some(l));
            set_right(arena, pivot, Some(curr));
            set_p(arena, l, Some(pivot));
            set_p(arena, curr, Some(pivot));
            set_p(arena, pivot, Some(cp));
            set_left(arena, cp, Some(pivot));
            rebalance_after_insert(arena, u, pivot).0
        }
    };

    debug!(lower_rank = hl, upper_rank = hu, touched, "join");
    (root, touched)
}

/// Splits the tree that contains `node` around it.
///
/// The subtrees of `node` seed the two results; every ancestor on the way to
/// the root contributes its other subtree plus itself as a pivot. Those
/// pairs are folded in with [`join`] innermost first. Returns
/// `(lower, upper)` roots; `node` itself is left detached.
pub fn split<K, V, N>(arena: &mut [N], node: u32) -> (Option<u32>, Option<u32>)
where
    N: AvlNodeLike<K, V>,
{
    let mut lower = get_l(arena, node);
    let mut upper = get_r(arena, node);

    // (ancestor, its other subtree, ancestor sorts below `node`)
    let mut fragments: Vec<(u32, Option<u32>, bool)> = Vec::new();
    let mut curr = node;
    while let Some(a) = get_p(arena, curr) {
        if get_r(arena, a) == Some(curr) {
            fragments.push((a, get_l(arena, a), true));
        } else {
            fragments.push((a, get_r(arena, a), false));
        }
        curr = a;
    }

    detach(arena, node);
    for i in [lower, upper].into_iter().flatten() {
        set_p(arena, i, None);
    }
    for &(a, subtree, _) in &fragments {
        detach(arena, a);
        if let Some(i) = subtree {
            set_p(arena, i, None);
        }
    }

    debug!(fragments = fragments.len(), "split");
    for (a, subtree, below) in fragments {
        if below {
            lower = Some(join(arena, subtree, a, lower).0);
        } else {
            upper = Some(join(arena, upper, a, subtree).0);
        }
    }
    (lower, upper)
}

/// Checks BST order, AVL balance, stored heights and sizes, and parent links
/// of the tree under `root`.
pub fn assert_avl_tree<K, V, N>(arena: &[N], root: Option<u32>) -> Result<(), String>
where
    K: Ord + Debug,
    N: AvlNodeLike<K, V>,
{
    let Some(root) = root else {
        return Ok(());
    };

    if arena[root as usize].p().is_some() {
        return Err("Root has parent".to_string());
    }

    // Returns (height, size) recomputed from scratch.
    fn validate<K, V, N>(arena: &[N], node: u32) -> Result<(i32, usize), String>
    where
        N: AvlNodeLike<K, V>,
    {
        let l = arena[node as usize].l();
        let r = arena[node as usize].r();

        let (lh, ls) = match l {
            Some(l) => {
                if arena[l as usize].p() != Some(node) {
                    return Err(format!("Broken parent link on left child of node {node}"));
                }
                validate(arena, l)?
            }
            None => (-1, 0),
        };
        let (rh, rs) = match r {
            Some(r) => {
                if arena[r as usize].p() != Some(node) {
                    return Err(format!("Broken parent link on right child of node {node}"));
                }
                validate(arena, r)?
            }
            None => (-1, 0),
        };

        let h = lh.max(rh) + 1;
        let s = ls + rs + 1;
        let n = &arena[node as usize];
        if n.height() != h {
            return Err(format!(
                "Height mismatch at node {node}: expected {h}, got {}",
                n.height()
            ));
        }
        if n.size() != s {
            return Err(format!(
                "Size mismatch at node {node}: expected {s}, got {}",
                n.size()
            ));
        }
        if !(-1..=1).contains(&(lh - rh)) {
            return Err(format!("AVL balance violated at node {node}: bf={}", lh - rh));
        }
        Ok((h, s))
    }

    validate(arena, root)?;

    let mut curr = first(arena, Some(root));
    let mut prev: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev {
            let (a, b) = (arena[prev as usize].key(), arena[i as usize].key());
            if a >= b {
                return Err(format!("Node order violated: {a:?} before {b:?}"));
            }
        }
        prev = Some(i);
        curr = next(arena, i);
    }

    Ok(())
}

/// Debug printer for AVL trees.
pub fn print<K, V, N>(arena: &[N], node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    V: Debug,
    N: AvlNodeLike<K, V>,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print::<K, V, N>(arena, n.l(), &format!("{tab}  "));
            let right = print::<K, V, N>(arena, n.r(), &format!("{tab}  "));
            format!(
                "Node[{i}] [h={} n={}] {{ {:?} = {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.height(),
                n.size(),
                n.key(),
                n.value()
            )
        }
    }
}
