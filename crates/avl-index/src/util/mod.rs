//! Structural helpers over any [`Node`] arena.
//!
//! These only follow links; they never look at keys, heights or sizes, so
//! they work for any binary tree laid out in an index arena.

use std::cmp::Ordering;

use crate::types::{KvNode, Node};

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

/// Leftmost node in the tree.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(l) = get_l(arena, curr) {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node in the tree.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(r) = get_r(arena, curr) {
        curr = r;
    }
    Some(curr)
}

/// In-order successor.
///
/// Leftmost node of the right subtree if there is one, otherwise the first
/// ancestor reached through a left-child edge.
pub fn next<N: Node>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, curr) {
        return first(arena, Some(r));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, curr) {
        return last(arena, Some(l));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

fn size_inner<N: Node>(arena: &[N], root: u32) -> usize {
    1 + get_l(arena, root).map_or(0, |l| size_inner(arena, l))
        + get_r(arena, root).map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes under `root`, counted by walking the links.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

/// Binary-search descent for `key`.
pub fn find<K, V, N>(arena: &[N], root: Option<u32>, key: &K) -> Option<u32>
where
    K: Ord,
    N: KvNode<K, V>,
{
    let mut curr = root;
    while let Some(i) = curr {
        curr = match key.cmp(arena[i as usize].key()) {
            Ordering::Equal => return Some(i),
            Ordering::Less => get_l(arena, i),
            Ordering::Greater => get_r(arena, i),
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Link {
        p: Option<u32>,
        l: Option<u32>,
        r: Option<u32>,
    }

    impl Node for Link {
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

    //       0
    //     /   \
    //    1     2
    //     \   /
    //      3 4
    fn sample() -> Vec<Link> {
        let link = |p, l, r| Link { p, l, r };
        vec![
            link(None, Some(1), Some(2)),
            link(Some(0), None, Some(3)),
            link(Some(0), Some(4), None),
            link(Some(1), None, None),
            link(Some(2), None, None),
        ]
    }

    #[test]
    fn walks_in_order_both_ways() {
        let arena = sample();
        let mut forward = Vec::new();
        let mut curr = first(&arena, Some(0));
        while let Some(i) = curr {
            forward.push(i);
            curr = next(&arena, i);
        }
        assert_eq!(forward, vec![1, 3, 0, 4, 2]);

        let mut backward = Vec::new();
        let mut curr = last(&arena, Some(0));
        while let Some(i) = curr {
            backward.push(i);
            curr = prev(&arena, i);
        }
        assert_eq!(backward, vec![2, 4, 0, 3, 1]);
    }

    #[test]
    fn empty_tree_has_no_extremes() {
        let arena: Vec<Link> = Vec::new();
        assert_eq!(first(&arena, None), None);
        assert_eq!(last(&arena, None), None);
        assert_eq!(size(&arena, None), 0);
    }

    #[test]
    fn counts_nodes_by_links() {
        let arena = sample();
        assert_eq!(size(&arena, Some(0)), 5);
        assert_eq!(size(&arena, Some(2)), 2);
    }
}
