//! Moving nodes between arenas.
//!
//! Every arena is owned by exactly one tree. When nodes change owner (delete,
//! split, join) they are physically moved, and the arena they leave stays
//! dense: the last slot is swapped into the hole and its neighbours are
//! redirected.

use crate::types::Node;
use crate::util::{get_l, get_p, get_r, set_p};

/// Points the neighbours of the node now stored at `to` (previously at
/// `from`) back at it.
fn relink<N: Node>(arena: &mut [N], from: u32, to: u32) {
    if let Some(p) = get_p(arena, to) {
        if get_l(arena, p) == Some(from) {
            arena[p as usize].set_l(Some(to));
        } else if get_r(arena, p) == Some(from) {
            arena[p as usize].set_r(Some(to));
        }
    }
    for c in [get_l(arena, to), get_r(arena, to)].into_iter().flatten() {
        set_p(arena, c, Some(to));
    }
}

fn redirect(handles: &mut [&mut Option<u32>], from: u32, to: u32) {
    for h in handles.iter_mut() {
        if **h == Some(from) {
            **h = Some(to);
        }
    }
}

/// Takes the unlinked node `i` out of the arena.
///
/// No other node may link to `i`. The last node moves into slot `i`; any of
/// `handles` that referred to it are updated.
pub fn vacate<N: Node>(arena: &mut Vec<N>, i: u32, handles: &mut [&mut Option<u32>]) -> N {
    let last = (arena.len() - 1) as u32;
    let node = arena.swap_remove(i as usize);
    if i != last {
        relink(arena, last, i);
        redirect(handles, last, i);
    }
    node
}

/// Moves the subtree under the parentless node `root` into a fresh arena.
///
/// The subtree root lands at index `0` of the returned arena. Links are
/// rewritten; any per-node bookkeeping is carried over untouched, since the
/// subtree keeps its shape. `handles` into the source arena are kept valid.
pub fn extract<N: Node>(arena: &mut Vec<N>, root: u32, handles: &mut [&mut Option<u32>]) -> Vec<N> {
    let mut out: Vec<N> = Vec::new();
    // (index in source arena, parent in `out` and whether it is a left child)
    let mut stack: Vec<(u32, Option<(u32, bool)>)> = vec![(root, None)];

    while let Some((i, parent)) = stack.pop() {
        let l = get_l(arena, i);
        let r = get_r(arena, i);
        for c in [l, r].into_iter().flatten() {
            set_p(arena, c, None);
        }
        let node = &mut arena[i as usize];
        node.set_l(None);
        node.set_r(None);

        let last = (arena.len() - 1) as u32;
        let mut node = arena.swap_remove(i as usize);
        let moved = |c: u32| if c == last { i } else { c };
        if i != last {
            relink(arena, last, i);
            redirect(handles, last, i);
            for entry in stack.iter_mut() {
                entry.0 = moved(entry.0);
            }
        }

        let at = out.len() as u32;
        node.set_p(parent.map(|(p, _)| p));
        out.push(node);
        if let Some((p, is_left)) = parent {
            if is_left {
                out[p as usize].set_l(Some(at));
            } else {
                out[p as usize].set_r(Some(at));
            }
        }

        if let Some(l) = l {
            stack.push((moved(l), Some((at, true))));
        }
        if let Some(r) = r {
            stack.push((moved(r), Some((at, false))));
        }
    }

    out
}

/// Appends all of `other` to `arena`, shifting its links.
///
/// Returns the offset added to every index of `other`.
pub fn absorb<N: Node>(arena: &mut Vec<N>, other: Vec<N>) -> u32 {
    let offset = arena.len() as u32;
    let shift = |v: Option<u32>| v.map(|i| i + offset);
    arena.reserve(other.len());
    for mut node in other {
        node.set_p(shift(node.p()));
        node.set_l(shift(node.l()));
        node.set_r(shift(node.r()));
        arena.push(node);
    }
    offset
}
