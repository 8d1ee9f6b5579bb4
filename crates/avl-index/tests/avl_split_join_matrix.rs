use avl_index::{AvlError, AvlTree};

fn tree_of(keys: impl IntoIterator<Item = i32>) -> AvlTree<i32, i32> {
    let mut tree = AvlTree::new();
    for k in keys {
        tree.insert(k, -k).unwrap();
    }
    tree
}

fn keys(tree: &AvlTree<i32, i32>) -> Vec<i32> {
    tree.keys().copied().collect()
}

#[test]
fn split_absent_key_matrix() {
    let mut tree = tree_of(1..=10);
    assert!(matches!(
        tree.split(&42),
        Err(AvlError::PreconditionViolation(_))
    ));
    // A failed split keeps the source tree.
    assert_eq!(keys(&tree), (1..=10).collect::<Vec<_>>());
    tree.assert_valid().unwrap();

    let (lower, upper) = tree.split(&5).unwrap();
    assert!(tree.is_empty());
    assert_eq!(lower.size() + upper.size(), 9);
}

#[test]
fn split_every_key_matrix() {
    for x in 1..=64 {
        let (lower, upper) = tree_of(1..=64).split(&x).unwrap();
        lower.assert_valid().unwrap();
        upper.assert_valid().unwrap();
        assert_eq!(keys(&lower), (1..x).collect::<Vec<_>>());
        assert_eq!(keys(&upper), (x + 1..=64).collect::<Vec<_>>());
        assert_eq!(lower.size() + upper.size(), 63);
        assert_eq!(lower.search(&x), None);
        assert_eq!(upper.search(&x), None);
    }
}

#[test]
fn split_extremes_matrix() {
    let (lower, upper) = tree_of(1..=20).split(&1).unwrap();
    assert!(lower.is_empty());
    assert_eq!(upper.min_key(), Some(&2));
    upper.assert_valid().unwrap();

    let (lower, upper) = tree_of(1..=20).split(&20).unwrap();
    assert!(upper.is_empty());
    assert_eq!(lower.max_key(), Some(&19));
    lower.assert_valid().unwrap();

    let (lower, upper) = tree_of([7]).split(&7).unwrap();
    assert!(lower.is_empty());
    assert!(upper.is_empty());
}

#[test]
fn split_results_are_independent_matrix() {
    let (mut lower, mut upper) = tree_of(1..=40).split(&25).unwrap();
    for k in 100..120 {
        upper.insert(k, k).unwrap();
    }
    for k in 1..10 {
        lower.delete(&k).unwrap();
    }
    lower.assert_valid().unwrap();
    upper.assert_valid().unwrap();
    assert_eq!(keys(&lower), (10..25).collect::<Vec<_>>());
    assert_eq!(upper.size(), 15 + 20);
}

#[test]
fn join_same_rank_matrix() {
    let mut lower = tree_of(1..=3);
    let mut upper = tree_of(5..=7);
    assert_eq!(lower.join(4, -4, &mut upper), Ok(1));
    assert!(upper.is_empty());
    upper.assert_valid().unwrap();
    assert_eq!(lower.root_key(), Some(&4));
    assert_eq!(keys(&lower), (1..=7).collect::<Vec<_>>());
    lower.assert_valid().unwrap();
}

#[test]
fn join_taller_lower_matrix() {
    let mut lower = tree_of(1..=100);
    let mut upper = tree_of([200, 300]);
    let expected = (lower.height() - upper.height()).unsigned_abs() as usize + 1;
    assert_eq!(lower.join(150, -150, &mut upper), Ok(expected));
    lower.assert_valid().unwrap();
    assert_eq!(lower.size(), 103);
    assert_eq!(lower.max(), Some(&-300));
    assert_eq!(lower.search(&150), Some(&-150));
}

#[test]
fn join_taller_upper_matrix() {
    let mut upper = tree_of(100..=400);
    let mut lower = tree_of([1, 2, 3]);
    let expected = (upper.height() - lower.height()).unsigned_abs() as usize + 1;
    assert_eq!(upper.join(50, -50, &mut lower), Ok(expected));
    upper.assert_valid().unwrap();
    assert_eq!(upper.min_key(), Some(&1));
    assert_eq!(upper.size(), 305);
}

#[test]
fn join_small_self_into_large_other_matrix() {
    let mut small = tree_of([1]);
    let mut large = tree_of(10..=60);
    let expected = (large.height() - small.height()).unsigned_abs() as usize + 1;
    assert_eq!(small.join(5, -5, &mut large), Ok(expected));
    small.assert_valid().unwrap();
    assert_eq!(keys(&small)[..3], [1, 5, 10]);
    assert_eq!(small.size(), 53);
}

#[test]
fn join_with_empty_side_matrix() {
    let mut tree = tree_of(1..=7);
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.join(50, -50, &mut AvlTree::new()), Ok(4));
    assert_eq!(tree.max_key(), Some(&50));
    tree.assert_valid().unwrap();

    let mut empty = AvlTree::new();
    let mut other = tree_of([1, 2]);
    assert_eq!(empty.join(3, -3, &mut other), Ok(3));
    assert!(other.is_empty());
    assert_eq!(keys(&empty), vec![1, 2, 3]);
    empty.assert_valid().unwrap();

    let mut empty = AvlTree::<i32, i32>::new();
    assert_eq!(empty.join(3, -3, &mut AvlTree::new()), Ok(1));
    assert_eq!(keys(&empty), vec![3]);
}

#[test]
fn join_precondition_matrix() {
    let mut tree = tree_of(1..=10);
    let mut overlapping = tree_of(5..=15);
    assert!(matches!(
        tree.join(20, 0, &mut overlapping),
        Err(AvlError::PreconditionViolation(_))
    ));
    assert_eq!(keys(&tree), (1..=10).collect::<Vec<_>>());
    assert_eq!(keys(&overlapping), (5..=15).collect::<Vec<_>>());
    tree.assert_valid().unwrap();
    overlapping.assert_valid().unwrap();

    let mut above = tree_of(20..=30);
    assert!(matches!(
        tree.join(5, 0, &mut above),
        Err(AvlError::PreconditionViolation(_))
    ));
    assert_eq!(above.size(), 11);

    let mut empty = AvlTree::new();
    assert_eq!(
        empty.join(2, 0, &mut tree_of(1..=3)),
        Err(AvlError::DuplicateKey)
    );
    assert!(empty.is_empty());
}

#[test]
fn failed_join_keeps_both_trees_matrix() {
    // Empty receiver, pivot already present in the donor.
    let mut empty = AvlTree::new();
    let mut donor = tree_of(1..=1000);
    assert_eq!(empty.join(500, 0, &mut donor), Err(AvlError::DuplicateKey));
    assert!(empty.is_empty());
    assert_eq!(donor.size(), 1000);
    assert_eq!(donor.search(&500), Some(&-500));
    donor.assert_valid().unwrap();

    // Empty donor, pivot already present in the receiver.
    let mut tree = tree_of(1..=10);
    let mut nothing = AvlTree::new();
    assert_eq!(tree.join(3, 0, &mut nothing), Err(AvlError::DuplicateKey));
    assert_eq!(tree.search(&3), Some(&-3));
    assert_eq!(tree.size(), 10);

    // Overlapping ranges in either direction.
    let mut a = tree_of(1..=10);
    let mut b = tree_of(5..=15);
    assert!(a.join(20, 0, &mut b).is_err());
    assert!(b.join(0, 0, &mut a).is_err());
    assert_eq!(keys(&a), (1..=10).collect::<Vec<_>>());
    assert_eq!(keys(&b), (5..=15).collect::<Vec<_>>());
    a.assert_valid().unwrap();
    b.assert_valid().unwrap();

    // The same trees still join once the pivot separates them.
    let mut c = tree_of(20..=25);
    assert_eq!(a.join(15, -15, &mut c), Ok(2));
    assert!(c.is_empty());
    assert_eq!(a.size(), 17);
    a.assert_valid().unwrap();
}

#[test]
fn split_join_inverse_matrix() {
    let base = tree_of((1..=200).map(|k| k * 3));
    let expected: Vec<(i32, i32)> = base.iter().map(|(k, v)| (*k, *v)).collect();

    for x in [3, 42, 300, 597, 600] {
        let mut tree = tree_of((1..=200).map(|k| k * 3));
        let value = *tree.search(&x).unwrap();
        let (mut lower, mut upper) = tree.split(&x).unwrap();
        lower.join(x, value, &mut upper).unwrap();
        lower.assert_valid().unwrap();
        let rejoined: Vec<(i32, i32)> = lower.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(rejoined, expected);
    }
}
