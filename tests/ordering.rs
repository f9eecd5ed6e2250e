use ordmap::{OrderedMap, OutOfRange, RandomState};

fn pairs<S>(map: &OrderedMap<&'static str, i32, S>) -> Vec<(&'static str, i32)> {
    map.iter().map(|(k, v)| (*k, *v)).collect()
}

fn assert_positions_agree<S: std::hash::BuildHasher>(map: &OrderedMap<&'static str, i32, S>) {
    for pos in 0..map.len() {
        let key = map.key_at(pos).unwrap();
        assert_eq!(map.get_index_of(key), Some(pos), "{} is indexed at the wrong position", key);
        assert_eq!(map.get(key), map.value_at(pos).ok());
    }
}

#[test]
fn append_insert_remove_walkthrough() {
    let mut map = OrderedMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    map.insert("c", 3);
    assert_eq!(pairs(&map), [("a", 1), ("b", 2), ("c", 3)]);
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("b"), Some(&2));

    map.insert_at(1, "x", 9).unwrap();
    assert_eq!(pairs(&map), [("a", 1), ("x", 9), ("b", 2), ("c", 3)]);
    assert_eq!(map.get_index_of("b"), Some(2));

    assert_eq!(map.remove("a"), Some(1));
    assert_eq!(pairs(&map), [("x", 9), ("b", 2), ("c", 3)]);
    assert_eq!(map.get("a"), None);
    assert_eq!(map.get_index_of("b"), Some(1));

    assert_positions_agree(&map);
}

#[test]
fn distinct_appends_keep_call_order_and_count() {
    let keys = ["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"];
    let mut map = OrderedMap::new();
    for (i, key) in keys.iter().enumerate() {
        map.insert(*key, i as i32);
        assert_eq!(map.get(key), Some(&(i as i32)));
    }
    assert_eq!(map.len(), keys.len());
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), keys);
    assert_positions_agree(&map);
}

#[test]
fn removals_shrink_by_one() {
    let mut map: OrderedMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3), ("d", 4)].into_iter().collect();

    map.remove_at(0).unwrap();
    assert_eq!(map.len(), 3);

    assert!(map.remove("c").is_some());
    assert_eq!(map.len(), 2);

    assert!(map.remove("c").is_none());
    assert_eq!(map.len(), 2);
    assert_positions_agree(&map);
}

#[test]
fn unknown_keys_are_not_found() {
    let map: OrderedMap<&str, i32> = [("a", 1)].into_iter().collect();
    assert_eq!(map.get("never"), None);
    assert_eq!(map.get_index_of("never"), None);
    assert!(!map.contains_key("never"));
}

#[test]
fn positional_bounds() {
    let mut map: OrderedMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    let err = OutOfRange {
        position: 2,
        len: 2,
    };
    assert_eq!(map.value_at(2), Err(err));
    assert_eq!(map.key_at(2), Err(err));
    assert_eq!(map.remove_at(2), Err(err));
    assert_eq!(
        map.insert_at(3, "z", 0),
        Err(OutOfRange {
            position: 3,
            len: 2
        })
    );
    assert_eq!(map.insert_at(2, "z", 0), Ok(None));

    let mut empty: OrderedMap<&str, i32> = OrderedMap::new();
    assert!(empty.value_at(0).is_err());
    assert!(empty.remove_at(0).is_err());
    assert_eq!(empty.insert_at(0, "only", 1), Ok(None));
}

#[test]
fn reinsertion_leaves_no_orphans() {
    let mut map = OrderedMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    assert_eq!(map.insert("a", 3), Some(1));
    assert_eq!(map.len(), 2);
    assert_eq!(pairs(&map), [("b", 2), ("a", 3)]);
    assert_positions_agree(&map);
}

#[test]
fn fixed_keys_hash_the_same_across_maps() {
    let state = RandomState::<2, 4>::with_keys(11, 12);
    let mut a = OrderedMap::with_hasher(state.clone());
    let mut b = OrderedMap::with_capacity_and_hasher(8, state);
    for (k, v) in [("one", 1), ("two", 2)] {
        a.insert(k, v);
        b.insert(k, v);
    }
    assert_eq!(a, b);
    assert!(b.capacity() >= 8);
}
