use anyhow::Result;
use dialog_collections::{OrderedMap, OrderedMultiset, OrderedSet};
use pretty_assertions::assert_eq;

#[test]
fn set_erases_and_walks_backwards() -> Result<()> {
    let mut set = OrderedSet::from([14, 4, 18, 3, 8, 21, 6, 11, 5, 1]);
    assert_eq!(set.len(), 10);

    set.erase(set.find(&8));
    set.erase(set.find(&5));
    set.validate()?;

    let expected = vec![1, 3, 4, 6, 11, 14, 18, 21];
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), expected);

    let mut walked = Vec::new();
    let mut current = set.last().copied();
    while let Some(key) = current {
        walked.push(key);
        current = set.predecessor(&key).copied();
    }
    walked.reverse();
    assert_eq!(walked, expected);

    let reversed: Vec<_> = set.iter().rev().copied().collect();
    assert_eq!(reversed, expected.into_iter().rev().collect::<Vec<_>>());

    Ok(())
}

#[test]
fn multiset_counts_and_erases_within_an_equal_range() -> Result<()> {
    let mut multiset = OrderedMultiset::from([1, 2, 2, 2, 3]);
    assert_eq!(multiset.count(&2), 3);

    let (from, to) = multiset.equal_range(&2);
    assert_eq!(multiset.range(from, to).copied().collect::<Vec<_>>(), vec![2, 2, 2]);
    assert_eq!(multiset.get(to), Some(&3));

    let middle = multiset.next(from);
    multiset.erase(middle);

    assert_eq!(multiset.count(&2), 2);
    assert_eq!(multiset.count(&1), 1);
    assert_eq!(multiset.count(&3), 1);
    assert_eq!(
        multiset.iter().copied().collect::<Vec<_>>(),
        vec![1, 2, 2, 3]
    );
    multiset.validate()?;

    Ok(())
}

#[test]
fn map_assigns_without_reshaping() -> Result<()> {
    let mut map = OrderedMap::new();
    for (key, value) in [(30, "q"), (10, "s"), (50, "f"), (20, "h"), (70, "r")] {
        let (_, inserted) = map.insert(key, value);
        assert!(inserted);
    }
    assert_eq!(
        map.keys().copied().collect::<Vec<_>>(),
        vec![10, 20, 30, 50, 70]
    );

    let shape = map.tree().to_string();
    let (position, inserted) = map.insert_or_assign(30, "z");
    assert!(!inserted);
    assert_eq!(map.entry_at(position), Some((&30, &"z")));
    assert_eq!(map.tree().to_string(), shape);
    assert_eq!(map.len(), 5);
    assert_eq!(
        map.values().copied().collect::<Vec<_>>(),
        vec!["s", "h", "z", "f", "r"]
    );
    map.validate()?;

    Ok(())
}

#[test]
fn containers_report_nothing_beyond_their_bounds() -> Result<()> {
    let mut set = OrderedSet::from([10, 20, 30]);

    assert_eq!(set.successor(&30), None);
    assert_eq!(set.predecessor(&10), None);
    assert_eq!(set.successor(&15), None);
    assert!(set.upper_bound(&30).is_end());
    assert!(set.lower_bound(&31).is_end());
    assert_eq!(set.get(set.lower_bound(&0)), Some(&10));

    assert!(!set.remove(&25));
    assert_eq!(set.len(), 3);
    set.validate()?;

    assert_eq!(set.next(set.end()), set.begin());
    assert_eq!(set.prev(set.begin()), set.end());
    assert_eq!(set.get(set.prev(set.end())), Some(&30));

    let empty = OrderedSet::<u32>::new();
    assert_eq!(empty.begin(), empty.end());
    assert_eq!(empty.first(), None);
    assert_eq!(empty.last(), None);
    assert_eq!(empty.iter().count(), 0);
    empty.validate()?;

    Ok(())
}

#[test]
fn multiset_reports_nothing_beyond_its_bounds() -> Result<()> {
    let multiset = OrderedMultiset::from([1, 2, 2, 2, 3]);

    let (from, to) = multiset.equal_range(&3);
    assert_eq!(multiset.get(from), Some(&3));
    assert!(to.is_end());
    assert_eq!(multiset.range(from, to).count(), 1);

    let first = multiset.lower_bound(&0);
    assert_eq!(first, multiset.begin());
    assert_eq!(first.slot(), 0);
    assert_eq!(multiset.get(first), Some(&1));

    assert!(multiset.lower_bound(&4).is_end());
    assert!(multiset.upper_bound(&3).is_end());
    assert_eq!(multiset.get(multiset.upper_bound(&1)), Some(&2));

    let last_two = multiset.prev(multiset.upper_bound(&2));
    assert_eq!(last_two.slot(), 2);
    assert_eq!(multiset.get(last_two), Some(&2));
    assert_eq!(multiset.prev(multiset.begin()), multiset.end());
    assert_eq!(multiset.get(multiset.prev(multiset.end())), Some(&3));

    let (from, to) = multiset.equal_range(&9);
    assert!(from.is_end() && to.is_end());
    Ok(())
}

#[test]
fn positions_survive_unrelated_changes() -> Result<()> {
    let mut set: OrderedSet<u32> = (0..16).map(|key| key * 10).collect();
    let position = set.find(&50);

    for key in 0..64 {
        set.insert(key * 10 + 5);
    }
    assert_eq!(set.get(position), Some(&50));

    set.remove(&150);
    set.remove(&0);
    assert_eq!(set.get(position), Some(&50));

    let mut cursor = set.cursor(position);
    cursor.move_next();
    assert_eq!(cursor.current(), Some(&55));
    cursor.move_prev();
    cursor.move_prev();
    assert_eq!(cursor.current(), Some(&45));
    set.validate()?;

    Ok(())
}

#[test]
fn moving_a_container_keeps_its_positions() -> Result<()> {
    let mut map = OrderedMap::from([(1, "a"), (2, "b")]);
    let position = map.find(&2);

    let moved = std::mem::take(&mut map);
    assert!(map.is_empty());
    map.validate()?;

    assert_eq!(moved.entry_at(position), Some((&2, &"b")));
    Ok(())
}

#[test]
fn trees_render_sideways() -> Result<()> {
    let set = OrderedSet::from([2, 1, 3]);
    assert_eq!(set.tree().to_string(), "┌── 3 (R)\n2 (B)\n└── 1 (R)\n");
    Ok(())
}
