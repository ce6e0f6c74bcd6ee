use compact_str::CompactString;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use threadtree::{Map, Multimap, Multiset, Position, Set, StringMap};

mod common;
use common::*;

fn nth_map(map: &Map<u16, u16>, n: usize) -> Position {
    let mut pos = map.begin();
    for _ in 0..n {
        pos = map.next_pos(pos);
    }
    pos
}

fn nth_multimap(map: &Multimap<u16, u16>, n: usize) -> Position {
    let mut pos = map.begin();
    for _ in 0..n {
        pos = map.next_pos(pos);
    }
    pos
}

fn chk_map(map: &Map<u16, u16>, model: &BTreeMap<u16, u16>) {
    assert_eq!(map.len(), model.len());
    assert_eq!(map.is_empty(), model.is_empty());
    assert_eq_iters(map.iter().copied(), model.iter().map(|(k, v)| (*k, *v)));
    assert_eq_iters(
        map.iter().rev().copied(),
        model.iter().rev().map(|(k, v)| (*k, *v)),
    );
    map.validate().unwrap();
}

// Multimap elements are checked in order, so runs of equal keys must match insertion order
fn chk_multimap(map: &Multimap<u16, u16>, model: &[(u16, u16)]) {
    assert_eq!(map.len(), model.len());
    assert_eq_iters(map.iter().copied(), model.iter().copied());
    assert_eq_iters(map.iter().rev().copied(), model.iter().rev().copied());
    map.validate().unwrap();
}

fn insert_model(model: &mut Vec<(u16, u16)>, k: u16, v: u16) {
    let at = model.partition_point(|(x, _)| *x <= k);
    model.insert(at, (k, v));
}

//-----------------------------------------------------------------------------------------------//

fn check_map_ops(init: SmallIntPairs, ops: Vec<Op>) {
    let mut map = Map::new();
    let mut model = BTreeMap::new();

    for (k, v) in init {
        let (_, inserted) = map.insert(k, v);
        assert_eq!(inserted, !model.contains_key(&k));
        model.entry(k).or_insert(v);
    }
    chk_map(&map, &model);

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let (pos, inserted) = map.insert(k, v);
                assert_eq!(inserted, !model.contains_key(&k));
                let v = *model.entry(k).or_insert(v);
                assert_eq!(map.get_at(pos), Some((&k, &v)));
            }
            Op::Remove(k) => {
                let n = usize::from(model.remove(&k).is_some());
                assert_eq!(map.remove(&k), n);
                assert!(map.find(&k).is_end());
            }
            Op::EraseAt(i) => {
                if model.is_empty() {
                    assert_eq!(map.erase(map.begin()), map.end());
                    continue;
                }
                let pos = nth_map(&map, i % model.len());
                let next = map.next_pos(pos);
                let k = *map.get_at(pos).unwrap().0;
                assert_eq!(map.erase(pos), next);
                model.remove(&k);
            }
            Op::PopFirst => assert_eq!(map.pop_first(), model.pop_first()),
            Op::PopLast => assert_eq!(map.pop_last(), model.pop_last()),
        }
        chk_map(&map, &model);
    }
}

fn check_map_bounds(v: SmallIntPairs, targets: Vec<u16>) {
    let map = Map::from_iter(v.iter().copied());
    let model: BTreeMap<u16, u16> = v.into_iter().rev().collect();
    chk_map(&map, &model);

    for k in targets {
        let lower = model.range(k..).next().map(|(k, v)| (*k, *v));
        let upper = model
            .range((Bound::Excluded(k), Bound::Unbounded))
            .next()
            .map(|(k, v)| (*k, *v));

        let at = |pos| map.get_at(pos).map(|(k, v)| (*k, *v));
        assert_eq!(at(map.lower_bound(&k)), lower);
        assert_eq!(at(map.upper_bound(&k)), upper);
        assert_eq!(map.get(&k), model.get(&k));
        assert_eq!(map.count(&k), usize::from(model.contains_key(&k)));

        let (first, last) = map.equal_range(&k);
        assert_eq!(map.range(first, last).count(), map.count(&k));
    }
}

fn check_set_ops(init: Vec<u16>, ops: Vec<Op>) {
    let mut set = Set::from_iter(init.iter().copied());
    let mut model = BTreeSet::from_iter(init);

    for op in ops {
        match op {
            Op::Insert(k, _) => assert_eq!(set.insert(k).1, model.insert(k)),
            Op::Remove(k) => assert_eq!(set.remove(&k), usize::from(model.remove(&k))),
            Op::EraseAt(i) => {
                if let Some(k) = model.iter().nth(i % model.len().max(1)).copied() {
                    model.remove(&k);
                    set.erase(set.find(&k));
                }
            }
            Op::PopFirst => assert_eq!(set.pop_first(), model.pop_first()),
            Op::PopLast => assert_eq!(set.pop_last(), model.pop_last()),
        }

        assert_eq!(set.len(), model.len());
        assert_eq_iters(set.iter(), model.iter());
        set.validate().unwrap();
    }
}

fn check_multimap_ops(init: SmallIntPairs, ops: Vec<Op>) {
    let mut map = Multimap::new();
    let mut model = Vec::new();

    for (k, v) in init {
        map.insert(k, v);
        insert_model(&mut model, k, v);
    }
    chk_multimap(&map, &model);

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let pos = map.insert(k, v);
                assert_eq!(map.next_pos(pos), map.upper_bound(&k));
                insert_model(&mut model, k, v);
            }
            Op::Remove(k) => {
                let n = model.iter().filter(|(x, _)| *x == k).count();
                assert_eq!(map.count(&k), n);
                assert_eq!(map.remove(&k), n);
                model.retain(|(x, _)| *x != k);
            }
            Op::EraseAt(i) => {
                if model.is_empty() {
                    continue;
                }
                let i = i % model.len();
                map.erase(nth_multimap(&map, i));
                model.remove(i);
            }
            Op::PopFirst => {
                let expect = (!model.is_empty()).then(|| model.remove(0));
                assert_eq!(map.pop_first(), expect);
            }
            Op::PopLast => assert_eq!(map.pop_last(), model.pop()),
        }
        chk_multimap(&map, &model);
    }

    for k in 0..32 {
        let expect: Vec<u16> = model.iter().filter(|(x, _)| *x == k).map(|(_, v)| *v).collect();
        let found: Vec<u16> = map.get_all(&k).map(|(_, v)| *v).collect();
        assert_eq!(found, expect);
    }
}

// Hinted inserts land at the same place as plain inserts, wherever the hint points
fn check_multimap_hints(v: SmallIntPairs, hints: Vec<usize>) {
    let mut map = Multimap::new();
    let mut model = Vec::new();

    for ((k, v), h) in v.into_iter().zip(hints.into_iter().cycle()) {
        let hint = nth_multimap(&map, h % (model.len() + 1));
        let pos = map.insert_hint(hint, k, v);
        assert_eq!(map.get_at(pos), Some((&k, &v)));
        insert_model(&mut model, k, v);
    }
    chk_multimap(&map, &model);
}

fn check_multiset_positions(v: Vec<u16>) {
    let mut set = Multiset::new();
    let positions: Vec<(Position, u16)> = v.iter().map(|k| (set.insert(*k), *k)).collect();

    // Erase every other element by position; the rest stay reachable
    for (pos, k) in positions.iter().step_by(2) {
        assert_eq!(set.get_at(*pos), Some(k));
        set.erase(*pos);
        set.validate().unwrap();
    }
    for (pos, k) in positions.iter().skip(1).step_by(2) {
        assert_eq!(set.get_at(*pos), Some(k));
    }
    assert_eq!(set.len(), v.len() / 2);
}

fn check_string_map(v: Vec<(String, u16)>) {
    let mut map = StringMap::new();
    let mut model = BTreeMap::new();

    for (k, v) in v {
        map.insert(CompactString::from(k.as_str()), v);
        model.entry(k).or_insert(v);
    }

    assert_eq_iters(
        map.iter().map(|(k, v)| (k.as_str(), *v)),
        model.iter().map(|(k, v)| (k.as_str(), *v)),
    );
    for (k, v) in &model {
        assert_eq!(map.get(k.as_str()), Some(v));
    }
    map.validate().unwrap();
}

//-----------------------------------------------------------------------------------------------//

proptest! {
    #[test]
    fn test_map_ops(init in small_int_pairs(), ops in op_seqs(1024)) {
        check_map_ops(init, ops);
    }

    #[test]
    fn test_map_ops_crowded(init in crowded_int_pairs(), ops in op_seqs(32)) {
        check_map_ops(init, ops);
    }

    #[test]
    fn test_map_bounds(
        v in small_int_pairs(),
        targets in prop::collection::vec(0u16..1100, 0..64)
    ) {
        check_map_bounds(v, targets);
    }

    #[test]
    fn test_set_ops(init in prop::collection::vec(0u16..64, 0..128), ops in op_seqs(64)) {
        check_set_ops(init, ops);
    }

    #[test]
    fn test_multimap_ops(init in crowded_int_pairs(), ops in op_seqs(32)) {
        check_multimap_ops(init, ops);
    }

    #[test]
    fn test_multimap_hints(
        v in crowded_int_pairs(),
        hints in prop::collection::vec(any::<usize>(), 1..16)
    ) {
        check_multimap_hints(v, hints);
    }

    #[test]
    fn test_multiset_positions(v in prop::collection::vec(0u16..16, 0..256)) {
        check_multiset_positions(v);
    }

    #[test]
    fn test_string_map(v in string_u16_pairs()) {
        check_string_map(v);
    }
}
