use seq_stream::{map_stream, stream, SimpleList, SyncList};
use std::cell::{Cell, RefCell};

fn is_even(v: &i32) -> bool {
    v % 2 == 0
}

#[test]
fn test_filter_keeps_matching_in_order() {
    let data = [1, 2, 3, 4, 5];
    assert_eq!(stream(&data).filter(is_even).collect(), vec![2, 4]);
}

#[test]
fn test_order_preserved_without_limit() {
    let data = [9, 4, 7, 1, 8, 2, 6];
    let result = stream(&data)
        .filter(|v| *v > 3)
        .distinct(|v| i64::from(*v))
        .collect();
    assert_eq!(result, vec![9, 4, 7, 8, 6]);
}

#[test]
fn test_distinct_first_occurrence_wins() {
    let data = [1, 2, 2, 3, 1];
    let result = stream(&data).distinct(|v| i64::from(*v)).collect();
    assert_eq!(result, vec![1, 2, 3]);
}

#[test]
fn test_distinct_key_collision_counts_as_duplicate() {
    let words = ["apple", "avocado", "banana", "blueberry", "cherry"];
    let by_initial = stream(&words)
        .distinct(|w| i64::from(w.as_bytes()[0]))
        .collect();
    assert_eq!(by_initial, vec!["apple", "banana", "cherry"]);
}

#[test]
fn test_independent_dedup_stages() {
    // (group, id): first stage dedups on group, second on id
    let data = [(1, 10), (1, 11), (2, 10), (3, 12), (3, 13), (4, 12)];
    let result = stream(&data)
        .distinct(|(group, _)| i64::from(*group))
        .distinct(|(_, id)| i64::from(*id))
        .collect();
    // (2, 10) passes the group stage but its id was recorded by (1, 10)
    assert_eq!(result, vec![(1, 10), (3, 12)]);
}

#[test]
fn test_dedup_stage_skipped_after_rejection_keeps_no_key() {
    let data = [(1, 10), (1, 11), (2, 11)];
    let result = stream(&data)
        .distinct(|(group, _)| i64::from(*group))
        .distinct(|(_, id)| i64::from(*id))
        .collect();
    // (1, 11) stops at the group stage, so id 11 is still free for (2, 11)
    assert_eq!(result, vec![(1, 10), (2, 11)]);
}

#[test]
fn test_filter_rejection_does_not_reach_later_dedup() {
    let data = [3, 4, 3, 4];
    let calls = Cell::new(0);
    let result = stream(&data)
        .filter(|_| {
            calls.set(calls.get() + 1);
            calls.get() != 1
        })
        .distinct(|v| i64::from(*v))
        .collect();
    assert_eq!(result, vec![4, 3]);
}

#[test]
fn test_rejected_element_still_records_dedup_key() {
    let data = [(3, "draft"), (3, "final"), (4, "final")];
    let result = stream(&data)
        .distinct(|(id, _)| i64::from(*id))
        .filter(|(_, state)| *state == "final")
        .collect();
    // id 3 is recorded by the draft before the filter rejects it
    assert_eq!(result, vec![(4, "final")]);
}

#[test]
fn test_observer_after_filter_skips_rejected() {
    let data = [1, 2, 3, 4];
    let before = RefCell::new(Vec::new());
    let after = RefCell::new(Vec::new());
    let result = stream(&data)
        .observe(|i, _| before.borrow_mut().push(i))
        .filter(is_even)
        .observe(|i, _| after.borrow_mut().push(i))
        .collect();
    assert_eq!(result, vec![2, 4]);
    assert_eq!(before.into_inner(), vec![0, 1, 2, 3]);
    assert_eq!(after.into_inner(), vec![1, 3]);
}

#[test]
fn test_limit_stops_whole_pass() {
    let data = [1, 2, 3, 4, 5];
    let observed = RefCell::new(Vec::new());
    let (result, stats) = stream(&data)
        .observe(|i, v| observed.borrow_mut().push((i, *v)))
        .filter(is_even)
        .limit(1)
        .collect_with_stats();
    assert_eq!(result, vec![2]);
    assert_eq!(observed.into_inner(), vec![(0, 1), (1, 2)]);
    assert_eq!(stats.visited, 2);
    assert!(stats.early_exit);
}

#[test]
fn test_map_applies_only_to_accepted() {
    let data = [1, 2, 3, 4, 5, 6];
    let calls = Cell::new(0);
    let result: Vec<String> = map_stream(&data)
        .map(|v| {
            calls.set(calls.get() + 1);
            format!("v{v}")
        })
        .filter(|v| v % 3 == 0)
        .collect();
    assert_eq!(result, vec!["v3", "v6"]);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_map_with_limit() {
    let data = ["a", "bb", "ccc", "dd"];
    let lengths = map_stream(&data)
        .map(|s| s.len())
        .filter(|s| s.len() > 1)
        .limit(2)
        .collect();
    assert_eq!(lengths, vec![2, 3]);
}

#[test]
fn test_empty_source() {
    let data: Vec<i32> = Vec::new();
    let observed = Cell::new(false);
    let result = stream(&data)
        .observe(|_, _| observed.set(true))
        .distinct(|v| i64::from(*v))
        .filter(is_even)
        .limit(3)
        .collect();
    assert!(result.is_empty());
    assert!(!observed.get());
}

#[test]
fn test_each_pipeline_starts_with_fresh_dedup_state() {
    let data = [1, 1, 2];
    let first = stream(&data).distinct(|v| i64::from(*v)).collect();
    let second = stream(&data).distinct(|v| i64::from(*v)).collect();
    assert_eq!(first, second);
    assert_eq!(second, vec![1, 2]);
}

#[test]
fn test_stream_from_lists() {
    let list = SimpleList::from(vec![5, 1, 5, 2]);
    let unique = list.stream().distinct(|v| i64::from(*v)).collect();
    assert_eq!(unique, vec![5, 1, 2]);

    let shared = SyncList::from(vec![1, 2, 3, 4]);
    let snapshot = shared.to_simple_list();
    shared.add(6);
    let evens = snapshot.stream().filter(is_even).collect();
    assert_eq!(evens, vec![2, 4]);
}

#[test]
#[should_panic(expected = "stage failure")]
fn test_stage_panic_propagates() {
    let data = [1, 2, 3];
    stream(&data)
        .filter(|v| {
            if *v == 2 {
                panic!("stage failure");
            }
            true
        })
        .collect();
}
