// tests/store_tests.rs
//
// Concurrency and statistical properties of the store.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use quiz_backend::{
    store::{Store, StoreError},
    utils::hash::Argon2Hasher,
};

fn seeded_store() -> Arc<Store> {
    let hasher = Argon2Hasher::with_params(8, 1, 1).expect("valid argon2 params");
    let store = Store::new(Arc::new(hasher));
    store.seed_defaults().expect("Failed to seed store");
    Arc::new(store)
}

#[test]
fn concurrent_validation_never_over_consumes() {
    let store = seeded_store();
    store.create_access_code("FIVE-USES", 1, Some(5), None).unwrap();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || store.validate_access_code("FIVE-USES", 1))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let exhausted = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::LimitReached)))
        .count();

    assert_eq!(successes, 5);
    assert_eq!(exhausted, 27);
    assert_eq!(store.access_code("FIVE-USES").unwrap().used_count, 5);
}

#[test]
fn concurrent_answers_are_not_lost() {
    let store = seeded_store();
    let attempt = store.create_attempt(1, 1).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let id = attempt.id;
            thread::spawn(move || store.create_answer(id, 1, "270").unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every correct submission is counted exactly once.
    assert_eq!(store.get_attempt_by_id(attempt.id).unwrap().result, 160);
}

#[test]
fn concurrent_submits_succeed_once() {
    let store = seeded_store();
    let attempt = store.create_attempt(1, 1).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let id = attempt.id;
            thread::spawn(move || store.submit_attempt(id))
        })
        .collect();

    let ok = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(ok, 1);
}

#[test]
fn concurrent_attempt_ids_are_unique() {
    let store = seeded_store();

    let handles: Vec<_> = (0..8)
        .map(|user_id| {
            let store = store.clone();
            thread::spawn(move || {
                (0..25)
                    .map(|_| store.create_attempt(1, user_id).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 200);
    assert_eq!(ids.first(), Some(&1));
    assert_eq!(ids.last(), Some(&200));
}

#[test]
fn concurrent_registration_of_same_email_conflicts() {
    let store = seeded_store();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || store.create_user("race@example.com", "pw"))
        })
        .collect();

    let ok = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(ok, 1);
}

#[test]
fn question_selection_is_roughly_uniform() {
    let store = seeded_store();
    let trials = 3500;

    let mut counts: HashMap<u64, usize> = HashMap::new();
    for _ in 0..trials {
        for answer in store.create_attempt(1, 1).unwrap().answers {
            *counts.entry(answer.question_id).or_default() += 1;
        }
    }

    // 4 of 7 questions per attempt: each is expected 2000 times.
    assert_eq!(counts.len(), 7);
    for (question_id, count) in counts {
        assert!(
            (1700..=2300).contains(&count),
            "question {question_id} selected {count} times"
        );
    }
}
