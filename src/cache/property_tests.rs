//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple recency-list model.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::cache::{build_list_key, BoundedExpiringCache, ManualClock};
use crate::models::ListQuery;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Keys from a small alphabet so operations collide often.
fn small_key_strategy() -> impl Strategy<Value = String> {
    "[a-h]".prop_map(|s| s)
}

fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (small_key_strategy(), any::<u32>())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        2 => small_key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => small_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

// == Reference Model ==
/// Recency list with the least recently used key first.
#[derive(Default)]
struct LruModel {
    order: Vec<String>,
    values: HashMap<String, u32>,
}

impl LruModel {
    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push(key.to_string());
    }

    fn set(&mut self, key: String, value: u32, capacity: usize) {
        self.touch(&key);
        self.values.insert(key, value);
        if self.order.len() > capacity {
            let evicted = self.order.remove(0);
            self.values.remove(&evicted);
        }
    }

    fn get(&mut self, key: &str) -> Option<u32> {
        let value = self.values.get(key).copied()?;
        self.touch(key);
        Some(value)
    }

    fn delete(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.values.remove(key);
    }
}

fn new_cache(capacity: usize) -> BoundedExpiringCache<u32, ManualClock> {
    BoundedExpiringCache::with_clock(capacity, ManualClock::new(0)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any operation sequence, every lookup agrees with the recency model
    // and the retained keys are exactly the model's most recently touched.
    #[test]
    fn prop_matches_lru_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let cache = new_cache(capacity);
        let mut model = LruModel::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value, TEST_TTL);
                    model.set(key, value, capacity);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key), "get({}) diverged", key);
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.delete(&key);
                }
            }
            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(cache.len(), model.order.len());
        }

        for key in &model.order {
            prop_assert!(cache.contains(key), "key {} should be retained", key);
        }
    }

    // Distinct keys beyond capacity leave only the newest `capacity` keys.
    #[test]
    fn prop_capacity_keeps_most_recent(
        keys in prop::collection::hash_set(valid_key_strategy(), 1..60),
        capacity in 1usize..20
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let cache = new_cache(capacity);

        for (i, key) in keys.iter().enumerate() {
            cache.set(key.clone(), i as u32, TEST_TTL);
            prop_assert!(cache.len() <= capacity);
        }

        let retained: HashSet<&String> = keys.iter().rev().take(capacity).collect();
        for key in &keys {
            prop_assert_eq!(cache.contains(key), retained.contains(key));
        }
    }

    #[test]
    fn prop_get_after_set_returns_value(key in valid_key_strategy(), value in any::<u32>()) {
        let cache = new_cache(8);
        cache.set(key.clone(), value, TEST_TTL);
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // Re-setting a key never grows the cache.
    #[test]
    fn prop_overwrite_keeps_size(
        key in valid_key_strategy(),
        first in any::<u32>(),
        second in any::<u32>()
    ) {
        let cache = new_cache(8);
        cache.set(key.clone(), first, TEST_TTL);
        cache.set(key.clone(), second, TEST_TTL);

        prop_assert_eq!(cache.len(), 1);
        prop_assert_eq!(cache.get(&key), Some(second));
    }

    #[test]
    fn prop_clear_empties_everything(
        keys in prop::collection::vec(valid_key_strategy(), 1..30)
    ) {
        let cache = new_cache(16);
        for key in &keys {
            cache.set(key.clone(), 1, TEST_TTL);
        }

        cache.clear();

        prop_assert_eq!(cache.len(), 0);
        for key in &keys {
            prop_assert_eq!(cache.get(key), None);
        }
    }

    // Expiry hides an entry once its TTL has elapsed, and the key can be
    // reused afterwards.
    #[test]
    fn prop_ttl_expiration(
        key in valid_key_strategy(),
        ttl_ms in 1u64..100_000,
        late_by in 0u64..100_000
    ) {
        let clock = ManualClock::new(10_000);
        let cache = BoundedExpiringCache::with_clock(4, clock.clone()).unwrap();
        let ttl = Duration::from_millis(ttl_ms);

        cache.set(key.clone(), 1u32, ttl);
        clock.advance(Duration::from_millis(ttl_ms - 1));
        prop_assert_eq!(cache.get(&key), Some(1));

        clock.advance(Duration::from_millis(1 + late_by));
        prop_assert_eq!(cache.get(&key), None);

        cache.set(key.clone(), 2u32, ttl);
        prop_assert_eq!(cache.get(&key), Some(2));
    }

    // Hits and misses add up to the number of lookups performed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let cache = new_cache(4);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value, TEST_TTL),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => cache.delete(&key),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, cache.len());
    }

    // List keys depend on the tag set, not the order it was given in.
    #[test]
    fn prop_list_key_ignores_tag_order(
        tags in prop::collection::vec("[a-z]{1,8}", 1..5),
        limit in 1u32..50,
        offset in 0u32..500
    ) {
        let mut forward = ListQuery::new(limit, offset);
        forward.tag_slugs = tags.clone();
        let mut backward = ListQuery::new(limit, offset);
        backward.tag_slugs = tags.into_iter().rev().collect();

        prop_assert_eq!(build_list_key(&forward), build_list_key(&backward));

        let mut next_page = forward.clone();
        next_page.offset += limit;
        prop_assert_ne!(build_list_key(&forward), build_list_key(&next_page));
    }
}
