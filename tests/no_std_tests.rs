#![no_std]
extern crate active_cache;
extern crate alloc;

use active_cache::config::ActiveCacheConfig;
use active_cache::current::{CurrentResult, ResultSource, Served};
use active_cache::ActiveCache;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::num::NonZeroUsize;

fn make_cache(limit: usize) -> ActiveCache<String, Vec<u8>> {
    let config = ActiveCacheConfig {
        limit: NonZeroUsize::new(limit),
        initial_age: 0,
    };
    ActiveCache::init(config, core::iter::empty())
}

#[test]
fn test_string_keys_in_no_std() {
    let mut cache = make_cache(2);
    cache.insert_batch((0..5).map(|i| (format!("row-{}", i), alloc::vec![i as u8; 4])));

    cache.select("row-1");
    cache.select("row-3");
    cache.select("row-4");

    let keys: Vec<&str> = cache.active().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["row-3", "row-4"]);
}

#[test]
fn test_borrowed_nearest_lookup_in_no_std() {
    let mut cache = make_cache(3);
    cache.insert_batch([
        (String::from("apple"), Vec::new()),
        (String::from("cherry"), Vec::new()),
    ]);

    let selected = cache.select("banana").unwrap();
    assert_eq!(selected.key, "apple");
}

struct Lengths;

impl ResultSource<str> for Lengths {
    type Key = String;
    type Value = usize;

    fn key_for(&self, selection: &str) -> String {
        String::from(selection)
    }

    fn fetch(&mut self, selection: &str) -> Option<(String, usize)> {
        Some((String::from(selection), selection.len()))
    }
}

#[test]
fn test_current_result_in_no_std() {
    let mut current = CurrentResult::new(NonZeroUsize::new(1));
    assert_eq!(current.select(&mut Lengths, "four"), Served::Fetched);
    assert_eq!(current.select(&mut Lengths, "four"), Served::Cached);
    assert_eq!(current.current_or(&0), &4);
}
