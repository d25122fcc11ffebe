//! Selection Walkthrough
//!
//! Drives an active cache through a short selection sequence over a list
//! of ten rows, printing which rows are materialized after each step and
//! the resulting metrics.

use active_cache::{
    config::ActiveCacheConfig, metrics::CacheMetrics, ActiveCache, CurrentResult, Event,
    ResultSource, Served,
};
use core::num::NonZeroUsize;

fn main() {
    println!("Active Cache - Selection Walkthrough");
    println!("====================================\n");

    let limit = NonZeroUsize::new(3).unwrap();
    let config = ActiveCacheConfig::bounded(limit);
    let rows = (0..10u32).map(|i| (i * 10, format!("row {}", i)));
    let mut cache = ActiveCache::init(config, rows);

    println!("Limit: {} rows, items: {}", limit.get(), cache.len());
    show(&cache, "after init");

    for key in [40, 45, 0, 40, 95, 1000] {
        match cache.select(&key) {
            Some(selected) => {
                println!(
                    "select {:>4} -> {:>3} ({:?}, {}){}",
                    key,
                    selected.key,
                    selected.kind,
                    selected.age,
                    selected
                        .evicted
                        .map(|(k, _)| format!(", evicted {}", k))
                        .unwrap_or_default()
                );
            }
            None => println!("select {:>4} -> nothing", key),
        }
        show(&cache, "");
    }

    println!("\nDeleting row 90 and updating every value:");
    cache.apply(Event::Remove(vec![90]));
    cache.apply(Event::Update(Box::new(|_: &u32, v: &mut String| {
        v.make_ascii_uppercase()
    })));
    show(&cache, "after events");

    let rendered = cache.render_with(|key, value, selected| {
        format!("{}{} = {}", if selected { "> " } else { "  " }, key, value)
    });
    println!("\nRendered:");
    for line in rendered.values() {
        println!("  {}", line);
    }

    println!("\nMetrics ({}):", cache.algorithm_name());
    for (name, value) in cache.metrics() {
        println!("  {:<24} {:>8.3}", name, value);
    }

    single_result_demo();
}

fn show(cache: &ActiveCache<u32, String>, label: &str) {
    let keys: Vec<String> = cache
        .active()
        .map(|(k, _)| format!("{}@{}", k, cache.born_at(k).map_or(0, |a| a.get())))
        .collect();
    println!("             materialized [{}] {}", keys.join(", "), label);
}

/// Computes a factorial per selection and remembers the last two.
struct Factorials {
    computed: usize,
}

impl ResultSource<u64> for Factorials {
    type Key = u64;
    type Value = u128;

    fn key_for(&self, selection: &u64) -> u64 {
        *selection
    }

    fn fetch(&mut self, selection: &u64) -> Option<(u64, u128)> {
        if *selection > 34 {
            return None;
        }
        self.computed += 1;
        Some((*selection, (1..=u128::from(*selection)).product()))
    }
}

fn single_result_demo() {
    println!("\nSingle result (limit 2):");
    let mut source = Factorials { computed: 0 };
    let mut current = CurrentResult::new(NonZeroUsize::new(2));

    for n in [10, 20, 10, 30, 10, 50] {
        let served = current.select(&mut source, &n);
        let shown = match served {
            Served::Unavailable => String::from("unavailable"),
            _ => current.current_or(&0).to_string(),
        };
        println!("  {}! -> {} ({:?})", n, shown, served);
    }
    println!("  computed {} factorials", source.computed);
}
