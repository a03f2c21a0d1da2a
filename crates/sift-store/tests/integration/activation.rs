//! Generation swaps and snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use sift_store::MemoryIndex;
use tempfile::TempDir;

use crate::common::{config, index_into, news_store, options};

#[test]
fn test_reindex_replaces_generation() {
    let dir = TempDir::new().unwrap();
    let index = Arc::new(MemoryIndex::new());

    let report = index_into(dir.path(), &news_store(5), Arc::clone(&index));
    assert_eq!(report.activation.generation, 1);
    assert_eq!(index.search(&options("rust")).len(), 6);

    let report = index_into(dir.path(), &news_store(2), Arc::clone(&index));
    assert_eq!(report.activation.generation, 2);
    assert_eq!(report.activation.removed, 3);
    assert_eq!(index.search(&options("rust")).len(), 3);
}

#[test]
fn test_readers_see_whole_generations() {
    let dir = TempDir::new().unwrap();
    let index = Arc::new(MemoryIndex::new());
    index_into(dir.path(), &news_store(4), Arc::clone(&index));

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let index = Arc::clone(&index);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut checks = 0;
                while !done.load(Ordering::Relaxed) || checks == 0 {
                    let generation = index.active();
                    let nodes = generation.nodes().len();
                    assert!(nodes == 6 || nodes == 10, "partial generation of {nodes}");
                    checks += 1;
                }
                checks
            })
        })
        .collect();

    for round in 0..6 {
        let news = if round % 2 == 0 { 8 } else { 4 };
        index_into(dir.path(), &news_store(news), Arc::clone(&index));
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(index.stats().generation, 7);
}

#[test]
fn test_snapshot_from_config_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = config();

    let index = Arc::new(MemoryIndex::from_config(&config, dir.path()).unwrap());
    index_into(dir.path(), &news_store(3), Arc::clone(&index));
    assert!(dir.path().join("data/index.json").exists());

    let restarted = MemoryIndex::from_config(&config, dir.path()).unwrap();
    let stats = restarted.stats();
    assert_eq!(stats.generation, 1);
    assert_eq!(stats.nodes, 5);
    assert_eq!(restarted.search(&options("rust")).len(), 4);
}
