//! Concurrent access tests for write_atomic
//!
//! Readers must only ever observe one complete write, never a torn file.

use repo_fs::{NormalizedPath, RobustnessConfig, io};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

#[test]
fn test_concurrent_writes_no_corruption() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("concurrent.txt");
    let path = Arc::new(NormalizedPath::new(&file_path));

    let num_threads = 8;
    let writes_per_thread = 20;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let path = Arc::clone(&path);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                for i in 0..writes_per_thread {
                    let content = format!("thread{thread_id}:write{i}\n");
                    io::write_atomic(&path, content.as_bytes(), RobustnessConfig::default()).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    let content = std::fs::read_to_string(&file_path).unwrap();
    assert!(content.starts_with("thread"), "got: {content}");
    assert_eq!(content.lines().count(), 1, "got: {content}");
}

#[test]
fn test_reader_never_sees_partial_content() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("map.json");
    let path = NormalizedPath::new(&file_path);

    let small = "a".repeat(16);
    let large = "b".repeat(64 * 1024);
    io::write_atomic(&path, small.as_bytes(), RobustnessConfig::default()).unwrap();

    let writer = {
        let path = path.clone();
        let (small, large) = (small.clone(), large.clone());
        thread::spawn(move || {
            for i in 0..50 {
                let content = if i % 2 == 0 { &large } else { &small };
                io::write_atomic(&path, content.as_bytes(), RobustnessConfig::default()).unwrap();
            }
        })
    };

    for _ in 0..200 {
        if let Ok(content) = std::fs::read_to_string(&file_path) {
            assert!(content == small || content == large, "torn read of {} bytes", content.len());
        }
    }

    writer.join().unwrap();
}
