//! Concurrent construction example for instance-registry.
//!
//! Demonstrates:
//! - 50 threads racing to build the same `Widget`; exactly one constructor runs
//! - A failing constructor that leaves nothing behind, followed by a retry
//!
//! Run with: `cargo run --example concurrent_construction`

use instance_registry::{define_registry, SlotState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

define_registry!(shop);

struct Widget {
    built_by: String,
}

struct Inventory {
    items: u32,
}

static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== instance-registry: Concurrent Construction ===\n");

    // -------------------------------------------------------------------------
    // 1. Race 50 threads
    // -------------------------------------------------------------------------
    println!("1. Spawning 50 threads that all request a Widget...");

    let barrier = Arc::new(Barrier::new(50));
    let handles: Vec<_> = (0..50)
        .map(|i| {
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                shop::get_or_create(|| {
                    CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(100));
                    Widget {
                        built_by: format!("thread-{i}"),
                    }
                })
                .unwrap()
            })
        })
        .collect();

    let widgets: Vec<Arc<Widget>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    println!(
        "   Constructor calls: {}",
        CONSTRUCTIONS.load(Ordering::SeqCst)
    );
    println!("   Built by: {}", widgets[0].built_by);
    println!(
        "   All threads share it? {}",
        widgets.iter().all(|w| Arc::ptr_eq(w, &widgets[0]))
    );

    // -------------------------------------------------------------------------
    // 2. Failure and retry
    // -------------------------------------------------------------------------
    println!("\n2. Constructing Inventory with a failing constructor...");

    match shop::try_get_or_create::<Inventory, _, _>(|| Err("warehouse offline")) {
        Ok(_) => println!("   Unexpected success"),
        Err(e) => println!("   Error (expected): {e}"),
    }
    println!(
        "   State after failure: {:?}",
        shop::state::<Inventory>()
    );

    let inventory = shop::try_get_or_create(|| Ok::<_, std::io::Error>(Inventory { items: 12 }))
        .unwrap();
    println!("   Retry succeeded with {} items", inventory.items);
    assert_eq!(shop::state::<Inventory>(), SlotState::Present);

    println!("\n=== Example Complete ===");
}
