//! Basic usage example for instance-registry.
//!
//! Demonstrates:
//! - Lazily constructing instances with `get_or_create()` (returns `Arc<T>`)
//! - Later requests reusing the instance and ignoring their constructors
//! - Recording construction arguments with `get_or_create_with()`
//! - Checking state with `contains()` and `state()`
//!
//! Run with: `cargo run --example basic_usage`

use instance_registry::define_registry;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

// Create an isolated registry for this example
define_registry!(app);

/// A counter shared by every part of the program.
struct Counter {
    value: AtomicU32,
}

#[derive(Debug, Clone, PartialEq)]
struct AppConfig {
    name: String,
    version: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== instance-registry: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. First request constructs
    // -------------------------------------------------------------------------
    println!("1. Requesting a Counter for the first time...");

    let counter = app::get_or_create(|| Counter {
        value: AtomicU32::new(0),
    })
    .unwrap();
    counter.value.fetch_add(1, Ordering::SeqCst);

    println!("   Counter value: {}", counter.value.load(Ordering::SeqCst));

    // -------------------------------------------------------------------------
    // 2. Second request reuses
    // -------------------------------------------------------------------------
    println!("\n2. Requesting it again with a different constructor...");

    let again = app::get_or_create(|| Counter {
        value: AtomicU32::new(100),
    })
    .unwrap();

    println!("   Counter value: {}", again.value.load(Ordering::SeqCst));
    println!("   Same instance? {}", Arc::ptr_eq(&counter, &again));

    // -------------------------------------------------------------------------
    // 3. Construction arguments
    // -------------------------------------------------------------------------
    println!("\n3. Constructing AppConfig from arguments...");

    let cfg = app::get_or_create_with(("MyApp", 1), |&(name, version)| AppConfig {
        name: name.to_string(),
        version,
    })
    .unwrap();
    let ignored = app::get_or_create_with(("Other", 2), |&(name, version)| AppConfig {
        name: name.to_string(),
        version,
    })
    .unwrap();

    println!("   First:  {:?}", cfg);
    println!("   Second: {:?} (arguments ignored)", ignored);
    println!(
        "   Recorded arguments: {:?}",
        app::construction_args::<AppConfig, (&str, u32)>()
    );

    // -------------------------------------------------------------------------
    // 4. Inspect state
    // -------------------------------------------------------------------------
    println!("\n4. Checking state...");

    println!("   contains::<Counter>()   = {}", app::contains::<Counter>());
    println!("   contains::<AppConfig>() = {}", app::contains::<AppConfig>());
    println!("   state::<Vec<u8>>()      = {:?}", app::state::<Vec<u8>>());

    // -------------------------------------------------------------------------
    // 5. Handle missing types gracefully
    // -------------------------------------------------------------------------
    println!("\n5. Handling missing types...");

    match app::get::<Vec<u8>>() {
        Ok(value) => println!("   Found Vec<u8>: {:?}", value),
        Err(e) => println!("   Error (expected): {}", e),
    }

    println!("\n=== Example Complete ===");
}
