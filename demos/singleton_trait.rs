//! Singleton trait example for instance-registry.
//!
//! Demonstrates:
//! - Routing every construction of a type through the registry with `Singleton`
//! - Fallible singletons with `TrySingleton`
//! - Watching registry activity through a trace callback
//!
//! Run with: `cargo run --example singleton_trait`

use instance_registry::{set_trace_callback, Singleton, TrySingleton};
use std::sync::{Arc, Mutex};

/// One spooler for the whole process.
struct PrintSpooler {
    jobs: Mutex<Vec<String>>,
}

impl Singleton for PrintSpooler {
    fn construct() -> Self {
        println!("   [construct] PrintSpooler");
        PrintSpooler {
            jobs: Mutex::new(Vec::new()),
        }
    }
}

/// A device handle whose setup can fail.
struct Scanner;

impl TrySingleton for Scanner {
    type Error = std::io::Error;

    fn try_construct() -> Result<Self, Self::Error> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no scanner attached",
        ))
    }
}

fn main() {
    println!("=== instance-registry: Singleton Trait ===\n");

    set_trace_callback(|event| println!("   [trace] {event}"));

    // -------------------------------------------------------------------------
    // 1. Two "constructions", one object
    // -------------------------------------------------------------------------
    println!("1. Asking for the spooler twice...");

    let first = PrintSpooler::instance().unwrap();
    first.jobs.lock().unwrap().push("invoice.pdf".to_string());

    let second = PrintSpooler::instance().unwrap();
    println!("   Same instance? {}", Arc::ptr_eq(&first, &second));
    println!("   Jobs seen by second handle: {:?}", second.jobs.lock().unwrap());

    // -------------------------------------------------------------------------
    // 2. Fallible singleton
    // -------------------------------------------------------------------------
    println!("\n2. Asking for a scanner...");

    match Scanner::instance() {
        Ok(_) => println!("   Scanner ready"),
        Err(e) => println!("   Error (expected): {e}"),
    }

    println!("\n=== Example Complete ===");
}
