//! # Instance Registry
//!
//! A lazy, thread-safe registry holding one instance per type.
//!
//! Ask the registry for a `T` and hand it a constructor. The first request runs the
//! constructor; every later request, from any thread, gets the same `Arc<T>` back and
//! its constructor is never called. Concurrent first requests construct exactly once.
//! A constructor that fails or panics leaves nothing behind, so the next request
//! simply tries again.
//!
//! ## Quick Start
//!
//! ```rust
//! use instance_registry::get_or_create;
//! use std::sync::Arc;
//!
//! let first: Arc<String> = get_or_create(|| "Hello, World!".to_string()).unwrap();
//! let again: Arc<String> = get_or_create(|| "ignored".to_string()).unwrap();
//!
//! assert_eq!(&*again, "Hello, World!");
//! assert!(Arc::ptr_eq(&first, &again));
//! ```
//!
//! ## Features
//!
//! - **At-most-once construction**: a per-type gate serializes first-time requests
//! - **Independent keys**: building one type never waits on another type's constructor
//! - **Retry on failure**: failed or panicking constructors leave the slot absent
//! - **Isolated registries**: [`define_registry!`] declares registries of your own
//! - **Tracing support**: a callback receives a [`RegistryEvent`] for every operation,
//!   and construction is logged through `tracing`
//!
//! ## Main Functions
//!
//! - [`get_or_create`] / [`try_get_or_create`] - Return the instance, constructing it if needed
//! - [`get_or_create_with`] - Same, recording the construction arguments
//! - [`register`] - Seed a pre-built value
//! - [`get`] - Retrieve the live instance without constructing it
//! - [`state`] - Inspect a type's [`SlotState`]
//! - [`Singleton`] - Route a type's construction through the registry
//! - [`set_trace_callback`] - Set up tracing for registry operations

mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;
mod singleton;
mod slot;

// Re-export the main public API
pub use registry::{
    clear_trace_callback, construction_args, contains, get, get_cloned, get_or_create,
    get_or_create_with, register, register_arc, set_trace_callback, state, try_get_or_create,
    try_get_or_create_with, GlobalRegistry, GLOBAL,
};
#[doc(hidden)]
pub use registry::clear;
pub use registry_error::{BoxError, RegistryError};
pub use registry_event::RegistryEvent;
pub use registry_trait::{new_trace_slot, RegistryApi, TraceCallback, TraceSlot};
pub use singleton::{Singleton, TrySingleton};
pub use slot::{new_storage, InstanceSlot, SlotCell, SlotState, Storage};
