//! The process-wide default registry.
//!
//! Free functions in this module operate on a single registry shared by the
//! whole process. [`Singleton::instance`](crate::Singleton::instance) goes
//! through it as well. Use [`define_registry!`](crate::define_registry) when a
//! component needs instances of its own.
//!
//! # Examples
//!
//! ```
//! use instance_registry::get_or_create;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! struct Counter(AtomicU32);
//!
//! let a = get_or_create(|| Counter(AtomicU32::new(0))).unwrap();
//! let b = get_or_create(|| Counter(AtomicU32::new(100))).unwrap();
//!
//! a.0.fetch_add(1, Ordering::SeqCst);
//! assert_eq!(b.0.load(Ordering::SeqCst), 1);
//! ```

use std::sync::Arc;

use crate::registry_error::BoxError;
use crate::registry_trait::{new_trace_slot, TraceSlot};
use crate::slot::{new_storage, SlotState, Storage};
use crate::{RegistryApi, RegistryError, RegistryEvent};

/// Global storage backing the default registry.
static GLOBAL_STORAGE: Storage = new_storage();

/// Holds an optional user-defined tracing callback.
static GLOBAL_TRACE: TraceSlot = new_trace_slot();

/// Handle to the default registry, for code that is generic over [`RegistryApi`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalRegistry;

impl RegistryApi for GlobalRegistry {
    fn storage() -> &'static Storage {
        &GLOBAL_STORAGE
    }

    fn trace() -> &'static TraceSlot {
        &GLOBAL_TRACE
    }
}

pub const GLOBAL: GlobalRegistry = GlobalRegistry;

/// Returns the process-wide instance of `T`, constructing it with `ctor` on first request.
///
/// Concurrent first requests construct exactly once; every caller gets the same `Arc`.
///
/// # Errors
///
/// - [`RegistryError::RecursiveConstruction`] if `ctor` requests `T` itself
pub fn get_or_create<T, F>(ctor: F) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> T,
{
    GLOBAL.get_or_create(ctor)
}

/// Returns the process-wide instance of `T`, passing `args` to `ctor` on first request.
///
/// When the instance already exists, `args` are dropped and the instance is returned
/// untouched; no initialization runs again.
///
/// # Examples
///
/// ```
/// use instance_registry::{construction_args, get_or_create_with};
///
/// struct Point { x: i32, y: i32 }
///
/// let p = get_or_create_with((1, 2), |&(x, y)| Point { x, y }).unwrap();
/// let q = get_or_create_with((2, 3), |&(x, y)| Point { x, y }).unwrap();
///
/// assert_eq!((q.x, q.y), (1, 2));
/// assert_eq!(*construction_args::<Point, (i32, i32)>().unwrap(), (1, 2));
/// # assert!(std::sync::Arc::ptr_eq(&p, &q));
/// ```
pub fn get_or_create_with<T, A, F>(args: A, ctor: F) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
    A: Send + Sync + 'static,
    F: FnOnce(&A) -> T,
{
    GLOBAL.get_or_create_with(args, ctor)
}

/// Fallible [`get_or_create`]. A failed constructor leaves nothing behind.
///
/// # Examples
///
/// ```
/// use instance_registry::{try_get_or_create, RegistryError};
///
/// #[derive(Debug)]
/// struct Pool;
///
/// let err = try_get_or_create::<Pool, _, _>(|| Err("no connection")).unwrap_err();
/// assert!(matches!(err, RegistryError::Construction { .. }));
///
/// let pool = try_get_or_create(|| Ok::<_, std::io::Error>(Pool));
/// assert!(pool.is_ok());
/// ```
pub fn try_get_or_create<T, E, F>(ctor: F) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
    E: Into<BoxError>,
    F: FnOnce() -> Result<T, E>,
{
    GLOBAL.try_get_or_create(ctor)
}

/// Fallible [`get_or_create_with`].
pub fn try_get_or_create_with<T, A, E, F>(args: A, ctor: F) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
    A: Send + Sync + 'static,
    E: Into<BoxError>,
    F: FnOnce(&A) -> Result<T, E>,
{
    GLOBAL.try_get_or_create_with(args, ctor)
}

/// Seeds the default registry with `value`. An instance that is already live wins.
pub fn register<T: Send + Sync + 'static>(value: T) -> Result<Arc<T>, RegistryError> {
    GLOBAL.register(value)
}

/// Seeds the default registry with an `Arc`. An instance that is already live wins.
pub fn register_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Result<Arc<T>, RegistryError> {
    GLOBAL.register_arc(value)
}

/// Retrieves the live instance of `T` without constructing it.
pub fn get<T: Send + Sync + 'static>() -> Result<Arc<T>, RegistryError> {
    GLOBAL.get()
}

/// Retrieves a clone of the live instance of `T`.
pub fn get_cloned<T: Send + Sync + Clone + 'static>() -> Result<T, RegistryError> {
    GLOBAL.get_cloned()
}

/// Checks whether an instance of `T` is live in the default registry.
pub fn contains<T: Send + Sync + 'static>() -> bool {
    GLOBAL.contains::<T>()
}

/// Current state of `T` in the default registry.
pub fn state<T: Send + Sync + 'static>() -> SlotState {
    GLOBAL.state::<T>()
}

/// Arguments the live instance of `T` was constructed with.
pub fn construction_args<T, A>() -> Option<Arc<A>>
where
    T: Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    GLOBAL.construction_args::<T, A>()
}

/// Sets a tracing callback that will be invoked on every default-registry interaction.
///
/// # Example
/// ```rust
/// use instance_registry::{clear_trace_callback, set_trace_callback};
///
/// set_trace_callback(|event| println!("[registry-trace] {event}"));
/// clear_trace_callback();
/// ```
pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
    GLOBAL.set_trace_callback(callback)
}

/// Clears the tracing callback (disables registry tracing).
pub fn clear_trace_callback() {
    GLOBAL.clear_trace_callback()
}

#[doc(hidden)]
pub fn clear() {
    GLOBAL.clear()
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
