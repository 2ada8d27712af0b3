//! Core trait defining registry behavior.
//!
//! This module provides the `RegistryApi` trait with default implementations for
//! lazy, at-most-once construction and retrieval of singleton instances.
//!
//! The registry is type-based: each type (`TypeId`) has at most one live instance,
//! and that instance is built by exactly one constructor call. Later requests get the
//! same `Arc` back and their constructors and arguments are ignored.

use std::any::type_name;
use std::convert::Infallible;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use crate::registry_error::BoxError;
use crate::slot::{self, AnyArc, SlotState, Storage};
use crate::{RegistryError, RegistryEvent};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because registries are globally shared.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Storage for a registry's optional trace callback.
pub type TraceSlot = LazyLock<Mutex<Option<Arc<TraceCallback>>>>;

/// Creates an empty trace slot, usable in a `static` initializer.
pub const fn new_trace_slot() -> TraceSlot {
    LazyLock::new(empty_trace_slot)
}

fn empty_trace_slot() -> Mutex<Option<Arc<TraceCallback>>> {
    Mutex::new(None)
}

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// two accessor methods (`storage` and `trace`) to be implemented by the implementor.
///
/// # Concurrency
///
/// Concurrent first-time requests for the same type block on a per-type gate; the
/// first one to get through runs the constructor, the rest receive its result.
/// Requests for different types never wait on each other's constructors.
///
/// A constructor may request other types from the same registry. Requesting its own
/// type yields [`RegistryError::RecursiveConstruction`]. Two constructors that request
/// each other's types from different threads will deadlock.
pub trait RegistryApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback static.
    fn trace() -> &'static TraceSlot;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked with no registry lock held, so it may call back into
    /// the registry.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        *Self::trace().lock() = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Registered instances are not affected.
    fn clear_trace_callback(&self) {
        *Self::trace().lock() = None;
    }

    /// Emit a registry event using the current callback.
    ///
    /// # Panics
    ///
    /// If the callback itself panics, the panic will propagate to the caller.
    fn emit_event(&self, event: &RegistryEvent) {
        let callback = Self::trace().lock().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------------------------------

    /// Access the storage static.
    fn storage() -> &'static Storage;

    /// Return the instance of `T`, constructing it with `ctor` if none exists yet.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::RecursiveConstruction`] if called from within `T`'s own constructor
    ///
    /// # Examples
    ///
    /// ```rust
    /// use instance_registry::{define_registry, RegistryApi};
    ///
    /// define_registry!(app);
    ///
    /// let first = app::API.get_or_create(|| String::from("first")).unwrap();
    /// let second = app::API.get_or_create(|| String::from("second")).unwrap();
    /// assert_eq!(&*second, "first");
    /// assert!(std::sync::Arc::ptr_eq(&first, &second));
    /// ```
    fn get_or_create<T, F>(&self, ctor: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        slot::resolve(
            Self::storage(),
            None,
            || Ok::<_, Infallible>(Arc::new(ctor())),
            &|event| self.emit_event(event),
        )
    }

    /// Like [`get_or_create`](Self::get_or_create), recording `args` next to the instance.
    ///
    /// `args` are passed to `ctor` and kept only if this call constructs the instance.
    /// Once the instance exists, later arguments are dropped unused.
    fn get_or_create_with<T, A, F>(&self, args: A, ctor: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        A: Send + Sync + 'static,
        F: FnOnce(&A) -> T,
    {
        let args = Arc::new(args);
        slot::resolve(
            Self::storage(),
            Some(args.clone() as AnyArc),
            || Ok::<_, Infallible>(Arc::new(ctor(&args))),
            &|event| self.emit_event(event),
        )
    }

    /// Fallible variant of [`get_or_create`](Self::get_or_create).
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Construction`] wrapping the constructor's error; nothing is
    ///   recorded and the next call retries
    /// - [`RegistryError::RecursiveConstruction`]
    fn try_get_or_create<T, E, F>(&self, ctor: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
        F: FnOnce() -> Result<T, E>,
    {
        slot::resolve(
            Self::storage(),
            None,
            || ctor().map(Arc::new),
            &|event| self.emit_event(event),
        )
    }

    /// Fallible variant of [`get_or_create_with`](Self::get_or_create_with).
    fn try_get_or_create_with<T, A, E, F>(&self, args: A, ctor: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        A: Send + Sync + 'static,
        E: Into<BoxError>,
        F: FnOnce(&A) -> Result<T, E>,
    {
        let args = Arc::new(args);
        slot::resolve(
            Self::storage(),
            Some(args.clone() as AnyArc),
            || ctor(&args).map(Arc::new),
            &|event| self.emit_event(event),
        )
    }

    /// Seed the registry with an already-built value.
    ///
    /// If an instance of `T` is already live it wins: `value` is dropped and the
    /// existing instance is returned.
    fn register<T: Send + Sync + 'static>(&self, value: T) -> Result<Arc<T>, RegistryError> {
        self.register_arc(Arc::new(value))
    }

    /// Seed the registry with an `Arc`-wrapped value.
    ///
    /// Avoids an extra allocation when you already hold an `Arc`.
    fn register_arc<T: Send + Sync + 'static>(&self, value: Arc<T>) -> Result<Arc<T>, RegistryError> {
        slot::resolve(
            Self::storage(),
            None,
            || Ok::<_, Infallible>(value),
            &|event| self.emit_event(event),
        )
    }

    // -------------------------------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------------------------------

    /// Retrieve the live instance of `T` without constructing it.
    ///
    /// # Errors
    ///
    /// - Type `T` is absent or still being constructed
    /// - Type mismatch (extremely rare)
    fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let cell = slot::peek::<T>(Self::storage());

        let result = match cell.as_deref().and_then(|cell| cell.slot()) {
            Some(slot) => slot::downcast::<T>(slot),
            None => Err(RegistryError::TypeNotFound {
                type_name: type_name::<T>(),
            }),
        };

        self.emit_event(&RegistryEvent::Get {
            type_name: type_name::<T>(),
            found: result.is_ok(),
        });

        result
    }

    /// Retrieve a cloned value from the registry.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    fn get_cloned<T: Send + Sync + Clone + 'static>(&self) -> Result<T, RegistryError> {
        let arc = self.get::<T>()?;
        Ok((*arc).clone())
    }

    /// Check whether an instance of `T` is live.
    fn contains<T: Send + Sync + 'static>(&self) -> bool {
        let found = self.state::<T>() == SlotState::Present;

        self.emit_event(&RegistryEvent::Contains {
            type_name: type_name::<T>(),
            found,
        });

        found
    }

    /// Current state of `T`'s slot.
    fn state<T: Send + Sync + 'static>(&self) -> SlotState {
        slot::peek::<T>(Self::storage()).map_or(SlotState::Absent, |cell| cell.state())
    }

    /// Arguments the live instance of `T` was constructed with.
    ///
    /// Returns `None` if `T` is absent, was built without arguments, or the arguments
    /// are not of type `A`.
    fn construction_args<T, A>(&self) -> Option<Arc<A>>
    where
        T: Send + Sync + 'static,
        A: Send + Sync + 'static,
    {
        let cell = slot::peek::<T>(Self::storage())?;
        cell.slot()?.args::<A>()
    }

    /// Drop every entry from the registry.
    ///
    /// Intended for tests. Already-retrieved `Arc<T>` references remain valid and the
    /// tracing callback is kept. A constructor running concurrently finishes into a
    /// detached cell and its result is not visible to later requests.
    #[doc(hidden)]
    fn clear(&self) {
        self.emit_event(&RegistryEvent::Clear);

        let removed = {
            let mut storage = Self::storage().write();
            let removed = storage.len();
            storage.clear();
            removed
        };
        tracing::debug!(removed, "cleared registry");
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
