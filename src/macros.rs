//! Macros for creating isolated instance registries.

/// Creates a complete instance registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Storage static (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `RegistryApi`, plus an `API` constant
/// - Free functions for every registry operation
///
/// # Examples
///
/// ```rust
/// use instance_registry::define_registry;
/// use std::sync::Arc;
///
/// define_registry!(global);
///
/// let num: Arc<i32> = global::get_or_create(|| 42).unwrap();
/// let again: Arc<i32> = global::get_or_create(|| 0).unwrap();
///
/// assert_eq!(*again, 42);
/// assert!(Arc::ptr_eq(&num, &again));
/// ```
///
/// # Multiple Registries
///
/// Each registry holds its own instance per type:
///
/// ```rust
/// use instance_registry::define_registry;
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// database::get_or_create(|| "db_connection".to_string()).unwrap();
/// cache::get_or_create(|| "redis_connection".to_string()).unwrap();
///
/// assert_eq!(*database::get::<String>().unwrap(), "db_connection");
/// assert_eq!(*cache::get::<String>().unwrap(), "redis_connection");
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::sync::Arc;

            static STORAGE: $crate::Storage = $crate::new_storage();
            static TRACE: $crate::TraceSlot = $crate::new_trace_slot();

            /// Zero-sized handle implementing the registry API over this module's statics.
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn storage() -> &'static $crate::Storage {
                    &STORAGE
                }

                fn trace() -> &'static $crate::TraceSlot {
                    &TRACE
                }
            }

            pub const API: Api = Api;

            /// Return the instance of `T`, constructing it on first request.
            pub fn get_or_create<T, F>(ctor: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                F: FnOnce() -> T,
            {
                use $crate::RegistryApi;
                API.get_or_create(ctor)
            }

            /// Return the instance of `T`, recording `args` if this call constructs it.
            pub fn get_or_create_with<T, A, F>(args: A, ctor: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                A: Send + Sync + 'static,
                F: FnOnce(&A) -> T,
            {
                use $crate::RegistryApi;
                API.get_or_create_with(args, ctor)
            }

            /// Fallible `get_or_create`.
            pub fn try_get_or_create<T, E, F>(ctor: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                E: Into<$crate::BoxError>,
                F: FnOnce() -> Result<T, E>,
            {
                use $crate::RegistryApi;
                API.try_get_or_create(ctor)
            }

            /// Fallible `get_or_create_with`.
            pub fn try_get_or_create_with<T, A, E, F>(args: A, ctor: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                A: Send + Sync + 'static,
                E: Into<$crate::BoxError>,
                F: FnOnce(&A) -> Result<T, E>,
            {
                use $crate::RegistryApi;
                API.try_get_or_create_with(args, ctor)
            }

            /// Seed the registry with a value; an existing instance wins.
            pub fn register<T: Send + Sync + 'static>(value: T) -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.register(value)
            }

            /// Seed the registry with an Arc-wrapped value; an existing instance wins.
            pub fn register_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.register_arc(value)
            }

            /// Retrieve the live instance of `T`.
            pub fn get<T: Send + Sync + 'static>() -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.get()
            }

            /// Retrieve a clone of the live instance of `T`.
            pub fn get_cloned<T: Send + Sync + Clone + 'static>() -> Result<T, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.get_cloned()
            }

            /// Check whether an instance of `T` is live.
            pub fn contains<T: Send + Sync + 'static>() -> bool {
                use $crate::RegistryApi;
                API.contains::<T>()
            }

            /// Current state of `T`'s slot.
            pub fn state<T: Send + Sync + 'static>() -> $crate::SlotState {
                use $crate::RegistryApi;
                API.state::<T>()
            }

            /// Arguments the live instance of `T` was constructed with.
            pub fn construction_args<T, A>() -> Option<Arc<A>>
            where
                T: Send + Sync + 'static,
                A: Send + Sync + 'static,
            {
                use $crate::RegistryApi;
                API.construction_args::<T, A>()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static) {
                use $crate::RegistryApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::RegistryApi;
                API.clear_trace_callback()
            }

            #[doc(hidden)]
            pub fn clear() {
                use $crate::RegistryApi;
                API.clear()
            }
        }
    };
}
