//! Types that are only ever built through a registry.

use std::sync::Arc;

use crate::registry_error::BoxError;
use crate::{registry, RegistryApi, RegistryError};

/// A type with exactly one instance per registry.
///
/// Implementors describe how to build themselves; callers never construct the
/// type directly and ask for [`instance`](Singleton::instance) instead.
///
/// # Examples
///
/// ```rust
/// use instance_registry::Singleton;
/// use std::sync::Arc;
///
/// struct Printer {
///     name: String,
/// }
///
/// impl Singleton for Printer {
///     fn construct() -> Self {
///         Printer { name: "office".into() }
///     }
/// }
///
/// let a = Printer::instance().unwrap();
/// let b = Printer::instance().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(a.name, "office");
/// ```
pub trait Singleton: Send + Sync + Sized + 'static {
    /// Builds the instance. Runs at most once per registry.
    fn construct() -> Self;

    /// The instance in the process-wide registry.
    fn instance() -> Result<Arc<Self>, RegistryError> {
        registry::get_or_create(Self::construct)
    }

    /// The instance in a specific registry.
    fn instance_in<R: RegistryApi>(registry: &R) -> Result<Arc<Self>, RegistryError> {
        registry.get_or_create(Self::construct)
    }
}

/// A singleton whose construction can fail.
///
/// A failed [`try_construct`](TrySingleton::try_construct) records nothing, so
/// the next call to [`instance`](TrySingleton::instance) tries again.
pub trait TrySingleton: Send + Sync + Sized + 'static {
    /// Error returned by a failed construction attempt.
    type Error: Into<BoxError>;

    /// Builds the instance. Called again after a failure, never after a success.
    fn try_construct() -> Result<Self, Self::Error>;

    /// The instance in the process-wide registry.
    fn instance() -> Result<Arc<Self>, RegistryError> {
        registry::try_get_or_create(Self::try_construct)
    }

    /// The instance in a specific registry.
    fn instance_in<R: RegistryApi>(registry: &R) -> Result<Arc<Self>, RegistryError> {
        registry.try_get_or_create(Self::try_construct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_registry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    define_registry!(scoped);

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    struct Clock {
        started_at: usize,
    }

    impl Singleton for Clock {
        fn construct() -> Self {
            Clock {
                started_at: BUILDS.fetch_add(1, Ordering::SeqCst),
            }
        }
    }

    #[test]
    fn test_instance_in_isolated_registry() {
        let a = Clock::instance_in(&scoped::API).unwrap();
        let b = Clock::instance_in(&scoped::API).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.started_at, b.started_at);
    }

    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct Flaky;

    impl TrySingleton for Flaky {
        type Error = String;

        fn try_construct() -> Result<Self, Self::Error> {
            if ATTEMPTS.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("first attempt fails".to_string())
            } else {
                Ok(Flaky)
            }
        }
    }

    #[test]
    fn test_try_singleton_retries_after_failure() {
        define_registry!(flaky);

        let err = Flaky::instance_in(&flaky::API).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Failed to construct {}: first attempt fails",
                std::any::type_name::<Flaky>()
            )
        );

        assert!(Flaky::instance_in(&flaky::API).is_ok());
        assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
    }
}
