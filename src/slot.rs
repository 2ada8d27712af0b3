//! Per-type slots and the check-then-construct gate.
//!
//! Every `TypeId` that has ever been requested owns one [`SlotCell`]. The map
//! lock is only held long enough to find or insert that cell; construction
//! runs under the cell's own gate, so building one type never blocks
//! requests for another.
//!
//! A cell walks through `Absent -> Constructing -> Present`. A failed or
//! panicking constructor leaves it `Absent` again and the next requester
//! retries.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, LazyLock, OnceLock};
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};

use crate::registry_error::BoxError;
use crate::{RegistryError, RegistryEvent};

pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased storage backing a registry: one cell per requested type.
pub type Storage = LazyLock<RwLock<HashMap<TypeId, Arc<SlotCell>>>>;

/// Creates empty registry storage, usable in a `static` initializer.
///
/// ```rust
/// use instance_registry::{new_storage, Storage};
///
/// static STORAGE: Storage = new_storage();
/// ```
pub const fn new_storage() -> Storage {
    LazyLock::new(empty_storage)
}

fn empty_storage() -> RwLock<HashMap<TypeId, Arc<SlotCell>>> {
    RwLock::new(HashMap::new())
}

/// Observable state of a type's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No instance, nobody is building one.
    Absent,
    /// A constructor is running right now.
    Constructing,
    /// The single instance is live.
    Present,
}

/// The constructed instance together with the arguments it was built from.
pub struct InstanceSlot {
    instance: AnyArc,
    args: Option<AnyArc>,
}

impl InstanceSlot {
    /// Downcasts the stored instance.
    pub fn instance<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.instance.clone().downcast::<T>().ok()
    }

    /// Downcasts the construction arguments, if any were recorded.
    pub fn args<A: Send + Sync + 'static>(&self) -> Option<Arc<A>> {
        self.args.clone()?.downcast::<A>().ok()
    }
}

/// Gate and storage for a single type.
#[derive(Default)]
pub struct SlotCell {
    gate: Mutex<()>,
    builder: Mutex<Option<ThreadId>>,
    slot: OnceLock<InstanceSlot>,
}

impl SlotCell {
    /// Whether the instance is live, being built right now, or absent.
    pub fn state(&self) -> SlotState {
        if self.slot.get().is_some() {
            SlotState::Present
        } else if self.gate.is_locked() {
            SlotState::Constructing
        } else {
            SlotState::Absent
        }
    }

    /// The published instance, if construction has completed.
    pub fn slot(&self) -> Option<&InstanceSlot> {
        self.slot.get()
    }

    fn built_by_current_thread(&self) -> bool {
        *self.builder.lock() == Some(thread::current().id())
    }
}

/// Marks the current thread as the builder of a cell for the duration of a
/// constructor call. Cleared on drop.
struct BuilderMark<'a> {
    cell: &'a SlotCell,
}

impl<'a> BuilderMark<'a> {
    fn set(cell: &'a SlotCell) -> Self {
        *cell.builder.lock() = Some(thread::current().id());
        Self { cell }
    }
}

impl Drop for BuilderMark<'_> {
    fn drop(&mut self) {
        *self.cell.builder.lock() = None;
    }
}

/// Finds the cell for `T` without creating one.
pub(crate) fn peek<T: 'static>(storage: &Storage) -> Option<Arc<SlotCell>> {
    storage.read().get(&TypeId::of::<T>()).cloned()
}

fn cell_for<T: 'static>(storage: &Storage) -> Arc<SlotCell> {
    if let Some(cell) = peek::<T>(storage) {
        return cell;
    }
    storage
        .write()
        .entry(TypeId::of::<T>())
        .or_default()
        .clone()
}

pub(crate) fn downcast<T: Send + Sync + 'static>(
    slot: &InstanceSlot,
) -> Result<Arc<T>, RegistryError> {
    slot.instance::<T>().ok_or(RegistryError::TypeMismatch {
        type_name: type_name::<T>(),
    })
}

enum Outcome {
    Reused,
    Constructed,
    Failed(BoxError),
    Panicked(Box<dyn Any + Send>),
}

/// Returns the live instance of `T`, running `ctor` only if none exists.
///
/// `args` are recorded next to the instance when this call is the one that
/// constructs it, and dropped otherwise. `emit` is called after every lock
/// has been released.
///
/// A panicking `ctor` is reported as [`RegistryEvent::ConstructFailed`] and
/// then resumed, so the caller still sees the panic.
pub(crate) fn resolve<T, E, F>(
    storage: &Storage,
    args: Option<AnyArc>,
    ctor: F,
    emit: &dyn Fn(&RegistryEvent),
) -> Result<Arc<T>, RegistryError>
where
    T: Send + Sync + 'static,
    E: Into<BoxError>,
    F: FnOnce() -> Result<Arc<T>, E>,
{
    let type_name = type_name::<T>();
    let cell = cell_for::<T>(storage);

    if let Some(slot) = cell.slot() {
        tracing::trace!(type_name, "reusing singleton instance");
        emit(&RegistryEvent::Reuse { type_name });
        return downcast(slot);
    }

    if cell.built_by_current_thread() {
        tracing::warn!(type_name, "constructor requested its own type");
        return Err(RegistryError::RecursiveConstruction { type_name });
    }

    let outcome = {
        let _gate = cell.gate.lock();
        if cell.slot().is_some() {
            Outcome::Reused
        } else {
            let _mark = BuilderMark::set(&cell);
            match panic::catch_unwind(AssertUnwindSafe(ctor)) {
                Ok(Ok(instance)) => {
                    cell.slot.get_or_init(|| InstanceSlot {
                        instance: instance as AnyArc,
                        args,
                    });
                    Outcome::Constructed
                }
                Ok(Err(err)) => Outcome::Failed(err.into()),
                Err(payload) => Outcome::Panicked(payload),
            }
        }
    };

    match outcome {
        Outcome::Reused => {
            tracing::trace!(type_name, "instance built by a concurrent caller");
            emit(&RegistryEvent::Reuse { type_name });
        }
        Outcome::Constructed => {
            tracing::debug!(type_name, "constructed singleton instance");
            emit(&RegistryEvent::Construct { type_name });
        }
        Outcome::Failed(source) => {
            tracing::warn!(type_name, error = %source, "singleton construction failed");
            emit(&RegistryEvent::ConstructFailed { type_name });
            return Err(RegistryError::Construction { type_name, source });
        }
        Outcome::Panicked(payload) => {
            tracing::warn!(type_name, "constructor panicked, slot left absent");
            emit(&RegistryEvent::ConstructFailed { type_name });
            panic::resume_unwind(payload);
        }
    }

    match cell.slot() {
        Some(slot) => downcast(slot),
        None => Err(RegistryError::TypeNotFound { type_name }),
    }
}
