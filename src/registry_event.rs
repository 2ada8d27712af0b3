/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use instance_registry::RegistryEvent;
///
/// let event = RegistryEvent::Construct { type_name: "i32" };
/// assert_eq!(event.to_string(), "construct { type_name: i32 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A constructor ran and its instance is now live.
    Construct {
        /// The type name of the constructed value (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
    },

    /// A constructor failed or panicked; the key is absent again.
    ConstructFailed {
        /// The type name whose construction failed
        type_name: &'static str,
    },

    /// A construction request was served by the existing instance.
    Reuse {
        /// The type name that was requested
        type_name: &'static str,
    },

    /// A value was requested from the registry.
    Get {
        /// The type name that was requested
        type_name: &'static str,
        /// Whether the value was found in the registry
        found: bool,
    },

    /// A type existence check was performed.
    Contains {
        /// The type name that was checked
        type_name: &'static str,
        /// Whether the type exists in the registry
        found: bool,
    },

    /// The registry was cleared.
    Clear,
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Construct { type_name } => {
                write!(f, "construct {{ type_name: {type_name} }}")
            }
            RegistryEvent::ConstructFailed { type_name } => {
                write!(f, "construct_failed {{ type_name: {type_name} }}")
            }
            RegistryEvent::Reuse { type_name } => {
                write!(f, "reuse {{ type_name: {type_name} }}")
            }
            RegistryEvent::Get { type_name, found } => {
                write!(f, "get {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Contains { type_name, found } => {
                write!(f, "contains {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Clear => write!(f, "Clearing the Registry"),
        }
    }
}
