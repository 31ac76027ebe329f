pub use crate::{
    definition::registry::{ElementTypeRegistry, StandardTypeRegistry},
    error::{FieldStateError, StorageError},
    hooks::form_hooks::{DeleteOutcome, FormHooks},
    state::{
        allocator::IdentifierAllocator,
        report::ReconcileReport,
        state_model::{FieldStateMap, FieldStateRecord},
        tracker::{FieldStateTracker, TrackerOptions},
    },
};

pub mod cli;
pub mod definition;
pub mod error;
pub mod hooks;
pub mod state;
pub mod trace;
