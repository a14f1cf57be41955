//! Built-in conflict handlers.
//!
//! - [`ValueConflictHandler`]: scalar tie-break
//! - [`MappingMerger`]: per-key recursion over mappings
//! - [`IdentitySetMerger`]: identity-keyed ordered collections

pub mod identity_set;
pub mod mapping;
pub mod value;

pub use identity_set::{IdentitySetMerger, DEFAULT_IDENTITY_FIELD};
pub use mapping::MappingMerger;
pub use value::ValueConflictHandler;
