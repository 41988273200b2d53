//! Schema Rules
//!
//! Each file in this module contains one schema rule.
//! Rules are organized by the contract clause they confirm:
//!
//! - `unresolved_reference.rs` - Types referencing records nothing declares
//! - `recursive_record.rs` - Records containing themselves
//! - `duplicate_name.rs` - Name collisions within a namespace

mod duplicate_name;
mod recursive_record;
mod unresolved_reference;

pub use duplicate_name::DuplicateNameRule;
pub use recursive_record::RecursiveRecordRule;
pub use unresolved_reference::UnresolvedReferenceRule;
