//! Reusable field-level predicates.
//!
//! Fragments are plain functions returning a [`Predicate`](crate::Predicate)
//! over a field type. Attach them to an entity with
//! [`ConditionBuilder::add_field`](crate::ConditionBuilder::add_field).

pub mod boolean;
pub mod collection;
pub mod compare;
pub mod numeric;
pub mod text;

pub use collection::Collection;
pub use compare::Comparable;
pub use text::Text;
