//! Composable conditions over Rust values, evaluated against slices or
//! deferred query handles.
//!
//! Build a [`Predicate`] with [`ConditionBuilder`] and the [`fragments`]
//! library, wrap it in an [`Evaluator`], then filter, page, group and
//! aggregate either a slice (synchronously) or a [`QueryHandle`] (through
//! [`Evaluator::on`]).

mod error;
mod evaluate;
pub mod fragments;
mod source;
mod types;

pub use error::{Error, Result, Vacuity};
pub use evaluate::{Deferred, Evaluator, Matches};
pub use source::{MemoryQuery, QueryHandle};
pub use types::{
    defaults, BlockPage, CompareOp, ConditionBuilder, Const, Dir, Mode, Numeric, OrderBy,
    Predicate, QuerySpec, Shape, Sort, Test, Value,
};
