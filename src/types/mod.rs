mod condition;
mod numeric;
pub(crate) mod page;
mod predicate;
mod query;
mod sort;
mod value;

pub use condition::{ConditionBuilder, Mode};
pub use numeric::Numeric;
pub use page::{defaults, BlockPage};
pub use predicate::{Const, Predicate, Shape, Test};
pub use query::QuerySpec;
pub use sort::{Dir, OrderBy, Sort};
pub use value::{CompareOp, Value};
