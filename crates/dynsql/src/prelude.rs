//! Convenient imports for typical `dynsql` usage.
//!
//! ```ignore
//! use dynsql::prelude::*;
//! ```

pub use crate::condition::*;
pub use crate::qb::expr::{
    add, avg, concatenate, constant, count, count_all, count_distinct, divide, lower, max, min,
    multiply, sort_by_alias, string_constant, substring, subtract, sum, upper,
};
pub use crate::qb::select::equal_to;
pub use crate::qb::{
    DeleteModel, GeneralInsertModel, MultiRowInsertModel, QueryExpressionFinisher,
    QueryExpressionStage, SelectModel, UpdateModel, WhereBuilder,
};
pub use crate::{
    Column, Criterion, DataType, ParameterMap, Renderable, RenderConfig, SqlError, SqlResult,
    StatementProvider, Table, Value, and, count_from, delete_from, delete_from_with, exists,
    insert_into, insert_into_with, insert_multiple, insert_multiple_with, not_exists, or, select,
    select_distinct, select_distinct_with, select_with, update, update_with,
};
