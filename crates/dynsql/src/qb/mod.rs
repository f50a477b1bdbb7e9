//! Statement builders.
//!
//! Every builder is staged: each step returns a new type exposing only the
//! steps valid next, and `build` hands the immutable model to an adapter. The
//! plain entry points use the identity adapter and yield the model itself;
//! the `*_with` variants take any `FnOnce(Model) -> R`.
//!
//! ```rust
//! use dynsql::prelude::*;
//!
//! let person = Table::new("person");
//! let id = person.column::<i32>("id", DataType::Integer);
//! let name = person.column::<String>("name", DataType::Varchar);
//!
//! let stmt = select((&id, &name))
//!     .from(&person)
//!     .where_(&id, is_greater_than(10))
//!     .and(&name, is_like("a%"))
//!     .order_by(&id)
//!     .limit(20)
//!     .build()?
//!     .to_statement();
//!
//! assert_eq!(
//!     stmt.sql(),
//!     "select id, name from person where id > $1 and name like $2 order by id limit $3"
//! );
//! assert_eq!(stmt.parameters().len(), 3);
//!
//! // Adapters map the model to anything, e.g. straight to SQL text.
//! let sql = delete_from_with(|m: DeleteModel| m.to_statement().sql().to_string(), &person)
//!     .where_(&id, is_equal_to(3))
//!     .build();
//! assert_eq!(sql, "delete from person where id = $1");
//! # Ok::<(), dynsql::SqlError>(())
//! ```

pub mod delete;
pub mod expr;
pub mod insert;
pub mod select;
pub mod traits;
pub mod update;
pub mod where_builder;

pub use delete::{DeleteDsl, DeleteModel, DeleteWhereDsl, delete_from_with};
pub use expr::{
    Expression, IntoSelectList, IntoSortList, SelectItem, SortSpec, add, avg, concatenate, constant,
    count, count_all, count_distinct, divide, lower, max, min, multiply, sort_by_alias,
    string_constant, substring, subtract, sum, upper,
};
pub use insert::{
    ColumnMapping, GeneralInsertDsl, GeneralInsertModel, InsertSetClause, MappingValue,
    MultiRowInsertDsl, MultiRowInsertModel, MultiRowIntoGatherer, MultiRowMappingClause,
    insert_into_with, insert_multiple_with,
};
pub use select::{
    FetchFirstFinisher, FromGatherer, GroupByFinisher, JoinSpecificationFinisher,
    JoinSpecificationStarter, LimitFinisher, OffsetFinisher, OffsetFirstFinisher, PagingModel,
    QueryExpressionDsl, QueryExpressionFinisher, QueryExpressionStage, QueryExpressionWhereDsl,
    RowsOnlyFinisher, SelectDsl, SelectModel, UnionBuilder, equal_to, select_distinct_with,
    select_with,
};
pub use traits::{Renderable, StatementKind, StatementProvider};
pub use update::{UpdateDsl, UpdateModel, UpdateSetClause, UpdateWhereDsl, update_with};
pub use where_builder::{WhereBuilder, WhereDsl};

use crate::table::Table;

/// `select ...`
pub fn select(items: impl IntoSelectList) -> FromGatherer<SelectModel> {
    select_with(|model| model, items)
}

/// `select distinct ...`
pub fn select_distinct(items: impl IntoSelectList) -> FromGatherer<SelectModel> {
    select_distinct_with(|model| model, items)
}

/// `select count(*) from table`
pub fn count_from(table: &Table) -> QueryExpressionDsl<SelectModel> {
    select(count_all()).from(table)
}

/// `delete from table`
pub fn delete_from(table: &Table) -> DeleteDsl<DeleteModel> {
    delete_from_with(|model| model, table)
}

/// `insert into table (...) values (...)`
pub fn insert_into(table: &Table) -> GeneralInsertDsl<GeneralInsertModel> {
    insert_into_with(|model| model, table)
}

/// `insert into table (...) values (...), (...)`, one row per record.
pub fn insert_multiple<Rec>(records: Vec<Rec>) -> MultiRowIntoGatherer<Rec, MultiRowInsertModel> {
    insert_multiple_with(|model| model, records)
}

/// `update table set ...`
pub fn update(table: &Table) -> UpdateDsl<UpdateModel> {
    update_with(|model| model, table)
}

#[cfg(test)]
mod tests;
