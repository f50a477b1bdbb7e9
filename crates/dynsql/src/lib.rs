//! # dynsql
//!
//! Dynamic SQL for Rust: build statements from typed tables, columns and
//! conditions, then render them to SQL text plus an ordered parameter map.
//!
//! ## Features
//!
//! - **Criterion trees**: nested `and`/`or` groups, parenthesized only when needed
//! - **Conditions that opt out**: `*_when_present`, `filter`, `map` and empty lists
//!   elide themselves at render time instead of failing
//! - **Deterministic parameters**: one sequence per render, shared with sub-queries
//! - **Pluggable placeholders**: `$1`, `:p1`, `?1` or MyBatis syntax, overridable per column
//! - **Staged builders**: invalid statement shapes do not compile
//! - **tokio-postgres ready**: every bound value implements `ToSql`
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
//!     .where_(&id, is_equal_to(5))
//!     .and_with(&name, is_equal_to("x"), vec![or(&name, is_equal_to("y"))])
//!     .build()?
//!     .render(&RenderConfig::numbered());
//!
//! assert_eq!(
//!     stmt.sql(),
//!     "select id, name from person where id = ?1 and (name = ?2 or name = ?3)"
//! );
//! assert_eq!(stmt.parameters().get("3"), Some(&Value::from("y")));
//! # Ok::<(), SqlError>(())
//! ```

pub mod condition;
pub mod criterion;
pub mod error;
pub mod param;
pub mod prelude;
pub mod qb;
pub mod render;
pub mod table;
pub mod value;

pub use condition::{Condition, ConditionValue, EmptyCallback, Operator};
pub use criterion::{Connector, Criterion, CriterionKind, WhereModel, and, exists, not_exists, or};
pub use error::{SqlError, SqlResult};
pub use param::ParameterMap;
pub use render::strategy::{
    Binding, MyBatisStrategy, NamedStrategy, NumberedStrategy, PostgresJsonStrategy,
    PostgresStrategy, RenderingStrategies, RenderingStrategy,
};
pub use render::{FragmentAndParameters, RenderConfig, TableAliasCalculator};
pub use table::{Column, ColumnDef, ColumnRef, DataType, Table};
pub use value::Value;

// Re-export qb entry points for easy access
pub use qb::{
    Renderable, StatementKind, StatementProvider, count_from, delete_from, delete_from_with,
    insert_into, insert_into_with, insert_multiple, insert_multiple_with, select, select_distinct,
    select_distinct_with, select_with, update, update_with,
};
