//! Table and column model.
//!
//! A [`Table`] is a named entity with an ordered set of columns. Tables have
//! identity: clones share it, while two tables created separately with the same
//! name are different tables. That is how a self-join is expressed:
//!
//! ```rust
//! use dynsql::{DataType, Table};
//!
//! let users = Table::new("users");
//! let id = users.column::<i64>("id", DataType::BigInt);
//! let parent = Table::new("users");
//! let parent_id = parent.column::<i64>("id", DataType::BigInt);
//!
//! assert!(!users.same_table(&parent));
//! assert_eq!(users.column_names(), vec!["id"]);
//! # let _ = (id, parent_id);
//! ```

use crate::render::alias::TableAliasCalculator;
use crate::render::strategy::RenderingStrategy;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

/// Semantic data type of a column.
///
/// Renderers only use this as a tag, e.g. for strategies whose placeholder
/// syntax carries the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Numeric,
    Char,
    Varchar,
    Text,
    Date,
    Timestamp,
    TimestampTz,
    Uuid,
    Json,
    Jsonb,
    Bytea,
    Other,
}

impl DataType {
    /// JDBC type name, as used by MyBatis-style placeholders.
    pub fn jdbc_name(self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::SmallInt => "SMALLINT",
            DataType::Integer => "INTEGER",
            DataType::BigInt => "BIGINT",
            DataType::Real => "REAL",
            DataType::Double => "DOUBLE",
            DataType::Numeric => "NUMERIC",
            DataType::Char => "CHAR",
            DataType::Varchar => "VARCHAR",
            DataType::Text => "LONGVARCHAR",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::TimestampTz => "TIMESTAMP_WITH_TIMEZONE",
            DataType::Bytea => "BINARY",
            DataType::Uuid | DataType::Json | DataType::Jsonb | DataType::Other => "OTHER",
        }
    }
}

/// Column definition recorded in its table's ordered column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

#[derive(Debug)]
struct TableInner {
    name: String,
    columns: RwLock<Vec<ColumnDef>>,
}

/// A queryable table.
#[derive(Debug, Clone)]
pub struct Table {
    inner: Arc<TableInner>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(TableInner {
                name: name.into(),
                columns: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Check if both handles refer to the same table instance.
    pub fn same_table(&self, other: &Table) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Declare a column on this table.
    ///
    /// Declaring the same name twice returns a second handle to the existing
    /// column definition; the first declared `data_type` is kept.
    pub fn column<T>(&self, name: &str, data_type: DataType) -> Column<T> {
        let mut columns = self
            .inner
            .columns
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let data_type = match columns.iter().find(|c| c.name == name) {
            Some(existing) => existing.data_type,
            None => {
                columns.push(ColumnDef {
                    name: name.to_string(),
                    data_type,
                });
                data_type
            }
        };
        Column::new(self.clone(), name, data_type)
    }

    /// The ordered set of declared columns.
    pub fn columns(&self) -> Vec<ColumnDef> {
        self.inner
            .columns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns().into_iter().map(|c| c.name).collect()
    }
}

/// A column with its Rust value type erased.
///
/// Criteria, mappings and select lists store columns in this form.
#[derive(Clone)]
pub struct ColumnRef {
    table: Table,
    name: Arc<str>,
    data_type: DataType,
    alias: Option<Arc<str>>,
    rendering_strategy: Option<Arc<dyn RenderingStrategy>>,
}

impl ColumnRef {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Select-list alias (`name as alias`), if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Per-column strategy override, if any.
    pub fn rendering_strategy(&self) -> Option<&Arc<dyn RenderingStrategy>> {
        self.rendering_strategy.as_ref()
    }

    /// Render the column name, qualified by its table alias when one is registered.
    pub fn render_with_table_alias(&self, aliases: &TableAliasCalculator) -> String {
        match aliases.alias_for(&self.table) {
            Some(alias) => format!("{alias}.{}", self.name),
            None => self.name.to_string(),
        }
    }

    /// Name used in ORDER BY: the alias if set, else the bare column name.
    pub fn order_by_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Same table instance and same column name; alias and strategy are ignored.
impl PartialEq for ColumnRef {
    fn eq(&self, other: &Self) -> bool {
        self.table.same_table(&other.table) && self.name == other.name
    }
}

impl fmt::Debug for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnRef")
            .field("table", &self.table.name())
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("alias", &self.alias)
            .field("rendering_strategy", &self.rendering_strategy)
            .finish()
    }
}

/// A typed column: `T` is the Rust type of its values.
pub struct Column<T> {
    inner: ColumnRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Column<T> {
    fn new(table: Table, name: &str, data_type: DataType) -> Self {
        Self {
            inner: ColumnRef {
                table,
                name: Arc::from(name),
                data_type,
                alias: None,
                rendering_strategy: None,
            },
            _marker: PhantomData,
        }
    }

    /// Give the column a select-list alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.inner.alias = Some(Arc::from(alias));
        self
    }

    /// Override the statement's rendering strategy for this column only.
    pub fn with_rendering_strategy(mut self, strategy: Arc<dyn RenderingStrategy>) -> Self {
        self.inner.rendering_strategy = Some(strategy);
        self
    }

    pub fn column_ref(&self) -> &ColumnRef {
        &self.inner
    }

    pub fn erase(&self) -> ColumnRef {
        self.inner.clone()
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> Deref for Column<T> {
    type Target = ColumnRef;

    fn deref(&self) -> &ColumnRef {
        &self.inner
    }
}

impl<T> From<&Column<T>> for ColumnRef {
    fn from(column: &Column<T>) -> Self {
        column.erase()
    }
}
