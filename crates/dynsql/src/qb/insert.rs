//! INSERT statement models and builders.
//!
//! Two flavors: a general insert of one row from explicit column mappings,
//! and a multi-row insert that maps each record through per-column property
//! functions.

use crate::error::{SqlError, SqlResult};
use crate::table::{Column, ColumnRef, Table};
use crate::value::Value;

/// What a column is set to.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingValue {
    Null,
    /// Rendered verbatim.
    Constant(String),
    /// Rendered single-quoted.
    StringConstant(String),
    /// Bound as a parameter.
    Value(Value),
    /// Another column (update only).
    Column(ColumnRef),
}

/// `column = value` in an insert or update.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    column: ColumnRef,
    value: MappingValue,
}

impl ColumnMapping {
    pub fn new(column: ColumnRef, value: MappingValue) -> Self {
        Self { column, value }
    }

    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    pub fn value(&self) -> &MappingValue {
        &self.value
    }
}

// ==================== General insert ====================

pub type GeneralInsertAdapter<R> = Box<dyn FnOnce(GeneralInsertModel) -> R>;

/// An immutable single-row INSERT.
#[derive(Debug, Clone)]
pub struct GeneralInsertModel {
    table: Table,
    mappings: Vec<ColumnMapping>,
}

impl GeneralInsertModel {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }
}

/// Start an insert with a custom adapter.
pub fn insert_into_with<R>(
    adapter: impl FnOnce(GeneralInsertModel) -> R + 'static,
    table: &Table,
) -> GeneralInsertDsl<R> {
    GeneralInsertDsl {
        adapter: Box::new(adapter),
        table: table.clone(),
        mappings: Vec::new(),
    }
}

/// Collects column mappings of a general insert.
pub struct GeneralInsertDsl<R> {
    adapter: GeneralInsertAdapter<R>,
    table: Table,
    mappings: Vec<ColumnMapping>,
}

impl<R> GeneralInsertDsl<R> {
    pub fn set<T>(self, column: &Column<T>) -> InsertSetClause<R, T> {
        InsertSetClause {
            dsl: self,
            column: column.clone(),
        }
    }

    fn push(mut self, column: ColumnRef, value: MappingValue) -> Self {
        self.mappings.push(ColumnMapping::new(column, value));
        self
    }

    /// # Errors
    /// Fails when no mapping was added.
    pub fn build(self) -> SqlResult<R> {
        if self.mappings.is_empty() {
            return Err(SqlError::invalid_argument("insert mappings"));
        }
        Ok((self.adapter)(GeneralInsertModel {
            table: self.table,
            mappings: self.mappings,
        }))
    }
}

/// Pending `set(col)` of a general insert.
pub struct InsertSetClause<R, T> {
    dsl: GeneralInsertDsl<R>,
    column: Column<T>,
}

impl<R, T: Into<Value>> InsertSetClause<R, T> {
    pub fn to_value(self, value: impl Into<T>) -> GeneralInsertDsl<R> {
        let value: T = value.into();
        self.dsl
            .push(self.column.erase(), MappingValue::Value(value.into()))
    }

    pub fn to_null(self) -> GeneralInsertDsl<R> {
        self.dsl.push(self.column.erase(), MappingValue::Null)
    }

    pub fn to_constant(self, constant: &str) -> GeneralInsertDsl<R> {
        self.dsl
            .push(self.column.erase(), MappingValue::Constant(constant.to_string()))
    }

    pub fn to_string_constant(self, constant: &str) -> GeneralInsertDsl<R> {
        self.dsl
            .push(self.column.erase(), MappingValue::StringConstant(constant.to_string()))
    }

    /// `None` inserts `null`.
    pub fn to_value_or_null<V: Into<T>>(self, value: Option<V>) -> GeneralInsertDsl<R> {
        match value {
            Some(value) => self.to_value(value),
            None => self.to_null(),
        }
    }

    /// `None` omits the column.
    pub fn to_value_when_present<V: Into<T>>(self, value: Option<V>) -> GeneralInsertDsl<R> {
        match value {
            Some(value) => self.to_value(value),
            None => self.dsl,
        }
    }
}

// ==================== Multi-row insert ====================

pub type MultiRowInsertAdapter<R> = Box<dyn FnOnce(MultiRowInsertModel) -> R>;

/// An immutable multi-row INSERT with values already extracted per record.
#[derive(Debug, Clone)]
pub struct MultiRowInsertModel {
    table: Table,
    columns: Vec<ColumnRef>,
    rows: Vec<Vec<MappingValue>>,
    returning: Vec<ColumnRef>,
}

impl MultiRowInsertModel {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<MappingValue>] {
        &self.rows
    }

    /// Columns of the `returning` clause.
    pub fn returning(&self) -> &[ColumnRef] {
        &self.returning
    }
}

/// Start a multi-row insert of `records` with a custom adapter.
pub fn insert_multiple_with<Rec, R>(
    adapter: impl FnOnce(MultiRowInsertModel) -> R + 'static,
    records: Vec<Rec>,
) -> MultiRowIntoGatherer<Rec, R> {
    MultiRowIntoGatherer {
        adapter: Box::new(adapter),
        records,
    }
}

/// Awaits the target table of a multi-row insert.
pub struct MultiRowIntoGatherer<Rec, R> {
    adapter: MultiRowInsertAdapter<R>,
    records: Vec<Rec>,
}

impl<Rec, R> MultiRowIntoGatherer<Rec, R> {
    pub fn into_table(self, table: &Table) -> MultiRowInsertDsl<Rec, R> {
        MultiRowInsertDsl {
            adapter: self.adapter,
            records: self.records,
            table: table.clone(),
            mappings: Vec::new(),
            returning: Vec::new(),
        }
    }
}

enum RowMapping<Rec> {
    Property(Box<dyn Fn(&Rec) -> Value>),
    Fixed(MappingValue),
}

impl<Rec> RowMapping<Rec> {
    fn value_for(&self, record: &Rec) -> MappingValue {
        match self {
            RowMapping::Property(property) => MappingValue::Value(property(record)),
            RowMapping::Fixed(value) => value.clone(),
        }
    }
}

/// Collects the column mappings of a multi-row insert.
pub struct MultiRowInsertDsl<Rec, R> {
    adapter: MultiRowInsertAdapter<R>,
    records: Vec<Rec>,
    table: Table,
    mappings: Vec<(ColumnRef, RowMapping<Rec>)>,
    returning: Vec<ColumnRef>,
}

impl<Rec, R> MultiRowInsertDsl<Rec, R> {
    pub fn map<T>(self, column: &Column<T>) -> MultiRowMappingClause<Rec, R, T> {
        MultiRowMappingClause {
            dsl: self,
            column: column.clone(),
        }
    }

    /// Add a column to the `returning` clause.
    pub fn returning<T>(mut self, column: &Column<T>) -> Self {
        self.returning.push(column.erase());
        self
    }

    fn push(mut self, column: ColumnRef, mapping: RowMapping<Rec>) -> Self {
        self.mappings.push((column, mapping));
        self
    }

    /// # Errors
    /// Fails when there are no records or no mappings.
    pub fn build(self) -> SqlResult<R> {
        if self.records.is_empty() {
            return Err(SqlError::invalid_argument("records"));
        }
        if self.mappings.is_empty() {
            return Err(SqlError::invalid_argument("insert mappings"));
        }
        let rows = self
            .records
            .iter()
            .map(|record| self.mappings.iter().map(|(_, m)| m.value_for(record)).collect())
            .collect();
        let columns = self.mappings.into_iter().map(|(column, _)| column).collect();
        Ok((self.adapter)(MultiRowInsertModel {
            table: self.table,
            columns,
            rows,
            returning: self.returning,
        }))
    }
}

/// Pending `map(col)` of a multi-row insert.
pub struct MultiRowMappingClause<Rec, R, T> {
    dsl: MultiRowInsertDsl<Rec, R>,
    column: Column<T>,
}

impl<Rec, R, T: Into<Value>> MultiRowMappingClause<Rec, R, T> {
    /// Bind each record's value as returned by `property`.
    pub fn to_property<V: Into<T>>(self, property: impl Fn(&Rec) -> V + 'static) -> MultiRowInsertDsl<Rec, R> {
        let mapping = RowMapping::Property(Box::new(move |record: &Rec| {
            let value: T = property(record).into();
            value.into()
        }));
        self.dsl.push(self.column.erase(), mapping)
    }

    pub fn to_null(self) -> MultiRowInsertDsl<Rec, R> {
        self.dsl
            .push(self.column.erase(), RowMapping::Fixed(MappingValue::Null))
    }

    pub fn to_constant(self, constant: &str) -> MultiRowInsertDsl<Rec, R> {
        let value = MappingValue::Constant(constant.to_string());
        self.dsl.push(self.column.erase(), RowMapping::Fixed(value))
    }

    pub fn to_string_constant(self, constant: &str) -> MultiRowInsertDsl<Rec, R> {
        let value = MappingValue::StringConstant(constant.to_string());
        self.dsl.push(self.column.erase(), RowMapping::Fixed(value))
    }
}
