//! UPDATE statement model and builder.

use crate::condition::Condition;
use crate::criterion::{Criterion, WhereModel};
use crate::error::{SqlError, SqlResult};
use crate::qb::insert::{ColumnMapping, MappingValue};
use crate::qb::where_builder::{WhereBuilder, WhereDsl};
use crate::table::{Column, ColumnRef, Table};
use crate::value::Value;

pub type UpdateAdapter<R> = Box<dyn FnOnce(UpdateModel) -> R>;

/// An immutable UPDATE.
#[derive(Debug, Clone)]
pub struct UpdateModel {
    table: Table,
    mappings: Vec<ColumnMapping>,
    where_model: WhereModel,
}

impl UpdateModel {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    pub fn where_model(&self) -> &WhereModel {
        &self.where_model
    }
}

/// Start an update with a custom adapter.
pub fn update_with<R>(adapter: impl FnOnce(UpdateModel) -> R + 'static, table: &Table) -> UpdateDsl<R> {
    UpdateDsl {
        adapter: Box::new(adapter),
        table: table.clone(),
        mappings: Vec::new(),
    }
}

/// Collects the `set` clause of an update.
pub struct UpdateDsl<R> {
    adapter: UpdateAdapter<R>,
    table: Table,
    mappings: Vec<ColumnMapping>,
}

impl<R> UpdateDsl<R> {
    pub fn set<T>(self, column: &Column<T>) -> UpdateSetClause<R, T> {
        UpdateSetClause {
            dsl: self,
            column: column.clone(),
        }
    }

    fn push(mut self, column: ColumnRef, value: MappingValue) -> Self {
        self.mappings.push(ColumnMapping::new(column, value));
        self
    }

    /// Start the where clause with `col <condition>`.
    pub fn where_<T: Into<Value>>(self, column: &Column<T>, condition: Condition<T>) -> UpdateWhereDsl<R> {
        self.where_criterion(Criterion::new(column, condition))
    }

    pub fn where_criterion(self, criterion: Criterion) -> UpdateWhereDsl<R> {
        UpdateWhereDsl {
            dsl: self,
            where_dsl: WhereDsl::starting_with(criterion),
        }
    }

    /// # Errors
    /// Fails when no column is set.
    pub fn build(self) -> SqlResult<R> {
        self.build_with_where(WhereModel::default())
    }

    fn build_with_where(self, where_model: WhereModel) -> SqlResult<R> {
        if self.mappings.is_empty() {
            return Err(SqlError::invalid_argument("set clause"));
        }
        Ok((self.adapter)(UpdateModel {
            table: self.table,
            mappings: self.mappings,
            where_model,
        }))
    }
}

/// Pending `set(col)` of an update.
pub struct UpdateSetClause<R, T> {
    dsl: UpdateDsl<R>,
    column: Column<T>,
}

impl<R, T: Into<Value>> UpdateSetClause<R, T> {
    pub fn equal_to(self, value: impl Into<T>) -> UpdateDsl<R> {
        let value: T = value.into();
        self.dsl
            .push(self.column.erase(), MappingValue::Value(value.into()))
    }

    pub fn equal_to_null(self) -> UpdateDsl<R> {
        self.dsl.push(self.column.erase(), MappingValue::Null)
    }

    pub fn equal_to_constant(self, constant: &str) -> UpdateDsl<R> {
        self.dsl
            .push(self.column.erase(), MappingValue::Constant(constant.to_string()))
    }

    pub fn equal_to_string_constant(self, constant: &str) -> UpdateDsl<R> {
        self.dsl
            .push(self.column.erase(), MappingValue::StringConstant(constant.to_string()))
    }

    /// `set col = other_col`
    pub fn equal_to_column(self, other: &Column<T>) -> UpdateDsl<R> {
        self.dsl
            .push(self.column.erase(), MappingValue::Column(other.erase()))
    }

    /// `None` sets `null`.
    pub fn equal_to_or_null<V: Into<T>>(self, value: Option<V>) -> UpdateDsl<R> {
        match value {
            Some(value) => self.equal_to(value),
            None => self.equal_to_null(),
        }
    }

    /// `None` leaves the column out of the `set` clause.
    pub fn equal_to_when_present<V: Into<T>>(self, value: Option<V>) -> UpdateDsl<R> {
        match value {
            Some(value) => self.equal_to(value),
            None => self.dsl,
        }
    }
}

/// Where stage of an update.
pub struct UpdateWhereDsl<R> {
    dsl: UpdateDsl<R>,
    where_dsl: WhereDsl,
}

impl<R> WhereBuilder for UpdateWhereDsl<R> {
    fn where_dsl(&mut self) -> &mut WhereDsl {
        &mut self.where_dsl
    }
}

impl<R> UpdateWhereDsl<R> {
    /// # Errors
    /// Fails when no column is set.
    pub fn build(self) -> SqlResult<R> {
        self.dsl.build_with_where(self.where_dsl.into_model())
    }
}
