//! DELETE statement model and builder.
//!
//! A delete without criteria deletes every row: `delete from t`.

use crate::condition::Condition;
use crate::criterion::{Criterion, WhereModel};
use crate::qb::where_builder::{WhereBuilder, WhereDsl};
use crate::table::{Column, Table};
use crate::value::Value;

pub type DeleteAdapter<R> = Box<dyn FnOnce(DeleteModel) -> R>;

/// An immutable DELETE.
#[derive(Debug, Clone)]
pub struct DeleteModel {
    table: Table,
    where_model: WhereModel,
}

impl DeleteModel {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn where_model(&self) -> &WhereModel {
        &self.where_model
    }
}

/// Start a delete with a custom adapter.
pub fn delete_from_with<R>(adapter: impl FnOnce(DeleteModel) -> R + 'static, table: &Table) -> DeleteDsl<R> {
    DeleteDsl {
        adapter: Box::new(adapter),
        table: table.clone(),
    }
}

pub struct DeleteDsl<R> {
    adapter: DeleteAdapter<R>,
    table: Table,
}

impl<R> DeleteDsl<R> {
    /// Start the where clause with `col <condition>`.
    pub fn where_<T: Into<Value>>(self, column: &Column<T>, condition: Condition<T>) -> DeleteWhereDsl<R> {
        self.where_criterion(Criterion::new(column, condition))
    }

    pub fn where_criterion(self, criterion: Criterion) -> DeleteWhereDsl<R> {
        DeleteWhereDsl {
            dsl: self,
            where_dsl: WhereDsl::starting_with(criterion),
        }
    }

    pub fn build(self) -> R {
        self.build_with_where(WhereModel::default())
    }

    fn build_with_where(self, where_model: WhereModel) -> R {
        (self.adapter)(DeleteModel {
            table: self.table,
            where_model,
        })
    }
}

/// Where stage of a delete.
pub struct DeleteWhereDsl<R> {
    dsl: DeleteDsl<R>,
    where_dsl: WhereDsl,
}

impl<R> WhereBuilder for DeleteWhereDsl<R> {
    fn where_dsl(&mut self) -> &mut WhereDsl {
        &mut self.where_dsl
    }
}

impl<R> DeleteWhereDsl<R> {
    pub fn build(self) -> R {
        self.dsl.build_with_where(self.where_dsl.into_model())
    }
}
