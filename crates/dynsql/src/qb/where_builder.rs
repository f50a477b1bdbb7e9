//! Shared WHERE clause accumulation for SELECT, UPDATE, DELETE.

use crate::condition::Condition;
use crate::criterion::{Connector, Criterion, WhereModel, and, or};
use crate::qb::select::SelectModel;
use crate::table::Column;
use crate::value::Value;

/// Reusable accumulator of top-level criteria.
///
/// Each statement's where stage embeds one and exposes it through
/// [`WhereBuilder`].
#[derive(Debug, Clone, Default)]
pub struct WhereDsl {
    criteria: Vec<Criterion>,
}

impl WhereDsl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `criterion` as the first group.
    pub fn starting_with(criterion: Criterion) -> Self {
        Self {
            criteria: vec![criterion],
        }
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn into_model(self) -> WhereModel {
        WhereModel::new(self.criteria)
    }
}

/// Fluent criteria methods shared by every where stage.
pub trait WhereBuilder: Sized {
    fn where_dsl(&mut self) -> &mut WhereDsl;

    /// Add `and col <condition>`.
    fn and<T: Into<Value>>(mut self, column: &Column<T>, condition: Condition<T>) -> Self {
        self.where_dsl().push(and(column, condition));
        self
    }

    /// Add `or col <condition>`.
    fn or<T: Into<Value>>(mut self, column: &Column<T>, condition: Condition<T>) -> Self {
        self.where_dsl().push(or(column, condition));
        self
    }

    /// Add `and (col <condition> <sub criteria...>)`.
    fn and_with<T: Into<Value>>(
        mut self,
        column: &Column<T>,
        condition: Condition<T>,
        sub_criteria: Vec<Criterion>,
    ) -> Self {
        self.where_dsl()
            .push(and(column, condition).with_sub_criteria(sub_criteria));
        self
    }

    /// Add `or (col <condition> <sub criteria...>)`.
    fn or_with<T: Into<Value>>(
        mut self,
        column: &Column<T>,
        condition: Condition<T>,
        sub_criteria: Vec<Criterion>,
    ) -> Self {
        self.where_dsl()
            .push(or(column, condition).with_sub_criteria(sub_criteria));
        self
    }

    /// Add `and exists (select ...)`.
    fn and_exists(mut self, select: SelectModel) -> Self {
        self.where_dsl()
            .push(Criterion::exists(select).with_connector(Connector::And));
        self
    }

    /// Add `or exists (select ...)`.
    fn or_exists(mut self, select: SelectModel) -> Self {
        self.where_dsl()
            .push(Criterion::exists(select).with_connector(Connector::Or));
        self
    }

    /// Add `and not exists (select ...)`.
    fn and_not_exists(mut self, select: SelectModel) -> Self {
        self.where_dsl()
            .push(Criterion::not_exists(select).with_connector(Connector::And));
        self
    }

    /// Add a prebuilt criterion joined with `and`.
    fn and_criterion(mut self, criterion: Criterion) -> Self {
        self.where_dsl().push(criterion.with_connector(Connector::And));
        self
    }

    /// Add a prebuilt criterion joined with `or`.
    fn or_criterion(mut self, criterion: Criterion) -> Self {
        self.where_dsl().push(criterion.with_connector(Connector::Or));
        self
    }
}
