//! Criterion trees.
//!
//! A [`Criterion`] is one node of a where clause: a condition on a column, an
//! `exists` sub-query, or a bare group. Each node carries an ordered list of
//! child criteria, every child joined to what precedes it by its own
//! [`Connector`].

use crate::condition::Condition;
use crate::qb::select::SelectModel;
use crate::table::{Column, ColumnRef};
use crate::value::Value;

/// Keyword joining a criterion to the fragment before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn keyword(self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

/// What a criterion tests on its own.
#[derive(Debug, Clone)]
pub enum CriterionKind {
    /// A condition on a column, with its values erased.
    Column {
        column: ColumnRef,
        condition: Condition<Value>,
    },
    /// `exists (select ...)` or `not exists (select ...)`.
    Exists {
        select: Box<SelectModel>,
        negated: bool,
    },
    /// No test of its own; only children.
    Group,
}

/// A node of the where-clause tree.
#[derive(Debug, Clone)]
pub struct Criterion {
    connector: Option<Connector>,
    kind: CriterionKind,
    sub_criteria: Vec<Criterion>,
}

impl Criterion {
    fn from_kind(kind: CriterionKind) -> Self {
        Self {
            connector: None,
            kind,
            sub_criteria: Vec::new(),
        }
    }

    /// A condition on `column`.
    ///
    /// Condition values are erased into [`Value`] here.
    pub fn new<T: Into<Value>>(column: &Column<T>, condition: Condition<T>) -> Self {
        Self::from_kind(CriterionKind::Column {
            column: column.erase(),
            condition: condition.map(Into::into),
        })
    }

    pub fn exists(select: SelectModel) -> Self {
        Self::from_kind(CriterionKind::Exists {
            select: Box::new(select),
            negated: false,
        })
    }

    pub fn not_exists(select: SelectModel) -> Self {
        Self::from_kind(CriterionKind::Exists {
            select: Box::new(select),
            negated: true,
        })
    }

    /// A criterion with no test of its own, grouping `sub_criteria`.
    pub fn group(sub_criteria: Vec<Criterion>) -> Self {
        Self::from_kind(CriterionKind::Group).with_sub_criteria(sub_criteria)
    }

    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Append children, keeping their own connectors.
    pub fn with_sub_criteria(mut self, sub_criteria: Vec<Criterion>) -> Self {
        self.sub_criteria.extend(sub_criteria);
        self
    }

    /// Append an `and` child.
    pub fn and<T: Into<Value>>(self, column: &Column<T>, condition: Condition<T>) -> Self {
        self.with_sub_criteria(vec![and(column, condition)])
    }

    /// Append an `or` child.
    pub fn or<T: Into<Value>>(self, column: &Column<T>, condition: Condition<T>) -> Self {
        self.with_sub_criteria(vec![or(column, condition)])
    }

    pub fn connector(&self) -> Option<Connector> {
        self.connector
    }

    pub fn kind(&self) -> &CriterionKind {
        &self.kind
    }

    pub fn sub_criteria(&self) -> &[Criterion] {
        &self.sub_criteria
    }
}

/// Criterion joined with `and`.
pub fn and<T: Into<Value>>(column: &Column<T>, condition: Condition<T>) -> Criterion {
    Criterion::new(column, condition).with_connector(Connector::And)
}

/// Criterion joined with `or`.
pub fn or<T: Into<Value>>(column: &Column<T>, condition: Condition<T>) -> Criterion {
    Criterion::new(column, condition).with_connector(Connector::Or)
}

pub fn exists(select: SelectModel) -> Criterion {
    Criterion::exists(select)
}

pub fn not_exists(select: SelectModel) -> Criterion {
    Criterion::not_exists(select)
}

/// Ordered top-level criteria of a statement.
#[derive(Debug, Clone, Default)]
pub struct WhereModel {
    criteria: Vec<Criterion>,
}

impl WhereModel {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{is_equal_to, is_null};
    use crate::table::{DataType, Table};

    #[test]
    fn test_values_are_erased_through_column_type() {
        let t = Table::new("person");
        let id = t.column::<i64>("id", DataType::BigInt);
        let c = Criterion::new(&id, is_equal_to(5));
        match c.kind() {
            CriterionKind::Column { column, condition } => {
                assert_eq!(column.name(), "id");
                assert_eq!(condition.values(), vec![&Value::Int(5)]);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
        assert_eq!(c.connector(), None);
    }

    #[test]
    fn test_children_keep_connectors() {
        let t = Table::new("person");
        let name = t.column::<String>("name", DataType::Varchar);
        let c = Criterion::new(&name, is_equal_to("x"))
            .or(&name, is_equal_to("y"))
            .and(&name, is_null());
        let connectors: Vec<_> = c.sub_criteria().iter().map(Criterion::connector).collect();
        assert_eq!(connectors, vec![Some(Connector::Or), Some(Connector::And)]);
    }

    #[test]
    fn test_group_has_no_test_of_its_own() {
        let t = Table::new("person");
        let id = t.column::<i32>("id", DataType::Integer);
        let g = Criterion::group(vec![and(&id, is_equal_to(1)), or(&id, is_equal_to(2))]);
        assert!(matches!(g.kind(), CriterionKind::Group));
        assert_eq!(g.sub_criteria().len(), 2);
    }
}
