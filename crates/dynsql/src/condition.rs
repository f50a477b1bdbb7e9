//! Typed conditions for criteria.
//!
//! A [`Condition`] pairs an [`Operator`] with zero, one, two or a list of
//! values. Every condition carries a render gate: a condition whose gate is
//! closed contributes nothing when its criterion is rendered and never fails.
//!
//! ```rust
//! use dynsql::prelude::*;
//!
//! let name: Option<&str> = None;
//! let cond: Condition<String> = is_equal_to_when_present(name);
//! assert!(!cond.is_renderable());
//!
//! let cond: Condition<i64> = is_in(vec![1, 2, 3]).filter(|v: &i64| *v > 1).map(|v| v * 10);
//! assert_eq!(cond.values(), vec![&20, &30]);
//! ```

use crate::qb::select::SelectModel;
use crate::table::{Column, ColumnRef};
use std::fmt;
use std::sync::Arc;

/// Callback fired when a list condition is elided because its list is empty.
pub type EmptyCallback = Arc<dyn Fn() + Send + Sync>;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    IsNull,
    IsNotNull,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Like,
    NotLike,
    Between,
    NotBetween,
    In,
    NotIn,
}

impl Operator {
    /// SQL keyword(s) of the operator.
    pub fn keyword(self) -> &'static str {
        match self {
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
            Operator::EqualTo => "=",
            Operator::NotEqualTo => "<>",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqualTo => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqualTo => "<=",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::Between => "between",
            Operator::NotBetween => "not between",
            Operator::In => "in",
            Operator::NotIn => "not in",
        }
    }
}

/// Values of a condition, by arity.
///
/// `None` in the single and two-value cases means the gate is closed.
#[derive(Clone)]
pub enum ConditionValue<T> {
    NoValue { open: bool },
    Single(Option<T>),
    Two(Option<(T, T)>),
    List(Vec<T>),
    /// Compared to another column; binds nothing.
    Column(Option<ColumnRef>),
    /// Compared to a sub-query, rendered `col <op> (select ...)`.
    Select(Option<Box<SelectModel>>),
}

impl<T: fmt::Debug> fmt::Debug for ConditionValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::NoValue { open } => f.debug_struct("NoValue").field("open", open).finish(),
            ConditionValue::Single(v) => f.debug_tuple("Single").field(v).finish(),
            ConditionValue::Two(v) => f.debug_tuple("Two").field(v).finish(),
            ConditionValue::List(v) => f.debug_tuple("List").field(v).finish(),
            ConditionValue::Column(c) => f
                .debug_tuple("Column")
                .field(&c.as_ref().map(ColumnRef::name))
                .finish(),
            ConditionValue::Select(s) => f.debug_tuple("Select").field(&s.is_some()).finish(),
        }
    }
}

/// A predicate over one column.
#[derive(Clone)]
pub struct Condition<T> {
    operator: Operator,
    value: ConditionValue<T>,
    upper_column: bool,
    empty_callback: Option<EmptyCallback>,
}

impl<T> Condition<T> {
    fn new(operator: Operator, value: ConditionValue<T>) -> Self {
        Self {
            operator,
            value,
            upper_column: false,
            empty_callback: None,
        }
    }

    fn upper(mut self) -> Self {
        self.upper_column = true;
        self
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &ConditionValue<T> {
        &self.value
    }

    /// Whether the column is rendered as `upper(col)`.
    pub fn is_upper_column(&self) -> bool {
        self.upper_column
    }

    /// Check if the gate is open. Pure; never fires the empty callback.
    pub fn is_renderable(&self) -> bool {
        match &self.value {
            ConditionValue::NoValue { open } => *open,
            ConditionValue::Single(v) => v.is_some(),
            ConditionValue::Two(v) => v.is_some(),
            ConditionValue::List(v) => !v.is_empty(),
            ConditionValue::Column(c) => c.is_some(),
            ConditionValue::Select(s) => s.is_some(),
        }
    }

    /// Render-time gate check.
    ///
    /// An empty list fires the empty callback here, once per call.
    pub(crate) fn should_render(&self) -> bool {
        if let ConditionValue::List(values) = &self.value
            && values.is_empty()
        {
            if let Some(callback) = &self.empty_callback {
                callback();
            }
            return false;
        }
        self.is_renderable()
    }

    /// Check if an empty list is what keeps this condition from rendering.
    pub fn is_empty_list(&self) -> bool {
        matches!(&self.value, ConditionValue::List(v) if v.is_empty())
    }

    /// All bound values, in placeholder order.
    pub fn values(&self) -> Vec<&T> {
        match &self.value {
            ConditionValue::Single(Some(v)) => vec![v],
            ConditionValue::Two(Some((a, b))) => vec![a, b],
            ConditionValue::List(v) => v.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Install a callback fired whenever this list condition is elided for
    /// being empty.
    pub fn with_list_empty_callback(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.empty_callback = Some(Arc::new(callback));
        self
    }

    /// Close the gate unless `test` passes.
    ///
    /// `test` is not evaluated when the gate is already closed.
    pub fn when(mut self, test: impl FnOnce() -> bool) -> Self {
        if self.is_renderable() && !test() {
            self.close();
        }
        self
    }

    /// Keep values passing `predicate`.
    ///
    /// A single value that fails closes the gate; a pair closes unless both
    /// values pass; a list drops failing elements and closes when none remain.
    /// Conditions without bound values (`is_null`, column and sub-query
    /// comparisons) have nothing to test and are returned unchanged; gate them
    /// with [`Condition::when`].
    pub fn filter(mut self, predicate: impl Fn(&T) -> bool) -> Self {
        self.value = match self.value {
            ConditionValue::Single(v) => ConditionValue::Single(v.filter(|v| predicate(v))),
            ConditionValue::Two(v) => ConditionValue::Two(v.filter(|(a, b)| predicate(a) && predicate(b))),
            ConditionValue::List(v) => ConditionValue::List(v.into_iter().filter(|v| predicate(v)).collect()),
            other => other,
        };
        self
    }

    /// Close a two-value condition unless `predicate` passes for the pair.
    pub fn filter_pair(mut self, predicate: impl FnOnce(&T, &T) -> bool) -> Self {
        if let ConditionValue::Two(v) = &mut self.value {
            *v = v.take().filter(|(a, b)| predicate(a, b));
        }
        self
    }

    /// Transform every value, keeping operator, gate and callback.
    ///
    /// `mapper` is not evaluated when the gate is closed.
    pub fn map<R>(self, mapper: impl Fn(T) -> R) -> Condition<R> {
        let value = match self.value {
            ConditionValue::NoValue { open } => ConditionValue::NoValue { open },
            ConditionValue::Single(v) => ConditionValue::Single(v.map(&mapper)),
            ConditionValue::Two(v) => ConditionValue::Two(v.map(|(a, b)| (mapper(a), mapper(b)))),
            ConditionValue::List(v) => ConditionValue::List(v.into_iter().map(&mapper).collect()),
            ConditionValue::Column(c) => ConditionValue::Column(c),
            ConditionValue::Select(s) => ConditionValue::Select(s),
        };
        Condition {
            operator: self.operator,
            value,
            upper_column: self.upper_column,
            empty_callback: self.empty_callback,
        }
    }

    fn close(&mut self) {
        self.value = match std::mem::replace(&mut self.value, ConditionValue::NoValue { open: false }) {
            ConditionValue::NoValue { .. } => ConditionValue::NoValue { open: false },
            ConditionValue::Single(_) => ConditionValue::Single(None),
            ConditionValue::Two(_) => ConditionValue::Two(None),
            ConditionValue::List(_) => ConditionValue::List(Vec::new()),
            ConditionValue::Column(_) => ConditionValue::Column(None),
            ConditionValue::Select(_) => ConditionValue::Select(None),
        };
    }
}

impl<T: fmt::Debug> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("operator", &self.operator)
            .field("value", &self.value)
            .field("upper_column", &self.upper_column)
            .field("empty_callback", &self.empty_callback.is_some())
            .finish()
    }
}

// ==================== Factories ====================

fn single<T>(operator: Operator, value: impl Into<T>) -> Condition<T> {
    Condition::new(operator, ConditionValue::Single(Some(value.into())))
}

fn single_when_present<T, V: Into<T>>(operator: Operator, value: Option<V>) -> Condition<T> {
    Condition::new(operator, ConditionValue::Single(value.map(Into::into)))
}

fn list<T, V: Into<T>>(operator: Operator, values: impl IntoIterator<Item = V>) -> Condition<T> {
    Condition::new(
        operator,
        ConditionValue::List(values.into_iter().map(Into::into).collect()),
    )
}

fn two<T>(operator: Operator, value1: impl Into<T>, value2: impl Into<T>) -> Condition<T> {
    Condition::new(operator, ConditionValue::Two(Some((value1.into(), value2.into()))))
}

fn two_when_present<T, V: Into<T>>(operator: Operator, value1: Option<V>, value2: Option<V>) -> Condition<T> {
    let pair = value1.zip(value2).map(|(a, b)| (a.into(), b.into()));
    Condition::new(operator, ConditionValue::Two(pair))
}

fn column<T>(operator: Operator, other: &Column<T>) -> Condition<T> {
    Condition::new(operator, ConditionValue::Column(Some(other.erase())))
}

fn subquery<T>(operator: Operator, select: SelectModel) -> Condition<T> {
    Condition::new(operator, ConditionValue::Select(Some(Box::new(select))))
}

pub fn is_null<T>() -> Condition<T> {
    Condition::new(Operator::IsNull, ConditionValue::NoValue { open: true })
}

pub fn is_not_null<T>() -> Condition<T> {
    Condition::new(Operator::IsNotNull, ConditionValue::NoValue { open: true })
}

/// `col = true`
pub fn is_true() -> Condition<bool> {
    is_equal_to(true)
}

/// `col = false`
pub fn is_false() -> Condition<bool> {
    is_equal_to(false)
}

pub fn is_equal_to<T>(value: impl Into<T>) -> Condition<T> {
    single(Operator::EqualTo, value)
}

pub fn is_not_equal_to<T>(value: impl Into<T>) -> Condition<T> {
    single(Operator::NotEqualTo, value)
}

pub fn is_greater_than<T>(value: impl Into<T>) -> Condition<T> {
    single(Operator::GreaterThan, value)
}

pub fn is_greater_than_or_equal_to<T>(value: impl Into<T>) -> Condition<T> {
    single(Operator::GreaterThanOrEqualTo, value)
}

pub fn is_less_than<T>(value: impl Into<T>) -> Condition<T> {
    single(Operator::LessThan, value)
}

pub fn is_less_than_or_equal_to<T>(value: impl Into<T>) -> Condition<T> {
    single(Operator::LessThanOrEqualTo, value)
}

pub fn is_like<T>(value: impl Into<T>) -> Condition<T> {
    single(Operator::Like, value)
}

pub fn is_not_like<T>(value: impl Into<T>) -> Condition<T> {
    single(Operator::NotLike, value)
}

/// `upper(col) like VALUE`, with the value upper-cased.
pub fn is_like_case_insensitive(value: impl Into<String>) -> Condition<String> {
    single(Operator::Like, value.into().to_uppercase()).upper()
}

pub fn is_not_like_case_insensitive(value: impl Into<String>) -> Condition<String> {
    single(Operator::NotLike, value.into().to_uppercase()).upper()
}

pub fn is_between<T>(value1: impl Into<T>, value2: impl Into<T>) -> Condition<T> {
    two(Operator::Between, value1, value2)
}

pub fn is_not_between<T>(value1: impl Into<T>, value2: impl Into<T>) -> Condition<T> {
    two(Operator::NotBetween, value1, value2)
}

/// `col between a and b`, closed unless both bounds are present.
pub fn is_between_when_present<T, V: Into<T>>(value1: Option<V>, value2: Option<V>) -> Condition<T> {
    two_when_present(Operator::Between, value1, value2)
}

pub fn is_not_between_when_present<T, V: Into<T>>(value1: Option<V>, value2: Option<V>) -> Condition<T> {
    two_when_present(Operator::NotBetween, value1, value2)
}

pub fn is_in<T, V: Into<T>>(values: impl IntoIterator<Item = V>) -> Condition<T> {
    list(Operator::In, values)
}

pub fn is_not_in<T, V: Into<T>>(values: impl IntoIterator<Item = V>) -> Condition<T> {
    list(Operator::NotIn, values)
}

/// `upper(col) in (...)`, with every value upper-cased.
pub fn is_in_case_insensitive<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Condition<String> {
    list(Operator::In, values.into_iter().map(|v| v.into().to_uppercase())).upper()
}

pub fn is_not_in_case_insensitive<S: Into<String>>(
    values: impl IntoIterator<Item = S>,
) -> Condition<String> {
    list(Operator::NotIn, values.into_iter().map(|v| v.into().to_uppercase())).upper()
}

pub fn is_equal_to_when_present<T, V: Into<T>>(value: Option<V>) -> Condition<T> {
    single_when_present(Operator::EqualTo, value)
}

pub fn is_not_equal_to_when_present<T, V: Into<T>>(value: Option<V>) -> Condition<T> {
    single_when_present(Operator::NotEqualTo, value)
}

pub fn is_greater_than_when_present<T, V: Into<T>>(value: Option<V>) -> Condition<T> {
    single_when_present(Operator::GreaterThan, value)
}

pub fn is_greater_than_or_equal_to_when_present<T, V: Into<T>>(value: Option<V>) -> Condition<T> {
    single_when_present(Operator::GreaterThanOrEqualTo, value)
}

pub fn is_less_than_when_present<T, V: Into<T>>(value: Option<V>) -> Condition<T> {
    single_when_present(Operator::LessThan, value)
}

pub fn is_less_than_or_equal_to_when_present<T, V: Into<T>>(value: Option<V>) -> Condition<T> {
    single_when_present(Operator::LessThanOrEqualTo, value)
}

pub fn is_like_when_present<T, V: Into<T>>(value: Option<V>) -> Condition<T> {
    single_when_present(Operator::Like, value)
}

pub fn is_not_like_when_present<T, V: Into<T>>(value: Option<V>) -> Condition<T> {
    single_when_present(Operator::NotLike, value)
}

pub fn is_like_case_insensitive_when_present<S: Into<String>>(value: Option<S>) -> Condition<String> {
    single_when_present(Operator::Like, value.map(|v| v.into().to_uppercase())).upper()
}

pub fn is_not_like_case_insensitive_when_present<S: Into<String>>(value: Option<S>) -> Condition<String> {
    single_when_present(Operator::NotLike, value.map(|v| v.into().to_uppercase())).upper()
}

pub fn is_in_case_insensitive_when_present<S: Into<String>>(
    values: impl IntoIterator<Item = Option<S>>,
) -> Condition<String> {
    is_in_case_insensitive(values.into_iter().flatten())
}

pub fn is_not_in_case_insensitive_when_present<S: Into<String>>(
    values: impl IntoIterator<Item = Option<S>>,
) -> Condition<String> {
    is_not_in_case_insensitive(values.into_iter().flatten())
}

/// `col in (...)` over the present values; `None` elements are dropped.
pub fn is_in_when_present<T, V: Into<T>>(values: impl IntoIterator<Item = Option<V>>) -> Condition<T> {
    list(Operator::In, values.into_iter().flatten())
}

pub fn is_not_in_when_present<T, V: Into<T>>(values: impl IntoIterator<Item = Option<V>>) -> Condition<T> {
    list(Operator::NotIn, values.into_iter().flatten())
}

// ==================== Column comparisons ====================

/// `col = other`, comparing two columns (e.g. in a correlated sub-query).
pub fn is_equal_to_column<T>(other: &Column<T>) -> Condition<T> {
    column(Operator::EqualTo, other)
}

pub fn is_not_equal_to_column<T>(other: &Column<T>) -> Condition<T> {
    column(Operator::NotEqualTo, other)
}

pub fn is_greater_than_column<T>(other: &Column<T>) -> Condition<T> {
    column(Operator::GreaterThan, other)
}

pub fn is_greater_than_or_equal_to_column<T>(other: &Column<T>) -> Condition<T> {
    column(Operator::GreaterThanOrEqualTo, other)
}

pub fn is_less_than_column<T>(other: &Column<T>) -> Condition<T> {
    column(Operator::LessThan, other)
}

pub fn is_less_than_or_equal_to_column<T>(other: &Column<T>) -> Condition<T> {
    column(Operator::LessThanOrEqualTo, other)
}

// ==================== Sub-query comparisons ====================
//
// The sub-query renders with the enclosing statement's parameter sequence.

/// `col = (select ...)`
pub fn is_equal_to_subquery<T>(select: SelectModel) -> Condition<T> {
    subquery(Operator::EqualTo, select)
}

pub fn is_not_equal_to_subquery<T>(select: SelectModel) -> Condition<T> {
    subquery(Operator::NotEqualTo, select)
}

pub fn is_greater_than_subquery<T>(select: SelectModel) -> Condition<T> {
    subquery(Operator::GreaterThan, select)
}

pub fn is_greater_than_or_equal_to_subquery<T>(select: SelectModel) -> Condition<T> {
    subquery(Operator::GreaterThanOrEqualTo, select)
}

pub fn is_less_than_subquery<T>(select: SelectModel) -> Condition<T> {
    subquery(Operator::LessThan, select)
}

pub fn is_less_than_or_equal_to_subquery<T>(select: SelectModel) -> Condition<T> {
    subquery(Operator::LessThanOrEqualTo, select)
}

/// `col in (select ...)`
pub fn is_in_subquery<T>(select: SelectModel) -> Condition<T> {
    subquery(Operator::In, select)
}

pub fn is_not_in_subquery<T>(select: SelectModel) -> Condition<T> {
    subquery(Operator::NotIn, select)
}
