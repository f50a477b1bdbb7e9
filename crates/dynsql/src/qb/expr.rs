//! Select-list expressions.
//!
//! Expressions cover columns, arithmetic and concatenation, `upper`/`lower`,
//! aggregates and literal constants. None of them bind parameters, so they
//! render with only a [`TableAliasCalculator`].
//!
//! Select and sort lists accept a single item, an array, a `Vec`, or a tuple
//! mixing column types:
//!
//! ```rust
//! use dynsql::prelude::*;
//!
//! let t = Table::new("orders");
//! let id = t.column::<i64>("id", DataType::BigInt);
//! let qty = t.column::<i32>("qty", DataType::Integer);
//!
//! let stmt = select((&id, multiply(&qty, constant("2")).as_("double_qty"), count_all().as_("n")))
//!     .from(&t)
//!     .group_by((&id, &qty))
//!     .order_by((id.descending(), sort_by_alias("n")))
//!     .build()
//!     .unwrap()
//!     .to_statement();
//! assert_eq!(
//!     stmt.sql(),
//!     "select id, (qty * 2) as double_qty, count(*) as n from orders group by id, qty order by id desc, n"
//! );
//! ```

use crate::render::TableAliasCalculator;
use crate::table::{Column, ColumnRef};

/// A select-list expression.
#[derive(Debug, Clone)]
pub enum Expression {
    Column(ColumnRef),
    /// Rendered verbatim.
    Constant(String),
    /// Rendered single-quoted.
    StringConstant(String),
    /// Unary function call, e.g. `upper(col)`.
    Function {
        name: &'static str,
        arg: Box<Expression>,
    },
    /// `substring(col, offset, length)`
    Substring {
        arg: Box<Expression>,
        offset: u32,
        length: u32,
    },
    /// Aggregate; `arg: None` renders `count(*)`.
    Aggregate {
        name: &'static str,
        arg: Option<Box<Expression>>,
        distinct: bool,
    },
    /// Binary or n-ary operator, rendered parenthesized.
    Operator {
        operator: &'static str,
        operands: Vec<Expression>,
    },
}

impl Expression {
    pub fn render(&self, aliases: &TableAliasCalculator) -> String {
        match self {
            Expression::Column(column) => column.render_with_table_alias(aliases),
            Expression::Constant(value) => value.clone(),
            Expression::StringConstant(value) => format!("'{}'", value.replace('\'', "''")),
            Expression::Function { name, arg } => format!("{name}({})", arg.render(aliases)),
            Expression::Substring { arg, offset, length } => {
                format!("substring({}, {offset}, {length})", arg.render(aliases))
            }
            Expression::Aggregate { name, arg, distinct } => match arg {
                None => format!("{name}(*)"),
                Some(arg) if *distinct => format!("{name}(distinct {})", arg.render(aliases)),
                Some(arg) => format!("{name}({})", arg.render(aliases)),
            },
            Expression::Operator { operator, operands } => {
                let parts: Vec<String> = operands.iter().map(|e| e.render(aliases)).collect();
                format!("({})", parts.join(&format!(" {operator} ")))
            }
        }
    }

    /// Give the expression a select-list alias.
    pub fn as_(self, alias: &str) -> SelectItem {
        SelectItem {
            expression: self,
            alias: Some(alias.to_string()),
        }
    }
}

impl<T> From<&Column<T>> for Expression {
    fn from(column: &Column<T>) -> Self {
        Expression::Column(column.erase())
    }
}

impl From<&ColumnRef> for Expression {
    fn from(column: &ColumnRef) -> Self {
        Expression::Column(column.clone())
    }
}

/// One entry of a select list: an expression and its optional alias.
#[derive(Debug, Clone)]
pub struct SelectItem {
    expression: Expression,
    alias: Option<String>,
}

impl SelectItem {
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn render(&self, aliases: &TableAliasCalculator) -> String {
        let text = self.expression.render(aliases);
        match &self.alias {
            Some(alias) => format!("{text} as {alias}"),
            None => text,
        }
    }
}

impl From<Expression> for SelectItem {
    fn from(expression: Expression) -> Self {
        SelectItem {
            expression,
            alias: None,
        }
    }
}

impl<T> From<&Column<T>> for SelectItem {
    fn from(column: &Column<T>) -> Self {
        SelectItem::from(column.column_ref())
    }
}

impl From<&ColumnRef> for SelectItem {
    fn from(column: &ColumnRef) -> Self {
        SelectItem {
            expression: Expression::Column(column.clone()),
            alias: column.alias().map(str::to_string),
        }
    }
}

/// An `order by` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    name: String,
    descending: bool,
}

impl SortSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn render(&self) -> String {
        if self.descending {
            format!("{} desc", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl ColumnRef {
    /// Sort descending by this column's order-by name.
    pub fn descending(&self) -> SortSpec {
        SortSpec::from(self).descending()
    }
}

impl From<&ColumnRef> for SortSpec {
    fn from(column: &ColumnRef) -> Self {
        SortSpec {
            name: column.order_by_name().to_string(),
            descending: false,
        }
    }
}

impl<T> From<&Column<T>> for SortSpec {
    fn from(column: &Column<T>) -> Self {
        SortSpec::from(column.column_ref())
    }
}

/// Sort by a select-list alias that is not a column, e.g. an aggregate's.
pub fn sort_by_alias(alias: &str) -> SortSpec {
    SortSpec {
        name: alias.to_string(),
        descending: false,
    }
}

// ==================== Lists ====================

/// Anything usable as a select or group-by list.
pub trait IntoSelectList {
    fn into_select_list(self) -> Vec<SelectItem>;
}

/// Anything usable as an order-by list.
pub trait IntoSortList {
    fn into_sort_list(self) -> Vec<SortSpec>;
}

impl<T> IntoSelectList for &Column<T> {
    fn into_select_list(self) -> Vec<SelectItem> {
        vec![self.into()]
    }
}

impl IntoSelectList for Expression {
    fn into_select_list(self) -> Vec<SelectItem> {
        vec![self.into()]
    }
}

impl IntoSelectList for SelectItem {
    fn into_select_list(self) -> Vec<SelectItem> {
        vec![self]
    }
}

impl<S: Into<SelectItem>> IntoSelectList for Vec<S> {
    fn into_select_list(self) -> Vec<SelectItem> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<SelectItem>, const N: usize> IntoSelectList for [S; N] {
    fn into_select_list(self) -> Vec<SelectItem> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T> IntoSortList for &Column<T> {
    fn into_sort_list(self) -> Vec<SortSpec> {
        vec![self.into()]
    }
}

impl IntoSortList for SortSpec {
    fn into_sort_list(self) -> Vec<SortSpec> {
        vec![self]
    }
}

impl<S: Into<SortSpec>> IntoSortList for Vec<S> {
    fn into_sort_list(self) -> Vec<SortSpec> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<SortSpec>, const N: usize> IntoSortList for [S; N] {
    fn into_sort_list(self) -> Vec<SortSpec> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! impl_tuple_lists {
    ($($name:ident),+) => {
        impl<$($name: Into<SelectItem>),+> IntoSelectList for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_select_list(self) -> Vec<SelectItem> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }

        impl<$($name: Into<SortSpec>),+> IntoSortList for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_sort_list(self) -> Vec<SortSpec> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

impl_tuple_lists!(A);
impl_tuple_lists!(A, B);
impl_tuple_lists!(A, B, C);
impl_tuple_lists!(A, B, C, D);
impl_tuple_lists!(A, B, C, D, E);
impl_tuple_lists!(A, B, C, D, E, F);
impl_tuple_lists!(A, B, C, D, E, F, G);
impl_tuple_lists!(A, B, C, D, E, F, G, H);
impl_tuple_lists!(A, B, C, D, E, F, G, H, I);
impl_tuple_lists!(A, B, C, D, E, F, G, H, I, J);
impl_tuple_lists!(A, B, C, D, E, F, G, H, I, J, K);
impl_tuple_lists!(A, B, C, D, E, F, G, H, I, J, K, L);

// ==================== Functions ====================

fn operator(operator: &'static str, operands: Vec<Expression>) -> Expression {
    Expression::Operator { operator, operands }
}

fn aggregate(name: &'static str, arg: Option<Expression>, distinct: bool) -> Expression {
    Expression::Aggregate {
        name,
        arg: arg.map(Box::new),
        distinct,
    }
}

/// `(a + b)`
pub fn add(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    operator("+", vec![a.into(), b.into()])
}

/// `(a - b)`
pub fn subtract(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    operator("-", vec![a.into(), b.into()])
}

/// `(a * b)`
pub fn multiply(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    operator("*", vec![a.into(), b.into()])
}

/// `(a / b)`
pub fn divide(a: impl Into<Expression>, b: impl Into<Expression>) -> Expression {
    operator("/", vec![a.into(), b.into()])
}

/// `(a || b || ...)`
pub fn concatenate(parts: Vec<Expression>) -> Expression {
    operator("||", parts)
}

pub fn upper(arg: impl Into<Expression>) -> Expression {
    Expression::Function {
        name: "upper",
        arg: Box::new(arg.into()),
    }
}

pub fn lower(arg: impl Into<Expression>) -> Expression {
    Expression::Function {
        name: "lower",
        arg: Box::new(arg.into()),
    }
}

pub fn substring(arg: impl Into<Expression>, offset: u32, length: u32) -> Expression {
    Expression::Substring {
        arg: Box::new(arg.into()),
        offset,
        length,
    }
}

/// `count(*)`
pub fn count_all() -> Expression {
    aggregate("count", None, false)
}

pub fn count(arg: impl Into<Expression>) -> Expression {
    aggregate("count", Some(arg.into()), false)
}

pub fn count_distinct(arg: impl Into<Expression>) -> Expression {
    aggregate("count", Some(arg.into()), true)
}

pub fn max(arg: impl Into<Expression>) -> Expression {
    aggregate("max", Some(arg.into()), false)
}

pub fn min(arg: impl Into<Expression>) -> Expression {
    aggregate("min", Some(arg.into()), false)
}

pub fn avg(arg: impl Into<Expression>) -> Expression {
    aggregate("avg", Some(arg.into()), false)
}

pub fn sum(arg: impl Into<Expression>) -> Expression {
    aggregate("sum", Some(arg.into()), false)
}

/// A literal rendered as-is, e.g. `constant("1")`.
pub fn constant(value: &str) -> Expression {
    Expression::Constant(value.to_string())
}

/// A string literal, rendered single-quoted.
pub fn string_constant(value: &str) -> Expression {
    Expression::StringConstant(value.to_string())
}
