//! SELECT statement model and staged builder.
//!
//! Stages: `select(...)` → [`FromGatherer`] → `from` → [`QueryExpressionDsl`]
//! (joins) → optional `where_` → optional `group_by` → optional union back to a
//! new [`FromGatherer`] → optional `order_by` → paging → `build`.
//!
//! Paging is one chain with two exclusive branches:
//! `limit` → `offset`, or `offset` → `fetch_first` → `rows_only`.

use crate::condition::Condition;
use crate::criterion::{Connector, Criterion, WhereModel};
use crate::error::{SqlError, SqlResult};
use crate::qb::expr::{Expression, IntoSelectList, IntoSortList, SelectItem, SortSpec};
use crate::qb::where_builder::{WhereBuilder, WhereDsl};
use crate::table::{Column, ColumnRef, Table};
use crate::value::Value;

/// Converts a finished model into the caller's result type.
pub type SelectAdapter<R> = Box<dyn FnOnce(SelectModel) -> R>;

// ==================== Model ====================

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "join",
            JoinType::Left => "left join",
            JoinType::Right => "right join",
            JoinType::Full => "full join",
        }
    }
}

/// Right-hand side of a join condition: `equal_to(col)`.
#[derive(Debug, Clone)]
pub struct JoinCondition {
    column: ColumnRef,
}

/// `on a = b` or `and a = b` inside a join.
#[derive(Debug, Clone)]
pub struct JoinCriterion {
    connector: Option<Connector>,
    left: ColumnRef,
    right: ColumnRef,
}

impl JoinCriterion {
    pub fn connector(&self) -> Option<Connector> {
        self.connector
    }

    pub fn left(&self) -> &ColumnRef {
        &self.left
    }

    pub fn right(&self) -> &ColumnRef {
        &self.right
    }
}

/// A joined table and its `on` criteria.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    join_type: JoinType,
    table: Table,
    alias: Option<String>,
    criteria: Vec<JoinCriterion>,
}

impl JoinSpec {
    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn criteria(&self) -> &[JoinCriterion] {
        &self.criteria
    }
}

/// Union keyword placed before a query expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    Union,
    UnionAll,
}

impl UnionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            UnionKind::Union => "union",
            UnionKind::UnionAll => "union all",
        }
    }
}

/// One `select ... from ... where ... group by ...` block.
#[derive(Debug, Clone)]
pub struct QueryExpressionModel {
    union: Option<UnionKind>,
    distinct: bool,
    select_list: Vec<SelectItem>,
    table: Table,
    table_alias: Option<String>,
    joins: Vec<JoinSpec>,
    where_model: WhereModel,
    group_by: Vec<Expression>,
}

impl QueryExpressionModel {
    /// Union keyword joining this block to the previous one.
    pub fn union(&self) -> Option<UnionKind> {
        self.union
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn select_list(&self) -> &[SelectItem] {
        &self.select_list
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }

    pub fn joins(&self) -> &[JoinSpec] {
        &self.joins
    }

    pub fn where_model(&self) -> &WhereModel {
        &self.where_model
    }

    pub fn group_by(&self) -> &[Expression] {
        &self.group_by
    }

    /// Table/alias pairs this block registers.
    pub fn table_aliases(&self) -> Vec<(Table, String)> {
        let from = self
            .table_alias
            .as_ref()
            .map(|alias| (self.table.clone(), alias.clone()));
        let joins = self
            .joins
            .iter()
            .filter_map(|j| j.alias.as_ref().map(|alias| (j.table.clone(), alias.clone())));
        from.into_iter().chain(joins).collect()
    }
}

/// Paging directives, exactly one strategy per statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingModel {
    /// `limit n [offset m]`
    LimitOffset { limit: u64, offset: Option<u64> },
    /// `[offset m rows] [fetch first n rows only]`
    OffsetFetch {
        offset: Option<u64>,
        fetch_first: Option<u64>,
    },
}

/// An immutable SELECT statement.
#[derive(Debug, Clone)]
pub struct SelectModel {
    query_expressions: Vec<QueryExpressionModel>,
    order_by: Vec<SortSpec>,
    paging: Option<PagingModel>,
}

impl SelectModel {
    pub fn query_expressions(&self) -> &[QueryExpressionModel] {
        &self.query_expressions
    }

    pub fn order_by(&self) -> &[SortSpec] {
        &self.order_by
    }

    pub fn paging(&self) -> Option<PagingModel> {
        self.paging
    }
}

// ==================== Entry ====================

/// Start a select with a custom adapter.
pub fn select_with<R>(adapter: impl FnOnce(SelectModel) -> R + 'static, items: impl IntoSelectList) -> FromGatherer<R> {
    FromGatherer::new(SelectDsl::new(Box::new(adapter)), None, false, items.into_select_list())
}

/// Start a select distinct with a custom adapter.
pub fn select_distinct_with<R>(
    adapter: impl FnOnce(SelectModel) -> R + 'static,
    items: impl IntoSelectList,
) -> FromGatherer<R> {
    FromGatherer::new(SelectDsl::new(Box::new(adapter)), None, true, items.into_select_list())
}

// ==================== Stages ====================

/// Completed query expressions plus ordering; the state every later stage
/// folds into.
pub struct SelectDsl<R> {
    adapter: SelectAdapter<R>,
    query_expressions: Vec<QueryExpressionModel>,
    order_by: Vec<SortSpec>,
}

impl<R> SelectDsl<R> {
    fn new(adapter: SelectAdapter<R>) -> Self {
        Self {
            adapter,
            query_expressions: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// `limit n`, optionally followed by `offset`.
    pub fn limit(self, limit: u64) -> LimitFinisher<R> {
        LimitFinisher { dsl: self, limit }
    }

    /// `offset n rows`, optionally followed by `fetch_first`.
    pub fn offset(self, offset: u64) -> OffsetFirstFinisher<R> {
        OffsetFirstFinisher { dsl: self, offset }
    }

    /// `fetch first n rows only`; must be completed with `rows_only`.
    pub fn fetch_first(self, fetch_first: u64) -> FetchFirstFinisher<R> {
        FetchFirstFinisher {
            dsl: self,
            offset: None,
            fetch_first,
        }
    }

    pub fn build(self) -> SqlResult<R> {
        self.build_with_paging(None)
    }

    fn build_with_paging(self, paging: Option<PagingModel>) -> SqlResult<R> {
        if self.query_expressions.iter().any(|q| q.select_list.is_empty()) {
            return Err(SqlError::invalid_argument("select list"));
        }
        let model = SelectModel {
            query_expressions: self.query_expressions,
            order_by: self.order_by,
            paging,
        };
        Ok((self.adapter)(model))
    }
}

/// Gathers the source table of a query expression.
pub struct FromGatherer<R> {
    dsl: SelectDsl<R>,
    union: Option<UnionKind>,
    distinct: bool,
    select_list: Vec<SelectItem>,
}

impl<R> FromGatherer<R> {
    fn new(dsl: SelectDsl<R>, union: Option<UnionKind>, distinct: bool, select_list: Vec<SelectItem>) -> Self {
        Self {
            dsl,
            union,
            distinct,
            select_list,
        }
    }

    pub fn from(self, table: &Table) -> QueryExpressionDsl<R> {
        self.from_table(table, None)
    }

    /// `from table alias`
    pub fn from_as(self, table: &Table, alias: &str) -> QueryExpressionDsl<R> {
        self.from_table(table, Some(alias.to_string()))
    }

    fn from_table(self, table: &Table, table_alias: Option<String>) -> QueryExpressionDsl<R> {
        QueryExpressionDsl {
            dsl: self.dsl,
            model: QueryExpressionModel {
                union: self.union,
                distinct: self.distinct,
                select_list: self.select_list,
                table: table.clone(),
                table_alias,
                joins: Vec::new(),
                where_model: WhereModel::default(),
                group_by: Vec::new(),
            },
        }
    }
}

/// A query expression whose source is known: joins, where, grouping.
pub struct QueryExpressionDsl<R> {
    dsl: SelectDsl<R>,
    model: QueryExpressionModel,
}

/// Stages from which joins, a where clause or grouping can still be added.
pub trait QueryExpressionStage<R>: Sized {
    fn into_query_expression(self) -> QueryExpressionDsl<R>;

    fn join(self, table: &Table) -> JoinSpecificationStarter<R> {
        self.into_query_expression().start_join(JoinType::Inner, table, None)
    }

    fn join_as(self, table: &Table, alias: &str) -> JoinSpecificationStarter<R> {
        self.into_query_expression()
            .start_join(JoinType::Inner, table, Some(alias))
    }

    fn left_join(self, table: &Table) -> JoinSpecificationStarter<R> {
        self.into_query_expression().start_join(JoinType::Left, table, None)
    }

    fn left_join_as(self, table: &Table, alias: &str) -> JoinSpecificationStarter<R> {
        self.into_query_expression()
            .start_join(JoinType::Left, table, Some(alias))
    }

    fn right_join(self, table: &Table) -> JoinSpecificationStarter<R> {
        self.into_query_expression().start_join(JoinType::Right, table, None)
    }

    fn right_join_as(self, table: &Table, alias: &str) -> JoinSpecificationStarter<R> {
        self.into_query_expression()
            .start_join(JoinType::Right, table, Some(alias))
    }

    fn full_join(self, table: &Table) -> JoinSpecificationStarter<R> {
        self.into_query_expression().start_join(JoinType::Full, table, None)
    }

    fn full_join_as(self, table: &Table, alias: &str) -> JoinSpecificationStarter<R> {
        self.into_query_expression()
            .start_join(JoinType::Full, table, Some(alias))
    }

    /// Start the where clause with `col <condition>`.
    fn where_<T: Into<Value>>(self, column: &Column<T>, condition: Condition<T>) -> QueryExpressionWhereDsl<R> {
        self.where_criterion(Criterion::new(column, condition))
    }

    /// Start the where clause with `exists (select ...)`.
    fn where_exists(self, select: SelectModel) -> QueryExpressionWhereDsl<R> {
        self.where_criterion(Criterion::exists(select))
    }

    /// Start the where clause with a prebuilt criterion.
    fn where_criterion(self, criterion: Criterion) -> QueryExpressionWhereDsl<R> {
        QueryExpressionWhereDsl {
            expression: self.into_query_expression(),
            where_dsl: WhereDsl::starting_with(criterion),
        }
    }

    fn group_by(self, items: impl IntoSelectList) -> GroupByFinisher<R> {
        self.into_query_expression().with_group_by(items)
    }
}

/// Stages at which the current query expression is complete.
pub trait QueryExpressionFinisher<R>: Sized {
    fn finish(self) -> SelectDsl<R>;

    /// Follow with `union select ...`.
    fn union(self) -> UnionBuilder<R> {
        UnionBuilder {
            dsl: self.finish(),
            kind: UnionKind::Union,
        }
    }

    /// Follow with `union all select ...`.
    fn union_all(self) -> UnionBuilder<R> {
        UnionBuilder {
            dsl: self.finish(),
            kind: UnionKind::UnionAll,
        }
    }

    fn order_by(self, specs: impl IntoSortList) -> SelectDsl<R> {
        let mut dsl = self.finish();
        dsl.order_by.extend(specs.into_sort_list());
        dsl
    }

    fn limit(self, limit: u64) -> LimitFinisher<R> {
        self.finish().limit(limit)
    }

    fn offset(self, offset: u64) -> OffsetFirstFinisher<R> {
        self.finish().offset(offset)
    }

    fn fetch_first(self, fetch_first: u64) -> FetchFirstFinisher<R> {
        self.finish().fetch_first(fetch_first)
    }

    fn build(self) -> SqlResult<R> {
        self.finish().build()
    }
}

impl<R> QueryExpressionDsl<R> {
    fn start_join(mut self, join_type: JoinType, table: &Table, alias: Option<&str>) -> JoinSpecificationStarter<R> {
        self.model.joins.push(JoinSpec {
            join_type,
            table: table.clone(),
            alias: alias.map(str::to_string),
            criteria: Vec::new(),
        });
        JoinSpecificationStarter { expression: self }
    }

    fn with_group_by(mut self, items: impl IntoSelectList) -> GroupByFinisher<R> {
        self.model.group_by = items
            .into_select_list()
            .into_iter()
            .map(|item| item.expression().clone())
            .collect();
        GroupByFinisher { expression: self }
    }

    fn push_join_criterion(&mut self, connector: Option<Connector>, left: ColumnRef, right: ColumnRef) {
        if let Some(join) = self.model.joins.last_mut() {
            join.criteria.push(JoinCriterion {
                connector,
                left,
                right,
            });
        }
    }
}

impl<R> QueryExpressionStage<R> for QueryExpressionDsl<R> {
    fn into_query_expression(self) -> QueryExpressionDsl<R> {
        self
    }
}

impl<R> QueryExpressionFinisher<R> for QueryExpressionDsl<R> {
    fn finish(mut self) -> SelectDsl<R> {
        self.dsl.query_expressions.push(self.model);
        self.dsl
    }
}

/// `equal_to(col)` for join `on` clauses.
pub fn equal_to<T>(column: &Column<T>) -> JoinCondition {
    JoinCondition {
        column: column.erase(),
    }
}

/// A join awaiting its first `on` criterion.
pub struct JoinSpecificationStarter<R> {
    expression: QueryExpressionDsl<R>,
}

impl<R> JoinSpecificationStarter<R> {
    /// `on col = other`
    pub fn on<T>(mut self, column: &Column<T>, condition: JoinCondition) -> JoinSpecificationFinisher<R> {
        self.expression
            .push_join_criterion(None, column.erase(), condition.column);
        JoinSpecificationFinisher {
            expression: self.expression,
        }
    }
}

/// A join with at least one `on` criterion.
pub struct JoinSpecificationFinisher<R> {
    expression: QueryExpressionDsl<R>,
}

impl<R> JoinSpecificationFinisher<R> {
    /// `and col = other`
    pub fn and<T>(mut self, column: &Column<T>, condition: JoinCondition) -> Self {
        self.expression
            .push_join_criterion(Some(Connector::And), column.erase(), condition.column);
        self
    }
}

impl<R> QueryExpressionStage<R> for JoinSpecificationFinisher<R> {
    fn into_query_expression(self) -> QueryExpressionDsl<R> {
        self.expression
    }
}

impl<R> QueryExpressionFinisher<R> for JoinSpecificationFinisher<R> {
    fn finish(self) -> SelectDsl<R> {
        self.expression.finish()
    }
}

/// Where stage of a query expression.
pub struct QueryExpressionWhereDsl<R> {
    expression: QueryExpressionDsl<R>,
    where_dsl: WhereDsl,
}

impl<R> QueryExpressionWhereDsl<R> {
    pub fn group_by(self, items: impl IntoSelectList) -> GroupByFinisher<R> {
        self.into_expression().with_group_by(items)
    }

    fn into_expression(self) -> QueryExpressionDsl<R> {
        let mut expression = self.expression;
        expression.model.where_model = self.where_dsl.into_model();
        expression
    }
}

impl<R> WhereBuilder for QueryExpressionWhereDsl<R> {
    fn where_dsl(&mut self) -> &mut WhereDsl {
        &mut self.where_dsl
    }
}

impl<R> QueryExpressionFinisher<R> for QueryExpressionWhereDsl<R> {
    fn finish(self) -> SelectDsl<R> {
        self.into_expression().finish()
    }
}

/// After `group by`.
pub struct GroupByFinisher<R> {
    expression: QueryExpressionDsl<R>,
}

impl<R> QueryExpressionFinisher<R> for GroupByFinisher<R> {
    fn finish(self) -> SelectDsl<R> {
        self.expression.finish()
    }
}

/// After `union` / `union all`: the next block's select list.
pub struct UnionBuilder<R> {
    dsl: SelectDsl<R>,
    kind: UnionKind,
}

impl<R> UnionBuilder<R> {
    pub fn select(self, items: impl IntoSelectList) -> FromGatherer<R> {
        FromGatherer::new(self.dsl, Some(self.kind), false, items.into_select_list())
    }

    pub fn select_distinct(self, items: impl IntoSelectList) -> FromGatherer<R> {
        FromGatherer::new(self.dsl, Some(self.kind), true, items.into_select_list())
    }
}

// ==================== Paging ====================

/// After `limit`.
pub struct LimitFinisher<R> {
    dsl: SelectDsl<R>,
    limit: u64,
}

impl<R> LimitFinisher<R> {
    pub fn offset(self, offset: u64) -> OffsetFinisher<R> {
        OffsetFinisher {
            dsl: self.dsl,
            limit: self.limit,
            offset,
        }
    }

    pub fn build(self) -> SqlResult<R> {
        self.dsl.build_with_paging(Some(PagingModel::LimitOffset {
            limit: self.limit,
            offset: None,
        }))
    }
}

/// After `limit ... offset`.
pub struct OffsetFinisher<R> {
    dsl: SelectDsl<R>,
    limit: u64,
    offset: u64,
}

impl<R> OffsetFinisher<R> {
    pub fn build(self) -> SqlResult<R> {
        self.dsl.build_with_paging(Some(PagingModel::LimitOffset {
            limit: self.limit,
            offset: Some(self.offset),
        }))
    }
}

/// After a leading `offset`.
pub struct OffsetFirstFinisher<R> {
    dsl: SelectDsl<R>,
    offset: u64,
}

impl<R> OffsetFirstFinisher<R> {
    pub fn fetch_first(self, fetch_first: u64) -> FetchFirstFinisher<R> {
        FetchFirstFinisher {
            dsl: self.dsl,
            offset: Some(self.offset),
            fetch_first,
        }
    }

    pub fn build(self) -> SqlResult<R> {
        self.dsl.build_with_paging(Some(PagingModel::OffsetFetch {
            offset: Some(self.offset),
            fetch_first: None,
        }))
    }
}

/// After `fetch_first`; only `rows_only` may follow.
pub struct FetchFirstFinisher<R> {
    dsl: SelectDsl<R>,
    offset: Option<u64>,
    fetch_first: u64,
}

impl<R> FetchFirstFinisher<R> {
    pub fn rows_only(self) -> RowsOnlyFinisher<R> {
        RowsOnlyFinisher {
            dsl: self.dsl,
            offset: self.offset,
            fetch_first: self.fetch_first,
        }
    }
}

/// After `fetch first ... rows only`.
pub struct RowsOnlyFinisher<R> {
    dsl: SelectDsl<R>,
    offset: Option<u64>,
    fetch_first: u64,
}

impl<R> RowsOnlyFinisher<R> {
    pub fn build(self) -> SqlResult<R> {
        self.dsl.build_with_paging(Some(PagingModel::OffsetFetch {
            offset: self.offset,
            fetch_first: Some(self.fetch_first),
        }))
    }
}
