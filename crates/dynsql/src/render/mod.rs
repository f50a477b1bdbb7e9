//! Rendering of statement models into SQL text and parameters.
//!
//! Every top-level render starts a fresh [`RenderContext`] whose parameter
//! sequence begins at 1. Sub-selects nested in `exists` criteria render with
//! the same context, so outer and inner placeholders never collide and
//! identical models always yield identical parameter names.

pub mod alias;
pub mod criterion;
pub mod delete;
pub mod fragment;
pub mod insert;
pub mod select;
pub mod strategy;
pub mod update;

use crate::param::ParameterMap;
use crate::qb::traits::StatementKind;
use crate::table::ColumnRef;
use crate::value::Value;
use std::sync::Arc;
use strategy::{Binding, RenderingStrategies, RenderingStrategy};

pub use alias::TableAliasCalculator;
pub use fragment::{FragmentAndParameters, FragmentCollector};

/// Statement-level rendering options.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    strategy: Arc<dyn RenderingStrategy>,
    parameter_prefix: String,
    max_logged_sql: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(RenderingStrategies::postgres())
    }
}

impl RenderConfig {
    pub fn new(strategy: Arc<dyn RenderingStrategy>) -> Self {
        Self {
            strategy,
            parameter_prefix: "p".to_string(),
            max_logged_sql: Some(200),
        }
    }

    /// `$1`, `$2`, ... placeholders.
    pub fn postgres() -> Self {
        Self::default()
    }

    /// `:p1`, `:p2`, ... placeholders.
    pub fn named() -> Self {
        Self::new(RenderingStrategies::named())
    }

    /// `?1`, `?2`, ... placeholders keyed by number.
    pub fn numbered() -> Self {
        Self::new(RenderingStrategies::numbered())
    }

    /// `#{parameters.p1,jdbcType=...}` placeholders.
    pub fn mybatis() -> Self {
        Self::new(RenderingStrategies::mybatis())
    }

    /// Set the prefix of generated parameter names.
    pub fn parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parameter_prefix = prefix.into();
        self
    }

    /// Set maximum SQL length (in chars) written to the log.
    pub fn max_logged_sql(mut self, len: usize) -> Self {
        self.max_logged_sql = Some(len);
        self
    }

    /// Disable SQL truncation in the log.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql = None;
        self
    }

    pub fn strategy(&self) -> &Arc<dyn RenderingStrategy> {
        &self.strategy
    }

    pub fn prefix(&self) -> &str {
        &self.parameter_prefix
    }

    pub fn max_logged_sql_len(&self) -> Option<usize> {
        self.max_logged_sql
    }
}

/// State of one top-level render.
#[derive(Debug)]
pub struct RenderContext<'a> {
    config: &'a RenderConfig,
    sequence: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            sequence: 1,
        }
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    /// The sequence number the next bound value will receive.
    pub fn next_sequence(&self) -> usize {
        self.sequence
    }

    /// Bind `value` and return its placeholder.
    ///
    /// The column's own strategy, if any, wins over the statement's.
    pub fn bind(
        &mut self,
        column: Option<&ColumnRef>,
        value: Value,
        parameters: &mut ParameterMap,
    ) -> String {
        let strategy = column
            .and_then(ColumnRef::rendering_strategy)
            .unwrap_or(&self.config.strategy);
        let name = format!("{}{}", self.config.parameter_prefix, self.sequence);
        let binding = Binding {
            sequence: self.sequence,
            name: &name,
            data_type: column.map(ColumnRef::data_type),
        };
        let placeholder = strategy.placeholder(&binding);
        parameters.insert(strategy.parameter_key(&binding), value);
        self.sequence += 1;
        placeholder
    }

    /// Bind `value` as a standalone fragment.
    pub fn bind_fragment(&mut self, column: Option<&ColumnRef>, value: Value) -> FragmentAndParameters {
        let mut parameters = ParameterMap::new();
        let placeholder = self.bind(column, value, &mut parameters);
        FragmentAndParameters::new(placeholder, parameters)
    }
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn truncate_sql(sql: &str, max_chars: Option<usize>) -> String {
    match max_chars {
        Some(max) if sql.chars().count() > max => {
            let cut: String = sql.chars().take(max).collect();
            format!("{cut}...")
        }
        _ => sql.to_string(),
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn log_statement(config: &RenderConfig, kind: StatementKind, sql: &str, param_count: usize) {
    let sql = truncate_sql(sql, config.max_logged_sql);
    tracing::debug!(target: "dynsql.sql", kind = ?kind, param_count, sql = %sql);
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn log_statement(_config: &RenderConfig, _kind: StatementKind, _sql: &str, _param_count: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn log_elided(column: &ColumnRef) {
    tracing::trace!(
        target: "dynsql.render",
        column = column.name(),
        table = column.table().name(),
        "empty list condition elided"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn log_elided(_column: &ColumnRef) {}
