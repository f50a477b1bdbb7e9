//! Rendered statements and the trait every statement model implements.

use crate::error::{SqlError, SqlResult};
use crate::param::ParameterMap;
use crate::render::{
    FragmentAndParameters, RenderConfig, RenderContext, TableAliasCalculator, log_statement,
};
use serde::Serialize;
use tokio_postgres::types::ToSql;

/// Kind of a rendered statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Select,
    Insert,
    InsertMultiple,
    Update,
    Delete,
}

/// Final rendered statement: SQL text plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementProvider {
    sql: String,
    parameters: ParameterMap,
    kind: StatementKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    generated_keys: Vec<String>,
}

impl StatementProvider {
    pub fn new(sql: String, parameters: ParameterMap, kind: StatementKind) -> Self {
        Self {
            sql,
            parameters,
            kind,
            generated_keys: Vec::new(),
        }
    }

    pub fn with_generated_keys(mut self, keys: Vec<String>) -> Self {
        self.generated_keys = keys;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Columns declared in a `returning` clause.
    pub fn generated_keys(&self) -> &[String] {
        &self.generated_keys
    }

    /// The single generated-key column.
    ///
    /// # Errors
    /// Fails unless exactly one column was declared.
    pub fn generated_key(&self) -> SqlResult<&str> {
        match self.generated_keys.as_slice() {
            [key] => Ok(key),
            [] => Err(SqlError::MissingGeneratedKey),
            keys => Err(SqlError::AmbiguousGeneratedKey {
                found: keys.len(),
                columns: keys.to_vec(),
            }),
        }
    }

    /// Parameters as references compatible with tokio-postgres, in placeholder order.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.parameters.as_refs()
    }

    pub fn into_parts(self) -> (String, ParameterMap) {
        (self.sql, self.parameters)
    }
}

/// A statement model that renders to SQL.
pub trait Renderable {
    fn kind(&self) -> StatementKind;

    /// Render into `ctx`, sharing its parameter sequence.
    ///
    /// `aliases` are those of an enclosing statement, if any.
    fn render_with(
        &self,
        ctx: &mut RenderContext<'_>,
        aliases: &TableAliasCalculator,
    ) -> FragmentAndParameters;

    /// Columns a `returning` clause declares.
    fn generated_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Render as a top-level statement with a fresh parameter sequence.
    fn render(&self, config: &RenderConfig) -> StatementProvider {
        let mut ctx = RenderContext::new(config);
        let (sql, parameters) = self
            .render_with(&mut ctx, &TableAliasCalculator::empty())
            .into_parts();
        log_statement(config, self.kind(), &sql, parameters.len());
        StatementProvider::new(sql, parameters, self.kind()).with_generated_keys(self.generated_keys())
    }

    /// Render with Postgres placeholders.
    fn to_statement(&self) -> StatementProvider {
        self.render(&RenderConfig::default())
    }
}
