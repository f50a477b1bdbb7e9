//! Placeholder syntax per target dialect.

use crate::table::DataType;
use std::fmt;
use std::sync::Arc;

/// One bound value as seen by a [`RenderingStrategy`].
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    /// Position in the statement's parameter sequence (1-based).
    pub sequence: usize,
    /// Logical parameter name, `p1`, `p2`, ... by default.
    pub name: &'a str,
    /// Data type of the column the value is bound to, when there is one.
    pub data_type: Option<DataType>,
}

/// Formats placeholders and parameter keys for one dialect.
pub trait RenderingStrategy: fmt::Debug + Send + Sync {
    /// Text inserted into the statement where the value goes.
    fn placeholder(&self, binding: &Binding<'_>) -> String;

    /// Key under which the value is stored in the parameter map.
    fn parameter_key(&self, binding: &Binding<'_>) -> String {
        binding.name.to_string()
    }
}

/// Postgres positional placeholders: `$1`, `$2`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresStrategy;

impl RenderingStrategy for PostgresStrategy {
    fn placeholder(&self, binding: &Binding<'_>) -> String {
        format!("${}", binding.sequence)
    }
}

/// Named placeholders: `:p1`, `:p2`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedStrategy;

impl RenderingStrategy for NamedStrategy {
    fn placeholder(&self, binding: &Binding<'_>) -> String {
        format!(":{}", binding.name)
    }
}

/// Numbered question-mark placeholders (`?1`, `?2`, ...) keyed by number.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedStrategy;

impl RenderingStrategy for NumberedStrategy {
    fn placeholder(&self, binding: &Binding<'_>) -> String {
        format!("?{}", binding.sequence)
    }

    fn parameter_key(&self, binding: &Binding<'_>) -> String {
        binding.sequence.to_string()
    }
}

/// MyBatis parameter expressions: `#{parameters.p1,jdbcType=INTEGER}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyBatisStrategy;

impl RenderingStrategy for MyBatisStrategy {
    fn placeholder(&self, binding: &Binding<'_>) -> String {
        match binding.data_type {
            Some(data_type) => format!(
                "#{{parameters.{},jdbcType={}}}",
                binding.name,
                data_type.jdbc_name()
            ),
            None => format!("#{{parameters.{}}}", binding.name),
        }
    }
}

/// Postgres placeholder cast to `jsonb`: `$1::jsonb`.
///
/// Meant as a per-column override for JSON columns bound from text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresJsonStrategy;

impl RenderingStrategy for PostgresJsonStrategy {
    fn placeholder(&self, binding: &Binding<'_>) -> String {
        format!("${}::jsonb", binding.sequence)
    }
}

/// Shared handles to the built-in strategies.
pub struct RenderingStrategies;

impl RenderingStrategies {
    pub fn postgres() -> Arc<dyn RenderingStrategy> {
        Arc::new(PostgresStrategy)
    }

    pub fn named() -> Arc<dyn RenderingStrategy> {
        Arc::new(NamedStrategy)
    }

    pub fn numbered() -> Arc<dyn RenderingStrategy> {
        Arc::new(NumberedStrategy)
    }

    pub fn mybatis() -> Arc<dyn RenderingStrategy> {
        Arc::new(MyBatisStrategy)
    }

    pub fn postgres_json() -> Arc<dyn RenderingStrategy> {
        Arc::new(PostgresJsonStrategy)
    }
}
