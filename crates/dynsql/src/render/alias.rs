//! Table alias resolution.

use crate::table::Table;
use std::sync::Arc;

/// Maps tables to their alias within one statement.
///
/// Lookup is by table identity, so the same table name can carry different
/// aliases in a self-join. A calculator created with [`child`](Self::child)
/// falls back to its parent for tables it does not know, which is how a
/// correlated sub-query qualifies outer columns.
#[derive(Debug, Clone, Default)]
pub struct TableAliasCalculator {
    aliases: Vec<(Table, String)>,
    parent: Option<Arc<TableAliasCalculator>>,
}

impl TableAliasCalculator {
    /// A calculator that qualifies nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(aliases: Vec<(Table, String)>) -> Self {
        Self {
            aliases,
            parent: None,
        }
    }

    /// A calculator whose own registrations take precedence over `parent`'s.
    pub fn child(parent: &TableAliasCalculator, aliases: Vec<(Table, String)>) -> Self {
        Self {
            aliases,
            parent: Some(Arc::new(parent.clone())),
        }
    }

    pub fn alias_for(&self, table: &Table) -> Option<&str> {
        // Last registration wins within one level.
        self.aliases
            .iter()
            .rev()
            .find(|(t, _)| t.same_table(table))
            .map(|(_, alias)| alias.as_str())
            .or_else(|| self.parent.as_deref().and_then(|p| p.alias_for(table)))
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.parent.as_ref().is_none_or(|p| p.is_empty())
    }
}
