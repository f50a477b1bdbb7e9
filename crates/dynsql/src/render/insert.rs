use super::alias::TableAliasCalculator;
use super::fragment::{FragmentAndParameters, FragmentCollector};
use super::RenderContext;
use crate::qb::insert::{GeneralInsertModel, MappingValue, MultiRowInsertModel};
use crate::qb::traits::{Renderable, StatementKind};
use crate::table::ColumnRef;

/// Render the value side of a column mapping.
pub(crate) fn render_mapping_value(
    column: &ColumnRef,
    value: &MappingValue,
    ctx: &mut RenderContext<'_>,
    aliases: &TableAliasCalculator,
) -> FragmentAndParameters {
    match value {
        MappingValue::Null => FragmentAndParameters::without_parameters("null"),
        MappingValue::Constant(constant) => FragmentAndParameters::without_parameters(constant.as_str()),
        MappingValue::StringConstant(constant) => {
            FragmentAndParameters::without_parameters(format!("'{}'", constant.replace('\'', "''")))
        }
        MappingValue::Value(value) => ctx.bind_fragment(Some(column), value.clone()),
        MappingValue::Column(other) => {
            FragmentAndParameters::without_parameters(other.render_with_table_alias(aliases))
        }
    }
}

fn column_list<'c>(columns: impl Iterator<Item = &'c ColumnRef>) -> String {
    columns.map(ColumnRef::name).collect::<Vec<_>>().join(", ")
}

impl Renderable for GeneralInsertModel {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn render_with(&self, ctx: &mut RenderContext<'_>, aliases: &TableAliasCalculator) -> FragmentAndParameters {
        let columns = column_list(self.mappings().iter().map(|m| m.column()));
        let values: FragmentCollector = self
            .mappings()
            .iter()
            .map(|m| render_mapping_value(m.column(), m.value(), ctx, aliases))
            .collect();
        values
            .join_wrapped(", ", "values (", ")")
            .prefixed(&format!("insert into {} ({columns}) ", self.table().name()))
    }
}

impl Renderable for MultiRowInsertModel {
    fn kind(&self) -> StatementKind {
        StatementKind::InsertMultiple
    }

    fn render_with(&self, ctx: &mut RenderContext<'_>, aliases: &TableAliasCalculator) -> FragmentAndParameters {
        let columns = column_list(self.columns().iter());
        let rows: FragmentCollector = self
            .rows()
            .iter()
            .map(|row| {
                let values: FragmentCollector = self
                    .columns()
                    .iter()
                    .zip(row)
                    .map(|(column, value)| render_mapping_value(column, value, ctx, aliases))
                    .collect();
                values.join_wrapped(", ", "(", ")")
            })
            .collect();
        let mut statement = rows
            .join_wrapped(", ", "values ", "")
            .prefixed(&format!("insert into {} ({columns}) ", self.table().name()));
        if !self.returning().is_empty() {
            let (sql, parameters) = statement.into_parts();
            let returning = column_list(self.returning().iter());
            statement = FragmentAndParameters::new(format!("{sql} returning {returning}"), parameters);
        }
        statement
    }

    fn generated_keys(&self) -> Vec<String> {
        self.returning().iter().map(|c| c.name().to_string()).collect()
    }
}
