use super::alias::TableAliasCalculator;
use super::criterion::CriterionRenderer;
use super::fragment::{FragmentAndParameters, FragmentCollector};
use super::insert::render_mapping_value;
use super::RenderContext;
use crate::qb::traits::{Renderable, StatementKind};
use crate::qb::update::UpdateModel;

impl Renderable for UpdateModel {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn render_with(&self, ctx: &mut RenderContext<'_>, aliases: &TableAliasCalculator) -> FragmentAndParameters {
        let set: FragmentCollector = self
            .mappings()
            .iter()
            .map(|m| {
                render_mapping_value(m.column(), m.value(), ctx, aliases)
                    .prefixed(&format!("{} = ", m.column().name()))
            })
            .collect();

        let mut statement = FragmentCollector::new();
        statement.add(set.join(", ").prefixed(&format!("update {} set ", self.table().name())));
        if let Some(where_clause) =
            CriterionRenderer::new(ctx, aliases).render_where(self.where_model().criteria())
        {
            statement.add(where_clause);
        }
        statement.join(" ")
    }
}
