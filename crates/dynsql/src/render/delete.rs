use super::alias::TableAliasCalculator;
use super::criterion::CriterionRenderer;
use super::fragment::{FragmentAndParameters, FragmentCollector};
use super::RenderContext;
use crate::qb::delete::DeleteModel;
use crate::qb::traits::{Renderable, StatementKind};

impl Renderable for DeleteModel {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn render_with(&self, ctx: &mut RenderContext<'_>, aliases: &TableAliasCalculator) -> FragmentAndParameters {
        let mut statement = FragmentCollector::new();
        statement.add(FragmentAndParameters::without_parameters(format!(
            "delete from {}",
            self.table().name()
        )));
        if let Some(where_clause) =
            CriterionRenderer::new(ctx, aliases).render_where(self.where_model().criteria())
        {
            statement.add(where_clause);
        }
        statement.join(" ")
    }
}
