use super::alias::TableAliasCalculator;
use super::criterion::CriterionRenderer;
use super::fragment::{FragmentAndParameters, FragmentCollector};
use super::RenderContext;
use crate::param::ParameterMap;
use crate::qb::select::{JoinSpec, PagingModel, QueryExpressionModel, SelectModel};
use crate::qb::traits::{Renderable, StatementKind};
use crate::value::Value;

impl Renderable for SelectModel {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn render_with(&self, ctx: &mut RenderContext<'_>, aliases: &TableAliasCalculator) -> FragmentAndParameters {
        let mut collector = FragmentCollector::new();
        for expression in self.query_expressions() {
            let rendered = render_query_expression(expression, ctx, aliases);
            match expression.union() {
                Some(union) => collector.add(rendered.prefixed(&format!("{} ", union.keyword()))),
                None => collector.add(rendered),
            }
        }
        if !self.order_by().is_empty() {
            let specs: Vec<String> = self.order_by().iter().map(|s| s.render()).collect();
            collector.add(FragmentAndParameters::without_parameters(format!(
                "order by {}",
                specs.join(", ")
            )));
        }
        if let Some(paging) = self.paging() {
            collector.add(render_paging(paging, ctx));
        }
        collector.join(" ")
    }
}

fn render_query_expression(
    model: &QueryExpressionModel,
    ctx: &mut RenderContext<'_>,
    parent: &TableAliasCalculator,
) -> FragmentAndParameters {
    let aliases = TableAliasCalculator::child(parent, model.table_aliases());
    let mut collector = FragmentCollector::new();

    let items: Vec<String> = model.select_list().iter().map(|i| i.render(&aliases)).collect();
    let distinct = if model.is_distinct() { "distinct " } else { "" };
    collector.add(FragmentAndParameters::without_parameters(format!(
        "select {distinct}{}",
        items.join(", ")
    )));

    collector.add(FragmentAndParameters::without_parameters(format!(
        "from {}",
        table_with_alias(model.table().name(), model.table_alias())
    )));

    for join in model.joins() {
        collector.add(FragmentAndParameters::without_parameters(render_join(join, &aliases)));
    }

    if let Some(where_clause) =
        CriterionRenderer::new(ctx, &aliases).render_where(model.where_model().criteria())
    {
        collector.add(where_clause);
    }

    if !model.group_by().is_empty() {
        let columns: Vec<String> = model.group_by().iter().map(|e| e.render(&aliases)).collect();
        collector.add(FragmentAndParameters::without_parameters(format!(
            "group by {}",
            columns.join(", ")
        )));
    }

    collector.join(" ")
}

fn table_with_alias(name: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("{name} {alias}"),
        None => name.to_string(),
    }
}

fn render_join(join: &JoinSpec, aliases: &TableAliasCalculator) -> String {
    let mut text = format!(
        "{} {}",
        join.join_type().keyword(),
        table_with_alias(join.table().name(), join.alias())
    );
    for criterion in join.criteria() {
        let keyword = criterion.connector().map_or("on", |c| c.keyword());
        text.push_str(&format!(
            " {keyword} {} = {}",
            criterion.left().render_with_table_alias(aliases),
            criterion.right().render_with_table_alias(aliases)
        ));
    }
    text
}

fn render_paging(paging: PagingModel, ctx: &mut RenderContext<'_>) -> FragmentAndParameters {
    let mut parameters = ParameterMap::new();
    let mut bind = |n: u64, parameters: &mut ParameterMap| {
        ctx.bind(None, Value::Int(i64::try_from(n).unwrap_or(i64::MAX)), parameters)
    };
    let text = match paging {
        PagingModel::LimitOffset { limit, offset } => {
            let mut text = format!("limit {}", bind(limit, &mut parameters));
            if let Some(offset) = offset {
                text.push_str(&format!(" offset {}", bind(offset, &mut parameters)));
            }
            text
        }
        PagingModel::OffsetFetch {
            offset,
            fetch_first,
        } => {
            let mut parts = Vec::new();
            if let Some(offset) = offset {
                parts.push(format!("offset {} rows", bind(offset, &mut parameters)));
            }
            if let Some(fetch_first) = fetch_first {
                parts.push(format!("fetch first {} rows only", bind(fetch_first, &mut parameters)));
            }
            parts.join(" ")
        }
    };
    FragmentAndParameters::new(text, parameters)
}
