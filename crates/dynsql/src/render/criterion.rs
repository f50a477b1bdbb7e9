//! Recursive where-clause rendering.

use super::alias::TableAliasCalculator;
use super::fragment::{FragmentAndParameters, FragmentCollector};
use super::{RenderContext, log_elided};
use crate::condition::{Condition, ConditionValue};
use crate::criterion::{Connector, Criterion, CriterionKind};
use crate::param::ParameterMap;
use crate::qb::traits::Renderable;
use crate::table::ColumnRef;
use crate::value::Value;

/// A rendered subtree and the connector its parent prefixes it with.
#[derive(Debug)]
pub struct RenderedCriterion {
    fragment: FragmentAndParameters,
    connector: Option<Connector>,
}

impl RenderedCriterion {
    pub fn fragment(&self) -> &FragmentAndParameters {
        &self.fragment
    }

    pub fn connector(&self) -> Option<Connector> {
        self.connector
    }

    /// The fragment as the group's first element: connector dropped.
    fn into_head(self) -> FragmentAndParameters {
        self.fragment
    }

    /// The fragment prefixed by its connector. A missing connector reads as `and`.
    fn into_tail(self) -> FragmentAndParameters {
        let connector = self.connector.unwrap_or(Connector::And);
        self.fragment.prefixed(&format!("{} ", connector.keyword()))
    }
}

/// Renders criteria against one context and alias calculator.
pub struct CriterionRenderer<'r, 'a> {
    ctx: &'r mut RenderContext<'a>,
    aliases: &'r TableAliasCalculator,
}

impl<'r, 'a> CriterionRenderer<'r, 'a> {
    pub fn new(ctx: &'r mut RenderContext<'a>, aliases: &'r TableAliasCalculator) -> Self {
        Self { ctx, aliases }
    }

    /// Render `criteria` as a where clause, or `None` if nothing renders.
    pub fn render_where(&mut self, criteria: &[Criterion]) -> Option<FragmentAndParameters> {
        let mut collector = FragmentCollector::new();
        for rendered in criteria.iter().filter_map(|c| self.render(c)) {
            if collector.is_empty() {
                collector.add(rendered.into_head());
            } else {
                collector.add(rendered.into_tail());
            }
        }
        if collector.is_empty() {
            return None;
        }
        Some(collector.join(" ").prefixed("where "))
    }

    /// Render one subtree, or `None` if neither it nor any descendant renders.
    pub fn render(&mut self, criterion: &Criterion) -> Option<RenderedCriterion> {
        let initial = self.render_initial(criterion);
        let mut children = criterion
            .sub_criteria()
            .iter()
            .filter_map(|c| self.render(c))
            .collect::<Vec<_>>()
            .into_iter();

        let mut collector = FragmentCollector::new();
        match initial {
            Some(fragment) => collector.add(fragment),
            None => collector.add(children.next()?.into_head()),
        }
        for child in children {
            collector.add(child.into_tail());
        }

        Some(RenderedCriterion {
            fragment: collector.join_grouped(),
            connector: criterion.connector(),
        })
    }

    fn render_initial(&mut self, criterion: &Criterion) -> Option<FragmentAndParameters> {
        match criterion.kind() {
            CriterionKind::Column { column, condition } => self.render_condition(column, condition),
            CriterionKind::Exists { select, negated } => {
                let keyword = if *negated { "not exists" } else { "exists" };
                let sub = select.render_with(self.ctx, self.aliases);
                let (sql, parameters) = sub.into_parts();
                Some(FragmentAndParameters::new(format!("{keyword} ({sql})"), parameters))
            }
            CriterionKind::Group => None,
        }
    }

    fn render_condition(
        &mut self,
        column: &ColumnRef,
        condition: &Condition<Value>,
    ) -> Option<FragmentAndParameters> {
        if !condition.should_render() {
            if condition.is_empty_list() {
                log_elided(column);
            }
            return None;
        }

        let mut name = column.render_with_table_alias(self.aliases);
        if condition.is_upper_column() {
            name = format!("upper({name})");
        }
        let keyword = condition.operator().keyword();
        let mut parameters = ParameterMap::new();

        let text = match condition.value() {
            ConditionValue::NoValue { .. } => format!("{name} {keyword}"),
            ConditionValue::Single(Some(value)) => {
                let p = self.ctx.bind(Some(column), value.clone(), &mut parameters);
                format!("{name} {keyword} {p}")
            }
            ConditionValue::Two(Some((value1, value2))) => {
                let p1 = self.ctx.bind(Some(column), value1.clone(), &mut parameters);
                let p2 = self.ctx.bind(Some(column), value2.clone(), &mut parameters);
                format!("{name} {keyword} {p1} and {p2}")
            }
            ConditionValue::List(values) => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| self.ctx.bind(Some(column), v.clone(), &mut parameters))
                    .collect();
                format!("{name} {keyword} ({})", placeholders.join(","))
            }
            ConditionValue::Column(Some(other)) => {
                format!("{name} {keyword} {}", other.render_with_table_alias(self.aliases))
            }
            ConditionValue::Select(Some(select)) => {
                let (sql, sub_parameters) = select.render_with(self.ctx, self.aliases).into_parts();
                parameters.merge(sub_parameters);
                format!("{name} {keyword} ({sql})")
            }
            // Gate checked above.
            ConditionValue::Single(None)
            | ConditionValue::Two(None)
            | ConditionValue::Column(None)
            | ConditionValue::Select(None) => {
                return None;
            }
        };
        Some(FragmentAndParameters::new(text, parameters))
    }
}
