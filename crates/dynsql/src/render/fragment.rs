//! Rendered text fragments and their parameters.

use crate::param::ParameterMap;
use crate::value::Value;

/// A piece of rendered SQL with the parameters it binds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentAndParameters {
    fragment: String,
    parameters: ParameterMap,
}

impl FragmentAndParameters {
    pub fn new(fragment: impl Into<String>, parameters: ParameterMap) -> Self {
        Self {
            fragment: fragment.into(),
            parameters,
        }
    }

    /// A fragment that binds nothing.
    pub fn without_parameters(fragment: impl Into<String>) -> Self {
        Self::new(fragment, ParameterMap::new())
    }

    /// A fragment binding a single value.
    pub fn with_parameter(fragment: impl Into<String>, key: String, value: Value) -> Self {
        let mut parameters = ParameterMap::new();
        parameters.insert(key, value);
        Self::new(fragment, parameters)
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    /// Prepend `prefix` to the text, keeping the parameters.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.fragment.insert_str(0, prefix);
        self
    }

    pub fn into_parts(self) -> (String, ParameterMap) {
        (self.fragment, self.parameters)
    }
}

/// Ordered accumulator of fragments.
///
/// Parameters of every added fragment are merged into one map; a duplicate
/// key panics (see [`ParameterMap::insert`]).
#[derive(Debug, Default)]
pub struct FragmentCollector {
    fragments: Vec<String>,
    parameters: ParameterMap,
}

impl FragmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fragment: FragmentAndParameters) {
        let (text, parameters) = fragment.into_parts();
        self.fragments.push(text);
        self.parameters.merge(parameters);
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn has_multiple_fragments(&self) -> bool {
        self.fragments.len() > 1
    }

    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    /// Join all fragments with `separator`.
    pub fn join(self, separator: &str) -> FragmentAndParameters {
        FragmentAndParameters::new(self.fragments.join(separator), self.parameters)
    }

    /// Join with `separator`, wrapped as `open ... close`.
    pub fn join_wrapped(self, separator: &str, open: &str, close: &str) -> FragmentAndParameters {
        let text = format!("{open}{}{close}", self.fragments.join(separator));
        FragmentAndParameters::new(text, self.parameters)
    }

    /// Space-join; parenthesize only when more than one fragment was collected.
    pub fn join_grouped(self) -> FragmentAndParameters {
        if self.has_multiple_fragments() {
            self.join_wrapped(" ", "(", ")")
        } else {
            self.join(" ")
        }
    }
}

impl FromIterator<FragmentAndParameters> for FragmentCollector {
    fn from_iter<I: IntoIterator<Item = FragmentAndParameters>>(iter: I) -> Self {
        let mut collector = FragmentCollector::new();
        for fragment in iter {
            collector.add(fragment);
        }
        collector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, key: &str, v: i64) -> FragmentAndParameters {
        FragmentAndParameters::with_parameter(text, key.to_string(), Value::Int(v))
    }

    #[test]
    fn test_single_fragment_is_bare() {
        let out: FragmentCollector = vec![frag("id = $1", "p1", 1)].into_iter().collect();
        let out = out.join_grouped();
        assert_eq!(out.fragment(), "id = $1");
        assert_eq!(out.parameters().len(), 1);
    }

    #[test]
    fn test_multiple_fragments_are_parenthesized_once() {
        let out: FragmentCollector = vec![frag("a = $1", "p1", 1), frag("or b = $2", "p2", 2)]
            .into_iter()
            .collect();
        let out = out.join_grouped();
        assert_eq!(out.fragment(), "(a = $1 or b = $2)");
        assert_eq!(out.parameters().keys().collect::<Vec<_>>(), vec!["p1", "p2"]);
    }

    #[test]
    #[should_panic(expected = "parameter key collision")]
    fn test_collision_panics() {
        let mut c = FragmentCollector::new();
        c.add(frag("a = $1", "p1", 1));
        c.add(frag("b = $1", "p1", 2));
    }

    #[test]
    fn test_prefixed() {
        let f = FragmentAndParameters::without_parameters("x is null").prefixed("and ");
        assert_eq!(f.fragment(), "and x is null");
    }
}
