use std::cmp::Ordering;

use super::PathContext;
use super::ast::{ComparisonOperator, Condition, Keyword, PathKey, Replacement, Segment, Selector};
use crate::graph::{AttributedGraph, ElementRef};

pub(crate) fn select(
    selector: &Selector,
    graph: &AttributedGraph,
    element: ElementRef,
    context: PathContext,
) -> Option<String> {
    match selector {
        Selector::Keyword(keyword) => {
            let record = graph.element(element);
            match keyword {
                Keyword::Id => record.element_id().map(str::to_string),
                Keyword::Name => record.element_name().map(str::to_string),
                Keyword::Tag => Some(record.element_tag().to_string()),
                Keyword::Type => record.element_type().map(str::to_string),
            }
        }
        Selector::Attribute(name) => graph.element(element).attribute(name).map(|v| v.literal()),
        Selector::Path(PathKey::Step) => Some(context.step.to_string()),
        Selector::Path(PathKey::Length) => Some(context.length.to_string()),
        Selector::Source(inner) => match element {
            ElementRef::Edge(edge) => {
                let source = graph.edge(edge).source;
                select(inner, graph, ElementRef::Node(source), context)
            }
            ElementRef::Node(_) => None,
        },
        Selector::Target(inner) => match element {
            ElementRef::Edge(edge) => {
                let target = graph.edge(edge).target;
                select(inner, graph, ElementRef::Node(target), context)
            }
            ElementRef::Node(_) => None,
        },
    }
}

pub(crate) fn holds(
    condition: &Condition,
    graph: &AttributedGraph,
    element: ElementRef,
    context: PathContext,
) -> bool {
    match condition {
        Condition::Compare {
            selector,
            operator,
            literal,
        } => {
            let value = select(selector, graph, element, context);
            compare_values(*operator, value.as_deref(), literal)
        }
        Condition::Exists(selector) => select(selector, graph, element, context).is_some(),
        Condition::NotExists(selector) => select(selector, graph, element, context).is_none(),
    }
}

pub(crate) fn render(
    segments: &[Segment],
    graph: &AttributedGraph,
    element: ElementRef,
    context: PathContext,
) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder(selector) => {
                if let Some(value) = select(selector, graph, element, context) {
                    out.push_str(&value);
                }
            }
            Segment::Conditional {
                condition,
                replacement,
            } => {
                if !holds(condition, graph, element, context) {
                    continue;
                }
                for part in replacement {
                    match part {
                        Replacement::Literal(text) => out.push_str(text),
                        Replacement::Selector(selector) => {
                            if let Some(value) = select(selector, graph, element, context) {
                                out.push_str(&value);
                            }
                        }
                    }
                }
            }
        }
    }
    out
}

/// A missing value never satisfies a comparison.
pub fn compare_values(operator: ComparisonOperator, value: Option<&str>, literal: &str) -> bool {
    let Some(value) = value else {
        return false;
    };
    let ordering = match (parse_number(value), parse_number(literal)) {
        (Some(a), Some(b)) => match a.partial_cmp(&b) {
            Some(ordering) => ordering,
            None => return false,
        },
        _ => collate(value, literal),
    };
    match operator {
        ComparisonOperator::Eq => ordering == Ordering::Equal,
        ComparisonOperator::Ne => ordering != Ordering::Equal,
        ComparisonOperator::Lt => ordering == Ordering::Less,
        ComparisonOperator::Le => ordering != Ordering::Greater,
        ComparisonOperator::Gt => ordering == Ordering::Greater,
        ComparisonOperator::Ge => ordering != Ordering::Less,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Case-insensitive order, lowercase before uppercase on ties, then code points.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        if x.is_lowercase() && y.is_uppercase() {
            return Ordering::Less;
        }
        if x.is_uppercase() && y.is_lowercase() {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}
