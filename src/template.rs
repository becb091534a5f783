//! Compiled token templates for nodes and edges.
//!
//! Surface syntax:
//!
//! - `text {{selector}} text` substitutes a selected value (empty when missing)
//! - `[[condition >> replacement]]` emits the replacement only when the condition holds
//! - `@condition >>> body` gates the whole template; a false gate yields no token
//!
//! `->` may stand in for either `>>` or `>>>`.
//!
//! Selectors are `id`, `name`, `tag`, `type`, `attr.NAME`, `path.step`, `path.length`
//! and, in edge templates, `source.SELECTOR` / `target.SELECTOR`. Conditions are
//! `selector OP literal` with `OP` one of `= != < <= > >=`, `selector.exists` or
//! `selector.not.exists`.

mod ast;
mod eval;
mod parser;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ast::{ComparisonOperator, Condition, Keyword, PathKey, Replacement, Segment, Selector};
pub use eval::{collate, compare_values};

use crate::errors::BopError;
use crate::graph::{AttributedGraph, ElementRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template error at offset {position} in {input:?}: {message}")]
pub struct TemplateError {
    pub input: String,
    pub position: usize,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Node,
    Edge,
}

/// Position of an element inside the path being encoded.
///
/// `step` is 0-based; `length` is the number of steps in the path minus one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathContext {
    pub step: usize,
    pub length: usize,
}

impl PathContext {
    pub fn new(step: usize, length: usize) -> Self {
        Self { step, length }
    }
}

/// Immutable compiled template; evaluation never mutates its inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    kind: TemplateKind,
    gate: Option<Condition>,
    segments: Vec<Segment>,
    source: String,
}

impl Template {
    pub fn compile(text: &str, kind: TemplateKind) -> Result<Self, TemplateError> {
        let (gate, segments) = parser::parse_template(text, kind)?;
        Ok(Self {
            kind,
            gate,
            segments,
            source: text.to_string(),
        })
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn gate(&self) -> Option<&Condition> {
        self.gate.as_ref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Token for `element`, or `None` when the gate rejects it.
    ///
    /// Fails with `NotFound` when `element` was not issued by `graph`.
    pub fn evaluate(
        &self,
        graph: &AttributedGraph,
        element: ElementRef,
        context: PathContext,
    ) -> Result<Option<String>, BopError> {
        graph.check_element(element)?;
        Ok(self.render(graph, element, context))
    }

    pub(crate) fn render(
        &self,
        graph: &AttributedGraph,
        element: ElementRef,
        context: PathContext,
    ) -> Option<String> {
        if let Some(gate) = &self.gate {
            if !eval::holds(gate, graph, element, context) {
                return None;
            }
        }
        Some(eval::render(&self.segments, graph, element, context))
    }
}

pub fn compile_node_template(text: &str) -> Result<Template, TemplateError> {
    Template::compile(text, TemplateKind::Node)
}

pub fn compile_edge_template(text: &str) -> Result<Template, TemplateError> {
    Template::compile(text, TemplateKind::Edge)
}

pub fn compile_templates<S: AsRef<str>>(
    texts: &[S],
    kind: TemplateKind,
) -> Result<Vec<Template>, TemplateError> {
    texts
        .iter()
        .map(|text| Template::compile(text.as_ref(), kind))
        .collect()
}

/// First template in `templates` that yields a token.
pub fn apply_first(
    templates: &[Template],
    graph: &AttributedGraph,
    element: ElementRef,
    context: PathContext,
) -> Result<Option<String>, BopError> {
    graph.check_element(element)?;
    Ok(first_token(templates, graph, element, context))
}

pub(crate) fn first_token(
    templates: &[Template],
    graph: &AttributedGraph,
    element: ElementRef,
    context: PathContext,
) -> Option<String> {
    templates
        .iter()
        .find_map(|template| template.render(graph, element, context))
}
