//! Flat, defaulted parameter objects for both pipeline variants.
//!
//! The JSON form is a single flat object with camelCase keys; each component
//! only sees its own parameter struct.

use serde::{Deserialize, Serialize};

use crate::errors::BopError;
use crate::frequency::PatternOrder;
use crate::partition::CostType;
use crate::paths::{PathWeight, SortOrder, StepWeight};
use crate::prune::PruneMethod;
use crate::summary::NodeFeature;
use crate::template::{Template, TemplateKind, compile_templates};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartitioningParams {
    /// Negative means unlimited.
    #[serde(alias = "maxPartitioningIterations")]
    pub max_iterations: i64,
    pub max_partition_size: usize,
    pub cost_type: CostType,
}

impl Default for PartitioningParams {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_partition_size: 10,
            cost_type: CostType::EdgeCount,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizationParams {
    pub mask_node_types: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MiningParams {
    pub min_pattern_length: usize,
    pub max_pattern_length: usize,
    pub max_patterns_per_partition: usize,
    pub closed_patterns: bool,
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            min_pattern_length: 1,
            max_pattern_length: 1000,
            max_patterns_per_partition: 10,
            closed_patterns: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrequencyParams {
    pub min_absolute_frequency: usize,
    pub min_model_frequency: usize,
    pub max_patterns: usize,
    pub pattern_order: PatternOrder,
}

impl Default for FrequencyParams {
    fn default() -> Self {
        Self {
            min_absolute_frequency: 1,
            min_model_frequency: 1,
            max_patterns: 10,
            pattern_order: PatternOrder::AbsoluteFrequency,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternMinerConfig {
    #[serde(flatten)]
    pub partitioning: PartitioningParams,
    #[serde(flatten)]
    pub normalization: NormalizationParams,
    #[serde(flatten)]
    pub mining: MiningParams,
    #[serde(flatten)]
    pub frequency: FrequencyParams,
}

impl PatternMinerConfig {
    pub fn from_json_str(text: &str) -> Result<Self, BopError> {
        serde_json::from_str(text).map_err(|e| BopError::invalid_parameter(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), BopError> {
        if self.partitioning.max_partition_size == 0 {
            return Err(BopError::invalid_parameter(
                "maxPartitionSize must be at least 1",
            ));
        }
        if self.mining.min_pattern_length == 0 {
            return Err(BopError::invalid_parameter(
                "minPatternLength must be at least 1",
            ));
        }
        if self.mining.max_pattern_length < self.mining.min_pattern_length {
            return Err(BopError::invalid_parameter(format!(
                "maxPatternLength ({}) is below minPatternLength ({})",
                self.mining.max_pattern_length, self.mining.min_pattern_length
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathParams {
    pub allow_cycles: bool,
    pub min_path_length: usize,
    pub max_path_length: usize,
    pub step_weight: StepWeight,
    pub path_weight: PathWeight,
    /// Negative keeps every path.
    pub max_paths: i64,
    pub order: SortOrder,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            allow_cycles: false,
            min_path_length: 1,
            max_path_length: 3,
            step_weight: StepWeight::EdgeCount,
            path_weight: PathWeight::Length,
            max_paths: -1,
            order: SortOrder::Desc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateParams {
    pub node_templates: Vec<String>,
    pub edge_templates: Vec<String>,
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            node_templates: vec!["{{type}}".to_string()],
            edge_templates: vec!["{{tag}}".to_string()],
        }
    }
}

/// Node and edge templates compiled once per pipeline call.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledTemplates {
    pub node_templates: Vec<Template>,
    pub edge_templates: Vec<Template>,
}

impl TemplateParams {
    pub fn compile(&self) -> Result<CompiledTemplates, BopError> {
        Ok(CompiledTemplates {
            node_templates: compile_templates(&self.node_templates, TemplateKind::Node)?,
            edge_templates: compile_templates(&self.edge_templates, TemplateKind::Edge)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathEncoderConfig {
    #[serde(flatten)]
    pub paths: PathParams,
    #[serde(flatten)]
    pub templates: TemplateParams,
    pub prune_method: PruneMethod,
    pub node_features: Vec<NodeFeature>,
}

impl Default for PathEncoderConfig {
    fn default() -> Self {
        Self {
            paths: PathParams::default(),
            templates: TemplateParams::default(),
            prune_method: PruneMethod::Node,
            node_features: vec![NodeFeature::PathCount, NodeFeature::PathWeight],
        }
    }
}

impl PathEncoderConfig {
    pub fn from_json_str(text: &str) -> Result<Self, BopError> {
        serde_json::from_str(text).map_err(|e| BopError::invalid_parameter(e.to_string()))
    }

    /// Range checks, then compiles every template.
    pub fn validate(&self) -> Result<CompiledTemplates, BopError> {
        if self.paths.max_path_length < self.paths.min_path_length {
            return Err(BopError::invalid_parameter(format!(
                "maxPathLength ({}) is below minPathLength ({})",
                self.paths.max_path_length, self.paths.min_path_length
            )));
        }
        self.templates.compile()
    }
}
