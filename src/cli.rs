use std::fs;

use serde_json::{Value, json};
use thiserror::Error;

use crate::config::{PathEncoderConfig, PatternMinerConfig};
use crate::errors::BopError;
use crate::graph::{AttributedGraph, GraphDocument};
use crate::pipeline::{
    GraphOrError, ItemError, embed_graph, run_path_encoder, run_pattern_miner,
};
use crate::template::{Template, TemplateError, TemplateKind};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(BopError),
    #[error(transparent)]
    Template(TemplateError),
    #[error("command failed: {0}")]
    Failed(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) | CliError::Config(_) => 2,
            CliError::Template(_) | CliError::Failed(_) => 1,
        }
    }
}

impl From<BopError> for CliError {
    fn from(err: BopError) -> Self {
        if err.is_user_error() {
            CliError::Config(err)
        } else {
            CliError::Failed(err.to_string())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub config_path: Option<String>,
    pub command: String,
    pub command_args: Vec<String>,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut config_path = None;
        let mut command: Option<String> = None;
        let mut command_args = Vec::new();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            if command.is_some() {
                command_args.push(arg.to_string());
                continue;
            }
            match *arg {
                "--config" => {
                    config_path = Some(
                        iter.next()
                            .ok_or_else(|| "--config requires a value".to_string())?
                            .to_string(),
                    );
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                _ => command = Some(arg.to_string()),
            }
        }
        let command = command.ok_or_else(|| "missing command".to_string())?;
        Ok(Self {
            config_path,
            command,
            command_args,
        })
    }

    pub fn help() -> &'static str {
        "Usage: bopgraph [--config FILE] <command> [args]\n\
         Commands:\n  \
           encode-paths --input FILE\n  \
           mine-patterns --input FILE\n  \
           embed --input FILE\n  \
           check-template --kind node|edge --template TEXT\n"
    }

    fn value_of(&self, flag: &str) -> Result<&str, CliError> {
        let mut iter = self.command_args.iter();
        while let Some(arg) = iter.next() {
            if arg == flag {
                return iter
                    .next()
                    .map(String::as_str)
                    .ok_or_else(|| CliError::Usage(format!("{flag} requires a value")));
            }
        }
        Err(CliError::Usage(format!("{} requires {flag}", self.command)))
    }
}

/// Parses a JSON array of graph documents; bad documents become item errors.
pub fn parse_batch(text: &str) -> Result<Vec<GraphOrError>, BopError> {
    let raw: Vec<Value> = serde_json::from_str(text)
        .map_err(|e| BopError::invalid_input(format!("input must be a JSON array: {e}")))?;
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<GraphDocument>(value)
                .map_err(|e| ItemError::new(index, e.to_string()))
                .and_then(|doc| {
                    AttributedGraph::from_document(&doc)
                        .map_err(|e| ItemError::new(index, e.to_string()))
                })
        })
        .collect())
}

/// Runs one command and returns its JSON output.
pub fn run_command(config: &CommandLineConfig) -> Result<Value, CliError> {
    match config.command.as_str() {
        "encode-paths" => {
            let settings: PathEncoderConfig = load_config(config)?;
            let batch = read_batch(config)?;
            let results = run_path_encoder(&batch, &settings)?;
            let items = results
                .iter()
                .enumerate()
                .map(|(index, item)| item_json(index, item.as_ref().map(to_json)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(json!({ "items": items }))
        }
        "mine-patterns" => {
            let settings: PatternMinerConfig = load_config(config)?;
            let batch = read_batch(config)?;
            let output = run_pattern_miner(&batch, &settings)?;
            let items = output
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item_json(
                        index,
                        item.as_ref().map(|patterns| {
                            Ok(json!({
                                "mapping": patterns.mapping,
                                "patterns": patterns.patterns,
                            }))
                        }),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(json!({
                "items": items,
                "frequencies": to_json(&output.frequencies)?,
            }))
        }
        "embed" => {
            let settings: PatternMinerConfig = load_config(config)?;
            settings.validate()?;
            let batch = read_batch(config)?;
            let mut items = Vec::with_capacity(batch.len());
            for (index, item) in batch.iter().enumerate() {
                let value = match item {
                    Ok(graph) => item_json(index, Ok(to_json(&embed_graph(graph, &settings)?)))?,
                    Err(err) => item_json(index, Err(err))?,
                };
                items.push(value);
            }
            Ok(json!({ "items": items }))
        }
        "check-template" => {
            let kind = match config.value_of("--kind")? {
                "node" => TemplateKind::Node,
                "edge" => TemplateKind::Edge,
                other => return Err(CliError::Usage(format!("unknown template kind {other}"))),
            };
            let text = config.value_of("--template")?;
            let template = Template::compile(text, kind).map_err(CliError::Template)?;
            Ok(json!({
                "valid": true,
                "kind": template.kind(),
                "gated": template.gate().is_some(),
                "segments": template.segments().len(),
            }))
        }
        other => Err(CliError::Usage(format!("unknown command {other}"))),
    }
}

fn load_config<T>(config: &CommandLineConfig) -> Result<T, CliError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(path) = &config.config_path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Usage(format!("cannot read config {path}: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Usage(format!("invalid config {path}: {e}")))
}

fn read_batch(config: &CommandLineConfig) -> Result<Vec<GraphOrError>, CliError> {
    let path = config.value_of("--input")?;
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Failed(format!("cannot read input {path}: {e}")))?;
    parse_batch(&text).map_err(|e| CliError::Failed(e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::Failed(e.to_string()))
}

fn item_json(
    index: usize,
    item: Result<Result<Value, CliError>, &ItemError>,
) -> Result<Value, CliError> {
    match item {
        Ok(value) => Ok(json!({ "index": index, "ok": value? })),
        Err(err) => Ok(json!({ "index": index, "error": err.message })),
    }
}
