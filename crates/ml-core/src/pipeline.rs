//! Decode → tokenize → resolve → split → invert
//!
//! A [`Pipeline`] runs the stages strictly in order. The first failing stage
//! moves it to [`Stage::Failed`] and nothing after it runs. No state
//! survives from one run to the next.

use crate::config::ColumnSpec;
use crate::decoder::decode;
use crate::error::Result;
use crate::inverter::Inversion;
use crate::resolver::resolve;
use crate::splitter::split_rows;
use crate::table::RawTable;
use crate::tokenizer::records;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Decoding,
    Tokenizing,
    Resolving,
    Splitting,
    Inverting,
    Done,
    Failed,
}

impl Stage {
    /// `Done` and `Failed` end a run
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Decoding => "decoding",
            Stage::Tokenizing => "tokenizing",
            Stage::Resolving => "resolving",
            Stage::Splitting => "splitting",
            Stage::Inverting => "inverting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Result of one pipeline run as handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// Member → lists mapping
    Success(Inversion),
    /// Message describing the first failure
    Failure(String),
}

impl PipelineOutcome {
    /// Check if the run succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success(_))
    }

    /// The mapping, if the run succeeded
    pub fn inversion(&self) -> Option<&Inversion> {
        match self {
            PipelineOutcome::Success(inversion) => Some(inversion),
            PipelineOutcome::Failure(_) => None,
        }
    }

    /// The failure message, if the run failed
    pub fn message(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Success(_) => None,
            PipelineOutcome::Failure(message) => Some(message),
        }
    }

    /// Convert into a standard result
    pub fn into_result(self) -> std::result::Result<Inversion, String> {
        match self {
            PipelineOutcome::Success(inversion) => Ok(inversion),
            PipelineOutcome::Failure(message) => Err(message),
        }
    }
}

impl From<Result<Inversion>> for PipelineOutcome {
    fn from(result: Result<Inversion>) -> Self {
        match result {
            Ok(inversion) => PipelineOutcome::Success(inversion),
            Err(e) => PipelineOutcome::Failure(e.to_string()),
        }
    }
}

/// A single pipeline run over one uploaded file
#[derive(Debug, Clone)]
pub struct Pipeline {
    spec: ColumnSpec,
    stage: Stage,
}

impl Pipeline {
    /// Create a pipeline in the `Idle` stage
    pub fn new(spec: ColumnSpec) -> Self {
        Self {
            spec,
            stage: Stage::Idle,
        }
    }

    /// Current stage; after `run` this is `Done` or `Failed`
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The columns this pipeline resolves
    pub fn spec(&self) -> &ColumnSpec {
        &self.spec
    }

    /// Run every stage over `bytes`, starting again from `Idle`
    pub fn run(&mut self, bytes: &[u8]) -> PipelineOutcome {
        self.stage = Stage::Idle;
        let result = self.execute(bytes);
        match &result {
            Ok(inversion) => {
                self.advance(Stage::Done);
                tracing::debug!(tokens = inversion.len(), "pipeline finished");
            }
            Err(e) => {
                tracing::warn!(stage = %self.stage, error = %e, "pipeline failed");
                self.stage = Stage::Failed;
            }
        }
        result.into()
    }

    fn execute(&mut self, bytes: &[u8]) -> Result<Inversion> {
        self.advance(Stage::Decoding);
        let text = decode(bytes)?;

        self.advance(Stage::Tokenizing);
        let table = RawTable::from_records(records(&text)?)?;
        tracing::debug!(
            columns = table.column_count(),
            rows = table.row_count(),
            "tokenized"
        );

        self.advance(Stage::Resolving);
        let columns = resolve(&table.header, &self.spec)?;

        self.advance(Stage::Splitting);
        let rows = split_rows(&table, columns)?;

        self.advance(Stage::Inverting);
        Ok(Inversion::from_rows(&rows))
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = %self.stage, to = %next, "stage");
        self.stage = next;
    }
}

/// Run the whole pipeline over one file's bytes
pub fn run_pipeline(raw_bytes: &[u8], key_header: &str, value_header: &str) -> PipelineOutcome {
    run_with_spec(raw_bytes, &ColumnSpec::new(key_header, value_header))
}

/// Run the whole pipeline with a column spec
pub fn run_with_spec(raw_bytes: &[u8], spec: &ColumnSpec) -> PipelineOutcome {
    Pipeline::new(spec.clone()).run(raw_bytes)
}

/// Decode and return only the header record
pub fn read_header(raw_bytes: &[u8]) -> Result<Vec<String>> {
    let text = decode(raw_bytes)?;
    let header = records(&text)?.next().transpose()?;
    Ok(header.unwrap_or_default())
}
