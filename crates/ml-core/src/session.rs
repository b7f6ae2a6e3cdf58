//! Holder for the outcome currently shown to the operator
//!
//! Runs may finish out of order when files are dropped in quick succession.
//! Only the most recently started run may publish: a run that completes
//! after a newer one has begun is discarded, whichever finishes last.

use crate::config::ColumnSpec;
use crate::pipeline::{run_with_spec, PipelineOutcome};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Proof that a run was started, ordered by start time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTicket {
    generation: u64,
}

impl RunTicket {
    /// Start order of the run, beginning at 1
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Published {
    generation: u64,
    outcome: PipelineOutcome,
}

/// Last-started-wins store for pipeline outcomes
#[derive(Debug, Default)]
pub struct Session {
    started: AtomicU64,
    visible: Mutex<Option<Published>>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the start of a new run, superseding every earlier one
    pub fn begin(&self) -> RunTicket {
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        RunTicket { generation }
    }

    /// Whether `ticket` belongs to the most recently started run
    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.started.load(Ordering::SeqCst) == ticket.generation
    }

    /// Publish `outcome` if its run is still the latest.
    ///
    /// Returns `false` and drops the outcome when a newer run has begun.
    pub fn complete(&self, ticket: RunTicket, outcome: PipelineOutcome) -> bool {
        let mut visible = self.visible.lock().unwrap_or_else(PoisonError::into_inner);
        let newer_published = visible
            .as_ref()
            .is_some_and(|p| p.generation > ticket.generation);

        if !self.is_current(ticket) || newer_published {
            tracing::debug!(generation = ticket.generation, "discarding superseded run");
            return false;
        }

        *visible = Some(Published {
            generation: ticket.generation,
            outcome,
        });
        true
    }

    /// Start, run and publish in one step
    pub fn run(&self, raw_bytes: &[u8], spec: &ColumnSpec) -> bool {
        let ticket = self.begin();
        let outcome = run_with_spec(raw_bytes, spec);
        self.complete(ticket, outcome)
    }

    /// The outcome currently visible, if any run has published
    pub fn current(&self) -> Option<PipelineOutcome> {
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|p| p.outcome.clone())
    }

    /// Generation of the visible outcome
    pub fn current_generation(&self) -> Option<u64> {
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|p| p.generation)
    }
}
