// src/scatter/queue.rs
use std::collections::VecDeque;

use bevy::prelude::*;

use super::config::ScatterConfig;
use super::core::ScatterError;

/// One scatter pass to run (what to instance, onto which target, how).
#[derive(Clone, Debug)]
pub struct ScatterRequest {
    pub source: Entity,
    pub target: Entity,
    pub config: ScatterConfig,
}

/// Queue resource (filled by the panel / input systems).
#[derive(Resource, Default)]
pub struct ScatterQueue {
    pub items: Vec<ScatterRequest>,
}

impl ScatterQueue {
    pub fn push(&mut self, request: ScatterRequest) {
        self.items.push(request);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScatterOutcome {
    Placed {
        pass: u64,
        group: Option<Entity>,
        candidates: usize,
        placed: usize,
    },
    /// Instances placed before the error stay under `group`.
    Failed {
        pass: u64,
        error: ScatterError,
        group: Option<Entity>,
        placed: usize,
    },
}

/// Outcomes kept in [`ScatterHistory`].
pub const HISTORY_LIMIT: usize = 32;

/// Most recent pass outcomes, oldest first, capped at [`HISTORY_LIMIT`].
#[derive(Resource, Default, Debug)]
pub struct ScatterHistory {
    /// Passes started; also feeds per-pass seeds.
    pub passes: u64,
    pub outcomes: VecDeque<ScatterOutcome>,
}

impl ScatterHistory {
    pub fn record(&mut self, outcome: ScatterOutcome) {
        if self.outcomes.len() == HISTORY_LIMIT {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(outcome);
    }

    pub fn last(&self) -> Option<&ScatterOutcome> {
        self.outcomes.back()
    }
}
