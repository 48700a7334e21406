use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::isa;

use super::{Program, Segment};

/// Per-segment layout and cost figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub name: String,
    pub offset: Option<u64>,
    pub byte_len: usize,
    pub cost: u64,
    pub stack_effect: i64,
    pub counts: BTreeMap<String, usize>,
}

impl SegmentSummary {
    pub fn of(segment: &Segment) -> Self {
        Self {
            name: segment.name().to_string(),
            offset: segment.offset(),
            byte_len: segment.byte_len(),
            cost: segment.cost(),
            stack_effect: segment.stack_effect(),
            counts: isa::counts(segment.instructions()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub segments: Vec<SegmentSummary>,
    pub byte_len: usize,
    pub cost: u64,
    pub memory_used: u64,
}

impl ProgramSummary {
    pub fn of(program: &Program) -> Self {
        let segments: Vec<SegmentSummary> = program.segments().iter().map(SegmentSummary::of).collect();
        Self {
            byte_len: segments.iter().map(|s| s.byte_len).sum(),
            cost: segments.iter().map(|s| s.cost).sum(),
            memory_used: program.memory().used(),
            segments,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize program summary")
    }
}
