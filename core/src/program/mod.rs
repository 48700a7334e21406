//! Program builder
//!
//! A [`Program`] owns the memory model and an ordered list of named
//! [`Segment`]s. Segments are laid out back to back in program order;
//! [`Program::resolve_offsets`] freezes their absolute offsets and
//! [`Program::serialize`] flattens and encodes them.

pub mod layout;
mod report;
mod segment;

pub use layout::{ResolvedImmediate, resolve_self_width};
pub use report::{ProgramSummary, SegmentSummary};
pub use segment::Segment;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::codec::{self, Instruction};
use crate::config::AsmConfig;
use crate::error::{AsmError, AsmResult};
use crate::memory::{Array, MemoryAllocator, Variable, View};

pub(crate) const TRACE_TARGET: &str = "stackasm::program";

#[derive(Debug, Clone, Default)]
pub struct Program {
    memory: MemoryAllocator,
    segments: Vec<Segment>,
    index: FxHashMap<String, usize>,
    code: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &AsmConfig) -> Self {
        Self {
            memory: MemoryAllocator::with_config(config),
            ..Self::default()
        }
    }

    pub fn memory(&self) -> &MemoryAllocator {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryAllocator {
        &mut self.memory
    }

    pub fn alloc(&mut self, name: &str, element_size: u64, shape: Option<&[usize]>) -> AsmResult<View> {
        self.memory.alloc(name, element_size, shape)
    }

    pub fn alloc_var(&mut self, name: &str) -> AsmResult<Variable> {
        self.memory.alloc_var(name)
    }

    pub fn alloc_array(&mut self, name: &str, shape: &[usize]) -> AsmResult<Array> {
        self.memory.alloc_array(name, shape)
    }

    /// Create a segment at the end of program order.
    pub fn segment(&mut self, name: &str) -> AsmResult<&mut Segment> {
        if self.index.contains_key(name) {
            return Err(AsmError::DuplicateSegment(name.to_string()));
        }
        let idx = self.segments.len();
        self.segments.push(Segment::new(name, self.memory.registers()));
        self.index.insert(name.to_string(), idx);
        Ok(&mut self.segments[idx])
    }

    pub fn get(&self, name: &str) -> AsmResult<&Segment> {
        self.index
            .get(name)
            .map(|idx| &self.segments[*idx])
            .ok_or_else(|| AsmError::UnknownSegment(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> AsmResult<&mut Segment> {
        match self.index.get(name) {
            Some(idx) => Ok(&mut self.segments[*idx]),
            None => Err(AsmError::UnknownSegment(name.to_string())),
        }
    }

    /// Resolved offset of a placed segment.
    pub fn offset_of(&self, name: &str) -> AsmResult<u64> {
        self.get(name)?
            .offset()
            .ok_or_else(|| AsmError::UnresolvedOffset(name.to_string()))
    }

    /// Segments in program order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Place every segment at the running sum of the lengths before it.
    ///
    /// Appending to a placed segment that is not the last one leaves the
    /// offsets after it stale until this runs again.
    pub fn resolve_offsets(&mut self) {
        let mut offset = 0u64;
        for segment in self.segments.iter_mut() {
            segment.place_at(offset);
            debug!(
                target: TRACE_TARGET,
                segment = segment.name(),
                offset,
                len = segment.byte_len(),
                "program.place"
            );
            offset += segment.byte_len() as u64;
        }
    }

    /// Put a `dispatcher` segment in front of everything that jumps straight
    /// to `target`, then place all segments. Returns the target's offset.
    ///
    /// The jump literal sits before the segments it skips, so its value
    /// includes its own width: `2 + skipped + width` for the push opcode and
    /// `JUMP`.
    pub fn link_entry(&mut self, dispatcher: &str, target: &str) -> AsmResult<u64> {
        if self.index.contains_key(dispatcher) {
            return Err(AsmError::DuplicateSegment(dispatcher.to_string()));
        }
        let target_idx = *self
            .index
            .get(target)
            .ok_or_else(|| AsmError::UnknownSegment(target.to_string()))?;

        let skipped: usize = self.segments[..target_idx].iter().map(Segment::byte_len).sum();
        let entry = resolve_self_width(2 + skipped as u64);
        let mut head = Segment::new(dispatcher, self.memory.registers());
        head.push(entry.word())?;
        head.op("JUMP")?;
        debug!(
            target: TRACE_TARGET,
            dispatcher,
            to = target,
            skipped,
            entry = entry.value,
            "program.link_entry"
        );

        self.segments.insert(0, head);
        self.reindex();
        self.resolve_offsets();
        debug_assert_eq!(self.offset_of(target).ok(), Some(entry.value));
        Ok(entry.value)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (idx, segment) in self.segments.iter().enumerate() {
            self.index.insert(segment.name().to_string(), idx);
        }
    }

    /// Flatten all segments, in program order, into the program's code.
    pub fn link(&mut self) -> &[Instruction] {
        self.code = self
            .segments
            .iter()
            .flat_map(|s| s.instructions().iter().cloned())
            .collect();
        &self.code
    }

    /// The flattened code from the last [`Program::link`].
    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    /// Link and encode the whole program.
    pub fn serialize(&mut self) -> AsmResult<Vec<u8>> {
        self.link();
        let bytes = codec::encode(&self.code)?;
        debug!(
            target: TRACE_TARGET,
            segments = self.segments.len(),
            instructions = self.code.len(),
            bytes = bytes.len(),
            "program.serialize"
        );
        Ok(bytes)
    }

    pub fn to_hex(&mut self) -> AsmResult<String> {
        Ok(codec::to_hex(&self.serialize()?))
    }

    pub fn summary(&self) -> ProgramSummary {
        ProgramSummary::of(self)
    }
}

#[cfg(test)]
mod program_test;
