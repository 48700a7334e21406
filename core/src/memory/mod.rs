//! Memory model
//!
//! A one-shot bump allocator over the machine's word-addressed memory. The
//! machine never frees memory, so neither does the allocator: the allocation
//! pointer only moves forward and every name is bound exactly once.

mod operand;
mod view;

pub use operand::{Operand, Values};
pub use view::{Array, Index, Variable, View, row_major_strides};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::config::AsmConfig;
use crate::error::{AsmError, AsmResult};

const TRACE_TARGET: &str = "stackasm::memory";

/// Geometry of the wide-integer register file addressed by slot indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    /// Address of slot 0.
    pub base: u64,
    /// 64-bit limbs per register.
    pub limbs: u64,
}

impl Default for RegisterFile {
    fn default() -> Self {
        AsmConfig::default().registers()
    }
}

impl RegisterFile {
    #[inline]
    pub fn width_bytes(&self) -> u64 {
        8 * self.limbs
    }

    /// Slot index of a variable: `(addr - base) / (8 * limbs)`.
    ///
    /// The address must sit at or above `base` on a register boundary.
    pub fn slot(&self, var: &Variable) -> AsmResult<u64> {
        let width = self.width_bytes();
        match var.addr().checked_sub(self.base) {
            Some(rel) if rel % width == 0 => Ok(rel / width),
            _ => Err(AsmError::MisalignedSlot {
                name: var.name().to_string(),
                addr: var.addr(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryAllocator {
    ap: u64,
    base: u64,
    element_size: u64,
    registers: RegisterFile,
    views: Vec<View>,
    by_name: FxHashMap<String, usize>,
}

impl Default for MemoryAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAllocator {
    pub fn new() -> Self {
        Self::with_config(&AsmConfig::default())
    }

    pub fn with_config(config: &AsmConfig) -> Self {
        Self {
            ap: config.memory_base,
            base: config.memory_base,
            element_size: config.element_size,
            registers: config.registers(),
            views: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Allocate `name`. A non-empty `shape` allocates an array covering
    /// `element_size * product(shape)` bytes, otherwise a scalar of
    /// `element_size` bytes.
    pub fn alloc(&mut self, name: &str, element_size: u64, shape: Option<&[usize]>) -> AsmResult<View> {
        if self.by_name.contains_key(name) {
            return Err(AsmError::DuplicateAllocation(name.to_string()));
        }
        let view = match shape {
            Some(shape) if !shape.is_empty() => View::Array(Array::new(name, self.ap, element_size, shape.to_vec())),
            _ => View::Scalar(Variable::new(name, self.ap, element_size)),
        };
        let bytes = view.checked_footprint();
        let next = bytes.and_then(|bytes| self.ap.checked_add(bytes));
        let (Some(bytes), Some(next)) = (bytes, next) else {
            return Err(AsmError::AllocationOverflow(name.to_string()));
        };
        trace!(target: TRACE_TARGET, name, addr = self.ap, bytes, "memory.alloc");
        self.ap = next;
        self.by_name.insert(name.to_string(), self.views.len());
        self.views.push(view.clone());
        Ok(view)
    }

    pub fn alloc_var(&mut self, name: &str) -> AsmResult<Variable> {
        self.alloc(name, self.element_size, None)?.into_scalar()
    }

    pub fn alloc_array(&mut self, name: &str, shape: &[usize]) -> AsmResult<Array> {
        match self.alloc(name, self.element_size, Some(shape))? {
            View::Array(arr) => Ok(arr),
            // An empty shape degrades to a scalar; expose it as a 1-element array.
            View::Scalar(var) => Ok(Array::new(var.name(), var.addr(), var.element_size(), vec![1])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&View> {
        self.by_name.get(name).map(|idx| &self.views[*idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Allocations in the order they were made.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Current allocation pointer.
    #[inline]
    pub fn allocated(&self) -> u64 {
        self.ap
    }

    /// Bytes handed out since the base.
    #[inline]
    pub fn used(&self) -> u64 {
        self.ap - self.base
    }

    #[inline]
    pub fn registers(&self) -> RegisterFile {
        self.registers
    }

    pub fn slot(&self, var: &Variable) -> AsmResult<u64> {
        self.registers.slot(var)
    }
}

#[cfg(test)]
mod memory_test;
