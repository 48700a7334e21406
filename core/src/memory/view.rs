use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{AsmError, AsmResult};
use crate::word::Word;

use super::Values;

/// A named scalar at a fixed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    addr: u64,
    element_size: u64,
}

impl Variable {
    pub fn new(name: impl Into<String>, addr: u64, element_size: u64) -> Self {
        Self {
            name: name.into(),
            addr,
            element_size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn addr(&self) -> u64 {
        self.addr
    }

    pub fn addr_word(&self) -> Word {
        Word::from(self.addr)
    }

    #[inline]
    pub fn element_size(&self) -> u64 {
        self.element_size
    }

    #[inline]
    pub fn footprint(&self) -> u64 {
        self.element_size
    }
}

/// A strided multi-dimensional view over consecutive elements.
///
/// Strides are counted in elements. Views created by indexing share the
/// parent's address space; nothing is copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    name: String,
    addr: u64,
    element_size: u64,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

/// One entry of an index list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    At(usize),
    /// Slice bounds; negative values count from the end of the dimension.
    Range {
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    },
}

impl Index {
    pub const ALL: Index = Index::Range {
        start: None,
        stop: None,
        step: None,
    };

    pub fn stepped(start: Option<isize>, stop: Option<isize>, step: isize) -> Index {
        Index::Range {
            start,
            stop,
            step: Some(step),
        }
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index::At(value)
    }
}

impl From<Range<usize>> for Index {
    fn from(range: Range<usize>) -> Self {
        Index::Range {
            start: Some(range.start as isize),
            stop: Some(range.end as isize),
            step: None,
        }
    }
}

impl From<RangeFrom<usize>> for Index {
    fn from(range: RangeFrom<usize>) -> Self {
        Index::Range {
            start: Some(range.start as isize),
            stop: None,
            step: None,
        }
    }
}

impl From<RangeTo<usize>> for Index {
    fn from(range: RangeTo<usize>) -> Self {
        Index::Range {
            start: None,
            stop: Some(range.end as isize),
            step: None,
        }
    }
}

impl From<RangeFull> for Index {
    fn from(_: RangeFull) -> Self {
        Index::ALL
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: &Option<isize>| b.map(|v| v.to_string()).unwrap_or_default();
        match self {
            Index::At(i) => write!(f, "{}", i),
            Index::Range { start, stop, step: None } => write!(f, "{}:{}", bound(start), bound(stop)),
            Index::Range { start, stop, step } => {
                write!(f, "{}:{}:{}", bound(start), bound(stop), bound(step))
            }
        }
    }
}

/// Result of an allocation or of indexing an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Scalar(Variable),
    Array(Array),
}

impl View {
    pub fn name(&self) -> &str {
        match self {
            View::Scalar(var) => var.name(),
            View::Array(arr) => arr.name(),
        }
    }

    pub fn addr(&self) -> u64 {
        match self {
            View::Scalar(var) => var.addr(),
            View::Array(arr) => arr.addr(),
        }
    }

    pub fn footprint(&self) -> u64 {
        match self {
            View::Scalar(var) => var.footprint(),
            View::Array(arr) => arr.footprint(),
        }
    }

    pub fn checked_footprint(&self) -> Option<u64> {
        match self {
            View::Scalar(var) => Some(var.footprint()),
            View::Array(arr) => arr.checked_footprint(),
        }
    }

    pub fn into_scalar(self) -> AsmResult<Variable> {
        match self {
            View::Scalar(var) => Ok(var),
            View::Array(arr) => Err(AsmError::ShapeMismatch {
                name: arr.name,
                expected: arr.shape,
            }),
        }
    }

    pub fn into_array(self) -> AsmResult<Array> {
        match self {
            View::Array(arr) => Ok(arr),
            View::Scalar(var) => Err(AsmError::ShapeMismatch {
                name: var.name,
                expected: Vec::new(),
            }),
        }
    }
}

/// Row-major strides: the last dimension is contiguous.
pub fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for dim in (0..shape.len().saturating_sub(1)).rev() {
        strides[dim] = strides[dim + 1] * shape[dim + 1];
    }
    strides
}

fn clamp_bound(bound: Option<isize>, default: usize, extent: usize) -> usize {
    match bound {
        None => default,
        Some(b) if b < 0 => (extent as isize + b).max(0) as usize,
        Some(b) => (b as usize).min(extent),
    }
}

impl Array {
    /// Row-major array over `shape`.
    pub fn new(name: impl Into<String>, addr: u64, element_size: u64, shape: Vec<usize>) -> Self {
        let strides = row_major_strides(&shape);
        Self::from_parts(name.into(), addr, element_size, shape, strides)
    }

    /// Array with explicit per-dimension strides, in elements.
    pub fn with_strides(
        name: impl Into<String>,
        addr: u64,
        element_size: u64,
        shape: Vec<usize>,
        strides: Vec<usize>,
    ) -> AsmResult<Self> {
        let name = name.into();
        if strides.len() != shape.len() {
            return Err(AsmError::StrideMismatch {
                name,
                ndims: shape.len(),
                strides: strides.len(),
            });
        }
        Ok(Self::from_parts(name, addr, element_size, shape, strides))
    }

    fn from_parts(name: String, addr: u64, element_size: u64, shape: Vec<usize>, strides: Vec<usize>) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            name,
            addr,
            element_size,
            shape,
            strides,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn addr(&self) -> u64 {
        self.addr
    }

    pub fn addr_word(&self) -> Word {
        Word::from(self.addr)
    }

    #[inline]
    pub fn element_size(&self) -> u64 {
        self.element_size
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().fold(1usize, |acc, extent| acc.saturating_mul(*extent))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes covered by the view's elements, saturating at `u64::MAX`.
    pub fn footprint(&self) -> u64 {
        self.checked_footprint().unwrap_or(u64::MAX)
    }

    /// Bytes covered by the view's elements, `None` on overflow.
    pub fn checked_footprint(&self) -> Option<u64> {
        self.shape
            .iter()
            .try_fold(self.element_size, |acc, extent| acc.checked_mul(*extent as u64))
    }

    /// Index with a list no longer than the dimensionality. Trailing
    /// dimensions are kept whole; an integer for every dimension yields a
    /// scalar.
    pub fn index(&self, indices: &[Index]) -> AsmResult<View> {
        if indices.len() > self.ndims() {
            return Err(AsmError::TooManyIndices {
                name: self.name.clone(),
                given: indices.len(),
                ndims: self.ndims(),
            });
        }

        let mut offset = 0usize;
        let mut shape = Vec::new();
        let mut strides = Vec::new();
        for dim in 0..self.ndims() {
            let extent = self.shape[dim];
            let stride = self.strides[dim];
            match indices.get(dim).copied().unwrap_or(Index::ALL) {
                Index::At(i) => {
                    if i >= extent {
                        return Err(AsmError::IndexOutOfBounds {
                            name: self.name.clone(),
                            dim,
                            index: i,
                            extent,
                        });
                    }
                    offset += i * stride;
                }
                Index::Range { start, stop, step } => {
                    let step = step.unwrap_or(1);
                    if step <= 0 {
                        return Err(AsmError::InvalidSlice {
                            name: self.name.clone(),
                            dim,
                            step,
                        });
                    }
                    let step = step as usize;
                    let start = clamp_bound(start, 0, extent);
                    let stop = clamp_bound(stop, extent, extent);
                    let len = if stop > start { (stop - start).div_ceil(step) } else { 0 };
                    offset += start * stride;
                    shape.push(len);
                    strides.push(stride * step);
                }
            }
        }

        let rendered: Vec<String> = indices.iter().map(Index::to_string).collect();
        let name = format!("{}[{}]", self.name, rendered.join(","));
        let addr = self.addr + offset as u64 * self.element_size;
        if shape.is_empty() {
            Ok(View::Scalar(Variable::new(name, addr, self.element_size)))
        } else {
            Ok(View::Array(Array::from_parts(name, addr, self.element_size, shape, strides)))
        }
    }

    /// Index along the first dimension only.
    pub fn get(&self, i: usize) -> AsmResult<View> {
        self.index(&[Index::At(i)])
    }

    /// Element at a full index.
    pub fn at(&self, indices: &[usize]) -> AsmResult<Variable> {
        let indices: Vec<Index> = indices.iter().copied().map(Index::At).collect();
        self.index(&indices)?.into_scalar()
    }

    /// Sub-range of the first dimension.
    pub fn slice(&self, range: impl Into<Index>) -> AsmResult<Array> {
        self.index(&[range.into()])?.into_array()
    }

    /// Element views in row-major order.
    pub fn elements(&self) -> Vec<Variable> {
        let mut out = Vec::with_capacity(self.len());
        if self.is_empty() {
            return out;
        }
        let mut idx = vec![0usize; self.ndims()];
        loop {
            let offset: usize = idx.iter().zip(&self.strides).map(|(i, s)| i * s).sum();
            let rendered: Vec<String> = idx.iter().map(usize::to_string).collect();
            out.push(Variable::new(
                format!("{}[{}]", self.name, rendered.join(",")),
                self.addr + offset as u64 * self.element_size,
                self.element_size,
            ));

            // odometer step, last dimension fastest
            let mut dim = self.ndims();
            loop {
                if dim == 0 {
                    return out;
                }
                dim -= 1;
                idx[dim] += 1;
                if idx[dim] < self.shape[dim] {
                    break;
                }
                idx[dim] = 0;
            }
        }
    }

    /// Pair every element with its value. The value tree must match the
    /// array's shape exactly.
    pub fn zip(&self, values: &Values) -> AsmResult<Vec<(Variable, Word)>> {
        if !values.matches_shape(&self.shape) {
            return Err(AsmError::ShapeMismatch {
                name: self.name.clone(),
                expected: self.shape.clone(),
            });
        }
        Ok(self
            .elements()
            .into_iter()
            .zip(values.flatten().into_iter().cloned())
            .collect())
    }
}
