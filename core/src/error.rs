use std::fmt;

/// Errors raised while building, encoding or decoding a program.
///
/// Every variant is terminal for the operation that produced it. Instructions
/// already appended to a segment before the failure are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// No descriptor matches a byte code or a mnemonic.
    UnknownOpcode(String),
    /// The input ended inside an immediate operand.
    TruncatedInput { offset: usize, needed: usize, available: usize },
    /// An immediate does not fit the fixed width of its opcode.
    ImmediateTooLarge { opcode: &'static str, width: usize, len: usize },
    /// A value needs more bytes than the widest push form carries.
    ValueTooLarge { len: usize, max: usize },
    DuplicateAllocation(String),
    IndexOutOfBounds { name: String, dim: usize, index: usize, extent: usize },
    TooManyIndices { name: String, given: usize, ndims: usize },
    InvalidSlice { name: String, dim: usize, step: isize },
    /// Explicit strides do not give one entry per dimension.
    StrideMismatch { name: String, ndims: usize, strides: usize },
    /// The allocation would run past the end of the address space.
    AllocationOverflow(String),
    /// An omitted operand appears to the left of a supplied one.
    InvalidOperandOrdering { position: usize },
    ShapeMismatch { name: String, expected: Vec<usize> },
    StackIndexOutOfRange { op: &'static str, index: usize },
    InvalidHex(String),
    /// The address cannot be expressed as a register-file slot.
    MisalignedSlot { name: String, addr: u64 },
    /// A call was emitted into a segment that has not been placed yet.
    UnresolvedOffset(String),
    DuplicateSegment(String),
    UnknownSegment(String),
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::UnknownOpcode(what) => write!(f, "unknown opcode {}", what),
            AsmError::TruncatedInput {
                offset,
                needed,
                available,
            } => write!(
                f,
                "truncated input at byte {}: immediate needs {} bytes, {} available",
                offset, needed, available
            ),
            AsmError::ImmediateTooLarge { opcode, width, len } => write!(
                f,
                "immediate of {} is {} bytes, opcode carries {}",
                opcode, len, width
            ),
            AsmError::ValueTooLarge { len, max } => {
                write!(f, "push value too big: {} bytes, max is {}", len, max)
            }
            AsmError::DuplicateAllocation(name) => write!(f, "variable {} is already allocated", name),
            AsmError::IndexOutOfBounds {
                name,
                dim,
                index,
                extent,
            } => write!(
                f,
                "index out of bounds for {} dim {}: passed {} for size {}",
                name, dim, index, extent
            ),
            AsmError::TooManyIndices { name, given, ndims } => write!(
                f,
                "too many indices for array {}: passed {}, expected at most {}",
                name, given, ndims
            ),
            AsmError::InvalidSlice { name, dim, step } => {
                write!(f, "invalid slice step {} for {} dim {}", step, name, dim)
            }
            AsmError::StrideMismatch { name, ndims, strides } => write!(
                f,
                "array {} has {} dims but {} strides",
                name, ndims, strides
            ),
            AsmError::AllocationOverflow(name) => {
                write!(f, "allocating {} overflows the address space", name)
            }
            AsmError::InvalidOperandOrdering { position } => write!(
                f,
                "unordered operands: argument {} is omitted but a later one is supplied",
                position
            ),
            AsmError::ShapeMismatch { name, expected } => {
                write!(f, "wrong value shape for array {}: expected {:?}", name, expected)
            }
            AsmError::StackIndexOutOfRange { op, index } => {
                write!(f, "{} index out of bounds: must be 1..16, passed {}", op, index)
            }
            AsmError::InvalidHex(detail) => write!(f, "invalid hex: {}", detail),
            AsmError::MisalignedSlot { name, addr } => write!(
                f,
                "variable {} at {:#x} is not aligned to a register slot",
                name, addr
            ),
            AsmError::UnresolvedOffset(segment) => {
                write!(f, "segment {} has no resolved offset", segment)
            }
            AsmError::DuplicateSegment(name) => write!(f, "segment {} already exists", name),
            AsmError::UnknownSegment(name) => write!(f, "no segment named {}", name),
        }
    }
}

impl std::error::Error for AsmError {}

pub type AsmResult<T> = Result<T, AsmError>;
