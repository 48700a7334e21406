pub mod codec;
pub mod config;
pub mod error;
pub mod isa;
pub mod memory;
pub mod word;

// Segments, call emulation and layout resolution
pub mod program;

pub use codec::Instruction;
pub use config::AsmConfig;
pub use error::{AsmError, AsmResult};
pub use memory::{Array, Index, MemoryAllocator, Operand, Values, Variable, View};
pub use program::{Program, Segment};
pub use word::Word;
