//! Assembler configuration.
//!
//! Only the memory layout is configurable: where allocation starts, where
//! the wide-integer register file begins, how many 64-bit limbs one register
//! holds, and the default element size of allocations.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::memory::RegisterFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsmConfig {
    /// Initial value of the allocation pointer.
    pub memory_base: u64,
    /// Address mapped to register slot 0.
    pub register_base: u64,
    /// 64-bit limbs per register.
    pub register_limbs: u64,
    /// Element size in bytes used by `alloc_var` / `alloc_array`.
    pub element_size: u64,
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            memory_base: 0,
            register_base: 0,
            register_limbs: 4,
            element_size: 32,
        }
    }
}

impl AsmConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AsmConfig = toml::from_str(text).context("failed to parse assembler config as TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: AsmConfig = serde_json::from_str(text).context("failed to parse assembler config as JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("failed to serialize assembler config")
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.register_limbs > 0, "register_limbs must be positive");
        ensure!(self.element_size > 0, "element_size must be positive");
        ensure!(
            self.memory_base >= self.register_base,
            "memory_base {:#x} lies below register_base {:#x}",
            self.memory_base,
            self.register_base
        );
        Ok(())
    }

    pub fn registers(&self) -> RegisterFile {
        RegisterFile {
            base: self.register_base,
            limbs: self.register_limbs,
        }
    }
}
