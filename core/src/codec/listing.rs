use std::fmt::{self, Write};

use super::Instruction;

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.opcode().immediate_width;
        if width == 0 {
            f.write_str(self.name())
        } else {
            write!(f, "{} 0x{}", self.name(), self.immediate().to_hex_padded(width))
        }
    }
}

/// Render a disassembly listing with byte offsets starting at `base`.
/// Jump targets are flagged with `►`.
pub fn listing(instructions: &[Instruction], base: usize) -> String {
    let mut out = String::new();
    let mut offset = base;
    for instr in instructions {
        let marker = if instr.name() == "JUMPDEST" { "►" } else { " " };
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{:04x} {} {}", offset, marker, instr);
        offset += instr.encoded_len();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_hex;

    #[test]
    fn listing_shows_offsets_and_targets() {
        let instructions = decode_hex("6003565b00").unwrap();
        let text = listing(&instructions, 0x10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "0010   PUSH1 0x03");
        assert_eq!(lines[1], "0012   JUMP");
        assert_eq!(lines[2], "0013 ► JUMPDEST");
        assert_eq!(lines[3], "0014   STOP");
    }
}
