use std::error::Error;

/// Errors while loading a program image.
#[derive(displaydoc::Display, Debug, Clone, PartialEq, Eq)]
pub enum LoadProgramError {
    /// Program too long, got {actual_instructions} u16 instructions while limit is {maximum_instructions}
    ProgramTooLong {
        actual_instructions: usize,
        maximum_instructions: u16,
    },
    /// Program is missing valid .ORIG header
    ProgramMissingOrigHeader,
    /// Program has an odd number of bytes: {0}, only whole u16 words can be loaded
    OddByteCount(usize),
    /// Program is not loaded at {expected_address:#06X} but {actual_address:#06X}
    ProgramLoadedAtWrongAddress {
        actual_address: u16,
        expected_address: u16,
    },
    /// Program could not be read: {0}
    ProgramNotLoadable(String),
}
impl Error for LoadProgramError {}

/// Reasons for execution to stop with a fault.
#[derive(displaydoc::Display, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Opcode {opcode:#06b} at address {address:#06X} is reserved and cannot be executed
    UnimplementedOpcode { opcode: u8, address: u16 },
    /// Keyboard input was closed while waiting for a key
    KeyboardDisconnected,
    /// Error during reading Stdin or writing program output to Stdout: {0}
    IOInputOutputError(String),
}
impl Error for ExecutionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    fn test_messages() {
        expect_that!(
            LoadProgramError::ProgramLoadedAtWrongAddress {
                actual_address: 0x4000,
                expected_address: 0x3000
            }
            .to_string(),
            eq("Program is not loaded at 0x3000 but 0x4000")
        );
        expect_that!(
            ExecutionError::UnimplementedOpcode {
                opcode: 0b1000,
                address: 0x3002
            }
            .to_string(),
            eq("Opcode 0b1000 at address 0x3002 is reserved and cannot be executed")
        );
    }
}
