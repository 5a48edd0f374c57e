//! # LC-3 Interpreter.
//!
//! `lc3-vm` interprets programs for the LC-3, a 16-bit teaching architecture
//! with 8 general purpose registers and 16 opcodes.
//! Usage starts with loading a program via `emulator::from_program` or `Emulator::load_program`.
//!
//!  # Example
//! ```
//! use lc3_vm::emulator::{Emulator, ExecutionState};
//! use std::sync::mpsc;
//!
//! let (_keys, keyboard) = mpsc::channel::<u16>();
//! let mut emu = Emulator::new(keyboard, Vec::new());
//! // .ORIG x3000; ADD R0, R0, #7; HALT
//! emu.load_program(&[0x3000, 0x1027, 0xF025]).unwrap();
//! emu.execute().unwrap();
//! assert_eq!(emu.registers().get(0).as_decimal(), 7);
//! assert_eq!(emu.state(), &ExecutionState::Halted);
//! ```
//! # Errors
//! - Program is missing valid .ORIG header (because it is shorter than one `u16` instruction
//! - Program not loaded at address `0x3000`
//! - Program too long
//! - Execution of a reserved opcode (RTI, RES)

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod loader;
pub(crate) mod numbers;
