//! The execution engine: fetch, decode and execute LC-3 instructions until the program
//! halts or faults.
pub mod instruction;
pub mod opcodes;
#[cfg(test)]
pub(crate) mod test_helpers;
pub mod trap_routines;

use crate::emulator::instruction::{Instruction, Opcode};
use crate::errors::{ExecutionError, LoadProgramError};
use crate::hardware::keyboard::{self, KeyboardInput};
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use crate::loader;
use std::io;
use std::io::{Stdout, Write};
use std::ops::ControlFlow;
use std::path::Path;

/// Whether the emulator can execute further instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    Running,
    /// The program executed the HALT trap.
    Halted,
    /// The program executed an instruction that cannot be executed or I/O failed.
    Faulted(ExecutionError),
}

/// The public facing emulator used to run LC-3 programs.
///
/// Owns its registers and memory, so independent instances do not interfere.
pub struct Emulator<W: Write = Stdout> {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    state: ExecutionState,
    output: W,
}

/// Creates an emulator with the program image at `path` loaded,
/// reading keys from stdin and writing to stdout.
///
/// # Errors
/// - see [`Emulator::load_program`]
/// - file cannot be read or has an odd number of bytes
pub fn from_program(path: impl AsRef<Path>) -> Result<Emulator, LoadProgramError> {
    let program = loader::read_program_file(path)?;
    from_program_words(&program)
}

/// Creates an emulator with `program` loaded, reading keys from stdin and writing to stdout.
///
/// # Errors
/// - see [`Emulator::load_program`]
pub fn from_program_words(program: &[u16]) -> Result<Emulator, LoadProgramError> {
    let mut emu = Emulator::new(keyboard::spawn_stdin_keyboard(), io::stdout());
    emu.load_program(program)?;
    Ok(emu)
}

impl<W: Write> Emulator<W> {
    /// Constructor method, registers and memory zeroed, PC at `0x3000`.
    pub fn new(keyboard: impl KeyboardInput + 'static, output: W) -> Self {
        Self {
            memory: Memory::new(keyboard),
            registers: Registers::new(),
            state: ExecutionState::Running,
            output,
        }
    }

    /// Loads a program starting with its `.ORIG` header into memory
    /// and points the PC to its first instruction.
    ///
    /// # Errors
    /// - Program is missing valid .ORIG header (because it is shorter than one `u16` instruction
    /// - Program not loaded at address `0x3000`
    /// - Program too long
    pub fn load_program(&mut self, program: &[u16]) -> Result<(), LoadProgramError> {
        let (origin, rest) = loader::split_orig_header(program)?;
        self.memory.load_program(rest)?;
        log::trace!("{:?}", self.memory);
        self.registers.set_pc(origin);
        self.state = ExecutionState::Running;
        Ok(())
    }

    /// Executes instructions until the program halts or faults.
    ///
    /// # Errors
    /// - the reason the execution faulted
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        loop {
            match self.step() {
                ExecutionState::Running => {}
                ExecutionState::Halted => return Ok(()),
                ExecutionState::Faulted(e) => return Err(e.clone()),
            }
        }
    }

    /// Executes exactly one instruction if the emulator is running, does nothing otherwise.
    pub fn step(&mut self) -> &ExecutionState {
        if self.state != ExecutionState::Running {
            return &self.state;
        }
        let address = self.registers.pc().as_binary();
        let i = Instruction::from(self.memory.read(address));
        self.registers.inc_pc();
        log::trace!("{address:#06X}: {i:?}");
        let r = &mut self.registers;
        match i.opcode() {
            Opcode::Add => opcodes::add(i, r),
            Opcode::And => opcodes::and(i, r),
            Opcode::Not => opcodes::not(i, r),
            Opcode::Br => opcodes::br(i, r),
            Opcode::Jmp => opcodes::jmp_or_ret(i, r),
            Opcode::Jsr => opcodes::jsr(i, r),
            Opcode::Ld => opcodes::ld(i, r, &self.memory),
            Opcode::Ldi => opcodes::ldi(i, r, &self.memory),
            Opcode::Ldr => opcodes::ldr(i, r, &self.memory),
            Opcode::Lea => opcodes::lea(i, r),
            Opcode::St => opcodes::st(i, r, &mut self.memory),
            Opcode::Sti => opcodes::sti(i, r, &mut self.memory),
            Opcode::Str => opcodes::str(i, r, &mut self.memory),
            Opcode::Trap => {
                match trap_routines::dispatch(i.trap_vector(), r, &self.memory, &mut self.output) {
                    ControlFlow::Continue(()) => {}
                    ControlFlow::Break(Ok(())) => self.state = ExecutionState::Halted,
                    ControlFlow::Break(Err(e)) => self.fault(e),
                }
            }
            Opcode::Rti | Opcode::Res => self.fault(ExecutionError::UnimplementedOpcode {
                opcode: i.op_code(),
                address,
            }),
        }
        &self.state
    }

    fn fault(&mut self, error: ExecutionError) {
        log::error!("Execution faulted: {error}");
        self.state = ExecutionState::Faulted(error);
    }

    /// Resets registers and condition flag so the loaded program can be executed again.
    pub fn reset_registers(&mut self) {
        self.registers = Registers::new();
        self.state = ExecutionState::Running;
    }

    #[must_use]
    pub const fn state(&self) -> &ExecutionState {
        &self.state
    }
    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }
}
