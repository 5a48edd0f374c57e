use crate::errors::ExecutionError;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};
use std::io;
use std::io::Write;
use std::ops::ControlFlow;

/// Service routines selected by the 8-bit vector of the TRAP instruction.
#[repr(u8)]
#[derive(enumn::N, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrapVector {
    /// get character from keyboard, not echoed
    GetC = 0x20,
    /// output a character
    Out = 0x21,
    /// output a string of one character per word
    PutS = 0x22,
    /// get character from keyboard, echoed
    In = 0x23,
    /// output a string of two characters per word
    PutSp = 0x24,
    /// halt the program
    Halt = 0x25,
}

/// Runs the trap routine for `vector`.
///
/// `Continue` resumes execution with the next instruction, `Break(Ok)` halts and
/// `Break(Err)` faults. Unknown vectors are reported and skipped. R7 is left untouched.
pub fn dispatch(
    vector: u8,
    regs: &mut Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    let Some(trap_vector) = TrapVector::n(vector) else {
        log::warn!(
            "Trap vector {vector:#04X} at {:#06X} not implemented, continuing",
            regs.pc().as_binary().wrapping_sub(1)
        );
        return ControlFlow::Continue(());
    };
    match trap_vector {
        TrapVector::GetC => get_c(regs, mem),
        TrapVector::Out => out(regs, stdout),
        TrapVector::PutS => put_s(regs, mem, stdout),
        TrapVector::In => in_trap(regs, mem, stdout),
        TrapVector::PutSp => put_sp(regs, mem, stdout),
        TrapVector::Halt => halt(regs),
    }
}

fn read_character_from_keyboard(mem: &Memory) -> ControlFlow<Result<(), ExecutionError>, u8> {
    mem.take_key().map_or(
        ControlFlow::Break(Err(ExecutionError::KeyboardDisconnected)),
        |key| ControlFlow::Continue(low_byte(key)),
    )
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
/// Blocks until a key is available.
pub fn get_c(regs: &mut Registers, mem: &Memory) -> ControlFlow<Result<(), ExecutionError>> {
    let c = read_character_from_keyboard(mem)?;
    regs.set(0, from_binary(u16::from(c)));
    ControlFlow::Continue(())
}

/// IN: Print a prompt on the screen and read a single character echoed back from the keyboard.
///
/// Otherwise, like 0x20 GETC. R0 is only written once the echo went through.
pub fn in_trap(
    regs: &mut Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    write_bytes_out(b"Input: ", stdout)?;
    let c = read_character_from_keyboard(mem)?;
    write_bytes_out(&[c], stdout)?;
    regs.set(0, from_binary(u16::from(c)));
    ControlFlow::Continue(())
}

/// OUT: Write a character in R0[7:0] to the console display.
pub fn out(regs: &Registers, stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    write_bytes_out(&[low_byte(regs.get(0).as_binary())], stdout)
}

fn low_byte(word: u16) -> u8 {
    word.to_le_bytes()[0]
}

/// Collects the bytes of the string starting at the address in R0.
/// `handle_word` appends the characters of one word and returns `false` once the string ended.
/// Reading stops after one pass over the whole address space at the latest.
fn put(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
    handle_word: fn(u16, &mut Vec<u8>) -> bool,
) -> ControlFlow<Result<(), ExecutionError>> {
    let address = regs.get(0).as_binary();
    let mut s = Vec::with_capacity(120);
    for offset in 0..=u16::MAX {
        if !handle_word(mem.read(address.wrapping_add(offset)), &mut s) {
            break;
        }
    }
    write_bytes_out(&s, stdout)
}

fn put_one_char_per_u16(input: u16, append_to: &mut Vec<u8>) -> bool {
    if input == 0 {
        return false;
    }
    append_to.push(low_byte(input));
    true
}

fn put_two_chars_per_u16(input: u16, append_to: &mut Vec<u8>) -> bool {
    for c in input.to_le_bytes() {
        if c == 0 {
            return false;
        }
        append_to.push(c);
    }
    true
}

/// PUTS: print null-delimited string of one character per word from register 0's address.
pub fn put_s(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits [7:0] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates at the first 0x00 character.
pub fn put_sp(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_two_chars_per_u16)
}

/// HALT: End program execution.
pub fn halt(regs: &Registers) -> ControlFlow<Result<(), ExecutionError>> {
    log::info!(
        "Program halted at {:#06X}",
        regs.pc().as_binary().wrapping_sub(1)
    );
    ControlFlow::Break(Ok(()))
}

fn write_bytes_out(
    message: &[u8],
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    match stdout.write_all(message).and_then(|()| stdout.flush()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

fn wrap_io_error_in_cf(error: &io::Error) -> ControlFlow<Result<(), ExecutionError>, ()> {
    ControlFlow::Break(Err(ExecutionError::IOInputOutputError(error.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::test_helpers::{FailingWriter, FakeEmulator};
    use crate::hardware::registers::Register;
    use googletest::prelude::*;
    use yare::parameterized;

    #[gtest]
    pub fn test_get_c() {
        let mut emu = FakeEmulator::new(&[]);
        emu.add_stdin_input(b"ab");
        let (regs, mem, writer) = emu.get_parts();
        regs.set(7, from_binary(0x1234));
        let res = get_c(regs, mem);
        assert_that!(res, eq(&ControlFlow::Continue(())));
        expect_that!(regs.get(0), eq(from_binary(u16::from(b'a'))));
        expect_that!(regs.get(7), eq(from_binary(0x1234)));
        expect_that!(writer.get_string(), eq(""));
    }
    #[gtest]
    pub fn test_get_c_keyboard_closed() {
        let mut emu = FakeEmulator::new(&[]);
        let (regs, mem, _writer) = emu.get_parts();
        let res = get_c(regs, mem);
        assert_that!(
            res,
            eq(&ControlFlow::Break(Err(ExecutionError::KeyboardDisconnected)))
        );
    }
    #[gtest]
    pub fn test_get_c_takes_latched_key_first() {
        let mut emu = FakeEmulator::new(&[]);
        emu.add_stdin_input(b"xy");
        let (regs, mem, _writer) = emu.get_parts();
        expect_that!(mem.read(0xFE00), eq(0x8000));
        let res = get_c(regs, mem);
        assert!(res.is_continue());
        expect_that!(regs.get(0), eq(from_binary(u16::from(b'x'))));
        let res = get_c(regs, mem);
        assert!(res.is_continue());
        expect_that!(regs.get(0), eq(from_binary(u16::from(b'y'))));
    }
    #[gtest]
    pub fn test_put_s() {
        let data = [0xFFFF, u16::from(b'O'), u16::from(b'K'), 0x0000, u16::from(b'!')];
        let mut emu = FakeEmulator::new(&data);
        let (regs, mem, writer) = emu.get_parts();
        regs.set(0, from_binary(0x3001));
        let res = put_s(regs, mem, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("OK"));
    }
    #[gtest]
    pub fn test_put_sp() {
        let data = [
            0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0x6548u16, 0x6c6c, 0x206f, 0x6f57, 0x6c72,
            0x2164, 0x0000,
        ];
        let mut emu = FakeEmulator::new(&data);
        let (regs, mem, writer) = emu.get_parts();
        regs.set(0, from_binary(0x3005));
        let res = put_sp(regs, mem, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("Hello World!"));
    }
    #[gtest]
    pub fn test_put_sp_odd_length() {
        // "abc" with the high byte of the last word being the terminator
        let data = [0x6261u16, 0x0063, 0x6464];
        let mut emu = FakeEmulator::new(&data);
        let (regs, mem, writer) = emu.get_parts();
        regs.set(0, from_binary(0x3000));
        let res = put_sp(regs, mem, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("abc"));
    }
    #[gtest]
    pub fn test_put_sp_zero_low_byte_terminates() {
        let data = [0x6261u16, 0x6300, 0x0000];
        let mut emu = FakeEmulator::new(&data);
        let (regs, mem, writer) = emu.get_parts();
        regs.set(0, from_binary(0x3000));
        let res = put_sp(regs, mem, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("ab"));
    }
    #[gtest]
    pub fn test_in() {
        let mut emu = FakeEmulator::new(&[]);
        emu.add_stdin_input(b"abc");
        let (regs, mem, writer) = emu.get_parts();
        let res = in_trap(regs, mem, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("Input: a"));
        assert_that!(regs.get(0), eq(from_binary(u16::from(b'a'))));
    }
    #[gtest]
    pub fn test_in_echo_error_leaves_r0() {
        let mut emu = FakeEmulator::new(&[]);
        emu.add_stdin_input(b"q");
        let (regs, mem, _writer) = emu.get_parts();
        regs.set(0, from_binary(0x1234));
        // the prompt is written, the echo fails
        let mut writer = FailingWriter::new(1);
        let res = in_trap(regs, mem, &mut writer);
        assert_that!(
            res,
            eq(&ControlFlow::Break(Err(ExecutionError::IOInputOutputError(
                "broken pipe".to_string()
            ))))
        );
        expect_that!(regs.get(0), eq(from_binary(0x1234)));
        assert_eq!(writer.written(), b"Input: ");
    }
    #[gtest]
    pub fn test_in_prompt_error_keeps_key() {
        let mut emu = FakeEmulator::new(&[]);
        emu.add_stdin_input(b"q");
        let (regs, mem, _writer) = emu.get_parts();
        let res = in_trap(regs, mem, &mut FailingWriter::new(0));
        assert!(res.is_break());
        expect_that!(regs.get(0), eq(from_binary(0)));
        // nothing was read, the key is still there for the next GETC
        assert!(get_c(regs, mem).is_continue());
        expect_that!(regs.get(0), eq(from_binary(u16::from(b'q'))));
    }
    #[gtest]
    pub fn test_out() {
        let mut emu = FakeEmulator::new(&[]);
        let (regs, _mem, writer) = emu.get_parts();
        regs.set(0, Register::from_binary(0xFF00 | u16::from(b'k')));
        let res = out(regs, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("k"));
    }
    #[gtest]
    pub fn test_out_write_error() {
        let mut emu = FakeEmulator::new(&[]);
        let (regs, _mem, _writer) = emu.get_parts();
        let res = out(regs, &mut FailingWriter::new(0));
        let execution_error = res.break_value().unwrap().unwrap_err();
        assert_that!(
            execution_error.to_string(),
            eq("Error during reading Stdin or writing program output to Stdout: broken pipe")
        );
    }
    #[gtest]
    pub fn test_halt() {
        let regs = Registers::new();
        assert_that!(halt(&regs), eq(&ControlFlow::Break(Ok(()))));
    }

    #[parameterized(
        below_table = { 0x00 },
        before_getc = { 0x1F },
        after_halt = { 0x26 },
        highest = { 0xFF },
    )]
    fn test_unknown_vector_continues(vector: u8) {
        let mut emu = FakeEmulator::new(&[]);
        let (regs, mem, writer) = emu.get_parts();
        regs.set(7, from_binary(0x4242));
        let before = regs.clone();
        let res = dispatch(vector, regs, mem, writer);
        assert!(res.is_continue());
        assert_eq!(*regs, before);
        assert_eq!(writer.get_string(), "");
    }
}
