use crate::emulator::Emulator;
use crate::hardware::memory::{Memory, PROGRAM_SECTION_START};
use crate::hardware::registers::Registers;
use std::io;
use std::io::Write;
use std::sync::mpsc;

pub struct StringWriter {
    vec: Vec<u8>,
}
impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        self.vec.write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}
impl StringWriter {
    pub fn new() -> Self {
        let vec = Vec::<u8>::with_capacity(120);
        Self { vec }
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.clone()).unwrap()
    }
}

/// Output sink accepting a number of writes and failing on every write after that.
pub struct FailingWriter {
    remaining_writes: usize,
    data: Vec<u8>,
}
impl FailingWriter {
    pub const fn new(successful_writes: usize) -> Self {
        Self {
            remaining_writes: successful_writes,
            data: Vec::new(),
        }
    }
    /// Bytes accepted before the writer started failing.
    pub fn written(&self) -> &[u8] {
        &self.data
    }
}
impl Write for FailingWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        if self.remaining_writes == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        self.remaining_writes -= 1;
        self.data.extend_from_slice(data);
        Ok(data.len())
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}

/// Emulator writing into a [`StringWriter`] with keyboard input given upfront.
pub struct FakeEmulator<'a> {
    pub inner: Emulator<StringWriter>,
    stdin_data: &'a [u8],
}
impl<'a> FakeEmulator<'a> {
    pub fn new(program_no_header: &[u16]) -> Self {
        let mut program = Vec::with_capacity(program_no_header.len() + 1);
        program.push(PROGRAM_SECTION_START);
        program.extend_from_slice(program_no_header);

        let (_sender, receiver) = mpsc::channel::<u16>();
        let mut emu = Emulator::new(receiver, StringWriter::new());
        emu.load_program(program.as_slice()).unwrap();
        Self {
            inner: emu,
            stdin_data: b"",
        }
    }
    pub fn add_stdin_input(&'_ mut self, input: &'a [u8]) -> &mut Self {
        self.stdin_data = input;
        self
    }
    /// Makes the stdin input available as keys, after it is consumed the keyboard is closed.
    pub fn connect_keyboard(&mut self) {
        let (sender, receiver) = mpsc::channel();
        for b in self.stdin_data {
            sender.send(u16::from(*b)).unwrap();
        }
        self.inner.memory.set_keyboard(receiver);
    }
    pub fn get_parts(&mut self) -> (&mut Registers, &mut Memory, &mut StringWriter) {
        self.connect_keyboard();
        (
            &mut self.inner.registers,
            &mut self.inner.memory,
            &mut self.inner.output,
        )
    }
}
