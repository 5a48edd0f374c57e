use crate::errors::LoadProgramError;
use crate::hardware::keyboard::KeyboardInput;
use std::cell::Cell;
use std::fmt::{Debug, Formatter};

pub const PROGRAM_SECTION_START: u16 = 0x3000;
pub const PROGRAM_SECTION_END: u16 = 0xFDFF;
pub const PROGRAM_SECTION_MAX_INSTRUCTION_COUNT: u16 =
    PROGRAM_SECTION_END - PROGRAM_SECTION_START + 1;
/// Every `u16` is a valid address.
const MEMORY_SIZE_U16: usize = 1 << 16;

/// An abstraction for the LC-3 memory including application but excluding registers.
///
/// Reading the keyboard status register polls the keyboard. A pending key is latched into a
/// single-slot mailbox (status and data register) and stays there until the data register is
/// read, no further key is taken from the keyboard until then.
pub struct Memory {
    /// Index equals memory address
    data: Box<[u16]>,
    instruction_count: u16,
    keyboard: Box<dyn KeyboardInput>,
    keyboard_status_register: Cell<u16>,
    keyboard_data_register: Cell<u16>,
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let slice = self.program_slice();
        write!(
            f,
            "Instructions: {:?}, Program section contents: {slice:?}",
            slice.len()
        )
    }
}
/// Memory regions mapped to IO functionality.
#[repr(u16)]
#[derive(enumn::N, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemoryMappedIOLocations {
    /// Keyboard Status Register
    Kbsr = 0xFE00,
    /// Keyboard Data Register
    Kbdr = 0xFE02,
}

impl Memory {
    const KEYBOARD_STATUS_REGISTER_SET: u16 = 1 << 15;
    const KEYBOARD_STATUS_REGISTER_UNSET: u16 = 0;

    pub fn new(keyboard: impl KeyboardInput + 'static) -> Self {
        Self {
            data: vec![0x0u16; MEMORY_SIZE_U16].into_boxed_slice(),
            instruction_count: 0,
            keyboard: Box::new(keyboard),
            keyboard_status_register: Cell::new(Self::KEYBOARD_STATUS_REGISTER_UNSET),
            keyboard_data_register: Cell::new(0),
        }
    }
    #[cfg(test)]
    pub(crate) fn set_keyboard(&mut self, keyboard: impl KeyboardInput + 'static) {
        self.keyboard = Box::new(keyboard);
    }

    /// Reads the word at `address`.
    /// Reading a memory mapped IO location triggers the device side effect.
    #[must_use]
    pub fn read(&self, address: u16) -> u16 {
        MemoryMappedIOLocations::n(address).map_or_else(
            || self.data[usize::from(address)],
            |mapped_io_loc| match mapped_io_loc {
                MemoryMappedIOLocations::Kbsr => self.read_keyboard_status(),
                MemoryMappedIOLocations::Kbdr => self.read_keyboard_data(),
            },
        )
    }

    /// Stores `value` at `address`.
    /// Writing a memory mapped IO location sets the device register.
    pub fn write(&mut self, address: u16, value: u16) {
        match MemoryMappedIOLocations::n(address) {
            Some(MemoryMappedIOLocations::Kbsr) => self.keyboard_status_register.set(value),
            Some(MemoryMappedIOLocations::Kbdr) => self.keyboard_data_register.set(value),
            None => self.data[usize::from(address)] = value,
        }
    }

    fn key_latched(&self) -> bool {
        self.keyboard_status_register.get() & Self::KEYBOARD_STATUS_REGISTER_SET != 0
    }

    fn read_keyboard_status(&self) -> u16 {
        if !self.key_latched()
            && let Some(key) = self.keyboard.poll_key()
        {
            self.keyboard_status_register
                .set(Self::KEYBOARD_STATUS_REGISTER_SET);
            self.keyboard_data_register.set(key & 0xFF);
        }
        self.keyboard_status_register.get()
    }

    fn read_keyboard_data(&self) -> u16 {
        self.keyboard_status_register
            .set(Self::KEYBOARD_STATUS_REGISTER_UNSET);
        self.keyboard_data_register.replace(0)
    }

    /// Takes the next key for the GETC and IN trap routines.
    ///
    /// A key already latched by polling the status register is handed out first,
    /// otherwise this blocks until the keyboard produces one.
    /// Returns `None` if the keyboard can never produce another key.
    pub fn take_key(&self) -> Option<u16> {
        if self.key_latched() {
            Some(self.read_keyboard_data())
        } else {
            self.keyboard.wait_key().map(|key| key & 0xFF)
        }
    }

    /// Loads a program without an `.ORIG` header into the memory section
    /// starting from address `PROGRAM_SECTION_START`.
    ///
    /// # Errors
    /// - Program too long
    pub fn load_program(&mut self, data: &[u16]) -> Result<(), LoadProgramError> {
        let instruction_count = u16::try_from(data.len())
            .ok()
            .filter(|count| *count <= PROGRAM_SECTION_MAX_INSTRUCTION_COUNT)
            .ok_or(LoadProgramError::ProgramTooLong {
                actual_instructions: data.len(),
                maximum_instructions: PROGRAM_SECTION_MAX_INSTRUCTION_COUNT,
            })?;
        self.instruction_count = instruction_count;
        let program_slice = &mut self.data[usize::from(PROGRAM_SECTION_START)
            ..usize::from(PROGRAM_SECTION_START + self.instruction_count)];
        program_slice.copy_from_slice(data);
        log::debug!(
            "loaded {} words at {PROGRAM_SECTION_START:#06X}",
            self.instruction_count
        );
        Ok(())
    }
    #[must_use]
    pub const fn program_end(&self) -> u16 {
        PROGRAM_SECTION_START + self.instruction_count
    }
    #[must_use]
    pub fn program_slice(&self) -> &[u16] {
        &self.data[usize::from(PROGRAM_SECTION_START)..usize::from(self.program_end())]
    }
}
