//! The machine state: register file, memory and the keyboard device behind it.
pub mod keyboard;
pub mod memory;
pub mod registers;
