//! Reading LC-3 object files: big-endian 16-bit words, the first being the `.ORIG` address.
use crate::errors::LoadProgramError;
use crate::hardware::memory::PROGRAM_SECTION_START;
use std::fs;
use std::path::Path;

/// Reads the program image at `path` into words, the `.ORIG` header included.
///
/// # Errors
/// - file cannot be read
/// - file has an odd number of bytes
pub fn read_program_file(path: impl AsRef<Path>) -> Result<Vec<u16>, LoadProgramError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        LoadProgramError::ProgramNotLoadable(format!("{}: {e}", path.display()))
    })?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    words_from_bytes(&bytes)
}

/// Converts big-endian bytes into words.
///
/// # Errors
/// - odd number of bytes
pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<u16>, LoadProgramError> {
    let chunks = bytes.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        return Err(LoadProgramError::OddByteCount(bytes.len()));
    }
    Ok(chunks
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

/// Splits the `.ORIG` header from the program.
///
/// # Errors
/// - program is empty
/// - origin is not `0x3000`
pub fn split_orig_header(program: &[u16]) -> Result<(u16, &[u16]), LoadProgramError> {
    let Some((&origin, rest)) = program.split_first() else {
        return Err(LoadProgramError::ProgramMissingOrigHeader);
    };
    if origin != PROGRAM_SECTION_START {
        return Err(LoadProgramError::ProgramLoadedAtWrongAddress {
            actual_address: origin,
            expected_address: PROGRAM_SECTION_START,
        });
    }
    Ok((origin, rest))
}
