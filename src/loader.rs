//! This module provides the `ProgramLoader` struct, responsible for loading bytecode programs
//! from files and strings.

use crate::analyzer::analyze;
use crate::encoder::decode;
use crate::types::{Program, TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// `ProgramLoader` is a utility struct for loading bytecode programs.
///
/// Loading decodes the whole program before anything can run. Analyzer findings are logged
/// as warnings and never reject a program.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a program from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the bytecode file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and decoded.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::DecodeError)` if the content is not valid bytecode.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|source| TuringMachineError::FileError {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), bytes = content.len(), "read program file");
        Self::load_program_from_string(&content)
    }

    /// Loads a program from the provided bytecode text.
    ///
    /// # Arguments
    ///
    /// * `content` - A string slice containing the bytecode.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the content is successfully decoded.
    /// * `Err(TuringMachineError::ValidationError)` if the content exceeds `MAX_PROGRAM_SIZE`.
    /// * `Err(TuringMachineError::DecodeError)` if the content is not valid bytecode.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        if content.len() > MAX_PROGRAM_SIZE {
            return Err(TuringMachineError::ValidationError(format!(
                "Program is {} bytes, the limit is {} bytes",
                content.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        let program = decode(content)?;

        for finding in analyze(&program) {
            warn!("{}", finding);
        }

        debug!(transitions = program.len(), "loaded program");
        Ok(program)
    }
}
