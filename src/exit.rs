// src/exit.rs
//! Standardized process exit codes for `servicemap`.

use std::process::Termination;

use crate::error::ServiceMapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ServiceMapExit {
    /// Analysis completed and the report was written.
    Success = 0,
    /// Generic error (IO, config, report write).
    Error = 1,
    /// The input tree cannot be analyzed (not a directory, no files, too many files).
    InvalidInput = 2,
}

impl ServiceMapExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Maps an application error to an exit code, looking through `anyhow` context.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ServiceMapError>() {
            Some(e) if e.is_invalid_input() => Self::InvalidInput,
            _ => Self::Error,
        }
    }
}

impl Termination for ServiceMapExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
