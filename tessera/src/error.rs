//! Error types used by the crate.

use tessera_types::TesseraTypesError;
use tessera_wire::TesseraWireError;
use thiserror::Error;

/// Tessera error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TesseraError {
    /// Geometry operation failed.
    #[error(transparent)]
    Geometry(#[from] TesseraTypesError),
    /// Encoding or decoding failed.
    #[error(transparent)]
    Wire(#[from] TesseraWireError),
}

impl TesseraError {
    /// Returns true if the operation was stopped by an interrupt request rather than by bad input.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            Self::Geometry(TesseraTypesError::Interrupted)
                | Self::Wire(TesseraWireError::Geometry(TesseraTypesError::Interrupted))
        )
    }
}
