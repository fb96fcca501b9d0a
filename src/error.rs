use core::fmt;

use thiserror::Error;

/// Result type used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
///
/// The codec never panics on malformed input; every failure is reported
/// through this enum and also recorded in the originating object's
/// last-error slot (see [`Errnum`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The named field does not exist in the bound template.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// Byte-granular access targeted a field that is not byte aligned.
    #[error("field not byte aligned: {0}")]
    NotByteAligned(&'static str),

    /// A required field has not been set.
    #[error("required field missing: {0}")]
    RequiredFieldMissing(&'static str),

    /// A value or byte string does not fit the field's declared width.
    #[error("fixed length field invalid: {0}")]
    FixedLengthFieldInvalid(&'static str),

    /// Two templates share no fields, or shared fields disagree in width.
    #[error("templates not identical")]
    NotIdentical,

    /// The field is unset or lies beyond the populated region.
    #[error("data not available: {0}")]
    DataNotAvailable(String),

    /// The input buffer ends before a required field is reached.
    #[error("incomplete record")]
    IncompleteRecord,

    /// Invalid caller-supplied argument.
    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),

    /// Internal invariant violation (e.g. a malformed template in a
    /// release build).
    #[error("internal error: {0}")]
    InternalError(&'static str),

    /// An IPMI command completed with a non-zero completion code.
    #[error("ipmi completion code: {code:#04x}")]
    CompletionCode {
        /// Raw completion code returned by the BMC.
        code: u8,
    },

    /// Unsupported protocol feature (e.g. a non-linear linearization).
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}

impl Error {
    /// The field-less code corresponding to this error.
    pub fn errnum(&self) -> Errnum {
        match self {
            Self::FieldNotFound(_) => Errnum::FieldNotFound,
            Self::NotByteAligned(_) => Errnum::NotByteAligned,
            Self::RequiredFieldMissing(_) => Errnum::RequiredFieldMissing,
            Self::FixedLengthFieldInvalid(_) => Errnum::FixedLengthFieldInvalid,
            Self::NotIdentical => Errnum::NotIdentical,
            Self::DataNotAvailable(_) => Errnum::DataNotAvailable,
            Self::IncompleteRecord => Errnum::IncompleteRecord,
            Self::InvalidParameters(_) => Errnum::InvalidParameters,
            Self::InternalError(_) => Errnum::InternalError,
            Self::CompletionCode { .. } => Errnum::CompletionCode,
            Self::Unsupported(_) => Errnum::Unsupported,
        }
    }
}

/// Last-error code retained per [`Obj`](crate::Obj), errno-style.
///
/// Every fallible object operation stores its outcome here before
/// returning, so callers holding only the object can still inspect the
/// most recent failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errnum {
    /// The most recent operation succeeded.
    Success,
    /// See [`Error::FieldNotFound`].
    FieldNotFound,
    /// See [`Error::NotByteAligned`].
    NotByteAligned,
    /// See [`Error::RequiredFieldMissing`].
    RequiredFieldMissing,
    /// See [`Error::FixedLengthFieldInvalid`].
    FixedLengthFieldInvalid,
    /// See [`Error::NotIdentical`].
    NotIdentical,
    /// See [`Error::DataNotAvailable`].
    DataNotAvailable,
    /// See [`Error::IncompleteRecord`].
    IncompleteRecord,
    /// See [`Error::InvalidParameters`].
    InvalidParameters,
    /// See [`Error::InternalError`].
    InternalError,
    /// See [`Error::CompletionCode`].
    CompletionCode,
    /// See [`Error::Unsupported`].
    Unsupported,
}

impl Errnum {
    /// Human-readable description of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::FieldNotFound => "field not found",
            Self::NotByteAligned => "field not byte aligned",
            Self::RequiredFieldMissing => "required field missing",
            Self::FixedLengthFieldInvalid => "fixed length field invalid",
            Self::NotIdentical => "templates not identical",
            Self::DataNotAvailable => "data not available",
            Self::IncompleteRecord => "incomplete record",
            Self::InvalidParameters => "invalid parameters",
            Self::InternalError => "internal error",
            Self::CompletionCode => "non-zero completion code",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Errnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
