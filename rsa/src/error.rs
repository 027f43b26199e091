use std::{error::Error, fmt::Display};

/// Error taxonomy of the crate.
///
/// `Decryption` and `Verification` deliberately carry no detail: every
/// failed check on those paths maps to the same value with the same
/// message, so callers (and their logs) cannot distinguish which internal
/// check tripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsaError {
    /// A caller-supplied parameter is out of range or inconsistent.
    InvalidArgument(String),

    /// A value does not fit the requested size (message too long for the
    /// key, integer too wide for the requested byte length).
    Overflow(String),

    /// Ciphertext rejected. Intentionally unspecific.
    Decryption,

    /// Signature rejected. Intentionally unspecific.
    Verification,

    /// Malformed DER or PEM key material.
    Codec(String),

    /// Key generation aborted through a [`CancelFlag`](crate::CancelFlag).
    Cancelled,
}

impl Display for RsaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsaError::InvalidArgument(msg) => f.write_str(msg),
            RsaError::Overflow(msg) => f.write_str(msg),
            RsaError::Decryption => f.write_str("decryption failed"),
            RsaError::Verification => f.write_str("verification failed"),
            RsaError::Codec(msg) => f.write_fmt(format_args!("invalid key encoding: {msg}")),
            RsaError::Cancelled => f.write_str("operation cancelled"),
        }
    }
}

impl Error for RsaError {}
