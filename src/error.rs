use thiserror::Error;

/// Errors produced while decoding a raw header buffer.
///
/// A corrupted medical-recording header must never be masked, so decode
/// failures are always surfaced to the caller and carry enough context to
/// point at the offending field.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("header declares {expected} bytes but the buffer holds only {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("field `{field}` holds {value:?} where a numeric value is required")]
    MalformedField { field: &'static str, value: String },

    #[error("invalid channel count: {0}")]
    InvalidChannelCount(i64),
}

/// Errors produced while rendering a header back into bytes.
///
/// Over-length text is truncated rather than rejected (the format itself is
/// lossy by design there); these errors cover the cases where truncation
/// would silently change a value or destroy a mandatory token.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("numeric value for field `{field}` does not fit in {width} bytes")]
    FieldTooLong { field: &'static str, width: usize },

    #[error("truncating field `{field}` would destroy the `{token}` token")]
    StructuralViolation {
        field: &'static str,
        token: &'static str,
    },
}

/// Errors produced by mediated mutation through [`HeaderModel`](crate::model::HeaderModel).
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("unknown header field `{0}`")]
    UnknownField(String),

    #[error("field `{0}` is derived and cannot be set directly")]
    ImmutableField(&'static str),

    #[error("field `{field}` expects a {expected} value")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("value for field `{field}` is {len} bytes long, the field offers {width}")]
    ValueTooWide {
        field: &'static str,
        len: usize,
        width: usize,
    },

    #[error("field `{field}` takes {expected} values, {found} were provided")]
    ArrayLengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("channel {channel}: {reason}")]
    InvalidRange { channel: usize, reason: String },

    #[error("channel {channel} does not exist, the header has {count} channels")]
    ChannelOutOfBounds { channel: usize, count: usize },

    #[error("invalid channel count: {0}")]
    InvalidChannelCount(usize),

    #[error("invalid value for field `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}
