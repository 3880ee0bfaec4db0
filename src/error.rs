pub type Result<T, E = GribError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum GribError {
    /// The byte stream ended before the requested bits could be read. Fatal
    /// for the current record; callers resynchronize from the message length.
    #[error("UnexpectedEndOfStream(bit {0})")]
    UnexpectedEndOfStream(usize),

    #[error("BitWidthOverflow({0})")]
    BitWidthOverflow(usize),

    #[error("UnsupportedTemplate({0})")]
    UnsupportedTemplate(u16),

    #[error("ParseError({0})")]
    ParseError(String),

    #[error("DecodeError({0})")]
    DecodeError(String),
}
