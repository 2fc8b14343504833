use thiserror::Error;

/// Borrowed view of a syntactically valid address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address<'a> {
    pub local: &'a str,
    pub domain: &'a str,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid email syntax")]
    Syntax,
    #[error("expected exactly one '@', found {parts} parts")]
    Split { parts: usize },
}
