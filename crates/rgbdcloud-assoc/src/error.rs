/// Error types for the association module.
#[derive(Debug, thiserror::Error)]
pub enum AssocError {
    /// Error reading or writing file
    #[error("error reading or writing file")]
    Io(#[from] std::io::Error),

    /// A token that must be numeric could not be parsed.
    #[error("line {line}: cannot parse '{token}': {reason}")]
    ParseError {
        /// 1-based line number in the source text.
        line: usize,
        /// The offending token.
        token: String,
        /// Why the token was rejected.
        reason: String,
    },

    /// A correlated line does not have the expected number of tokens.
    #[error("line {line}: expected {expected} tokens, found {found}")]
    MalformedLine {
        /// 1-based line number in the source text.
        line: usize,
        /// Number of tokens a line must have.
        expected: usize,
        /// Number of tokens found.
        found: usize,
    },

    /// A triple refers to a stamp that is not part of the given record set.
    #[error("stamp {0} is not present in the record set")]
    UnknownStamp(f64),
}
