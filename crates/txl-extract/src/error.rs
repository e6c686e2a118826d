/// Why a payload could not be decoded structurally.
///
/// Never returned to callers of the extractor; it selects the fallback pass
/// and is logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedPayload {
    #[error("invalid JSON at line {line}, column {column}: {reason}")]
    InvalidJson {
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("top-level value is {0}, expected an object")]
    NotAnObject(&'static str),
}

impl From<serde_json::Error> for MalformedPayload {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson {
            line: err.line(),
            column: err.column(),
            reason: err.to_string(),
        }
    }
}
