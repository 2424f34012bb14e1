#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// `add`/`update` called without an id.
    MissingId,
    DuplicateId(String),
    NotFound(String),
    InvalidGeometry { id: String, reason: &'static str },
}

impl std::fmt::Display for MarkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerError::MissingId => write!(f, "marker id is missing"),
            MarkerError::DuplicateId(id) => write!(f, "marker `{id}` already exists"),
            MarkerError::NotFound(id) => write!(f, "marker `{id}` not found"),
            MarkerError::InvalidGeometry { id, reason } => {
                write!(f, "invalid geometry for marker `{id}`: {reason}")
            }
        }
    }
}

impl std::error::Error for MarkerError {}
