use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Required field is empty: {0}")]
    MissingRequired(&'static str),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Payload cannot be encoded: {0}")]
    Encode(String),

    #[error("Image error: {0}")]
    Image(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed store file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("History list is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("No history entry at index {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No history entry with id {0}")]
    NotFound(Uuid),
}
