use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpyLogError {
    /// A compute event whose name is not shaped like `Actor@id.key`.
    #[error("malformed event name '{name}': expected <actor>@<id>.<key>")]
    MalformedEventName { name: String },

    #[error("invalid logger config: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for SpyLogError {
    fn from(err: serde_json::Error) -> Self {
        SpyLogError::InvalidConfig(err.to_string())
    }
}
