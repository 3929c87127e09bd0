use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Plugin manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid plugin manifest at {}: {reason}", path.display())]
    InvalidManifest { path: PathBuf, reason: String },

    #[error(
        "Duplicate plugin name '{name}': first at {}, second at {}",
        first.display(),
        second.display()
    )]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Plugin '{name}' already exists at {}", path.display())]
    AlreadyExists { name: String, path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
