use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] labelproof_core::Error),

    #[error("File does not exist: {}", path.display())]
    DieLineFileNotFound { path: PathBuf },

    #[error("Cannot find Dieline in uploaded file")]
    DielineNotFound,

    #[error("Offset action produced no paths")]
    EmptyOffsetResult,

    #[error("Action '{action}' not found in '{action_set}' action set")]
    OffsetActionUnavailable { action_set: String, action: String },

    #[error("Cannot open document {}: {message}", path.display())]
    OpenDocument { path: PathBuf, message: String },

    #[error("unknown {kind} handle #{id}")]
    UnknownHandle { kind: &'static str, id: u32 },

    #[error("layer `{layer}` is locked")]
    LayerLocked { layer: String },

    #[error("drawing surface error: {message}")]
    Surface { message: String },
}

impl Error {
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    /// Whether this error aborts the proof it was raised in. Only a missing legend asset is
    /// reported without aborting.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Core(labelproof_core::Error::LegendNotFound { .. })
        )
    }
}
