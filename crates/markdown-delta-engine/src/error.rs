use thiserror::Error;

/// Errors surfaced by the engine. Conversion itself never fails; only
/// reading a tree from its serialized form can.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid document tree: {0}")]
    InvalidTree(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
