use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Map profile or image dimensions cannot produce a pixel-to-meter ratio.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Flight path start and end coincide, so it has no direction.
    #[error("flight path start and end are the same point")]
    DegeneratePath,
}
