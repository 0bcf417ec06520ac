use thiserror::Error;

/// An error that can occur when rendering a map page.
#[derive(Error, Debug)]
pub enum Error {
    /// A legend label that cannot be drawn
    #[error("Invalid legend label: {0}")]
    InvalidLegend(String),
    /// Generic Input/Output error while writing a page
    #[error("impossible to write page")]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Layers(#[from] crate::layers::error::Error),
}
