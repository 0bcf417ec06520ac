use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The dataset held no usable features
    #[error("No usable features in {0}")]
    EmptyDataset(String),
    #[error("Cannot read file")]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    GeoJson(#[from] geojson::Error),
}
