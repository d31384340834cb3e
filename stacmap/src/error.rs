use std::io;
use std::path::PathBuf;

/// A convenience [`Result`] for the stacmap crate.
pub type StacmapResult<T> = Result<T, StacmapError>;

#[derive(thiserror::Error, Debug)]
pub enum StacmapError {
    #[error("The --config option cannot be combined with a catalog URL argument '{0}'")]
    ConfigAndUrlError(String),

    #[error("Unable to bind to {1}: {0}")]
    BindingError(io::Error, String),

    #[error("Unable to load config file {1}: {0}")]
    ConfigLoadError(io::Error, PathBuf),

    #[error("Unable to parse config file {1}: {0}")]
    ConfigParseError(subst::yaml::Error, PathBuf),

    #[error("Unable to write config file {1}: {0}")]
    ConfigWriteError(io::Error, PathBuf),

    #[error("Unable to serialize config: {0}")]
    ConfigSerializeError(#[from] serde_yaml::Error),

    #[error("Invalid catalog URL '{1}': {0}")]
    CatalogUrlError(url::ParseError, String),

    #[error("Invalid bounding box '{0}', expected 'west,south,east,north'")]
    BboxError(String),

    #[error(transparent)]
    CatalogError(#[from] stacmap_core::catalog::CatalogError),

    #[error(transparent)]
    WebError(#[from] actix_web::Error),

    #[error(transparent)]
    IoError(#[from] io::Error),
}
