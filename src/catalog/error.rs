use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("patch directory {} is not readable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("patch id {id:?} cannot name a file")]
    UnsafeId { id: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
