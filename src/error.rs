use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("failed to access `{}`: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("{}:{line}: {message}", path.display())]
  Parse {
    path: PathBuf,
    line: usize,
    message: String,
  },
  #[error("mesh has no edges, the mesh width is undefined")]
  EmptyEdgeSet,
  #[error("sparse factorization failed: {0}")]
  Factorization(String),
  #[error("failed to export VTK: {0}")]
  Vtk(String),
}

pub type Result<T> = std::result::Result<T, Error>;
