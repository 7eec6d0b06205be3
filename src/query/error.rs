use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid query config{}: {message}", display_suffix(.path.as_deref()))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("config path has no file name: {}", .path.display())]
    InvalidPath { path: PathBuf },
}

fn display_suffix(path: Option<&Path>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}
