use std::path::{Component, Path, PathBuf};

use crate::content::source::StaticSource;
use crate::content::{Content, ContentError};
use crate::http::mime;
use crate::http::request::ServerInfo;

const INDEX_FILE: &str = "index.html";

/// Serves files below the server root.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl StaticSource for FileSystem {
    fn read(&self, server: &ServerInfo, path: &str) -> Result<Content, ContentError> {
        let relative = confine(path).ok_or_else(|| ContentError::NotFound(path.to_string()))?;

        let mut full = server.root.join(relative);
        if full.is_dir() {
            full.push(INDEX_FILE);
        }

        match std::fs::read(&full) {
            Ok(bytes) => {
                tracing::trace!(file = %full.display(), len = bytes.len(), "Read static file");
                Ok(Content::ok(mime::from_path(&full), bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ContentError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps only plain path segments; anything escaping the root is rejected.
fn confine(path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(segment) => out.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}
