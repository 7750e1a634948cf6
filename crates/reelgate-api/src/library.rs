use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use reelgate_types::media::video_extension;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("invalid video name")]
    InvalidName,

    #[error("video not found")]
    NotFound,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The server-side directory videos are listed and streamed from.
///
/// Names handed to [`VideoLibrary::open`] must be a single path component,
/// so a request can never escape the directory.
pub struct VideoLibrary {
    dir: PathBuf,
}

impl VideoLibrary {
    pub fn new(dir: PathBuf) -> Self {
        info!("Video directory: {}", dir.display());
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the playable files in the directory, in enumeration order.
    pub async fn list(&self) -> io::Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if video_extension(&name).is_none() {
                continue;
            }
            // Follows symlinks; a dangling link is simply skipped.
            match fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => names.push(name),
                _ => debug!("Skipping non-file entry {}", name),
            }
        }

        Ok(names)
    }

    /// Map a requested name to its path inside the directory.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, LibraryError> {
        if !is_plain_file_name(name) {
            return Err(LibraryError::InvalidName);
        }
        if video_extension(name).is_none() {
            return Err(LibraryError::NotFound);
        }
        Ok(self.dir.join(name))
    }

    /// Open a video for reading. Returns the file and its length in bytes.
    pub async fn open(&self, name: &str) -> Result<(fs::File, u64), LibraryError> {
        let path = self.resolve(name)?;

        let file = fs::File::open(&path).await.map_err(not_found_or_io)?;
        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(LibraryError::NotFound);
        }

        Ok((file, meta.len()))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn not_found_or_io(err: io::Error) -> LibraryError {
    if err.kind() == io::ErrorKind::NotFound {
        LibraryError::NotFound
    } else {
        LibraryError::Io(err)
    }
}
