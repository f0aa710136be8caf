//! Saving a selected wallpaper to disk.
//!
//! Files are named `ai_wallpaper_<prompt-prefix>_<timestamp>.jpeg`, where the
//! prefix is the first 20 characters of the prompt with whitespace and
//! filename-hostile characters replaced by `_`.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub const FILENAME_PREFIX: &str = "ai_wallpaper";
pub const FILENAME_EXTENSION: &str = "jpeg";
/// Number of prompt characters kept in the filename.
pub const PROMPT_PREFIX_CHARS: usize = 20;

#[derive(Debug)]
pub enum DownloadError {
    /// `download` was called with no image open in the viewer.
    NothingSelected,
    Io(io::Error),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::NothingSelected => write!(f, "No image is selected"),
            DownloadError::Io(err) => write!(f, "Failed to save image: {}", err),
        }
    }
}

impl Error for DownloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DownloadError::Io(err) => Some(err),
            DownloadError::NothingSelected => None,
        }
    }
}

impl From<io::Error> for DownloadError {
    fn from(err: io::Error) -> Self {
        DownloadError::Io(err)
    }
}

/// First [`PROMPT_PREFIX_CHARS`] characters of `prompt`, made safe for a filename.
pub fn sanitize_prompt_prefix(prompt: &str) -> String {
    prompt
        .chars()
        .take(PROMPT_PREFIX_CHARS)
        .map(|c| {
            if c.is_whitespace()
                || c.is_control()
                || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// ```
/// use ai_wallpaper::download::download_filename;
///
/// assert_eq!(
///     download_filename("sunset over mountains", 1700000000000),
///     "ai_wallpaper_sunset_over_mountain_1700000000000.jpeg"
/// );
/// ```
pub fn download_filename(prompt: &str, timestamp_millis: i64) -> String {
    format!(
        "{}_{}_{}.{}",
        FILENAME_PREFIX,
        sanitize_prompt_prefix(prompt),
        timestamp_millis,
        FILENAME_EXTENSION
    )
}

/// Write `bytes` to `dir/filename`, creating `dir` if needed.
pub async fn save_image(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
