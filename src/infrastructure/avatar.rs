use std::fs;
use std::path::{Path, PathBuf};

use image::ImageError;
use uuid::Uuid;

use crate::domain::error::{Error, Result};

/// Longest edge of a stored avatar.
const MAX_AVATAR_EDGE: u32 = 256;

/// Ingests uploaded avatar images into the static image directory.
///
/// Uploads are decoded, bounded to 256x256 preserving aspect ratio
/// (never upscaled) and written under a random filename. Replaced
/// avatars are not cleaned up.
#[derive(Clone)]
pub struct AvatarStore {
    dir: PathBuf,
}

impl AvatarStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the filename the resized copy was stored under.
    pub fn save(&self, bytes: &[u8], original_name: &str) -> Result<String> {
        let img = image::load_from_memory(bytes).map_err(|_| Error::UnsupportedImageFormat)?;
        let resized = img.thumbnail(MAX_AVATAR_EDGE, MAX_AVATAR_EDGE);

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_ascii_lowercase();
        let filename = format!("{}.{}", Uuid::new_v4().simple(), ext);

        resized.save(self.dir.join(&filename)).map_err(|e| match e {
            ImageError::IoError(io) => Error::Io(io),
            _ => Error::UnsupportedImageFormat,
        })?;
        Ok(filename)
    }
}
