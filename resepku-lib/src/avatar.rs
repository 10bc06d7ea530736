//! Avatar file validation and data URI encoding.

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose};
use getset::Getters;
use image::ImageFormat;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::profile_page::{Error, Result};

/// Largest avatar accepted by default: 5 MiB
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A file the user picked as their new avatar.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct AvatarFile {
    path: PathBuf,
    /// Media type as declared for the file, e.g. `image/png`
    media_type: String,
    /// Size in bytes
    size: u64,
}

impl AvatarFile {
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
            size,
        }
    }

    /// Describe a file on disk. The media type is declared from its extension.
    pub async fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let size = tokio::fs::metadata(&path).await?.len();
        let media_type = declared_media_type(&path);

        Ok(Self {
            path,
            media_type,
            size,
        })
    }

    /// Check the declared media type and the size, in that order.
    pub fn validate(&self, max_bytes: u64) -> Result<()> {
        if !self.media_type.starts_with("image/") {
            return Err(Error::InvalidFileType {
                media_type: self.media_type.clone(),
            });
        }

        if self.size > max_bytes {
            return Err(Error::FileTooLarge {
                size: self.size,
                limit: max_bytes,
            });
        }

        Ok(())
    }

    /// Read the file and encode it as a self-contained data URI. At most `max_bytes` are
    /// accepted, whatever size the file had when it was described.
    pub async fn read_data_uri(&self, max_bytes: u64) -> Result<String> {
        let file = tokio::fs::File::open(&self.path).await?;
        let mut bytes = Vec::new();
        file.take(max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .await?;

        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if size > max_bytes {
            return Err(Error::FileTooLarge {
                size,
                limit: max_bytes,
            });
        }

        debug!("Read {} bytes from {}", bytes.len(), self.path.display());

        Ok(encode_data_uri(&self.media_type, &bytes))
    }
}

/// The media type implied by a file's extension.
pub fn declared_media_type(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MEDIA_TYPE.to_string())
}

pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{media_type};base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Split a base64 data URI into its media type and decoded payload.
pub fn decode_data_uri(uri: &str) -> Option<(&str, Vec<u8>)> {
    let (media_type, payload) = uri.strip_prefix("data:")?.split_once(";base64,")?;
    let bytes = general_purpose::STANDARD.decode(payload).ok()?;

    Some((media_type, bytes))
}

/// Whether `uri` is a base64 data URI declaring an image type whose payload looks like an
/// image format we know.
pub fn is_image_data_uri(uri: &str) -> bool {
    decode_data_uri(uri).is_some_and(|(media_type, bytes)| {
        media_type.starts_with("image/") && image::guess_format(&bytes).is_ok()
    })
}


#[cfg(test)]
mod test {
    use std::{io::Write, path::Path};

    use tempfile::NamedTempFile;

    use super::{AvatarFile, MAX_AVATAR_BYTES, declared_media_type, fixtures::PNG};
    use crate::{avatar::decode_data_uri, profile_page::Error};

    #[test]
    fn test_declared_media_type_from_extension() {
        assert_eq!(declared_media_type(Path::new("me.png")), "image/png");
        assert_eq!(declared_media_type(Path::new("me.JPG")), "image/jpeg");
        assert_eq!(
            declared_media_type(Path::new("notes.txt")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_validate_rejects_non_image_first() {
        // Oversized as well, but the type check wins
        let file = AvatarFile::new("cv.pdf", "application/pdf", MAX_AVATAR_BYTES + 1);

        assert!(matches!(
            file.validate(MAX_AVATAR_BYTES),
            Err(Error::InvalidFileType { .. })
        ));
    }

    #[test]
    fn test_validate_size_boundary() {
        let at_limit = AvatarFile::new("a.png", "image/png", MAX_AVATAR_BYTES);
        let over_limit = AvatarFile::new("b.png", "image/png", MAX_AVATAR_BYTES + 1);

        assert!(at_limit.validate(MAX_AVATAR_BYTES).is_ok());
        assert!(matches!(
            over_limit.validate(MAX_AVATAR_BYTES),
            Err(Error::FileTooLarge {
                size,
                limit: MAX_AVATAR_BYTES
            }) if size == MAX_AVATAR_BYTES + 1
        ));
    }

    #[tokio::test]
    async fn test_from_path_reads_data_uri() {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.write_all(PNG).unwrap();

        let file = AvatarFile::from_path(tmp.path()).await.unwrap();
        assert_eq!(file.media_type(), "image/png");
        assert_eq!(*file.size(), PNG.len() as u64);

        let uri = file.read_data_uri(MAX_AVATAR_BYTES).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let (media_type, bytes) = decode_data_uri(&uri).unwrap();
        assert_eq!(media_type, "image/png");
        assert_eq!(bytes, PNG);
    }

    #[tokio::test]
    async fn test_read_enforces_limit_on_actual_bytes() {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.write_all(PNG).unwrap();

        // Described while still small, then grown before the read
        let file = AvatarFile::from_path(tmp.path()).await.unwrap();
        tmp.write_all(&[0; 64]).unwrap();
        tmp.flush().unwrap();

        let limit = *file.size();
        assert!(file.validate(limit).is_ok());
        assert!(matches!(
            file.read_data_uri(limit).await,
            Err(Error::FileTooLarge { limit: l, .. }) if l == limit
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();
        drop(tmp);

        assert!(matches!(
            AvatarFile::from_path(path).await,
            Err(Error::Io(_))
        ));
    }
}
