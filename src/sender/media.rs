use std::fmt;
use std::path::Path;

use crate::errors::{AppError, AppResult};

/// Platform media category. The numeric codes are fixed by the files API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaTypeClass {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaTypeClass {
    /// Classify by file extension; anything unrecognised is a document.
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" => MediaTypeClass::Image,
            "mp4" => MediaTypeClass::Video,
            "mp3" | "wav" => MediaTypeClass::Audio,
            _ => MediaTypeClass::Document,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            MediaTypeClass::Image => 1,
            MediaTypeClass::Video => 2,
            MediaTypeClass::Audio => 3,
            MediaTypeClass::Document => 4,
        }
    }
}

impl fmt::Display for MediaTypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaTypeClass::Image => "image",
            MediaTypeClass::Video => "video",
            MediaTypeClass::Audio => "audio",
            MediaTypeClass::Document => "document",
        };
        write!(f, "{}", name)
    }
}

/// Which upload/envelope shape a send uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaVariant {
    /// Generic file message: original filename, octet-stream part,
    /// `{"file_info": ..}` media element.
    File,
    /// Image message: `image.<ext>` filename, image/jpeg part,
    /// `{"type": "image", "content": ..}` media element.
    Image,
}

impl MediaVariant {
    /// The image shape is used only when it was asked for and the file
    /// really classifies as an image.
    pub fn select(class: MediaTypeClass, image_requested: bool) -> Self {
        if image_requested && class == MediaTypeClass::Image {
            MediaVariant::Image
        } else {
            MediaVariant::File
        }
    }
}

/// A local file read fully into memory.
#[derive(Clone)]
pub struct MediaFile {
    path: String,
    bytes: Vec<u8>,
    extension: String,
}

impl MediaFile {
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            path,
            bytes,
            extension,
        }
    }

    /// Read the whole file. The handle is closed before this returns.
    pub async fn load(path: &str) -> AppResult<Self> {
        if !Path::new(path).is_file() {
            return Err(AppError::file_not_found(path));
        }

        let bytes = tokio::fs::read(path).await?;
        log::debug!("Read {} bytes from {}", bytes.len(), path);
        Ok(Self::new(path, bytes))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase extension without the leading dot; empty when there is none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn file_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string())
    }

    pub fn class(&self) -> MediaTypeClass {
        MediaTypeClass::from_extension(&self.extension)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("path", &self.path)
            .field("len", &self.bytes.len())
            .field("extension", &self.extension)
            .finish()
    }
}

pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
