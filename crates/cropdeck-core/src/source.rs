//! User-selected input files.

/// Value for the host file picker's `accept` attribute.
///
/// `.json` is accepted by the picker for compatibility with saved geometry
/// files, but only images can be loaded; JSON fails to decode.
pub const ACCEPTED_FILE_TYPES: &str = ".jpg, .jpeg, .png, .Jfif, .json";

/// A single file chosen through the input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_name(&self.name)
    }
}

/// What a file name says about its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Json,
    Unsupported,
}

impl FileKind {
    /// Classify by extension, ignoring case.
    pub fn from_name(name: &str) -> FileKind {
        let extension = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return FileKind::Unsupported,
        };

        match extension.as_str() {
            "jpg" | "jpeg" | "jfif" | "png" => FileKind::Image,
            "json" => FileKind::Json,
            _ => FileKind::Unsupported,
        }
    }
}
