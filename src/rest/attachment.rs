//! Multipart attachment payloads.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

/// Content of a single attachment part.
///
/// The transport accepts exactly three content shapes: an in-memory byte
/// buffer, a readable stream, or a path to a file on disk. Streams and files
/// are read exactly once, at send time, and are not retried.
pub enum AttachmentContent {
    /// An in-memory byte buffer.
    Bytes(Vec<u8>),
    /// A readable stream, consumed fully when the request is sent.
    Reader(Box<dyn Read + Send + Sync>),
    /// A file on disk, opened and read when the request is sent.
    Path(PathBuf),
}

impl fmt::Debug for AttachmentContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

/// A file to be uploaded with a multipart POST.
///
/// # Example
///
/// ```rust
/// use jira_api::rest::NewAttachment;
///
/// let from_bytes = NewAttachment::from_bytes("notes.txt", b"hello".to_vec());
/// let from_disk = NewAttachment::from_path("build.log", "/tmp/build.log");
/// assert_eq!(from_bytes.file_name(), "notes.txt");
/// assert_eq!(from_disk.file_name(), "build.log");
/// ```
#[derive(Debug)]
pub struct NewAttachment {
    /// The file name reported to the server.
    pub file_name: String,
    /// The attachment content; an attachment submitted without content fails
    /// with [`RestError::InvalidAttachment`](crate::rest::RestError::InvalidAttachment).
    pub content: Option<AttachmentContent>,
}

impl NewAttachment {
    /// Creates an attachment from an in-memory byte buffer.
    #[must_use]
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content: Some(AttachmentContent::Bytes(bytes)),
        }
    }

    /// Creates an attachment from a readable stream.
    ///
    /// The stream is read to its end when the upload request is sent.
    #[must_use]
    pub fn from_reader(
        file_name: impl Into<String>,
        reader: impl Read + Send + Sync + 'static,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content: Some(AttachmentContent::Reader(Box::new(reader))),
        }
    }

    /// Creates an attachment from a file on disk.
    #[must_use]
    pub fn from_path(file_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            content: Some(AttachmentContent::Path(path.into())),
        }
    }

    /// Returns the file name reported to the server.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_always_set_content() {
        assert!(NewAttachment::from_bytes("a", vec![1, 2]).content.is_some());
        assert!(NewAttachment::from_reader("b", std::io::empty())
            .content
            .is_some());
        assert!(NewAttachment::from_path("c", "/tmp/c").content.is_some());
    }

    #[test]
    fn test_debug_does_not_dump_payload_bytes() {
        let attachment = NewAttachment::from_bytes("big.bin", vec![0; 1024]);
        let rendered = format!("{attachment:?}");
        assert!(rendered.contains("big.bin"));
        assert!(rendered.contains("1024"));
        assert!(!rendered.contains("0, 0, 0"));
    }
}
