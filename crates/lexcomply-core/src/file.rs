//! Files attached to upload-bearing dialogs, and the type/size checks that
//! run before anything is sent.

use std::path::Path;

use crate::error::ValidationError;
use crate::schema::UploadSpec;

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Original file name, as shown to the user.
    pub file_name: String,
    /// MIME type sent with the multipart part.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FileUpload {
    /// Build an upload from in-memory bytes; the MIME type is derived from
    /// the extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, bytes))
    }

    /// Lowercase extension without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check the file against an upload spec: non-empty, accepted
    /// extension, within the size limit.
    pub fn check(&self, spec: &UploadSpec) -> Result<(), ValidationError> {
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyFile {
                field: spec.field.to_string(),
                file_name: self.file_name.clone(),
            });
        }
        let accepted = self
            .extension()
            .map(|ext| spec.allowed_extensions.contains(&ext.as_str()))
            .unwrap_or(false);
        if !accepted {
            return Err(ValidationError::FileType {
                field: spec.field.to_string(),
                file_name: self.file_name.clone(),
                allowed: spec.allowed_extensions.join(", "),
            });
        }
        if self.size() > spec.max_bytes {
            return Err(ValidationError::FileTooLarge {
                field: spec.field.to_string(),
                file_name: self.file_name.clone(),
                size: self.size(),
                max: spec.max_bytes,
            });
        }
        Ok(())
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}
