use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_UPLOAD_BYTES: usize = 5_000_000;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ProfilePicture,
    CompanyLogo,
    Resume,
}

impl UploadKind {
    pub const ALL: [UploadKind; 3] = [
        UploadKind::ProfilePicture,
        UploadKind::CompanyLogo,
        UploadKind::Resume,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            UploadKind::ProfilePicture => "profile_pictures",
            UploadKind::CompanyLogo => "company_logos",
            UploadKind::Resume => "resumes",
        }
    }

    /// Multipart field carrying the file, named after the profile attribute.
    pub fn field_name(self) -> &'static str {
        match self {
            UploadKind::ProfilePicture => "profile_picture",
            UploadKind::CompanyLogo => "logo",
            UploadKind::Resume => "resume_file",
        }
    }

    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            UploadKind::ProfilePicture | UploadKind::CompanyLogo => IMAGE_EXTENSIONS,
            UploadKind::Resume => DOCUMENT_EXTENSIONS,
        }
    }
}

/// Checks name and size of an upload, returning the lowercased extension the
/// stored file will carry.
pub fn validate_upload(kind: UploadKind, file_name: &str, size: usize) -> Result<String, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !kind.allowed_extensions().contains(&extension.as_str()) {
        return Err(AppError::BadRequest(format!(
            "File extension not allowed. Allowed: {}.",
            kind.allowed_extensions().join(", ")
        )));
    }
    if size == 0 {
        return Err(AppError::BadRequest("Uploaded file is empty.".into()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(format!(
            "File size too large. Maximum is {MAX_UPLOAD_BYTES} bytes."
        )));
    }

    Ok(extension)
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, kind: UploadKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    pub async fn ensure_dirs(&self) -> Result<(), AppError> {
        for kind in UploadKind::ALL {
            let dir = self.dir(kind);
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                AppError::Upload(format!("Failed to create {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }

    /// Validates and writes the file under a generated name, which is
    /// returned. The original name never reaches the disk.
    pub async fn save(
        &self,
        kind: UploadKind,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        let extension = validate_upload(kind, file_name, bytes.len())?;
        let stored_name = format!("{}.{extension}", Uuid::new_v4());
        let destination = self.dir(kind).join(&stored_name);

        tokio::fs::write(&destination, bytes).await.map_err(|e| {
            tracing::error!("Failed to write upload {}: {}", destination.display(), e);
            AppError::Upload(e.to_string())
        })?;

        tracing::info!("Stored {:?} upload as {}", kind, stored_name);
        Ok(stored_name)
    }
}
