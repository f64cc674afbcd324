//! Upload storage for Aula.
//!
//! Files land in a public directory tree split by upload kind
//! (`uploads/assignments`, `uploads/submissions`) under a
//! timestamp-prefixed, sanitized name, and are served back as static
//! files. Declared MIME type and size are checked before anything is
//! written; there is no content sniffing or deduplication.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;

use crate::{AulaError, Result};

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "image/jpeg",
    "image/png",
    "image/jpg",
];

/// Which resource an upload is attached to; selects the target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Attachment for an assignment.
    Assignment,
    /// Attachment for a submission.
    Submission,
}

impl UploadKind {
    /// Directory name under `uploads/` for this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadKind::Assignment => "assignments",
            UploadKind::Submission => "submissions",
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadKind::Assignment => write!(f, "assignment"),
            UploadKind::Submission => write!(f, "submission"),
        }
    }
}

impl FromStr for UploadKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "assignment" => Ok(UploadKind::Assignment),
            "submission" => Ok(UploadKind::Submission),
            _ => Err(format!("unknown upload type: {s}")),
        }
    }
}

/// A stored upload: where it lives on disk and the URL it is served from.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Public URL path (`/uploads/...`).
    pub url: String,
    /// Name the file was stored under.
    pub stored_name: String,
    /// Size in bytes.
    pub size: u64,
}

/// File storage service writing uploads under a public directory.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    /// Public directory root; uploads go to `<public_dir>/uploads/<kind>/`.
    public_dir: PathBuf,
    /// Maximum accepted size in bytes.
    max_size: u64,
}

impl UploadStorage {
    /// Create an UploadStorage rooted at the given public directory.
    ///
    /// The per-kind directories are created up front.
    pub fn new(public_dir: impl Into<PathBuf>, max_size: u64) -> Result<Self> {
        let public_dir = public_dir.into();

        for kind in [UploadKind::Assignment, UploadKind::Submission] {
            fs::create_dir_all(public_dir.join("uploads").join(kind.dir_name()))?;
        }

        Ok(Self {
            public_dir,
            max_size,
        })
    }

    /// The public directory root.
    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// The directory static uploads are served from.
    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join("uploads")
    }

    /// Maximum accepted size in bytes.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Check a declared MIME type against the allow-list.
    pub fn is_allowed_mime(mime: &str) -> bool {
        ALLOWED_MIME_TYPES.contains(&mime)
    }

    /// Validate and store an upload.
    ///
    /// Validation rejects a disallowed MIME type or an oversized payload
    /// before any write. The stored name is the current timestamp (millis)
    /// plus the sanitized original name.
    pub fn store(
        &self,
        kind: UploadKind,
        original_name: &str,
        mime: &str,
        content: &[u8],
    ) -> Result<StoredUpload> {
        if !Self::is_allowed_mime(mime) {
            return Err(AulaError::Validation(
                "Invalid file type. Allowed: PDF, Word, Excel, Text, Images".to_string(),
            ));
        }

        if content.len() as u64 > self.max_size {
            let max_mb = self.max_size / 1024 / 1024;
            return Err(AulaError::Validation(format!(
                "File too large. Maximum size is {max_mb}MB"
            )));
        }

        let stored_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );

        let dir = self.public_dir.join("uploads").join(kind.dir_name());
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(&stored_name), content)?;

        Ok(StoredUpload {
            url: format!("/uploads/{}/{}", kind.dir_name(), stored_name),
            stored_name,
            size: content.len() as u64,
        })
    }
}

/// Sanitize an original filename for on-disk storage.
///
/// Anything outside `[a-zA-Z0-9.-]` becomes an underscore, which also
/// strips path separators and traversal sequences.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, UploadStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path(), MAX_UPLOAD_SIZE).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_kind_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path(), MAX_UPLOAD_SIZE).unwrap();

        assert!(storage.uploads_dir().join("assignments").is_dir());
        assert!(storage.uploads_dir().join("submissions").is_dir());
    }

    #[test]
    fn test_store_and_read_back() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage
            .store(UploadKind::Submission, "essay.pdf", "application/pdf", b"%PDF-data")
            .unwrap();

        assert!(stored.url.starts_with("/uploads/submissions/"));
        assert!(stored.stored_name.ends_with("-essay.pdf"));
        assert_eq!(stored.size, 9);

        let on_disk = storage
            .uploads_dir()
            .join("submissions")
            .join(&stored.stored_name);
        assert_eq!(fs::read(on_disk).unwrap(), b"%PDF-data");
    }

    #[test]
    fn test_store_assignment_kind_directory() {
        let (_temp_dir, storage) = setup_storage();

        let stored = storage
            .store(UploadKind::Assignment, "brief.txt", "text/plain", b"read me")
            .unwrap();

        assert!(stored.url.starts_with("/uploads/assignments/"));
    }

    #[test]
    fn test_rejects_disallowed_mime() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.store(
            UploadKind::Submission,
            "app.exe",
            "application/x-msdownload",
            b"MZ",
        );

        assert!(matches!(result, Err(AulaError::Validation(_))));
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path(), 16).unwrap();

        let result = storage.store(
            UploadKind::Submission,
            "big.txt",
            "text/plain",
            &[0u8; 17],
        );

        assert!(matches!(result, Err(AulaError::Validation(_))));

        // Nothing was written
        let entries: Vec<_> = fs::read_dir(storage.uploads_dir().join("submissions"))
            .unwrap()
            .collect();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_accepts_exact_limit() {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path(), 16).unwrap();

        let result = storage.store(UploadKind::Submission, "ok.txt", "text/plain", &[0u8; 16]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_file_name("my report.pdf"), "my_report.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name("notes (final).txt"), "notes__final_.txt");
    }

    #[test]
    fn test_upload_kind_parse() {
        assert_eq!(
            UploadKind::from_str("assignment").unwrap(),
            UploadKind::Assignment
        );
        assert_eq!(
            UploadKind::from_str("submission").unwrap(),
            UploadKind::Submission
        );
        assert!(UploadKind::from_str("avatar").is_err());
    }

    #[test]
    fn test_allowed_mime_list() {
        assert!(UploadStorage::is_allowed_mime("application/pdf"));
        assert!(UploadStorage::is_allowed_mime("image/png"));
        assert!(!UploadStorage::is_allowed_mime("text/html"));
        assert!(!UploadStorage::is_allowed_mime("application/zip"));
    }
}
