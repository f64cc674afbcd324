//! Upload handling for Aula.

pub mod storage;

pub use storage::{
    sanitize_file_name, StoredUpload, UploadKind, UploadStorage, ALLOWED_MIME_TYPES,
    MAX_UPLOAD_SIZE,
};
