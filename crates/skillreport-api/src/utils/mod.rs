pub mod upload;

pub use upload::{extract_multipart_file, validate_file_size, FileKind, UploadedFile};
