//! # Blockpress Gateway
//!
//! HTTP implementation of the editor's [`UploadGateway`].
//!
//! ```text
//! POST <base>/api/uploadImage/create
//! Content-Type: multipart/form-data   (single "file" field)
//!
//! 200 { "success": 1, "url": "https://…" }   → Uploaded
//! anything else / network error              → Failed
//! ```

mod http;

pub use http::{HttpUploadGateway, UploadResponse};

pub use blockpress_editor::{RawFile, UploadFailure, UploadGateway, UploadPurpose, UploadResult};
