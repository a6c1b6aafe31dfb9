//! Upload intake: validation of client-supplied files

mod validator;

pub use validator::{validate_upload, ValidatedUpload};
