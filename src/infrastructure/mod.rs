//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{data_dir, expand_tilde, settings_path, DATA_DIR_ENV, SETTINGS_FILE_NAME};
