//! Settings document adapter.

mod json_settings_file;

pub use json_settings_file::JsonSettingsFile;
