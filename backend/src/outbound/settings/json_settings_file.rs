//! JSON settings document backing the [`WritableOptions`] port.
//!
//! The document is a single JSON object whose top-level keys are settings
//! sections (see [`SettingsSection::SECTION`]). The parsed document is cached
//! behind a lock; an update rewrites the whole document atomically and only
//! then swaps the cache, so a failed write leaves both untouched.

use std::io;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::SettingsSection;
use crate::domain::ports::{SettingsStoreError, WritableOptions};
use crate::outbound::atomic_io::write_atomic;

type Document = Map<String, Value>;

struct SettingsDocument {
    dir: Dir,
    file_name: String,
    path: Utf8PathBuf,
    cache: RwLock<Document>,
}

/// Handle to a settings document on disk.
///
/// Cloning is cheap; every clone and every section handle share the same
/// cache.
#[derive(Clone)]
pub struct JsonSettingsFile {
    document: Arc<SettingsDocument>,
}

impl JsonSettingsFile {
    /// Open the document at `path`. A missing file is treated as an empty
    /// document and created on the first update; the parent directory must
    /// exist.
    ///
    /// # Errors
    /// Returns [`SettingsStoreError::Read`] when the directory cannot be
    /// opened or the file is not a JSON object.
    pub fn open(path: &Utf8Path) -> Result<Self, SettingsStoreError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| SettingsStoreError::read(format!("{path}: not a file path")))?
            .to_owned();
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| SettingsStoreError::read(format!("{parent}: {err}")))?;
        let cache = load(&dir, &file_name, path)?;
        info!(path = %path, sections = cache.len(), "settings document loaded");

        Ok(Self {
            document: Arc::new(SettingsDocument {
                dir,
                file_name,
                path: path.to_path_buf(),
                cache: RwLock::new(cache),
            }),
        })
    }

    /// Location of the document.
    pub fn path(&self) -> &Utf8Path {
        &self.document.path
    }

    /// Typed handle to one section of the document.
    pub fn section<T: SettingsSection>(&self) -> Arc<dyn WritableOptions<T>> {
        Arc::new(SectionOptions::<T> {
            document: Arc::clone(&self.document),
            section: PhantomData,
        })
    }
}

fn load(dir: &Dir, file_name: &str, path: &Utf8Path) -> Result<Document, SettingsStoreError> {
    let raw = match dir.read_to_string(file_name) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path, "settings document missing; starting empty");
            return Ok(Document::new());
        }
        Err(err) => return Err(SettingsStoreError::read(format!("{path}: {err}"))),
    };
    if raw.trim().is_empty() {
        return Ok(Document::new());
    }
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(SettingsStoreError::read(format!(
            "{path}: settings document must be a JSON object"
        ))),
        Err(err) => Err(SettingsStoreError::read(format!("{path}: {err}"))),
    }
}

struct SectionOptions<T> {
    document: Arc<SettingsDocument>,
    section: PhantomData<fn() -> T>,
}

impl<T: SettingsSection> SectionOptions<T> {
    fn decode(document: &Document) -> Result<T, SettingsStoreError> {
        match document.get(T::SECTION) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|err| SettingsStoreError::read(format!("{}: {err}", T::SECTION))),
        }
    }
}

impl<T: SettingsSection> WritableOptions<T> for SectionOptions<T> {
    fn value(&self) -> Result<T, SettingsStoreError> {
        let cache = self
            .document
            .cache
            .read()
            .map_err(|_| SettingsStoreError::read("settings cache lock poisoned"))?;
        Self::decode(&cache)
    }

    fn update(&self, apply: &mut dyn FnMut(&mut T)) -> Result<(), SettingsStoreError> {
        let mut cache = self
            .document
            .cache
            .write()
            .map_err(|_| SettingsStoreError::write("settings cache lock poisoned"))?;

        let mut value = Self::decode(&cache)?;
        apply(&mut value);
        let encoded = serde_json::to_value(&value)
            .map_err(|err| SettingsStoreError::write(format!("{}: {err}", T::SECTION)))?;

        let mut next = cache.clone();
        next.insert(T::SECTION.to_owned(), encoded);
        let contents = serde_json::to_string_pretty(&next)
            .map_err(|err| SettingsStoreError::write(err.to_string()))?;
        write_atomic(&self.document.dir, &self.document.file_name, &contents)
            .map_err(|err| SettingsStoreError::write(err.to_string()))?;

        *cache = next;
        debug!(section = T::SECTION, path = %self.document.path, "settings section updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ApplicationSettings, ConnectionStrings, HeaderSettings};
    use crate::test_support::temp_settings_path;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn missing_document_yields_defaults() {
        let (_dir, path) = temp_settings_path();
        let file = JsonSettingsFile::open(&path).expect("open");

        let strings = file.section::<ConnectionStrings>().value().expect("read");

        assert_eq!(strings, ConnectionStrings::default());
        assert!(!path.exists());
    }

    #[rstest]
    fn update_is_visible_in_process_and_on_disk() {
        let (_dir, path) = temp_settings_path();
        let file = JsonSettingsFile::open(&path).expect("open");
        let app = file.section::<ApplicationSettings>();

        app.update(&mut |settings| settings.default_locale = "da-DK".to_owned())
            .expect("update");

        assert_eq!(app.value().expect("read").default_locale, "da-DK");
        let reopened = JsonSettingsFile::open(&path).expect("reopen");
        let stored = reopened
            .section::<ApplicationSettings>()
            .value()
            .expect("read");
        assert_eq!(stored.default_locale, "da-DK");
    }

    #[rstest]
    fn sections_are_written_with_pascal_case_keys() {
        let (_dir, path) = temp_settings_path();
        let file = JsonSettingsFile::open(&path).expect("open");

        file.section::<ConnectionStrings>()
            .update(&mut |strings| strings.sdk_connection = "sdk".to_owned())
            .expect("update");

        let raw = std::fs::read_to_string(&path).expect("read file");
        let value: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["ConnectionStrings"]["SdkConnection"], "sdk");
        assert_eq!(value["ConnectionStrings"]["DefaultConnection"], "");
    }

    #[rstest]
    fn unrelated_sections_survive_updates() {
        let (_dir, path) = temp_settings_path();
        std::fs::write(
            &path,
            json!({ "Logging": { "Level": "Debug" }, "HeaderSettings": { "MainText": "Acme" } })
                .to_string(),
        )
        .expect("seed");
        let file = JsonSettingsFile::open(&path).expect("open");

        let header = file.section::<HeaderSettings>();
        assert_eq!(header.value().expect("read").0.main_text, "Acme");
        header
            .update(&mut |settings| settings.0.image_link = "logo.png".to_owned())
            .expect("update");

        let raw = std::fs::read_to_string(&path).expect("read file");
        let value: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["Logging"]["Level"], "Debug");
        assert_eq!(value["HeaderSettings"]["MainText"], "Acme");
        assert_eq!(value["HeaderSettings"]["ImageLink"], "logo.png");
    }

    #[rstest]
    fn sections_share_one_cache() {
        let (_dir, path) = temp_settings_path();
        let file = JsonSettingsFile::open(&path).expect("open");
        let writer = file.section::<ApplicationSettings>();
        let reader = file.clone().section::<ApplicationSettings>();

        writer
            .update(&mut |settings| settings.is_two_factor_forced = true)
            .expect("update");

        assert!(reader.value().expect("read").is_two_factor_forced);
    }

    #[rstest]
    #[case("[1, 2, 3]")]
    #[case("{ not json")]
    fn malformed_documents_are_rejected(#[case] contents: &str) {
        let (_dir, path) = temp_settings_path();
        std::fs::write(&path, contents).expect("seed");

        let result = JsonSettingsFile::open(&path);

        assert!(matches!(result, Err(SettingsStoreError::Read { .. })));
    }

    #[rstest]
    fn mistyped_section_fails_to_read() {
        let (_dir, path) = temp_settings_path();
        std::fs::write(&path, r#"{ "EmailSettings": { "SmtpPort": "twenty-five" } }"#)
            .expect("seed");
        let file = JsonSettingsFile::open(&path).expect("open");

        let result = file.section::<crate::domain::EmailSettings>().value();

        assert!(matches!(result, Err(SettingsStoreError::Read { .. })));
    }
}
