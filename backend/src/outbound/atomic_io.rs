//! Atomic replacement of documents owned by the file-backed adapters.
//!
//! Writes go to a hidden temporary file in the same directory which is then
//! renamed over the target, so readers never observe a partial document.

use std::io::{self, Write};

use cap_std::fs::{Dir, OpenOptions};
use uuid::Uuid;

/// Replace `file_name` inside `dir` with `contents`.
///
/// Errors carry the name of the file that failed.
pub(crate) fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> io::Result<()> {
    let tmp_name = temp_name(file_name);

    write_temp_file(dir, &tmp_name, contents).map_err(|err| {
        discard(dir, &tmp_name);
        named(&tmp_name, &err)
    })?;
    replace_target(dir, &tmp_name, file_name).map_err(|err| {
        discard(dir, &tmp_name);
        named(file_name, &err)
    })?;
    sync_directory(dir);
    Ok(())
}

fn named(file_name: &str, err: &io::Error) -> io::Error {
    io::Error::new(err.kind(), format!("{file_name}: {err}"))
}

fn temp_name(file_name: &str) -> String {
    format!(".{file_name}.tmp.{}", Uuid::new_v4().simple())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn discard(dir: &Dir, tmp_name: &str) {
    if dir.remove_file(tmp_name).is_err() {
        // Already gone or never created.
    }
}

fn sync_directory(dir: &Dir) {
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Best effort only.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;

    #[test]
    fn temp_names_are_hidden_and_unique() {
        let first = temp_name("settings.json");
        let second = temp_name("settings.json");

        assert!(first.starts_with(".settings.json.tmp."));
        assert_ne!(first, second);
    }

    #[test]
    fn write_replaces_the_target_and_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open dir");

        write_atomic(&dir, "settings.json", "{\"a\":1}").expect("first write");
        write_atomic(&dir, "settings.json", "{\"a\":2}").expect("second write");

        assert_eq!(
            dir.read_to_string("settings.json").expect("read"),
            "{\"a\":2}"
        );
        let names: Vec<String> = dir
            .entries()
            .expect("entries")
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        assert_eq!(names, ["settings.json"]);
    }
}
