//! A key/value sink that stores each result list as a JSON file.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use log::debug;
use waymark_core::{KvSink, PlaceRecord, SinkError};

/// Writes `<dir>/<key>.json`, one pretty-printed array per key.
///
/// Keys are reduced to a portable file stem first: characters other than
/// ASCII letters, digits and `-_.,+@` become `_`. Distinct keys that reduce
/// to the same stem overwrite each other, as does writing a key twice.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use waymark_core::KvSink;
/// use waymark_data::JsonDirSink;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut sink = JsonDirSink::create(Utf8Path::new("out/bakeries"))?;
/// sink.write("Paris".to_owned(), vec![serde_json::json!({"name": "Poilâne"})])?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JsonDirSink {
    dir: Dir,
    path: Utf8PathBuf,
}

impl JsonDirSink {
    /// Open `path` as the output directory, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the directory cannot be created or opened.
    pub fn create(path: &Utf8Path) -> Result<Self, SinkError> {
        let dir = waymark_fs::create_dir_all(path).map_err(|err| {
            SinkError::with_source(format!("cannot open output directory {path}"), err)
        })?;
        Ok(Self {
            dir,
            path: path.to_owned(),
        })
    }

    /// Directory the sink writes into.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// File name used for `key`.
    #[must_use]
    pub fn file_name(key: &str) -> String {
        let stem: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || "-_.,+@".contains(ch) {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        if stem.chars().all(|ch| ch == '.') {
            format!("_{stem}.json")
        } else {
            format!("{stem}.json")
        }
    }
}

impl KvSink<String, Vec<PlaceRecord>> for JsonDirSink {
    fn write(&mut self, key: String, value: Vec<PlaceRecord>) -> Result<(), SinkError> {
        let name = Self::file_name(&key);
        let body = serde_json::to_vec_pretty(&value)
            .map_err(|err| SinkError::with_source(format!("cannot serialise {key}"), err))?;
        self.dir.write(&name, body).map_err(|err| {
            SinkError::with_source(format!("cannot write {}/{name}", self.path), err)
        })?;
        debug!("wrote {} records to {}/{name}", value.len(), self.path);
        Ok(())
    }
}
