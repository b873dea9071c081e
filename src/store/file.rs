use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use tracing::warn;

use crate::model::Document;

use super::{DocumentStore, StoreError};

/// The document as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the data file, creating an empty document if it does not exist
    /// and rewriting it with every default field filled in.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };

        let document = match fs::read_to_string(&store.path) {
            Ok(raw) => store.parse(&raw)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(path = %store.path.display(), "data file missing, starting empty");
                Document::default()
            }
            Err(source) => return Err(store.io_error(source)),
        };
        store.save(&document)?;

        Ok(store)
    }

    fn parse(&self, raw: &str) -> Result<Document, StoreError> {
        serde_json::from_str(raw).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Document, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        self.parse(&raw)
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = File::create(&temp_path).map_err(|source| self.io_error(source))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
                StoreError::Malformed {
                    path: temp_path.clone(),
                    source,
                }
            })?;
            writer.flush().map_err(|source| self.io_error(source))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|source| self.io_error(source))
    }
}
