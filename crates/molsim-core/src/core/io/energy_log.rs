use crate::core::models::energy::EnergySnapshot;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnergyLogError {
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Writes one CSV row (`step,kinetic,potential,total`) per energy snapshot.
pub struct EnergyLog<W: Write> {
    writer: csv::Writer<W>,
    path: String,
    rows: usize,
}

impl EnergyLog<File> {
    pub fn create(path: &Path) -> Result<Self, EnergyLogError> {
        let path_str = path.to_string_lossy().to_string();
        let writer = csv::Writer::from_path(path).map_err(|e| EnergyLogError::Csv {
            path: path_str.clone(),
            source: e,
        })?;
        Ok(Self {
            writer,
            path: path_str,
            rows: 0,
        })
    }
}

impl<W: Write> EnergyLog<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            path: "<writer>".to_string(),
            rows: 0,
        }
    }

    pub fn record(&mut self, snapshot: &EnergySnapshot) -> Result<(), EnergyLogError> {
        self.writer
            .serialize(snapshot)
            .map_err(|e| EnergyLogError::Csv {
                path: self.path.clone(),
                source: e,
            })?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<(), EnergyLogError> {
        self.writer.flush().map_err(|e| EnergyLogError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, EnergyLogError> {
        let path = self.path;
        self.writer.into_inner().map_err(|e| EnergyLogError::Io {
            path,
            source: std::io::Error::new(e.error().kind(), e.error().to_string()),
        })
    }
}
