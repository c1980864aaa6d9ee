use crate::error::{Result, ScoutError};
use crate::models::{HotelRecord, COLUMNS};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// How field values are quoted in the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Wrap every field in double quotes and leave its content untouched
    #[default]
    Raw,
    /// Wrap every field in double quotes and double any embedded quote
    Escaped,
}

/// Appends hotel rows to the output file, one writer at a time
pub struct Recorder {
    path: PathBuf,
    quote_style: QuoteStyle,
    guard: Mutex<()>,
}

impl Recorder {
    pub fn new(path: impl Into<PathBuf>, quote_style: QuoteStyle) -> Self {
        Self {
            path: path.into(),
            quote_style,
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new
    pub async fn append(&self, record: &HotelRecord) -> Result<()> {
        let row = self.encode(record)?;

        // Held across the header check and the write so only one task creates the file
        let _guard = self.guard.lock().await;

        let mut bytes = Vec::with_capacity(row.len() + 64);
        if self.needs_header().await? {
            debug!("Creating {} with header", self.path.display());
            bytes.extend_from_slice(COLUMNS.join(",").as_bytes());
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(&row);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.write_error(e))?;
        file.write_all(&bytes).await.map_err(|e| self.write_error(e))?;
        file.flush().await.map_err(|e| self.write_error(e))?;

        Ok(())
    }

    async fn needs_header(&self) -> Result<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(self.write_error(e)),
        }
    }

    fn encode(&self, record: &HotelRecord) -> Result<Vec<u8>> {
        match self.quote_style {
            QuoteStyle::Raw => {
                let quoted: Vec<String> = record
                    .fields()
                    .iter()
                    .map(|field| format!("\"{}\"", field))
                    .collect();
                let mut line = quoted.join(",");
                line.push('\n');
                Ok(line.into_bytes())
            }
            QuoteStyle::Escaped => {
                let mut writer = csv::WriterBuilder::new()
                    .has_headers(false)
                    .quote_style(csv::QuoteStyle::Always)
                    .terminator(csv::Terminator::Any(b'\n'))
                    .from_writer(Vec::new());
                writer.write_record(record.fields())?;
                writer
                    .into_inner()
                    .map_err(|e| self.write_error(e.into_error()))
            }
        }
    }

    fn write_error(&self, source: std::io::Error) -> ScoutError {
        ScoutError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
