use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Result;
use crate::models::RawRow;
use crate::utils::constants::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_CHUNK_SIZE};

/// Events emitted by a sample source: any number of chunks in order, then
/// exactly one terminal `Complete` or `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Chunk(Vec<RawRow>),
    Complete,
    Error(String),
}

/// Streams a CSV file with a header row as batches of raw rows.
pub struct CsvChunkSource {
    chunk_size: usize,
}

impl CsvChunkSource {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Open `path` and stream it from a blocking worker.
    pub fn spawn_file(&self, path: &Path) -> Result<mpsc::Receiver<SourceEvent>> {
        let file = File::open(path)?;
        Ok(self.spawn_reader(file))
    }

    /// Stream any reader from a blocking worker. Must be called inside a tokio runtime.
    pub fn spawn_reader<R>(&self, reader: R) -> mpsc::Receiver<SourceEvent>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let chunk_size = self.chunk_size;

        tokio::task::spawn_blocking(move || {
            let terminal = match Self::stream(reader, chunk_size, &tx) {
                Ok(true) => SourceEvent::Complete,
                // Receiver dropped, nobody is listening for the terminal event
                Ok(false) => return,
                Err(e) => SourceEvent::Error(e.to_string()),
            };
            let _ = tx.blocking_send(terminal);
        });

        rx
    }

    /// Returns `Ok(false)` when the receiver went away mid-stream.
    fn stream<R: Read>(
        reader: R,
        chunk_size: usize,
        tx: &mpsc::Sender<SourceEvent>,
    ) -> Result<bool> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .byte_headers()?
            .iter()
            .map(decode_field)
            .collect();

        let mut chunk = Vec::with_capacity(chunk_size);
        let mut total = 0usize;
        let mut record = csv::ByteRecord::new();

        while csv_reader.read_byte_record(&mut record)? {
            let row: RawRow = headers
                .iter()
                .zip(record.iter())
                .filter(|(_, field)| !field.is_empty())
                .map(|(header, field)| (header.clone(), decode_field(field)))
                .collect();
            chunk.push(row);
            total += 1;

            if chunk.len() >= chunk_size {
                let full = std::mem::replace(&mut chunk, Vec::with_capacity(chunk_size));
                if tx.blocking_send(SourceEvent::Chunk(full)).is_err() {
                    return Ok(false);
                }
            }
        }

        if !chunk.is_empty() && tx.blocking_send(SourceEvent::Chunk(chunk)).is_err() {
            return Ok(false);
        }

        debug!(rows = total, "CSV source exhausted");
        Ok(true)
    }
}

impl Default for CsvChunkSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a CSV field as UTF-8, falling back to Windows-1252 for legacy exports.
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
    }
}
