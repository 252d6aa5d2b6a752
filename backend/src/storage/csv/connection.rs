use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const PROFILE_FILE_NAME: &str = "baby_info.csv";
pub const SLEEP_LOG_FILE_NAME: &str = "sleep_log.csv";
pub const FEED_LOG_FILE_NAME: &str = "feeding_log.csv";
pub const PENDING_SLEEP_FILE_NAME: &str = "pending_sleep.txt";

/// CsvConnection owns the data directory and knows where each file lives
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn profile_file_path(&self) -> PathBuf {
        self.base_directory.join(PROFILE_FILE_NAME)
    }

    pub fn sleep_log_file_path(&self) -> PathBuf {
        self.base_directory.join(SLEEP_LOG_FILE_NAME)
    }

    pub fn feed_log_file_path(&self) -> PathBuf {
        self.base_directory.join(FEED_LOG_FILE_NAME)
    }

    pub fn pending_sleep_file_path(&self) -> PathBuf {
        self.base_directory.join(PENDING_SLEEP_FILE_NAME)
    }

    /// Read every data row of a CSV file, skipping the header.
    /// A missing file reads as empty. Rows that are not valid UTF-8 are
    /// skipped with a warning.
    pub fn read_records(&self, path: &Path) -> Result<Vec<StringRecord>> {
        let (_, raw_records) = self.read_byte_records(path)?;

        let mut records = Vec::with_capacity(raw_records.len());
        for (row, raw) in raw_records.into_iter().enumerate() {
            match StringRecord::from_byte_record(raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Skipping unreadable row {} in {}: {}",
                    row + 1,
                    path.display(),
                    e.utf8_error()
                ),
            }
        }
        Ok(records)
    }

    /// Header and data rows as raw bytes, so rows can be carried through a
    /// rewrite untouched whether or not they parse.
    fn read_byte_records(&self, path: &Path) -> Result<(ByteRecord, Vec<ByteRecord>)> {
        if !path.exists() {
            debug!("{} does not exist yet, treating as empty", path.display());
            return Ok((ByteRecord::new(), Vec::new()));
        }

        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let header = reader
            .byte_headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?
            .clone();

        let mut records = Vec::new();
        for result in reader.byte_records() {
            records.push(result.with_context(|| format!("Failed to read {}", path.display()))?);
        }
        Ok((header, records))
    }

    /// Remove every row whose first column is `id`, keeping all other rows
    /// byte for byte. Returns false, without touching the file, when no row
    /// matched.
    pub fn delete_records_with_id(&self, path: &Path, id: &str) -> Result<bool> {
        let (header, records) = self.read_byte_records(path)?;

        let initial_len = records.len();
        let remaining: Vec<ByteRecord> = records
            .into_iter()
            .filter(|record| {
                record
                    .get(0)
                    .map(|value| String::from_utf8_lossy(value).trim() != id)
                    .unwrap_or(true)
            })
            .collect();

        if remaining.len() == initial_len {
            return Ok(false);
        }

        self.write_atomically(path, |writer| {
            writer.write_byte_record(&header)?;
            for record in &remaining {
                writer.write_byte_record(record)?;
            }
            Ok(())
        })?;
        Ok(true)
    }

    /// Append a single row, writing the header first if the file is new
    pub fn append_record(&self, path: &Path, header: &[&str], record: &[String]) -> Result<()> {
        // An empty file left behind by an interrupted write still needs its header
        let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for append", path.display()))?;
        let mut writer = Writer::from_writer(BufWriter::new(file));

        if is_new {
            writer.write_record(header)?;
        }
        writer.write_record(record)?;
        writer.flush()?;

        Ok(())
    }

    /// Replace the whole file with `header` plus `records`
    pub fn rewrite_records(&self, path: &Path, header: &[&str], records: &[Vec<String>]) -> Result<()> {
        self.write_atomically(path, |writer| {
            writer.write_record(header)?;
            for record in records {
                writer.write_record(record)?;
            }
            Ok(())
        })
    }

    fn write_atomically<F>(&self, path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&mut Writer<BufWriter<File>>) -> Result<()>,
    {
        // Create a temporary file for atomic write
        let temp_path = path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to open {}", temp_path.display()))?;

            // Carried-over rows may have a different column count
            let mut writer = WriterBuilder::new()
                .flexible(true)
                .from_writer(BufWriter::new(file));
            write(&mut writer)?;
            writer.flush()?;
        }

        // Atomic move from temp to final file
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_writes_header_into_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let path = connection.sleep_log_file_path();
        fs::write(&path, "").unwrap();

        connection
            .append_record(
                &path,
                &["id", "start", "end"],
                &[
                    "sleep::1".to_string(),
                    "2025-01-01T20:00".to_string(),
                    "2025-01-02T05:00".to_string(),
                ],
            )
            .unwrap();

        let records = connection.read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "sleep::1");
    }

    #[test]
    fn test_delete_keeps_unmatched_rows_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let path = connection.sleep_log_file_path();
        fs::write(&path, "id,start,end\na,x,y\nb,2025-01-01T8pm\n").unwrap();

        assert!(connection.delete_records_with_id(&path, "a").unwrap());
        assert!(!connection.delete_records_with_id(&path, "missing").unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "id,start,end\nb,2025-01-01T8pm\n"
        );
    }
}
