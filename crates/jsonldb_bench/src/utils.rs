//! Benchmark utilities.

use jsonldb_codec::Record;
use jsonldb_core::JsonlFile;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::json;
use std::path::Path;

/// Generate a random alphanumeric string of the specified length.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate one record with a sequential `id`, a random `group` in
/// `0..10`, and a random payload of `payload_size` characters.
pub fn random_record(id: usize, payload_size: usize) -> Record {
    let group: u8 = rand::thread_rng().gen_range(0..10);
    let mut record = Record::new();
    record.insert("id".to_string(), json!(id));
    record.insert("group".to_string(), json!(group));
    record.insert("payload".to_string(), json!(random_string(payload_size)));
    record
}

/// Generate test records with the specified payload size.
pub fn generate_records(count: usize, payload_size: usize) -> Vec<Record> {
    (0..count).map(|id| random_record(id, payload_size)).collect()
}

/// Create a file at `path` holding `count` random records.
pub fn populated_file(path: &Path, count: usize, payload_size: usize) -> JsonlFile {
    let file = JsonlFile::new(path);
    let records = generate_records(count, payload_size);
    file.append_all(&records).expect("Failed to populate bench file");
    file
}
