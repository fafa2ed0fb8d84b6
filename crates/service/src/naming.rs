//! Identifier, filename and date helpers shared by both stores.

use chrono::{Local, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Record id: epoch milliseconds followed by nine random base-36 characters.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{millis}{suffix}")
}

/// Local calendar date as `M/D/YYYY`, the format stamped into `uploadDate` and `addedDate`.
pub fn today() -> String {
    Local::now().format("%-m/%-d/%Y").to_string()
}

/// Final path component of a client-supplied filename. Both separator styles
/// are stripped so the stored name can never leave the blob directory.
pub fn sanitize_file_name(original: &str) -> Option<String> {
    let base = original.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("").trim();
    match base {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// On-disk blob name: `{id}_{originalFilename}`.
pub fn stored_file_name(id: &str, original: &str) -> String {
    let base = sanitize_file_name(original).unwrap_or_else(|| "unknown".to_string());
    format!("{id}_{base}")
}
