//! Code digest chunking
//!
//! Splits a digest into pieces small enough for one classifier call,
//! preferring to cut right after a file header once a chunk is half full.

use crate::ingest::is_header_rule;
use tracing::debug;

/// Default chunk budget, in characters of line content
pub const DEFAULT_CHUNK_SIZE: usize = 12_000;

/// Split `content` into line-granular chunks of at most `chunk_size` characters
///
/// Newlines are not counted toward the budget. A single line longer than the
/// budget becomes a chunk of its own.
pub fn chunk_by_files(content: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_size = 0usize;

    for line in content.split('\n') {
        let line_size = line.chars().count();

        if current_size + line_size > chunk_size && !current.is_empty() {
            chunks.push(current.join("\n"));
            current.clear();
            current_size = 0;
        }

        current.push(line);
        current_size += line_size;

        if is_header_rule(line) && current_size * 2 > chunk_size {
            chunks.push(current.join("\n"));
            current.clear();
            current_size = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    debug!("Created {} chunks", chunks.len());
    chunks
}
