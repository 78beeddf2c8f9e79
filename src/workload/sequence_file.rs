//! Sequence File I/O
//!
//! One line of whitespace-separated base-10 keys, nothing else. The external
//! drivers read it with a plain `>>` loop, so no header and no trailing newline.

use std::fs;
use std::path::Path;

use crate::core_types::{Key, Sequence};
use crate::error::SequenceFileError;

pub const DEFAULT_SEQUENCE_FILE: &str = "sequence.txt";

/// Render keys on a single space-separated line
pub fn format_sequence(seq: &[Key]) -> String {
    let mut out = String::with_capacity(seq.len() * 6);
    for (i, key) in seq.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&key.to_string());
    }
    out
}

/// Parse any whitespace-separated run of positive keys.
pub fn parse_sequence(text: &str) -> Result<Sequence, SequenceFileError> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            let key: Key = token
                .parse()
                .map_err(|_| SequenceFileError::InvalidToken {
                    position,
                    token: token.to_string(),
                })?;
            if key == 0 {
                return Err(SequenceFileError::NonPositiveKey { position });
            }
            Ok(key)
        })
        .collect()
}

/// Write a fully generated sequence to `path`, replacing any previous file.
pub fn write_sequence(path: &Path, seq: &[Key]) -> Result<(), SequenceFileError> {
    fs::write(path, format_sequence(seq)).map_err(|source| SequenceFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), keys = seq.len(), "sequence written");
    Ok(())
}

pub fn read_sequence(path: &Path) -> Result<Sequence, SequenceFileError> {
    let text = fs::read_to_string(path).map_err(|source| SequenceFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sequence(&text)
}
