//! FASTA file parser.
//!
//! This module reads the circular sequence shown by the viewer.
//! It supports both single-line and multi-line sequences; only the first
//! record of a file is displayed.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::model::Sequence;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Reads the first sequence of a FASTA file.
///
/// # Examples
///
/// ```no_run
/// use circview::fasta::read_sequence_file;
///
/// let sequence = read_sequence_file("plasmid.fasta").unwrap();
/// println!("{}: {} residues", sequence.id, sequence.len());
/// ```
pub fn read_sequence_file<P: AsRef<Path>>(path: P) -> FastaResult<Sequence> {
    let file = File::open(path)?;
    first_sequence(parse_fasta(BufReader::new(file))?)
}

/// Reads the first sequence from FASTA content in a string.
pub fn read_sequence_str(content: &str) -> FastaResult<Sequence> {
    first_sequence(parse_fasta(content.as_bytes())?)
}

fn first_sequence(sequences: Vec<Sequence>) -> FastaResult<Sequence> {
    if sequences.len() > 1 {
        warn!(
            count = sequences.len(),
            "multiple records found, only the first one is shown"
        );
    }
    sequences.into_iter().next().ok_or(FastaError::EmptyFile)
}

/// Parses FASTA content from a reader.
///
/// This function handles both single-line and multi-line sequences.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<Vec<Sequence>> {
    let mut sequences = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_seq = String::new();
    let mut line_number = 0;

    for line_result in reader.lines() {
        line_number += 1;
        let line = line_result?;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            // Save previous sequence if exists
            if let Some(id) = current_id.take() {
                if !current_seq.is_empty() {
                    sequences.push(Sequence::new(id, std::mem::take(&mut current_seq)));
                }
            }

            // ID is everything after '>' up to the first space
            let id = header.split_whitespace().next().unwrap_or(header).to_string();

            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    line_number
                )));
            }

            current_id = Some(id);
            current_seq.clear();
        } else {
            // Sequence line
            if current_id.is_none() {
                return Err(FastaError::SequenceWithoutHeader(line_number));
            }

            current_seq.extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    // Don't forget the last sequence
    if let Some(id) = current_id {
        if !current_seq.is_empty() {
            sequences.push(Sequence::new(id, current_seq));
        }
    }

    if sequences.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_parse_simple_fasta() {
        let sequences = parse_fasta(">seq1\nACGT\n>seq2\nTGCA\n".as_bytes()).unwrap();

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].id, "seq1");
        assert_eq!(sequences[0].data, "ACGT");
        assert_eq!(sequences[1].id, "seq2");
        assert_eq!(sequences[1].data, "TGCA");
    }

    #[test]
    fn test_first_record_only() {
        let sequence = read_sequence_str(">mito circular\nACGT\nTGCA\n>other\nAAAA\n").unwrap();
        assert_eq!(sequence.id, "mito");
        assert_eq!(sequence.data, "ACGTTGCA");
    }

    #[test]
    fn test_parse_with_empty_lines() {
        let sequences = parse_fasta(">seq1\nACGT\n\n>seq2\n\nTGCA\n".as_bytes()).unwrap();
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[1].data, "TGCA");
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(read_sequence_str(""), Err(FastaError::EmptyFile)));
        assert!(matches!(read_sequence_str(">only_header\n"), Err(FastaError::EmptyFile)));
    }

    #[test]
    fn test_sequence_without_header() {
        let result = read_sequence_str("ACGT\n>seq1\nTGCA\n");
        assert!(matches!(result, Err(FastaError::SequenceWithoutHeader(1))));
    }

    #[test]
    fn test_empty_identifier() {
        let result = read_sequence_str(">\nACGT\n");
        assert!(matches!(result, Err(FastaError::InvalidFormat(_))));
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">prot\nMTAVFRVG\nLVRL").unwrap();
        let sequence = read_sequence_file(file.path()).unwrap();
        assert_eq!(sequence.data, "MTAVFRVGLVRL");

        assert!(matches!(
            read_sequence_file("/nonexistent/seq.fa"),
            Err(FastaError::IoError(_))
        ));
    }
}
