use crate::utils::{open_fasta_reader, Result};
use crossbeam_channel::Sender;
use std::{io::BufRead, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub seq: String,
}

/// Streams FASTA records into the channel, returning the first parse or I/O
/// error. Sequence lines are concatenated and uppercased; the record id is
/// the first whitespace-delimited token of the header.
pub fn stream_records_into_channel(
    fasta_path: &Path,
    sender: Sender<SequenceRecord>,
) -> Result<()> {
    let reader = open_fasta_reader(fasta_path)?;
    send_records(reader, sender)
}

fn send_records(reader: impl BufRead, sender: Sender<SequenceRecord>) -> Result<()> {
    let mut id: Option<String> = None;
    let mut seq = String::new();

    for (line_number, result_line) in reader.lines().enumerate() {
        let line =
            result_line.map_err(|e| format!("Error at FASTA line {}: {}", line_number + 1, e))?;
        let line = line.trim();

        if let Some(header) = line.strip_prefix('>') {
            if let Some(id) = id.take() {
                send_record(&sender, id, std::mem::take(&mut seq));
            }
            let name = header.split_whitespace().next().ok_or_else(|| {
                format!(
                    "Error at FASTA line {}: record has an empty identifier",
                    line_number + 1
                )
            })?;
            id = Some(name.to_string());
        } else if line.is_empty() {
            continue;
        } else if id.is_none() {
            return Err(format!(
                "Error at FASTA line {}: sequence data before the first '>' header",
                line_number + 1
            ));
        } else {
            seq.push_str(&line.to_uppercase());
        }
    }

    if let Some(id) = id.take() {
        send_record(&sender, id, seq);
    }
    Ok(())
}

fn send_record(sender: &Sender<SequenceRecord>, id: String, seq: String) {
    sender
        .send(SequenceRecord { id, seq })
        .expect("Failed to send record through channel");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Cursor;

    fn parse(fasta: &str) -> Result<Vec<SequenceRecord>> {
        let (sender, receiver) = unbounded();
        send_records(Cursor::new(fasta.to_string()), sender)?;
        Ok(receiver.iter().collect())
    }

    fn rec(id: &str, seq: &str) -> SequenceRecord {
        SequenceRecord {
            id: id.to_string(),
            seq: seq.to_string(),
        }
    }

    #[test]
    fn parse_multi_record_fasta_ok() {
        let records = parse(">chr1 assembly=hap1\nACGT\nTTAGGG\n>chr2\nCCCTAA\n").unwrap();
        assert_eq!(
            records,
            vec![rec("chr1", "ACGTTTAGGG"), rec("chr2", "CCCTAA")]
        );
    }

    #[test]
    fn parse_uppercases_sequence_lines() {
        let records = parse(">chr1\nacgtttagGG\n").unwrap();
        assert_eq!(records, vec![rec("chr1", "ACGTTTAGGG")]);
    }

    #[test]
    fn parse_skips_blank_lines() {
        let records = parse(">chr1\nACGT\n\nACGT\n\n").unwrap();
        assert_eq!(records, vec![rec("chr1", "ACGTACGT")]);
    }

    #[test]
    fn parse_record_without_sequence_ok() {
        let records = parse(">chr1\n>chr2\nACGT\n").unwrap();
        assert_eq!(records, vec![rec("chr1", ""), rec("chr2", "ACGT")]);
    }

    #[test]
    fn parse_empty_input_yields_no_records() {
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn parse_sequence_before_header_err() {
        assert_eq!(
            parse("ACGT\n>chr1\nACGT\n"),
            Err("Error at FASTA line 1: sequence data before the first '>' header".to_string())
        );
    }

    #[test]
    fn parse_empty_identifier_err() {
        assert_eq!(
            parse(">chr1\nACGT\n>\nACGT\n"),
            Err("Error at FASTA line 3: record has an empty identifier".to_string())
        );
    }

    #[test]
    fn stream_plain_and_gzipped_files_match() {
        use flate2::{write::GzEncoder, Compression};
        use std::io::Write;

        let fasta = ">chr1\nTTAGGGTTAGGG\n>chr2\nCCCTAA\n";

        let mut plain = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        plain.write_all(fasta.as_bytes()).unwrap();
        plain.flush().unwrap();

        let mut gzipped = tempfile::Builder::new().suffix(".fa.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(&mut gzipped, Compression::default());
        encoder.write_all(fasta.as_bytes()).unwrap();
        encoder.finish().unwrap();
        gzipped.flush().unwrap();

        let (sender, receiver) = unbounded();
        stream_records_into_channel(plain.path(), sender).unwrap();
        let from_plain: Vec<_> = receiver.iter().collect();

        let (sender, receiver) = unbounded();
        stream_records_into_channel(gzipped.path(), sender).unwrap();
        let from_gzipped: Vec<_> = receiver.iter().collect();

        assert_eq!(from_plain, from_gzipped);
        assert_eq!(from_plain.len(), 2);
    }

    #[test]
    fn stream_missing_file_err() {
        let (sender, _receiver) = unbounded();
        let result = stream_records_into_channel(Path::new("does/not/exist.fa"), sender);
        assert!(result.is_err());
    }
}
