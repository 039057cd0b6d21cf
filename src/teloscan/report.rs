use crate::teloscan::detect::{Detection, TelomereMatch};
use itertools::Itertools;
use std::cmp::Reverse;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqReport {
    /// Ordinal of the record in the input file; breaks ordering ties.
    pub index: usize,
    pub id: String,
    pub length: usize,
    pub detection: Detection,
}

/// Entries with telomeres on both ends come first, then one end, then none.
/// Within a class the original input order is preserved.
pub fn sort_reports(reports: &mut [SeqReport]) {
    reports.sort_by_key(|r| (Reverse(r.detection.num_ends()), r.index));
}

pub fn write_reports(reports: &[SeqReport], out: &mut impl Write) -> io::Result<()> {
    for report in reports {
        writeln!(out, "Entry: {}", report.id)?;
        writeln!(out, "  Length: {}", report.length)?;
        write_end(out, "Left", &report.detection.left)?;
        write_end(out, "Right", &report.detection.right)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_end(out: &mut impl Write, label: &str, telomere: &Option<TelomereMatch>) -> io::Result<()> {
    match telomere {
        Some(t) => writeln!(
            out,
            "  {} telomere: YES ({}) (positions {}-{}) sequence: {}",
            label, t.motif, t.start, t.end, t.seq
        ),
        None => writeln!(out, "  {} telomere: NO", label),
    }
}

pub fn log_summary(reports: &[SeqReport]) {
    let tallies = reports.iter().counts_by(|r| r.detection.num_ends());
    let count = |ends: usize| tallies.get(&ends).copied().unwrap_or(0);
    log::info!(
        "Scanned {} sequences: both ends={}, one end={}, none={}",
        reports.len(),
        count(2),
        count(1),
        count(0)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teloscan::detect::{detect, Params};

    fn report(index: usize, id: &str, seq: &str) -> SeqReport {
        let params = Params::new(
            vec!["TTAGGG".to_string(), "CCCTAA".to_string()],
            5,
            200,
            None,
        )
        .unwrap();
        SeqReport {
            index,
            id: id.to_string(),
            length: seq.len(),
            detection: detect(seq, &params),
        }
    }

    fn telomere(n: usize) -> String {
        "TTAGGG".repeat(n)
    }

    fn spacer() -> String {
        "ACGT".repeat(100)
    }

    #[test]
    fn reports_ordered_by_detected_ends_then_input_order() {
        let none_a = report(0, "none_a", &spacer());
        let one = report(1, "one", &format!("{}{}", telomere(5), spacer()));
        let none_b = report(2, "none_b", &spacer());
        let both = report(
            3,
            "both",
            &format!("{}{}{}", telomere(5), spacer(), "CCCTAA".repeat(5)),
        );

        let mut reports = vec![none_a, one, none_b, both];
        sort_reports(&mut reports);
        let order = reports.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
        assert_eq!(order, vec!["both", "one", "none_a", "none_b"]);
    }

    #[test]
    fn write_report_block_with_both_ends() {
        let entry = report(
            0,
            "chr1",
            &format!("{}{}{}", telomere(5), spacer(), "CCCTAA".repeat(5)),
        );
        let mut out = Vec::new();
        write_reports(&[entry], &mut out).unwrap();
        let expected = concat!(
            "Entry: chr1\n",
            "  Length: 460\n",
            "  Left telomere: YES (TTAGGG) (positions 1-30) sequence: TTAGGGTTAGGGTTAGGGTTAGGGTTAGGG\n",
            "  Right telomere: YES (CCCTAA) (positions 431-460) sequence: CCCTAACCCTAACCCTAACCCTAACCCTAA\n",
            "\n",
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn write_report_block_without_telomeres() {
        let entry = report(0, "chrU", "ACGT");
        let mut out = Vec::new();
        write_reports(&[entry], &mut out).unwrap();
        let expected = concat!(
            "Entry: chrU\n",
            "  Length: 4\n",
            "  Left telomere: NO\n",
            "  Right telomere: NO\n",
            "\n",
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
