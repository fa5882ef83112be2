use anyhow::{anyhow, Result};
use std::io::Write;

use crate::types::DatasetResult;

/// Header line of the TSV report.
pub const REPORT_HEADER: &str = "dataset\theterozygous\thomozygous\n";

/// Write dataset calls as TSV: accession, heterozygous and homozygous
/// variants, each list space-separated.
pub fn write_report<W: Write>(writer: &mut W, results: &[DatasetResult]) -> Result<()> {
    writer.write_all(REPORT_HEADER.as_bytes())?;

    for result in results {
        let line = format!(
            "{accession}\t{heterozygous}\t{homozygous}\n",
            accession = result.accession,
            heterozygous = result.heterozygous.join(" "),
            homozygous = result.homozygous.join(" "),
        );
        writer.write_all(line.as_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the report into a string (useful for tests and snapshots).
pub fn render_report(results: &[DatasetResult]) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(&mut buffer, results)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered report is not valid UTF-8"))
}
