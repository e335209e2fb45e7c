use std::io::Write;

use marketcfg::ValidationReport;

use crate::error::CliError;

/// Write `report` as indented text, or as one JSON document in `json_mode`.
///
/// Text layout: one header line per market followed by its diagnostics,
/// then every recorded error.
pub fn write_report<W: Write>(
    report: &ValidationReport,
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    if json_mode {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)?;
        writer.flush()?;
        return Ok(());
    }

    for market in &report.markets {
        writeln!(writer, "{}", market.header())?;
        for diagnostic in &market.diagnostics {
            writeln!(writer, "    {diagnostic}")?;
        }
    }

    if report.has_errors() {
        writeln!(writer)?;
        for error in &report.errors {
            writeln!(writer, "{error}")?;
        }
    }

    writeln!(
        writer,
        "{} markets checked on {}, {} errors",
        report.markets.len(),
        report.network,
        report.errors.len()
    )?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketcfg::{Network, ParamSource, RunOptions};

    async fn arbitrum_report() -> ValidationReport {
        marketcfg::run(&RunOptions::new(Network::Arbitrum)).await.unwrap()
    }

    #[tokio::test]
    async fn test_text_report() {
        let report = arbitrum_report().await;
        let mut out = Vec::new();
        write_report(&report, false, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("(declared) index: BTC"), "{first}");
        assert!(text.lines().nth(1).unwrap().starts_with("    Position impact"));
        assert!(text.trim_end().ends_with("errors"));
    }

    #[tokio::test]
    async fn test_json_report() {
        let report = arbitrum_report().await;
        let mut out = Vec::new();
        write_report(&report, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["network"], "arbitrum");
        assert_eq!(value["source"], "static");
        assert_eq!(value["markets"].as_array().unwrap().len(), report.markets.len());
        assert_eq!(report.source, ParamSource::Static);
    }
}
