//! Dal Split command line
//!
//! Usage:
//!   dalsplit preview --daal 1.000 --tukdi 2.000 --red-black 0.5 ...
//!   dalsplit report  --daal 1.000 ... --party "Shree Traders" --image photo.jpg
//!   dalsplit config  [--init]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dalsplit_core::calc::{DerivedRecord, MeasurementField};
use dalsplit_core::config::ReportConfig;
use dalsplit_core::input::{parse_measurements, GaadiType, ReportMeta};
use dalsplit_core::report::{
    report_file_name, JsonPresenter, PdfPresenter, Presenter, ReportImage, TablePresenter,
};

/// Dal split weight calculator and report generator
#[derive(Parser, Debug)]
#[command(name = "dalsplit", version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/dalsplit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the preview table for a sample
    Preview {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the two-page PDF report
    Report {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Photo for the first page (JPEG or PNG)
        #[arg(long)]
        image: Option<PathBuf>,

        /// Output file (default: generated name in the configured output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

/// Form fields shared by `preview` and `report`
#[derive(Args, Debug)]
struct SheetArgs {
    /// Daal weight in grams
    #[arg(long, allow_hyphen_values = true)]
    daal: Option<String>,

    /// Tukdi weight in grams
    #[arg(long, allow_hyphen_values = true)]
    tukdi: Option<String>,

    /// Red/Black weight in grams
    #[arg(long, allow_hyphen_values = true)]
    red_black: Option<String>,

    /// Chhala weight in grams
    #[arg(long, allow_hyphen_values = true)]
    chhala: Option<String>,

    /// Dankhal weight in grams
    #[arg(long, allow_hyphen_values = true)]
    dankhal: Option<String>,

    /// 14 Mesh weight in grams
    #[arg(long, allow_hyphen_values = true)]
    mesh14: Option<String>,

    /// Sample date, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Vehicle number
    #[arg(long, default_value = "")]
    vehicle: String,

    /// Party name
    #[arg(long, default_value = "")]
    party: String,

    /// Gaadi type: khadi or poori
    #[arg(long, default_value = "khadi")]
    gaadi: GaadiType,
}

impl SheetArgs {
    fn meta(&self) -> ReportMeta {
        let meta = match self.date {
            Some(date) => ReportMeta::new(date),
            None => ReportMeta::today(),
        };
        meta.with_vehicle(self.vehicle.as_str())
            .with_party(self.party.as_str())
            .with_gaadi_type(self.gaadi)
    }

    fn record(&self) -> Result<DerivedRecord> {
        let fields = [
            (MeasurementField::Daal, &self.daal),
            (MeasurementField::Tukdi, &self.tukdi),
            (MeasurementField::RedBlack, &self.red_black),
            (MeasurementField::Chhala, &self.chhala),
            (MeasurementField::Dankhal, &self.dankhal),
            (MeasurementField::Mesh14, &self.mesh14),
        ];
        let measurements = parse_measurements(
            fields
                .iter()
                .map(|(field, text)| (*field, text.as_deref().unwrap_or(""))),
        )?;
        tracing::info!(?measurements, "measurements collected");
        Ok(measurements.derive()?)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    match cli_path {
        Some(path) => Some(path.to_path_buf()),
        None => ReportConfig::default_path()
            .map_err(|e| tracing::warn!("{e}, using default configuration"))
            .ok(),
    }
}

/// Write the built-in defaults to `path`, replacing any existing file
fn init_config(path: &Path) -> Result<()> {
    ReportConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write config {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = config_path(cli.config.as_deref());
    let config = config_path
        .as_deref()
        .map(ReportConfig::load_or_default)
        .unwrap_or_default();

    match cli.command {
        Command::Preview { sheet, json } => {
            let record = sheet.record()?;
            let meta = sheet.meta();
            let bytes = if json {
                JsonPresenter.render(&record, &meta, None)?
            } else {
                TablePresenter::with_title(&config.app_title).render(&record, &meta, None)?
            };
            io::stdout().write_all(&bytes)?;
        }

        Command::Report {
            sheet,
            image,
            output,
        } => {
            let record = sheet.record()?;
            let meta = sheet.meta();
            let image = image
                .as_deref()
                .map(|path| {
                    ReportImage::from_path(path)
                        .with_context(|| format!("Failed to read image {}", path.display()))
                })
                .transpose()?;

            let path = output.unwrap_or_else(|| config.output_path(&report_file_name(&meta)));
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }

            PdfPresenter::from_config(&config)
                .write_to(&path, &record, &meta, image.as_ref())
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            println!("Report written: {}", path.display());
        }

        Command::Config { init } => {
            if init {
                let path = config_path.context("No config path available; pass --config")?;
                init_config(&path)?;
                println!("Config written: {}", path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_preview_args() {
        let cli = Cli::try_parse_from([
            "dalsplit", "preview", "--daal", "1.000", "--tukdi", "2", "--red-black", "0.5",
            "--chhala", "0.25", "--dankhal", "0.125", "--date", "2024-05-20", "--gaadi", "Poori",
        ])
        .unwrap();
        let Command::Preview { sheet, json } = cli.command else {
            panic!("expected preview");
        };
        assert!(!json);

        let record = sheet.record().unwrap();
        assert_eq!(record.grand_total_g, 7.75);
        assert_eq!(record.total6_pct, 77.5);

        let meta = sheet.meta();
        assert_eq!(meta.display_date(), "20/05/2024");
        assert_eq!(meta.gaadi_type, GaadiType::Poori);
    }

    #[test]
    fn test_negative_measurement_rejected() {
        let cli = Cli::try_parse_from(["dalsplit", "preview", "--daal", "-1"]).unwrap();
        let Command::Preview { sheet, .. } = cli.command else {
            panic!("expected preview");
        };
        let err = sheet.record().unwrap_err();
        assert!(err.to_string().contains("Daal"));
    }

    #[test]
    fn test_report_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out").join("report.pdf");
        let cli = Cli::try_parse_from([
            "dalsplit",
            "report",
            "--daal",
            "1",
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();
        let Command::Report { sheet, output, .. } = cli.command else {
            panic!("expected report");
        };
        let path = output.unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        PdfPresenter::default()
            .write_to(&path, &sheet.record().unwrap(), &sheet.meta(), None)
            .unwrap();
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn test_metadata_passed_through_unchanged() {
        let cli = Cli::try_parse_from([
            "dalsplit", "preview", "--vehicle", " GJ 01 ", "--party", "  Shree Traders",
        ])
        .unwrap();
        let Command::Preview { sheet, .. } = cli.command else {
            panic!("expected preview");
        };
        let meta = sheet.meta();
        assert_eq!(meta.vehicle_number, " GJ 01 ");
        assert_eq!(meta.party_name, "  Shree Traders");
    }

    #[test]
    fn test_init_config_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let custom = ReportConfig {
            company_name: "ACME PULSES".into(),
            ..Default::default()
        };
        custom.save(&path).unwrap();

        init_config(&path).unwrap();
        assert_eq!(ReportConfig::load(&path).unwrap(), ReportConfig::default());
    }

    #[test]
    fn test_bad_gaadi_rejected() {
        assert!(Cli::try_parse_from(["dalsplit", "preview", "--gaadi", "half"]).is_err());
    }
}
