use std::path::PathBuf;

use adoption_app::OutputFormat;
use clap::{Parser, ValueEnum};
use tracing::Level;

/// Synthesize HTTPS adoption data
#[derive(Debug, Parser)]
#[command(name = "https-adoption")]
#[command(about = "Join Firefox secure-pageload telemetry with certificate issuance counts")]
pub struct CliArgs {
    /// Configure the logging level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: Level,

    /// The directory to cache downloaded files in (defaults to the system temp dir)
    #[arg(long, env = "HTTPS_ADOPTION_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// TOML config file with the url base, validation policy and filters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read pageload telemetry from this CSV instead of downloading it
    #[arg(long)]
    pub pageloads: Option<PathBuf>,

    /// Read the issuance timeline from this TSV instead of downloading it
    #[arg(long)]
    pub issuance: Option<PathBuf>,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    pub format: FormatArg,

    /// Skip malformed pageload rows instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => Self::Csv,
            FormatArg::Json => Self::JsonLines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["https-adoption"]).expect("parse");
        assert_eq!(args.log_level, Level::WARN);
        assert_eq!(args.output, PathBuf::from("-"));
        assert_eq!(args.format, FormatArg::Csv);
        assert!(!args.skip_invalid);
        assert!(args.pageloads.is_none());
    }

    #[test]
    fn local_sources_and_format() {
        let args = CliArgs::try_parse_from([
            "https-adoption",
            "--log-level",
            "debug",
            "--pageloads",
            "p.csv",
            "--issuance",
            "i.tsv",
            "-o",
            "out.json",
            "--format",
            "json",
            "--skip-invalid",
        ])
        .expect("parse");
        assert_eq!(args.log_level, Level::DEBUG);
        assert_eq!(args.pageloads, Some(PathBuf::from("p.csv")));
        assert_eq!(args.issuance, Some(PathBuf::from("i.tsv")));
        assert_eq!(args.output, PathBuf::from("out.json"));
        assert_eq!(OutputFormat::from(args.format), OutputFormat::JsonLines);
        assert!(args.skip_invalid);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(CliArgs::try_parse_from(["https-adoption", "--log-level", "loud"]).is_err());
    }
}
