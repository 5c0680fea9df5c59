use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_extractor::{Method, TableFormat};

/// Extract text and tables from PDF files.
#[derive(Debug, Parser)]
#[command(name = "pdf-extractor", version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides this
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract text from PDF
    ExtractText {
        /// Input PDF file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output text file path. Default: the input with a .txt extension
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Text extraction method
        #[arg(long, value_enum, default_value_t = MethodArg::Auto)]
        text_method: MethodArg,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Extract tables from PDF
    ExtractTables {
        /// Input PDF file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory. Default: the input's directory
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Table extraction method
        #[arg(long, value_enum, default_value_t = MethodArg::Auto)]
        table_method: MethodArg,

        /// File format for saved tables
        #[arg(long, value_enum, default_value_t = FormatArg::Parquet)]
        format: FormatArg,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Extract both text and tables
    ExtractAll {
        /// Input PDF file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory. Default: the input's directory
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Text extraction method
        #[arg(long, value_enum, default_value_t = MethodArg::Auto)]
        text_method: MethodArg,

        /// Table extraction method
        #[arg(long, value_enum, default_value_t = MethodArg::Auto)]
        table_method: MethodArg,

        /// File format for saved tables
        #[arg(long, value_enum, default_value_t = FormatArg::Parquet)]
        format: FormatArg,

        #[command(flatten)]
        report: ReportArgs,
    },
}

/// How results are reported on stdout.
#[derive(Debug, Clone, Copy, Args)]
pub struct ReportArgs {
    /// Print a JSON summary instead of the human-readable lines
    #[arg(long)]
    pub json: bool,
}

/// Extraction method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Try pdf-extract, fall back to lopdf
    Auto,
    /// pdf-extract only
    PdfExtract,
    /// lopdf only
    Lopdf,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Auto => Method::Auto,
            MethodArg::PdfExtract => Method::PdfExtract,
            MethodArg::Lopdf => Method::Lopdf,
        }
    }
}

/// Table file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// zstd-compressed Parquet
    Parquet,
    /// Comma-separated values
    Csv,
    /// JSON array of records
    Json,
}

impl From<FormatArg> for TableFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Parquet => TableFormat::Parquet,
            FormatArg::Csv => TableFormat::Csv,
            FormatArg::Json => TableFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extract_text_defaults() {
        let cli = Cli::try_parse_from(["pdf-extractor", "extract-text", "a.pdf"]).unwrap();
        match cli.command {
            Commands::ExtractText {
                input,
                output,
                text_method,
                report,
            } => {
                assert_eq!(input, PathBuf::from("a.pdf"));
                assert!(output.is_none());
                assert_eq!(text_method, MethodArg::Auto);
                assert!(!report.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parse_extract_tables_options() {
        let cli = Cli::try_parse_from([
            "pdf-extractor",
            "-vv",
            "extract-tables",
            "a.pdf",
            "out",
            "--table-method",
            "pdf-extract",
            "--format",
            "csv",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::ExtractTables {
                output_dir,
                table_method,
                format,
                report,
                ..
            } => {
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert_eq!(Method::from(table_method), Method::PdfExtract);
                assert_eq!(TableFormat::from(format), TableFormat::Csv);
                assert!(report.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_method_is_rejected() {
        let result = Cli::try_parse_from([
            "pdf-extractor",
            "extract-all",
            "a.pdf",
            "--text-method",
            "tabula",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["pdf-extractor"]).is_err());
    }
}
