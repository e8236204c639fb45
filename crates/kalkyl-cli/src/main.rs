mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kalkyl",
    version,
    about = "Convert PDF documents to Excel workbooks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF file(s) to xlsx; multiple inputs become a zip archive
    Convert {
        /// Paths to PDF files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output path (default: <stem>.xlsx for one input, converted.zip for several)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Pages with fewer visible characters count as scanned (0 disables)
        #[arg(long, default_value_t = 1)]
        scanned_min_chars: usize,

        /// Skip pdfimages; flag every text-less page for OCR
        #[arg(long)]
        no_image_check: bool,

        /// Minimum run of spaces treated as a table column separator
        #[arg(long, default_value_t = 2)]
        min_gap: usize,
    },
    /// Extract a PDF into per-page tables/text without writing a workbook
    Extract {
        /// Path to PDF file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write extracted output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            files,
            out,
            scanned_min_chars,
            no_image_check,
            min_gap,
        } => commands::convert::run(files, out, scanned_min_chars, no_image_check, min_gap),
        Commands::Extract {
            input_file,
            output,
            out,
        } => commands::extract::run(input_file, &output, out),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
