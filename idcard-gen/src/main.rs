use clap::{Parser, Subcommand, ValueEnum};
use idcard_gen_rs::{CardLayoutEngine, CardRecord, DocumentExporter, PdfMode};
use std::path::PathBuf;

/// idcard-gen: renders a servidor ID card and exports it as PDF or JPEG files
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export both card faces as a single A4 PDF
    Pdf {
        /// Path to the card record JSON file
        #[clap(short, long)]
        input: PathBuf,

        /// Output base name (".pdf" is appended)
        #[clap(short, long)]
        output: PathBuf,

        /// Page arrangement
        #[clap(short, long, value_enum, default_value = "full")]
        mode: ModeArg,
    },
    /// Export both card faces as standalone JPEG images
    Images {
        /// Path to the card record JSON file
        #[clap(short, long)]
        input: PathBuf,

        /// Output base name ("_FRENTE.jpg" / "_VERSO.jpg" are appended)
        #[clap(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// One face per page, full-bleed
    Full,
    /// Both faces side by side on one page
    Clone,
}

impl From<ModeArg> for PdfMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => PdfMode::Full,
            ModeArg::Clone => PdfMode::Clone,
        }
    }
}

fn read_card(path: &PathBuf) -> Option<CardRecord> {
    let card_str = match std::fs::read_to_string(path) {
        Ok(card_str) => card_str,
        Err(err) => {
            eprintln!("Failed to read input file: {}\n{}", path.display(), err);
            return None;
        }
    };

    match serde_json::from_str::<CardRecord>(&card_str) {
        Ok(card) => Some(card),
        Err(err) => {
            eprintln!("Failed to parse input file as a card record: {}", err);
            None
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args: Args = Args::parse();

    let exporter = DocumentExporter::new(CardLayoutEngine::new());

    match args.command {
        Command::Pdf {
            input,
            output,
            mode,
        } => {
            let Some(card) = read_card(&input) else {
                std::process::exit(1);
            };
            match exporter.export_to_pdf(&card, mode.into(), &output).await {
                Ok(path) => println!("Wrote {}", path.display()),
                Err(err) => {
                    eprintln!("PDF export failed: {}", err);
                    std::process::exit(1);
                }
            }
        }
        Command::Images { input, output } => {
            let Some(card) = read_card(&input) else {
                std::process::exit(1);
            };
            match exporter.export_to_images(&card, &output).await {
                Ok((front, back)) => {
                    println!("Wrote {}", front.display());
                    println!("Wrote {}", back.display());
                }
                Err(err) => {
                    eprintln!("Image export failed: {}", err);
                    std::process::exit(1);
                }
            }
        }
    }
}
