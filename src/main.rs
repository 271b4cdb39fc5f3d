use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use cardpng::{
    embed_card, extract_card, inspect_text_chunks, remove_card, CardDocument, CardResult,
};

#[derive(Parser)]
#[command(name = "cardpng")]
#[command(about = "Embed and recover character-card JSON in PNG text chunks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a card JSON file into a PNG
    Embed {
        /// Path to input PNG file
        #[arg(short, long)]
        png: PathBuf,

        /// Path to card JSON file
        #[arg(short, long)]
        card: PathBuf,

        /// Path for the output PNG
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Extract the card from a PNG as canonical JSON
    Extract {
        /// Path to input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Path for the extracted JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Strip any embedded card from a PNG
    Remove {
        /// Path to input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Path for the stripped PNG
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the text chunks of a PNG
    Inspect {
        /// Path to input PNG file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Embed { png, card, output } => {
            let png_data = read_file(&png).with_context(|| format!("reading {}", png.display()))?;
            let card_text = fs::read_to_string(&card)
                .with_context(|| format!("reading {}", card.display()))?;

            // Canonicalize whatever shape the card file is in before writing
            let value: serde_json::Value = serde_json::from_str(&card_text)
                .with_context(|| format!("parsing {}", card.display()))?;
            let Some(doc) = CardDocument::from_value(&value) else {
                bail!("{} holds no recognizable card fields", card.display());
            };

            let embedded = embed_card(&png_data, &doc.to_canonical_json())?;
            fs::write(&output, &embedded)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Embedded card into {} ({} bytes)", output.display(), embedded.len());
        }

        Commands::Extract { input, output } => {
            let data = read_file(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let card = extract_card(&data)
                .with_context(|| format!("extracting from {}", input.display()))?;

            let json = card.to_canonical_json();
            match output {
                Some(path) => {
                    fs::write(&path, &json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Card written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Commands::Remove { input, output } => {
            let data = read_file(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let stripped = remove_card(&data)?;
            fs::write(&output, &stripped)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Stripped card chunks: {} -> {}", input.display(), output.display());
        }

        Commands::Inspect { input } => {
            let data = read_file(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let infos = inspect_text_chunks(&data)?;

            if infos.is_empty() {
                println!("No text chunks found");
            }
            for info in infos {
                println!(
                    "{} {:<20} {:>8} bytes  json={}  crc={}",
                    info.chunk_type,
                    info.keyword,
                    info.text_len,
                    if info.is_json { "yes" } else { "no" },
                    if info.crc_ok { "ok" } else { "MISMATCH" },
                );
            }
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> CardResult<Vec<u8>> {
    Ok(fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpng::CardError;

    #[test]
    fn test_read_file_missing_path_is_io_error() {
        let err = read_file(Path::new("/nonexistent/missing.png")).unwrap_err();
        assert!(matches!(err, CardError::Io(_)));
    }
}
