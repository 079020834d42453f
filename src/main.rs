mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use ravenfoot::{
    BundledSource, DirectorySource, GenerationRequest, KeystreamRng, PassphraseGenerator,
    SourceManifest, VocabularyCollection, breakdown,
};
use std::path::{Path, PathBuf};

const MAX_TOKEN_COUNT: i64 = 256;
const MAX_BATCH: u64 = 1000;

#[derive(Parser)]
#[command(
    name = "ravenfoot",
    version,
    about = "Memorable passphrases from mixed word lists, with an entropy estimate",
    allow_negative_numbers = true
)]
struct Cli {
    /// Words per passphrase
    #[arg(
        short,
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(i64).range(..=MAX_TOKEN_COUNT)
    )]
    words: i64,

    /// Special characters per passphrase
    #[arg(
        short,
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(i64).range(..=MAX_TOKEN_COUNT)
    )]
    specials: i64,

    /// Digits per passphrase
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(i64).range(..=MAX_TOKEN_COUNT)
    )]
    numbers: i64,

    /// Passphrases to generate
    #[arg(
        short,
        long,
        default_value_t = 10,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(0..=MAX_BATCH)
    )]
    count: usize,

    /// Library directory with *_words_clean.txt, special_characters.txt and
    /// numbers.txt (defaults to the bundled library)
    #[arg(short, long, value_name = "DIR")]
    library: Option<PathBuf>,

    /// Derive the random stream from a phrase, making the batch reproducible
    #[arg(long, value_name = "PHRASE")]
    seed: Option<String>,

    /// Only print the entropy estimate
    #[arg(short, long)]
    entropy_only: bool,

    /// Print bare passphrases without stats
    #[arg(short, long)]
    quiet: bool,
}

fn load_vocabulary(
    library: Option<&Path>,
    options: &ui::DisplayOptions,
) -> Result<VocabularyCollection> {
    let (vocab, warnings) = match library {
        Some(dir) => {
            let source = DirectorySource::new(dir);
            let manifest = match source.manifest() {
                Ok(manifest) => manifest,
                Err(e) => {
                    ui::print_warnings(
                        &[ravenfoot::LoadWarning::Unreadable {
                            source: source.root().display().to_string(),
                            reason: format!("{:#}", e),
                        }],
                        options,
                    )?;
                    SourceManifest {
                        word_lists: Vec::new(),
                        specials: ravenfoot::library::SPECIALS_FILE.to_string(),
                        numbers: ravenfoot::library::NUMBERS_FILE.to_string(),
                    }
                }
            };
            VocabularyCollection::load(&source, &manifest)
        }
        None => VocabularyCollection::load(&BundledSource, &BundledSource.manifest()),
    };

    ui::print_warnings(&warnings, options).context("Failed to write warnings")?;
    Ok(vocab)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    let vocab = load_vocabulary(cli.library.as_deref(), &options)?;
    let request = GenerationRequest::clamped(cli.words, cli.specials, cli.numbers);
    let entropy = breakdown(&request, &vocab);

    if cli.entropy_only {
        ui::display_stats(&request, &vocab, &entropy, &options);
        return Ok(());
    }

    let mut rng = match cli.seed.as_deref() {
        Some(phrase) => KeystreamRng::from_phrase(phrase),
        None => KeystreamRng::from_os_entropy(),
    };

    let generator = PassphraseGenerator::new(&vocab);
    let passwords = generator.generate_batch(&request, cli.count, &mut rng);

    ui::display_output(&passwords, &request, &vocab, &entropy, &options);

    Ok(())
}
