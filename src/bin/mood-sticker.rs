use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use mood_sticker::{StickerRequest, TextEffect, compose_sticker, sticker_id};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mood-sticker", version, about = "Compose a 512x512 mood sticker PNG")]
struct Cli {
    /// Request JSON file. Flags below override its fields.
    #[arg(long = "request")]
    request_path: Option<PathBuf>,

    /// Mood name (happy, sad, angry, excited, calm, love, cool, tired).
    /// Anything else uses the fallback background.
    #[arg(long)]
    mood: Option<String>,

    /// Emoji glyph drawn in the middle.
    #[arg(long)]
    emoji: Option<String>,

    /// Caption text, at most 20 characters.
    #[arg(long)]
    text: Option<String>,

    /// Caption color as #RRGGBB.
    #[arg(long)]
    color: Option<String>,

    /// Caption effect.
    #[arg(long, value_enum)]
    effect: Option<TextEffect>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let request = build_request(&cli)?;

    let png = compose_sticker(&request).context("composing sticker")?;
    std::fs::write(&cli.out, &png)
        .with_context(|| format!("writing {}", cli.out.display()))?;

    // The id goes to stdout so callers can capture it.
    println!("{}", sticker_id(&png));
    Ok(())
}

fn build_request(cli: &Cli) -> anyhow::Result<StickerRequest> {
    let mut request = match &cli.request_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            StickerRequest::from_json(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => StickerRequest::default(),
    };

    if let Some(mood) = &cli.mood {
        request = request.with_mood_name(mood);
    }
    if let Some(emoji) = &cli.emoji {
        request = request.with_emoji(emoji.as_str());
    }
    if let Some(text) = &cli.text {
        request = request.with_text(text.as_str());
    }
    if let Some(color) = &cli.color {
        request = request
            .with_text_color_hex(color)
            .context("invalid --color")?;
    }
    if let Some(effect) = cli.effect {
        request = request.with_effect(effect);
    }

    request.validate()?;
    Ok(request)
}
