//! One-shot playlist recommendation from the command line
//!
//! **Usage:**
//! ```bash
//! moodmix-cli photo.jpg --scene forest --emotion sad --emotion happy --object dog
//! ```
//!
//! Labels are given as flags, one `--emotion` per detected face. The image
//! path is only checked for existence and echoed in the report.

use anyhow::{bail, Result};
use clap::Parser;
use moodmix_common::config::{resolve_catalog_path, resolve_config_path, TomlConfig};
use moodmix_engine::{extract_signals, MusicEngine, Recommendation, Signals, StaticSignals};
use moodmix_server::logging;
use std::path::PathBuf;

/// Mood-based playlist for a single image
#[derive(Parser, Debug)]
#[command(name = "moodmix-cli", version)]
#[command(about = "Recommend a playlist from scene, face and object labels")]
struct Args {
    /// Image the labels were taken from
    image: Option<PathBuf>,

    /// Song catalog CSV
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scene label (e.g. forest, street, sea)
    #[arg(short, long)]
    scene: Option<String>,

    /// Emotion label of one detected face; repeat per face
    #[arg(short, long = "emotion", value_name = "EMOTION")]
    emotions: Vec<String>,

    /// Detected object label; repeat per object
    #[arg(short, long = "object", value_name = "OBJECT")]
    objects: Vec<String>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Report goes to stdout; keep logs to warnings unless RUST_LOG says otherwise
    let _log = logging::init_tracing("warn");

    let config_path = resolve_config_path(args.config.as_deref());
    let config = TomlConfig::load_or_default(config_path.as_deref());

    let image = args.image.clone().unwrap_or_default();
    if args.image.is_some() && !image.exists() {
        bail!("File '{}' not found", image.display());
    }

    let extractor = StaticSignals {
        faces: args.emotions,
        scene: args.scene,
        objects: args.objects,
    };
    let signals = extract_signals(&extractor, &image).await;

    let catalog_path = resolve_catalog_path(args.catalog.as_deref(), &config);
    let engine = MusicEngine::load(&catalog_path);
    let recommendation = engine.recommend_detailed(&signals);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        print_report(args.image.as_ref(), &signals, &recommendation);
    }

    Ok(())
}

fn print_report(image: Option<&PathBuf>, signals: &Signals, recommendation: &Recommendation) {
    if let Some(image) = image {
        println!("\nMOOD MUSIC FOR: {}", image.display());
    } else {
        println!("\nMOOD MUSIC");
    }
    println!("{}", "=".repeat(40));

    println!("\nDIAGNOSIS:");
    match &signals.emotion {
        Some(emotion) => println!("Face Detected:  {}", emotion.to_uppercase()),
        None => println!("Face Detected:  None"),
    }
    println!("Scene Detected: {}", signals.scene.to_uppercase());
    if !signals.objects.is_empty() {
        println!("Objects:        {}", signals.objects.join(", "));
    }

    let target = recommendation.target();
    println!(
        "Target:         valence {:.2}, energy {:.2}, danceability {:.2}, acousticness {:.2}",
        target[0], target[1], target[2], target[3]
    );

    println!("\nRECOMMENDED PLAYLIST:");
    println!("{}", "-".repeat(30));

    let playlist = recommendation.playlist();
    if playlist.is_empty() {
        println!("   (No songs found for this vibe yet!)");
    } else {
        for (i, song) in playlist.iter().enumerate() {
            println!("   {}. {} - {}", i + 1, song.title, song.artist);
            println!("      {}", song.link);
        }
    }

    println!("{}", "-".repeat(30));
}
