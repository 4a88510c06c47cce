//! Inspect a dump directory the way the training pipeline will see it:
//! discovery, id derivation, and length filtering, without starting a run.
//!
//! Usage: dataset_stats <root_dir> [audio_query] [mel_query] [threshold]

use std::path::Path;

use color_eyre::eyre::{eyre, Result};

use audiogan::dataset::{AudioMelDataset, ExampleDataset};
use audiogan::io::{json_audio_loader, json_mel_loader};

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let root = args
        .next()
        .ok_or_else(|| eyre!("usage: dataset_stats <root_dir> [audio_query] [mel_query] [threshold]"))?;
    let audio_query = args.next().unwrap_or_else(|| "*-wave.json".to_string());
    let mel_query = args.next().unwrap_or_else(|| "*-feats.json".to_string());
    let threshold = args.next().map(|raw| raw.parse::<usize>()).transpose()?;

    let dataset = AudioMelDataset::new(
        Path::new(&root),
        &audio_query,
        &mel_query,
        json_audio_loader(),
        json_mel_loader(),
        threshold,
        None,
        true,
    )?;

    println!("{}: {} examples", dataset.name(), dataset.len());
    println!("output dtypes: {:?}", dataset.output_dtypes());
    for utt_id in dataset.utt_ids() {
        println!("  {utt_id}");
    }

    Ok(())
}
