use hog_features::config::extract::{load_config, FeatureConfig};
use hog_features::diagnostics::TimingBreakdown;
use hog_features::features::{compute_fhog_with_timing, compute_hog_with_timing, FeatureTensor};
use hog_features::image::io::{load_image_f32, save_channel_png, write_json_file};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let image = load_image_f32(&config.input, config.color)?;
    let input = image.as_input();
    let (tensor, timing) = match &config.features {
        FeatureConfig::Hog(params) => compute_hog_with_timing(&input, params),
        FeatureConfig::Fhog(params) => compute_fhog_with_timing(&input, params),
    }
    .map_err(|e| e.to_string())?;

    let summary = ExtractSummary {
        feature: config.features.name(),
        width: image.width(),
        height: image.height(),
        channels_in: image.channels(),
        channels: tensor.channels,
        cells_x: tensor.cells_x,
        cells_y: tensor.cells_y,
        channel_stats: channel_stats(&tensor),
        timing,
    };
    write_json_file(&config.output.summary_json, &summary)?;
    println!(
        "Saved {} summary ({} channels, {}x{} cells) to {}",
        summary.feature,
        summary.channels,
        summary.cells_x,
        summary.cells_y,
        config.output.summary_json.display()
    );

    if let Some(dir) = &config.output.channels_dir {
        for c in 0..tensor.channels {
            save_channel_png(&tensor.channel(c), &dir.join(format!("channel_{c:02}.png")))?;
        }
        println!("Saved {} channel images to {}", tensor.channels, dir.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: fhog_extract <config.json>".to_string()
}

fn channel_stats(tensor: &FeatureTensor) -> Vec<ChannelStats> {
    (0..tensor.channels)
        .map(|c| {
            let values = tensor.channel_slice(c);
            let sum: f32 = values.iter().sum();
            ChannelStats {
                index: c,
                mean: if values.is_empty() { 0.0 } else { sum / values.len() as f32 },
                max: values.iter().copied().fold(0.0, f32::max),
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractSummary {
    feature: &'static str,
    width: usize,
    height: usize,
    channels_in: usize,
    channels: usize,
    cells_x: usize,
    cells_y: usize,
    channel_stats: Vec<ChannelStats>,
    timing: TimingBreakdown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStats {
    index: usize,
    mean: f32,
    max: f32,
}
