use argh::FromArgs;
use std::path::PathBuf;

use rgbdcloud::assoc::{self, CorrelationPolicy};
use rgbdcloud::config::RgbdConfig;

#[derive(FromArgs)]
/// Associate depth maps, color images and ground truth poses by timestamp
struct Args {
    /// path to the depth map list
    #[argh(option, default = "PathBuf::from(\"depth.txt\")")]
    depth: PathBuf,

    /// path to the color image list
    #[argh(option, default = "PathBuf::from(\"rgb.txt\")")]
    rgb: PathBuf,

    /// path to the ground truth trajectory
    #[argh(option, default = "PathBuf::from(\"groundtruth.txt\")")]
    groundtruth: PathBuf,

    /// path to the correlated frame file to write
    #[argh(option, default = "PathBuf::from(\"timestamp_map.txt\")")]
    output: PathBuf,

    /// path to a JSON configuration file
    #[argh(option)]
    config: Option<PathBuf>,

    /// time offset added to the color and pose stamps, in seconds
    #[argh(option)]
    offset: Option<f64>,

    /// maximum time difference of a match, in seconds
    #[argh(option)]
    max_difference: Option<f64>,

    /// pose selection: first_match or nearest
    #[argh(option, from_str_fn(parse_policy))]
    policy: Option<CorrelationPolicy>,
}

fn parse_policy(value: &str) -> Result<CorrelationPolicy, String> {
    match value {
        "first_match" => Ok(CorrelationPolicy::FirstMatch),
        "nearest" => Ok(CorrelationPolicy::Nearest),
        _ => Err(format!("unknown policy '{value}', expected first_match or nearest")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Args = argh::from_env();

    let mut config = match args.config {
        Some(path) => RgbdConfig::from_json_file(path)?.association,
        None => Default::default(),
    };
    if let Some(offset) = args.offset {
        config.offset = offset;
    }
    if let Some(max_difference) = args.max_difference {
        config.max_difference = max_difference;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }

    let depth = assoc::read_stamped_file(&args.depth)?;
    let rgb = assoc::read_stamped_file(&args.rgb)?;
    let groundtruth = assoc::read_stamped_file(&args.groundtruth)?;
    log::info!(
        "read {} depth maps, {} color images and {} poses",
        depth.len(),
        rgb.len(),
        groundtruth.len()
    );

    let triples = assoc::correlate_streams(&depth, &rgb, &groundtruth, &config);
    let num_lines =
        assoc::write_correlated_file(&args.output, &triples, &depth, &rgb, &groundtruth)?;

    log::info!("output written to {} ({num_lines} lines)", args.output.display());

    Ok(())
}
