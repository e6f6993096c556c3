use argh::FromArgs;
use std::path::PathBuf;

use rgbdcloud::{
    assoc,
    config::RgbdConfig,
    k3d::rgbd::ExecutionStrategy,
    pipeline::{self, FailurePolicy, PipelineOptions},
};

#[derive(FromArgs)]
/// Reconstruct one colored PLY point cloud per correlated frame
struct Args {
    /// path to the correlated frame file
    #[argh(option, default = "PathBuf::from(\"timestamp_map.txt\")")]
    file_list: PathBuf,

    /// directory the image paths are relative to
    #[argh(option, default = "PathBuf::from(\".\")")]
    dataset_root: PathBuf,

    /// directory where the PLY files are saved
    #[argh(option, default = "PathBuf::from(\"output_ply\")")]
    output_dir: PathBuf,

    /// path to a JSON configuration file with the camera intrinsics
    #[argh(option)]
    config: Option<PathBuf>,

    /// skip frames that fail instead of stopping
    #[argh(switch)]
    continue_on_error: bool,

    /// process the pixels on a single thread
    #[argh(switch)]
    serial: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Args = argh::from_env();

    let config = match args.config {
        Some(path) => RgbdConfig::from_json_file(path)?,
        None => RgbdConfig::default(),
    };

    let frames = assoc::read_correlated_file(&args.file_list)?;
    log::info!(
        "read {} correlated frames from {}",
        frames.len(),
        args.file_list.display()
    );

    let options = PipelineOptions {
        dataset_root: args.dataset_root,
        output_dir: args.output_dir,
        camera: config.camera,
        strategy: if args.serial {
            ExecutionStrategy::Serial
        } else {
            ExecutionStrategy::Parallel
        },
        failure_policy: if args.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        },
    };

    let report = pipeline::process_correlated_frames(&frames, &options)?;
    for failure in report.failures.iter() {
        log::error!("frame {} failed: {}", failure.index, failure.error);
    }

    Ok(())
}
