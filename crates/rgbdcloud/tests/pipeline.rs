use std::path::Path;

use approx::assert_relative_eq;
use rgbdcloud::{
    assoc::{self, AssociationConfig, CorrelatedFrame},
    image::{Image, ImageSize},
    io::png::{write_image_png_gray16, write_image_png_gray8, write_image_png_rgb8},
    k3d::{
        io::ply::read_ply_ascii,
        rgbd::{ExecutionStrategy, RgbdError},
    },
    pipeline::{self, FailurePolicy, PipelineError, PipelineOptions},
};

const SIZE: ImageSize = ImageSize {
    width: 4,
    height: 3,
};

// depth samples in raster order, two of them without measurement
const DEPTH: [u16; 12] = [
    5000, 0, 5000, 5000, //
    5000, 5000, 10000, 5000, //
    5000, 5000, 5000, 0,
];

fn write_frame(root: &Path, stamp: &str) -> Result<(), Box<dyn std::error::Error>> {
    let color = Image::<u8, 3>::new(
        SIZE,
        (0..SIZE.num_pixels())
            .flat_map(|i| [i as u8, 100 + i as u8, 200])
            .collect(),
    )?;
    let depth = Image::<u16, 1>::new(SIZE, DEPTH.to_vec())?;
    write_image_png_rgb8(root.join("rgb").join(format!("{stamp}.png")), &color)?;
    write_image_png_gray16(root.join("depth").join(format!("{stamp}.png")), &depth)?;
    Ok(())
}

fn write_dataset(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(root.join("rgb"))?;
    std::fs::create_dir_all(root.join("depth"))?;

    std::fs::write(
        root.join("depth.txt"),
        "# depth maps\n# timestamp filename\n\
         10.000 depth/10.000.png\n\
         11.000 depth/11.000.png\n\
         12.000 depth/12.000.png\n",
    )?;
    std::fs::write(
        root.join("rgb.txt"),
        "# color images\n\
         10.010 rgb/10.010.png\n\
         11.005 rgb/11.005.png\n\
         12.500 rgb/12.500.png\n",
    )?;
    std::fs::write(
        root.join("groundtruth.txt"),
        "# timestamp tx ty tz qx qy qz qw\n\
         10.004 0.0 0.0 0.0 0.0 0.0 0.0 1.0\n\
         11.001 1.0 2.0 3.0 0.0 0.0 0.0 1.0\n",
    )?;

    for stamp in ["10.000", "11.000", "12.000"] {
        write_frame(root, stamp)?;
    }
    // color images named after their own stamps
    for (depth_stamp, color_stamp) in [("10.000", "10.010"), ("11.000", "11.005")] {
        std::fs::rename(
            root.join("rgb").join(format!("{depth_stamp}.png")),
            root.join("rgb").join(format!("{color_stamp}.png")),
        )?;
    }
    Ok(())
}

fn correlate_dataset(root: &Path) -> Result<Vec<CorrelatedFrame>, Box<dyn std::error::Error>> {
    let depth = assoc::read_stamped_file(root.join("depth.txt"))?;
    let color = assoc::read_stamped_file(root.join("rgb.txt"))?;
    let pose = assoc::read_stamped_file(root.join("groundtruth.txt"))?;

    let triples = assoc::correlate_streams(&depth, &color, &pose, &AssociationConfig::default());
    let map_path = root.join("timestamp_map.txt");
    assoc::write_correlated_file(&map_path, &triples, &depth, &color, &pose)?;

    Ok(assoc::read_correlated_file(&map_path)?)
}

#[test]
fn associate_and_reconstruct() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let tmp_dir = tempfile::tempdir()?;
    let root = tmp_dir.path();
    write_dataset(root)?;

    let frames = correlate_dataset(root)?;
    // the third depth map has neither a color image nor a pose in range
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].depth_stamp, 10.0);
    assert_eq!(frames[0].color_stamp, 10.01);
    assert_eq!(frames[0].pose_stamp, 10.004);
    assert_eq!(frames[1].pose.translation, [1.0, 2.0, 3.0]);

    let options = PipelineOptions {
        dataset_root: root.to_path_buf(),
        output_dir: root.join("output_ply"),
        ..Default::default()
    };
    let report = pipeline::process_correlated_frames(&frames, &options)?;
    assert!(report.failures.is_empty());
    assert_eq!(report.written.len(), 2);
    assert_eq!(
        report.written[1].ply_path,
        root.join("output_ply").join("point_cloud1.ply")
    );

    let first = read_ply_ascii(&report.written[0].ply_path)?;
    let second = read_ply_ascii(&report.written[1].ply_path)?;
    assert_eq!(first.len(), 10);
    assert_eq!(report.written[0].num_points, 10);

    // pixel (0, 0) with identity pose, then shifted by the second pose
    let p0 = first.points()[0];
    assert_relative_eq!(p0[0], -319.5 / 525.0, epsilon = 1e-12);
    assert_relative_eq!(p0[1], -239.5 / 525.0, epsilon = 1e-12);
    assert_relative_eq!(p0[2], 1.0, epsilon = 1e-12);
    let q0 = second.points()[0];
    assert_relative_eq!(q0[0], p0[0] + 1.0, epsilon = 1e-12);
    assert_relative_eq!(q0[1], p0[1] + 2.0, epsilon = 1e-12);
    assert_relative_eq!(q0[2], p0[2] + 3.0, epsilon = 1e-12);

    // pixel (2, 1) has twice the depth
    let colors = first.colors().ok_or("missing colors")?;
    let k = colors
        .iter()
        .position(|c| *c == [6, 106, 200])
        .ok_or("missing pixel 6")?;
    assert_relative_eq!(first.points()[k][2], 2.0, epsilon = 1e-12);
    // pixels 1 and 11 have no depth
    assert!(!colors.contains(&[1, 101, 200]));
    assert!(!colors.contains(&[11, 111, 200]));
    Ok(())
}

#[test]
fn serial_and_parallel_outputs_match() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let root = tmp_dir.path();
    write_dataset(root)?;
    let frames = correlate_dataset(root)?;

    let mut outputs = Vec::new();
    for (name, strategy) in [
        ("serial", ExecutionStrategy::Serial),
        ("parallel", ExecutionStrategy::Parallel),
    ] {
        let options = PipelineOptions {
            dataset_root: root.to_path_buf(),
            output_dir: root.join(name),
            strategy,
            ..Default::default()
        };
        let report = pipeline::process_correlated_frames(&frames, &options)?;
        outputs.push(std::fs::read_to_string(&report.written[1].ply_path)?);
    }
    assert_eq!(outputs[0], outputs[1]);
    Ok(())
}

#[test]
fn failing_frame_aborts_or_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let root = tmp_dir.path();
    write_dataset(root)?;
    let frames = correlate_dataset(root)?;

    // replace the first depth map with an 8-bit image
    let depth8 = Image::<u8, 1>::new(SIZE, vec![1; SIZE.num_pixels()])?;
    write_image_png_gray8(root.join("depth").join("10.000.png"), &depth8)?;

    let options = PipelineOptions {
        dataset_root: root.to_path_buf(),
        output_dir: root.join("abort"),
        failure_policy: FailurePolicy::Abort,
        ..Default::default()
    };
    let res = pipeline::process_correlated_frames(&frames, &options);
    assert!(matches!(
        res,
        Err(PipelineError::Rgbd(RgbdError::UnsupportedDepthFormat(ref mode))) if mode == "L8"
    ));
    assert!(!root.join("abort").join("point_cloud0.ply").exists());
    assert!(!root.join("abort").join("point_cloud1.ply").exists());

    let options = PipelineOptions {
        output_dir: root.join("continue"),
        failure_policy: FailurePolicy::Continue,
        ..options
    };
    let report = pipeline::process_correlated_frames(&frames, &options)?;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 0);
    assert_eq!(report.written.len(), 1);
    // indices follow the correlated file, not the successes
    assert_eq!(report.written[0].index, 1);
    assert!(root.join("continue").join("point_cloud1.ply").exists());
    assert!(!root.join("continue").join("point_cloud0.ply").exists());
    Ok(())
}

#[test]
fn missing_image_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let root = tmp_dir.path();
    write_dataset(root)?;
    let frames = correlate_dataset(root)?;
    std::fs::remove_file(root.join("rgb").join("11.005.png"))?;

    let options = PipelineOptions {
        dataset_root: root.to_path_buf(),
        output_dir: root.join("out"),
        failure_policy: FailurePolicy::Continue,
        ..Default::default()
    };
    let report = pipeline::process_correlated_frames(&frames, &options)?;
    assert_eq!(report.written.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        PipelineError::Image(rgbdcloud::io::IoError::FileDoesNotExist(_))
    ));
    Ok(())
}
