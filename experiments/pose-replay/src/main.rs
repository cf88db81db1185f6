use std::time::Instant;

use pose_replay::{Recording, Replay};
use posenet::DecoderConfig;
use posenet_base::{log, log_fatal};

const USAGE: &str = "usage: pose-replay <recording.json> [config.json] [--log-dir <dir>]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let mut recording_path = None;
    let mut config_path = None;
    let mut log_dir = None;
    while let Some(arg) = args.next() {
        if arg == "--log-dir" {
            log_dir = Some(args.next().ok_or(USAGE)?);
        } else if recording_path.is_none() {
            recording_path = Some(arg);
        } else {
            config_path = Some(arg);
        }
    }
    let recording_path = recording_path.ok_or(USAGE)?;

    let level = posenet_base::default_level();
    match log_dir {
        Some(dir) => posenet_base::init_file_logger(dir, level)?,
        None => posenet_base::init_stdout_logger(level),
    }

    let config = match config_path {
        Some(path) => match DecoderConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => log_fatal!("cannot load config {}: {}", path, e),
        },
        None => DecoderConfig::default(),
    };
    log::info!("Pose Replay");
    log::info!("Recording: {}", recording_path);
    log::info!(
        "Stride {}, max {} poses, threshold {}, NMS radius {}",
        config.output_stride.value(),
        config.max_detections,
        config.score_threshold,
        config.nms_radius
    );

    let recording = match Recording::from_json_file(&recording_path) {
        Ok(recording) => recording,
        Err(e) => log_fatal!("cannot load recording {}: {}", recording_path, e),
    };
    let mut replay = match Replay::new(config) {
        Ok(replay) => replay,
        Err(e) => log_fatal!("invalid decoder config: {}", e),
    };

    let mut alerts = 0;
    for (index, frame) in recording.frames.iter().enumerate() {
        match replay.step(index, frame, Instant::now()) {
            Ok(report) => {
                if report.alerted {
                    alerts += 1;
                }
                println!("{}", serde_json::to_string(&report)?);
            }
            Err(e) => log::error!("frame {}: {}", index, e),
        }
    }

    log::info!("Replayed {} frames, {} fall alerts", recording.frames.len(), alerts);
    Ok(())
}
