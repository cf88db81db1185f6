use std::{path::Path, time::Instant};

use posenet::{
    AlertCooldown, DecoderConfig, FallMonitor, MultiPoseDecoder, Pose, PoseError,
    decode_single_pose, scale_pose, scale_poses,
};
use posenet_base::{Tensor, log};
use serde::{Deserialize, Serialize};

const DEFAULT_MIN_POSE_CONFIDENCE: f32 = 0.15;

/// Network output as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl RecordedTensor {
    pub fn to_tensor(&self) -> Result<Tensor<f32>, PoseError> {
        Ok(Tensor::new(self.shape.clone(), self.data.clone())?)
    }
}

/// Outputs of one network pass. Frames without displacements replay through
/// the single-pose decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// `[height, width]` of the source image
    pub original: [usize; 2],
    /// `[height, width]` of the network input
    pub resized: [usize; 2],
    pub heatmap_scores: RecordedTensor,
    pub offsets: RecordedTensor,
    #[serde(default)]
    pub displacement_fwd: Option<RecordedTensor>,
    #[serde(default)]
    pub displacement_bwd: Option<RecordedTensor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    pub fn from_json_str(json: &str) -> Result<Self, PoseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PoseError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// What one replayed frame produced.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame: usize,
    pub poses: Vec<Pose>,
    /// Poses confident enough to count as people.
    pub people: usize,
    /// Pose indices flagged as falling in this frame.
    pub falls: Vec<usize>,
    /// A fall alert was raised (rate limited).
    pub alerted: bool,
}

/// Decodes recorded frames and watches the poses for falls.
///
/// People are identified by pose index within the frame. Only poses scoring
/// at least the minimum pose confidence are counted or watched.
pub struct Replay {
    config: DecoderConfig,
    min_pose_confidence: f32,
    monitor: FallMonitor,
    cooldown: AlertCooldown,
}

impl Replay {
    pub fn new(config: DecoderConfig) -> Result<Self, PoseError> {
        config.validate()?;
        Ok(Self {
            config,
            min_pose_confidence: DEFAULT_MIN_POSE_CONFIDENCE,
            monitor: FallMonitor::new(),
            cooldown: AlertCooldown::default(),
        })
    }

    pub fn with_min_pose_confidence(mut self, score: f32) -> Self {
        self.min_pose_confidence = score;
        self
    }

    /// Decode a frame into poses in source image pixels.
    pub fn decode_frame(&self, frame: &RecordedFrame) -> Result<Vec<Pose>, PoseError> {
        let [original_h, original_w] = frame.original;
        let [resized_h, resized_w] = frame.resized;
        if resized_h == 0 || resized_w == 0 {
            return Err(PoseError::Shape(format!(
                "resized dimensions must be non-zero, got {}x{}",
                resized_h, resized_w
            )));
        }
        let scale_y = original_h as f32 / resized_h as f32;
        let scale_x = original_w as f32 / resized_w as f32;

        let heatmap_scores = frame.heatmap_scores.to_tensor()?;
        let offsets = frame.offsets.to_tensor()?;
        let stride = self.config.output_stride;

        match (&frame.displacement_fwd, &frame.displacement_bwd) {
            (Some(fwd), Some(bwd)) => {
                let poses = MultiPoseDecoder::new(stride)
                    .with_max_detections(self.config.max_detections)
                    .with_score_threshold(self.config.score_threshold)
                    .with_nms_radius(self.config.nms_radius)
                    .decode(&heatmap_scores, &offsets, &fwd.to_tensor()?, &bwd.to_tensor()?)?;
                Ok(scale_poses(&poses, scale_y, scale_x))
            }
            (None, None) => {
                let pose = decode_single_pose(&heatmap_scores, &offsets, stride)?;
                Ok(vec![scale_pose(&pose, scale_y, scale_x)])
            }
            _ => Err(PoseError::Shape(
                "frame has only one displacement map".to_string(),
            )),
        }
    }

    pub fn step(&mut self, index: usize, frame: &RecordedFrame, now: Instant) -> Result<FrameReport, PoseError> {
        let poses = self.decode_frame(frame)?;

        let mut people = 0;
        let mut falls = Vec::new();
        for (person, pose) in poses.iter().enumerate() {
            if pose.score < self.min_pose_confidence {
                continue;
            }
            people += 1;
            if self.monitor.observe(person, pose) {
                falls.push(person);
            }
        }

        let alerted = !falls.is_empty() && self.cooldown.try_alert(now);
        if alerted {
            log::warn!("frame {}: someone has fallen", index);
        }

        log::debug!("frame {}: {} poses, {} people", index, poses.len(), people);
        Ok(FrameReport {
            frame: index,
            poses,
            people,
            falls,
            alerted,
        })
    }
}
