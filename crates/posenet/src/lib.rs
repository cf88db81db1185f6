pub mod config;
pub mod decode;
pub mod detector;
pub mod error;
pub mod estimator;
pub mod keypoints;
pub mod maps;
pub mod monitor;
pub mod network;
pub mod skeleton;
pub mod types;
pub mod util;

pub use config::{DecoderConfig, Multiplier, OutputStride};
pub use decode::{
    LOCAL_MAXIMUM_RADIUS, MultiPoseDecoder, build_part_candidates, decode_multiple_poses,
    decode_single_pose, refine, scale_pose, scale_poses,
};
pub use detector::{EstimateMode, PoseDetector};
pub use error::PoseError;
pub use estimator::{PoseNet, preprocess};
pub use keypoints::{CONNECTED_PARTS, NUM_KEYPOINTS, PART_NAMES, POSE_CHAIN, PartId};
pub use maps::{DisplacementMap, OffsetMap, ScoreMap};
pub use monitor::{AlertCooldown, FallMonitor, SHOULDER_WINDOW};
pub use network::{MultiPoseOutputs, PoseNetwork, SinglePoseOutputs};
pub use skeleton::{Edge, SkeletonGraph};
pub use types::{Keypoint, PartCandidate, Pose};
pub use util::{BoundingBox, adjacent_keypoints, bounding_box, bounding_box_points, valid_resolution};
