use posenet_base::Vec2;
use serde::{Deserialize, Serialize};

use crate::keypoints::PartId;

/// A located body part.
///
/// `position` is in image pixels; `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub part_id: usize,
    #[serde(with = "position")]
    pub position: Vec2<f32>,
    pub score: f32,
}

impl Keypoint {
    pub fn new(part_id: usize, position: Vec2<f32>, score: f32) -> Self {
        Self {
            part_id,
            position,
            score,
        }
    }

    /// Semantic part, if `part_id` is a PoseNet channel.
    pub fn part(&self) -> Option<PartId> {
        PartId::try_from(self.part_id).ok()
    }
}

/// One person: one keypoint slot per part id, in part id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
    pub score: f32,
}

impl Pose {
    /// Build a pose whose score is the mean of its keypoint scores.
    pub fn from_keypoints(keypoints: Vec<Keypoint>) -> Self {
        let score = mean_score(&keypoints);
        Self { keypoints, score }
    }

    pub fn keypoint(&self, part: PartId) -> Option<&Keypoint> {
        self.keypoints.get(usize::from(part))
    }
}

pub(crate) fn mean_score(keypoints: &[Keypoint]) -> f32 {
    if keypoints.is_empty() {
        return 0.0;
    }
    keypoints.iter().map(|k| k.score).sum::<f32>() / keypoints.len() as f32
}

/// Local maximum found on the score grid; lives only inside one decode call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartCandidate {
    pub score: f32,
    pub part_id: usize,
    pub y: usize,
    pub x: usize,
}

// Keypoint positions serialize as `{ "y": .., "x": .. }` to keep the row-first
// convention of the score maps visible in recorded output.
mod position {
    use posenet_base::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct YX {
        y: f32,
        x: f32,
    }

    pub fn serialize<S: Serializer>(value: &Vec2<f32>, serializer: S) -> Result<S::Ok, S::Error> {
        YX {
            y: value.y,
            x: value.x,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec2<f32>, D::Error> {
        let yx = YX::deserialize(deserializer)?;
        Ok(Vec2::new(yx.x, yx.y))
    }
}
