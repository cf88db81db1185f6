/// Number of keypoints PoseNet predicts per person.
pub const NUM_KEYPOINTS: usize = 17;

/// Part names in channel order of the score map.
pub const PART_NAMES: [&str; NUM_KEYPOINTS] = [
    "nose",
    "leftEye",
    "rightEye",
    "leftEar",
    "rightEar",
    "leftShoulder",
    "rightShoulder",
    "leftElbow",
    "rightElbow",
    "leftWrist",
    "rightWrist",
    "leftHip",
    "rightHip",
    "leftKnee",
    "rightKnee",
    "leftAnkle",
    "rightAnkle",
];

/// Keypoint identifiers, numbered by score map channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PartId {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl PartId {
    pub const ALL: [PartId; NUM_KEYPOINTS] = [
        PartId::Nose,
        PartId::LeftEye,
        PartId::RightEye,
        PartId::LeftEar,
        PartId::RightEar,
        PartId::LeftShoulder,
        PartId::RightShoulder,
        PartId::LeftElbow,
        PartId::RightElbow,
        PartId::LeftWrist,
        PartId::RightWrist,
        PartId::LeftHip,
        PartId::RightHip,
        PartId::LeftKnee,
        PartId::RightKnee,
        PartId::LeftAnkle,
        PartId::RightAnkle,
    ];

    pub fn name(self) -> &'static str {
        PART_NAMES[self as usize]
    }

    pub fn from_name(name: &str) -> Option<PartId> {
        PART_NAMES
            .iter()
            .position(|&candidate| candidate == name)
            .map(|index| PartId::ALL[index])
    }
}

impl From<PartId> for usize {
    fn from(part: PartId) -> usize {
        part as usize
    }
}

impl TryFrom<usize> for PartId {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PartId::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid part id: {}. Must be in range 0-{}.",
                value,
                NUM_KEYPOINTS - 1
            )
        })
    }
}

/// Parent/child pairs of the tree the multi-pose decoder walks. Edge `i` of
/// this list reads displacement channel `i`.
pub const POSE_CHAIN: [(PartId, PartId); NUM_KEYPOINTS - 1] = [
    (PartId::Nose, PartId::LeftEye),
    (PartId::LeftEye, PartId::LeftEar),
    (PartId::Nose, PartId::RightEye),
    (PartId::RightEye, PartId::RightEar),
    (PartId::Nose, PartId::LeftShoulder),
    (PartId::LeftShoulder, PartId::LeftElbow),
    (PartId::LeftElbow, PartId::LeftWrist),
    (PartId::LeftShoulder, PartId::LeftHip),
    (PartId::LeftHip, PartId::LeftKnee),
    (PartId::LeftKnee, PartId::LeftAnkle),
    (PartId::Nose, PartId::RightShoulder),
    (PartId::RightShoulder, PartId::RightElbow),
    (PartId::RightElbow, PartId::RightWrist),
    (PartId::RightShoulder, PartId::RightHip),
    (PartId::RightHip, PartId::RightKnee),
    (PartId::RightKnee, PartId::RightAnkle),
];

/// Limb connections used when drawing a skeleton.
pub const CONNECTED_PARTS: [(PartId, PartId); 12] = [
    (PartId::LeftHip, PartId::LeftShoulder),
    (PartId::LeftElbow, PartId::LeftShoulder),
    (PartId::LeftElbow, PartId::LeftWrist),
    (PartId::LeftHip, PartId::LeftKnee),
    (PartId::LeftKnee, PartId::LeftAnkle),
    (PartId::RightHip, PartId::RightShoulder),
    (PartId::RightElbow, PartId::RightShoulder),
    (PartId::RightElbow, PartId::RightWrist),
    (PartId::RightHip, PartId::RightKnee),
    (PartId::RightKnee, PartId::RightAnkle),
    (PartId::LeftShoulder, PartId::RightShoulder),
    (PartId::LeftHip, PartId::RightHip),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_ids_match_names() {
        for (index, part) in PartId::ALL.iter().enumerate() {
            assert_eq!(usize::from(*part), index);
            assert_eq!(PartId::from_name(part.name()), Some(*part));
        }
    }

    #[test]
    fn test_try_from_out_of_range() {
        assert_eq!(PartId::try_from(16), Ok(PartId::RightAnkle));
        assert!(PartId::try_from(17).is_err());
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(PartId::from_name("tail"), None);
    }
}
