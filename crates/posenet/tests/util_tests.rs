use posenet::{
    BoundingBox, Keypoint, NUM_KEYPOINTS, OutputStride, PartId, adjacent_keypoints, bounding_box,
    bounding_box_points, valid_resolution,
};
use posenet_base::Vec2;

#[test]
fn test_valid_resolution_snaps_to_stride() {
    assert_eq!(valid_resolution(0.5, 800, OutputStride::Sixteen), 385);
    assert_eq!(valid_resolution(1.0, 513, OutputStride::ThirtyTwo), 513);
    assert_eq!(valid_resolution(0.5, 513, OutputStride::Sixteen), 241);
    assert_eq!(valid_resolution(0.75, 480, OutputStride::Eight), 353);
}

#[test]
fn test_valid_resolution_is_stride_aligned() {
    for stride in [OutputStride::Eight, OutputStride::Sixteen, OutputStride::ThirtyTwo] {
        for dim in [100, 257, 640, 1080] {
            let resolution = valid_resolution(0.5, dim, stride);
            assert_eq!((resolution - 1) % stride.value() as usize, 0);
            assert!(resolution as f32 <= dim as f32 * 0.5);
        }
    }
}

#[test]
fn test_valid_resolution_tiny_input() {
    assert_eq!(valid_resolution(0.5, 1, OutputStride::Sixteen), 1);
    assert_eq!(valid_resolution(1.0, 1, OutputStride::Sixteen), 1);
}

fn keypoints_with_scores(score: impl Fn(usize) -> f32) -> Vec<Keypoint> {
    (0..NUM_KEYPOINTS)
        .map(|id| Keypoint::new(id, Vec2::new(id as f32, 2.0 * id as f32), score(id)))
        .collect()
}

#[test]
fn test_adjacent_keypoints_all_confident() {
    let keypoints = keypoints_with_scores(|_| 0.9);
    assert_eq!(adjacent_keypoints(&keypoints, 0.5).len(), 12);
}

#[test]
fn test_adjacent_keypoints_drops_weak_endpoints() {
    let left_knee = usize::from(PartId::LeftKnee);
    let keypoints = keypoints_with_scores(|id| if id == left_knee { 0.1 } else { 0.9 });

    let pairs = adjacent_keypoints(&keypoints, 0.5);

    // left hip-knee and left knee-ankle are gone
    assert_eq!(pairs.len(), 10);
    assert!(pairs.iter().all(|(a, b)| a.part_id != left_knee && b.part_id != left_knee));
}

#[test]
fn test_adjacent_keypoints_threshold_is_inclusive() {
    let keypoints = keypoints_with_scores(|_| 0.5);
    assert_eq!(adjacent_keypoints(&keypoints, 0.5).len(), 12);
}

#[test]
fn test_bounding_box() {
    let keypoints = vec![
        Keypoint::new(0, Vec2::new(10.0, 40.0), 0.9),
        Keypoint::new(1, Vec2::new(-5.0, 12.0), 0.9),
        Keypoint::new(2, Vec2::new(30.0, 20.0), 0.1),
    ];

    assert_eq!(
        bounding_box(&keypoints),
        Some(BoundingBox {
            min_x: -5.0,
            min_y: 12.0,
            max_x: 30.0,
            max_y: 40.0,
        })
    );

    let corners = bounding_box_points(&keypoints).unwrap();
    assert_eq!(corners[0], Vec2::new(-5.0, 12.0));
    assert_eq!(corners[1], Vec2::new(30.0, 12.0));
    assert_eq!(corners[2], Vec2::new(30.0, 40.0));
    assert_eq!(corners[3], Vec2::new(-5.0, 40.0));
}

#[test]
fn test_bounding_box_empty() {
    assert_eq!(bounding_box(&[]), None);
    assert_eq!(bounding_box_points(&[]), None);
}
