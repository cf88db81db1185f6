use futures_util::{SinkExt, StreamExt};
use posenet::{
    DecoderConfig, EstimateMode, MultiPoseOutputs, NUM_KEYPOINTS, OutputStride, PoseDetector,
    PoseError, PoseNet, PoseNetwork, SinglePoseOutputs,
};
use posenet_base::Tensor;

const NUM_EDGES: usize = NUM_KEYPOINTS - 1;

/// Peaks every part in column 1 for bright frames and column 2 for dark
/// ones; fails on mid-gray frames.
struct BrightnessNetwork;

impl BrightnessNetwork {
    fn grid(input: &Tensor<f32>, stride: OutputStride, channels: usize) -> Tensor<f32> {
        let (h, w, _) = input.hwc().unwrap();
        let stride = stride.value() as usize;
        Tensor::zeros(vec![(h - 1) / stride + 1, (w - 1) / stride + 1, channels]).unwrap()
    }

    fn scores(input: &Tensor<f32>, stride: OutputStride) -> Result<Tensor<f32>, PoseError> {
        let brightness = input.data[0];
        if brightness.abs() < 0.5 {
            return Err(PoseError::Network("cannot see anything".to_string()));
        }
        let column = if brightness > 0.0 { 1 } else { 2 };
        let mut scores = Self::grid(input, stride, NUM_KEYPOINTS);
        for part in 0..NUM_KEYPOINTS {
            scores.set3(1, column, part, 0.9);
        }
        Ok(scores)
    }
}

impl PoseNetwork for BrightnessNetwork {
    fn predict_single_pose(
        &self,
        input: &Tensor<f32>,
        output_stride: OutputStride,
    ) -> Result<SinglePoseOutputs, PoseError> {
        Ok(SinglePoseOutputs {
            heatmap_scores: Self::scores(input, output_stride)?,
            offsets: Self::grid(input, output_stride, 2 * NUM_KEYPOINTS),
        })
    }

    fn predict_multi_pose(
        &self,
        input: &Tensor<f32>,
        output_stride: OutputStride,
    ) -> Result<MultiPoseOutputs, PoseError> {
        Ok(MultiPoseOutputs {
            heatmap_scores: Self::scores(input, output_stride)?,
            offsets: Self::grid(input, output_stride, 2 * NUM_KEYPOINTS),
            displacement_fwd: Self::grid(input, output_stride, 2 * NUM_EDGES),
            displacement_bwd: Self::grid(input, output_stride, 2 * NUM_EDGES),
        })
    }
}

fn detector() -> PoseDetector<BrightnessNetwork> {
    // scale 1.0 keeps 65x65 frames at network resolution
    let config = DecoderConfig {
        image_scale_factor: 1.0,
        ..Default::default()
    };
    PoseDetector::new(PoseNet::new(BrightnessNetwork, config).unwrap())
}

fn frame(value: f32) -> Tensor<f32> {
    Tensor::new(vec![65, 65, 3], vec![value; 65 * 65 * 3]).unwrap()
}

#[tokio::test]
async fn test_results_follow_frame_order() {
    let mut detector = detector();

    detector.send(frame(255.0)).await.unwrap();
    detector.send(frame(0.0)).await.unwrap();
    detector.close().await.unwrap();

    let first = detector.next().await.unwrap().unwrap();
    let second = detector.next().await.unwrap().unwrap();
    assert!(detector.next().await.is_none());

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].keypoints[0].position.x, 16.0);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].keypoints[0].position.x, 32.0);
}

#[tokio::test]
async fn test_single_mode_yields_one_pose_per_frame() {
    let mut detector = detector().with_mode(EstimateMode::Single);
    assert_eq!(detector.mode(), EstimateMode::Single);

    detector.send(frame(255.0)).await.unwrap();
    detector.close().await.unwrap();

    let poses = detector.next().await.unwrap().unwrap();
    assert_eq!(poses.len(), 1);
    assert_eq!(poses[0].keypoints.len(), NUM_KEYPOINTS);
}

#[tokio::test]
async fn test_failed_frame_does_not_end_stream() {
    let mut detector = detector();

    detector.send(frame(127.5)).await.unwrap();
    detector.send(frame(255.0)).await.unwrap();
    detector.close().await.unwrap();

    let results: Vec<_> = detector.collect().await;
    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], Err(PoseError::Network(_))));
    assert!(results[1].is_ok());
}

#[tokio::test]
async fn test_stream_ends_when_closed_without_frames() {
    let mut detector = detector();
    detector.close().await.unwrap();
    assert!(detector.next().await.is_none());
}

#[tokio::test]
async fn test_send_after_close_fails() {
    let mut detector = detector();
    detector.close().await.unwrap();

    let result = detector.send(frame(255.0)).await;
    assert!(matches!(result, Err(PoseError::Runtime(_))));
}

#[test]
fn test_detector_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<PoseDetector<BrightnessNetwork>>();
}
