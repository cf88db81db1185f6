use std::{
    collections::VecDeque,
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Waker},
};

use futures_core::Stream;
use futures_sink::Sink;
use posenet_base::Tensor;

use crate::{error::PoseError, estimator::PoseNet, network::PoseNetwork, types::Pose};

/// Which decoder the detector runs on each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EstimateMode {
    /// One pose per frame, every part at its global maximum.
    Single,
    #[default]
    Multiple,
}

type Inflight = Pin<Box<dyn Future<Output = Result<Vec<Pose>, PoseError>> + Send>>;

/// Asynchronous pose estimation over a sequence of frames.
///
/// Implements `Sink<Tensor<f32>>` to accept `[H, W, 3]` frames in `[0, 255]`
/// and `Stream<Item = Result<Vec<Pose>>>` to produce the poses of each frame.
///
/// Each frame sent via the Sink maps 1:1 to a result yielded from the Stream,
/// in order. Closing the sink signals no more input; the stream ends once all
/// pending frames are processed. In single mode every result holds exactly
/// one pose.
pub struct PoseDetector<N> {
    estimator: Arc<PoseNet<N>>,
    mode: EstimateMode,
    pending: VecDeque<Tensor<f32>>,
    closed: bool,
    inflight: Option<Inflight>,
    stream_waker: Option<Waker>,
}

impl<N> fmt::Debug for PoseDetector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseDetector")
            .field("mode", &self.mode)
            .field("pending", &self.pending.len())
            .field("closed", &self.closed)
            .field("inflight", &self.inflight.is_some())
            .finish()
    }
}

impl<N: PoseNetwork + 'static> PoseDetector<N> {
    pub fn new(estimator: PoseNet<N>) -> Self {
        Self {
            estimator: Arc::new(estimator),
            mode: EstimateMode::default(),
            pending: VecDeque::new(),
            closed: false,
            inflight: None,
            stream_waker: None,
        }
    }

    pub fn with_mode(mut self, mode: EstimateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> EstimateMode {
        self.mode
    }

    pub fn estimator(&self) -> &PoseNet<N> {
        &self.estimator
    }

    /// Spawn estimation of the given frame as an inflight future.
    fn start_estimation(&mut self, frame: Tensor<f32>) {
        let estimator = Arc::clone(&self.estimator);
        let mode = self.mode;

        self.inflight = Some(Box::pin(async move {
            tokio::task::spawn_blocking(move || match mode {
                EstimateMode::Single => estimator.estimate_single_pose(&frame).map(|pose| vec![pose]),
                EstimateMode::Multiple => estimator.estimate_multiple_poses(&frame),
            })
            .await
            .map_err(|e| PoseError::Runtime(format!("estimation task failed: {e}")))?
        }));
    }

    fn poll_inflight(&mut self, cx: &mut Context<'_>) -> Option<Poll<Option<Result<Vec<Pose>, PoseError>>>> {
        let fut = self.inflight.as_mut()?;
        Some(match fut.as_mut().poll(cx) {
            Poll::Ready(result) => {
                self.inflight = None;
                Poll::Ready(Some(result))
            }
            Poll::Pending => Poll::Pending,
        })
    }
}

impl<N> PoseDetector<N> {
    fn wake_stream(&mut self) {
        if let Some(waker) = self.stream_waker.take() {
            waker.wake();
        }
    }
}

impl<N: PoseNetwork + 'static> Sink<Tensor<f32>> for PoseDetector<N> {
    type Error = PoseError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: Tensor<f32>) -> Result<(), PoseError> {
        let this = self.get_mut();
        if this.closed {
            return Err(PoseError::Runtime("detector sink is closed".to_string()));
        }
        this.pending.push_back(item);
        this.wake_stream();
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        let this = self.get_mut();
        this.closed = true;
        this.wake_stream();
        Poll::Ready(Ok(()))
    }
}

impl<N: PoseNetwork + 'static> Stream for PoseDetector<N> {
    type Item = Result<Vec<Pose>, PoseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(poll) = this.poll_inflight(cx) {
            return poll;
        }

        if let Some(frame) = this.pending.pop_front() {
            this.start_estimation(frame);
            if let Some(poll) = this.poll_inflight(cx) {
                return poll;
            }
        }

        // done once closed with nothing pending or inflight
        if this.closed {
            return Poll::Ready(None);
        }

        this.stream_waker = Some(cx.waker().clone());
        Poll::Pending
    }
}
