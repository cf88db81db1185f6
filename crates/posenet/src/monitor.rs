use std::{
    collections::{HashMap, VecDeque},
    time::{Duration, Instant},
};

use log::{debug, warn};

use crate::{keypoints::PartId, types::Pose};

/// Shoulder samples kept per side.
pub const SHOULDER_WINDOW: usize = 10;

const DEFAULT_MIN_PART_SCORE: f32 = 0.1;
const DEFAULT_DROP_THRESHOLD: f32 = 200.0;
const DEFAULT_ALERT_COOLDOWN: Duration = Duration::from_secs(5);

/// Sliding window of shoulder heights, zero-filled until samples arrive.
#[derive(Debug, Clone)]
struct ShoulderWindow(VecDeque<f32>);

impl ShoulderWindow {
    fn new() -> Self {
        Self(VecDeque::from(vec![0.0; SHOULDER_WINDOW]))
    }

    fn push(&mut self, y: f32) {
        self.0.pop_front();
        self.0.push_back(y);
    }

    /// `newest - oldest`, or `None` while the oldest slot is still unfilled.
    fn rise(&self) -> Option<f32> {
        let oldest = *self.0.front()?;
        let newest = *self.0.back()?;
        (oldest != 0.0).then_some(newest - oldest)
    }
}

#[derive(Debug, Clone)]
struct ShoulderHistory {
    left: ShoulderWindow,
    right: ShoulderWindow,
}

impl ShoulderHistory {
    fn new() -> Self {
        Self {
            left: ShoulderWindow::new(),
            right: ShoulderWindow::new(),
        }
    }
}

/// Flags sudden falls from the shoulder height of tracked people.
///
/// Each observation records the left shoulder `y` when it is confidently
/// located, otherwise the right shoulder. A fall is a rise in image `y` of
/// more than the drop threshold across one full window of samples of that
/// side. Flagging resets the person's history.
#[derive(Debug, Clone)]
pub struct FallMonitor {
    people: HashMap<usize, ShoulderHistory>,
    min_part_score: f32,
    drop_threshold: f32,
}

impl Default for FallMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl FallMonitor {
    pub fn new() -> Self {
        Self {
            people: HashMap::new(),
            min_part_score: DEFAULT_MIN_PART_SCORE,
            drop_threshold: DEFAULT_DROP_THRESHOLD,
        }
    }

    pub fn with_min_part_score(mut self, score: f32) -> Self {
        self.min_part_score = score;
        self
    }

    /// Minimum shoulder drop, in image pixels, that counts as a fall.
    pub fn with_drop_threshold(mut self, pixels: f32) -> Self {
        self.drop_threshold = pixels;
        self
    }

    /// Record `pose` for `person`; true if this observation completes a fall.
    pub fn observe(&mut self, person: usize, pose: &Pose) -> bool {
        let min_part_score = self.min_part_score;
        let history = self.people.entry(person).or_insert_with(ShoulderHistory::new);

        let confident = move |part| {
            pose.keypoint(part)
                .filter(|keypoint| keypoint.score > min_part_score)
        };
        let (window, side) = if let Some(keypoint) = confident(PartId::LeftShoulder) {
            history.left.push(keypoint.position.y);
            (&history.left, "left")
        } else if let Some(keypoint) = confident(PartId::RightShoulder) {
            history.right.push(keypoint.position.y);
            (&history.right, "right")
        } else {
            return false;
        };

        let Some(rise) = window.rise() else {
            return false;
        };
        if rise <= self.drop_threshold {
            return false;
        }

        warn!("person {} fell: {} shoulder dropped {:.1}px", person, side, rise);
        *history = ShoulderHistory::new();
        true
    }

    /// Drop the history of a person who left the scene.
    pub fn forget(&mut self, person: usize) {
        if self.people.remove(&person).is_some() {
            debug!("forgot person {}", person);
        }
    }

    pub fn tracked(&self) -> usize {
        self.people.len()
    }
}

/// Rate limit for fall alerts.
#[derive(Debug, Clone)]
pub struct AlertCooldown {
    period: Duration,
    last: Option<Instant>,
}

impl Default for AlertCooldown {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_COOLDOWN)
    }
}

impl AlertCooldown {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// True, and restarts the cooldown, if no alert fired in the last `period`.
    pub fn try_alert(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.period => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_needs_full_history() {
        let mut window = ShoulderWindow::new();
        for _ in 0..SHOULDER_WINDOW - 1 {
            window.push(100.0);
            assert_eq!(window.rise(), None);
        }
        window.push(400.0);
        assert_eq!(window.rise(), Some(300.0));
    }

    #[test]
    fn test_window_keeps_last_samples() {
        let mut window = ShoulderWindow::new();
        for y in 1..=15 {
            window.push(y as f32);
        }
        assert_eq!(window.0.len(), SHOULDER_WINDOW);
        assert_eq!(window.rise(), Some(9.0));
    }
}
