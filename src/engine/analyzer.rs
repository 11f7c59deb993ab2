//! Throttled center-color analysis of camera frames.

use crate::engine::yuv::YuvFrame;
use crate::types::ColorSample;
use std::time::{Duration, Instant};

/// Samples the viewfinder center at most once per `interval`.
///
/// The very first frame only arms the timer, so the first sample is taken
/// one interval after the stream starts (auto-exposure settles meanwhile).
pub struct ColorAnalyzer {
    interval: Duration,
    last_analyzed: Option<Instant>,
}

impl ColorAnalyzer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_analyzed: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Forget the last analysis time; the next frame re-arms the timer.
    pub fn reset(&mut self) {
        self.last_analyzed = None;
    }

    /// Analyze `frame` if the interval since the last analysis has elapsed.
    pub fn analyze(&mut self, frame: &YuvFrame, now: Instant) -> Option<ColorSample> {
        let last = *self.last_analyzed.get_or_insert(now);
        if now.saturating_duration_since(last) < self.interval {
            return None;
        }
        let sample = frame.sample_center();
        log::debug!(
            "analyzed {}x{} frame: {} light={}",
            frame.width(),
            frame.height(),
            sample.hex(),
            sample.is_light
        );
        self.last_analyzed = Some(now);
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    fn gray_frame(level: u8) -> YuvFrame {
        let mut bytes = vec![level; 16];
        bytes.extend([128u8; 8]);
        YuvFrame::from_i420(4, 4, &bytes).unwrap()
    }

    #[test]
    fn first_frame_only_arms_the_timer() {
        let mut analyzer = ColorAnalyzer::new(Duration::from_secs(3));
        let t0 = Instant::now();
        assert_eq!(analyzer.analyze(&gray_frame(10), t0), None);
        assert_eq!(analyzer.analyze(&gray_frame(10), t0 + Duration::from_millis(2999)), None);
        let sample = analyzer
            .analyze(&gray_frame(10), t0 + Duration::from_secs(3))
            .unwrap();
        assert_eq!(sample.color, Rgba::opaque(10, 10, 10));
    }

    #[test]
    fn frames_inside_the_interval_are_dropped() {
        let mut analyzer = ColorAnalyzer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        analyzer.analyze(&gray_frame(0), t0);
        assert!(analyzer.analyze(&gray_frame(0), t0 + Duration::from_millis(100)).is_some());
        assert!(analyzer.analyze(&gray_frame(0), t0 + Duration::from_millis(150)).is_none());
        assert!(analyzer.analyze(&gray_frame(0), t0 + Duration::from_millis(200)).is_some());
    }

    #[test]
    fn zero_interval_analyzes_every_frame() {
        let mut analyzer = ColorAnalyzer::new(Duration::ZERO);
        let t0 = Instant::now();
        assert!(analyzer.analyze(&gray_frame(220), t0).unwrap().is_light);
        assert!(analyzer.analyze(&gray_frame(220), t0).is_some());
    }

    #[test]
    fn reset_rearms() {
        let mut analyzer = ColorAnalyzer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        analyzer.analyze(&gray_frame(0), t0);
        analyzer.reset();
        assert!(analyzer.analyze(&gray_frame(0), t0 + Duration::from_secs(1)).is_none());
    }
}
