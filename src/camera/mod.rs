//! Camera layer: frame sources, inter-thread message types and the
//! background capture loop.

pub mod source;

use crate::engine::analyzer::ColorAnalyzer;
use crate::engine::bitmap::Bitmap;
use crate::engine::yuv::YuvFrame;
use crate::error::Result;
use crate::types::ColorSample;
use serde::{Deserialize, Serialize};
use source::{RawFileSource, SyntheticSource};
use std::path::PathBuf;
use std::sync::mpsc::Sender as StdSender;
use std::time::Duration;
use tokio::sync::mpsc::Receiver;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Anything that can hand out camera frames.
pub trait FrameSource: Send {
    /// Human-readable description for logs and the settings window.
    fn describe(&self) -> String;

    /// The next frame, or `Ok(None)` when none is ready this tick.
    fn next_frame(&mut self) -> Result<Option<YuvFrame>>;
}

/// Serializable description of which source to open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SourceSpec {
    Synthetic {
        width: usize,
        height: usize,
    },
    RawFile {
        path: PathBuf,
        width: usize,
        height: usize,
    },
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::Synthetic {
            width: 640,
            height: 480,
        }
    }
}

impl SourceSpec {
    pub fn open(&self) -> Result<Box<dyn FrameSource>> {
        Ok(match self {
            SourceSpec::Synthetic { width, height } => {
                Box::new(SyntheticSource::new(*width, *height)?)
            }
            SourceSpec::RawFile {
                path,
                width,
                height,
            } => Box::new(RawFileSource::open(path, *width, *height)?),
        })
    }
}

/// Messages sent from the capture thread to the UI thread.
pub enum CameraMessage {
    /// A throttled center-color sample.
    Color(ColorSample),
    /// The source could not be opened or stopped producing frames.
    Error(String),
}

/// Control commands sent from the UI thread to the capture thread.
#[derive(Debug)]
pub enum Control {
    Pause,
    Resume,
    ChangeSource(SourceSpec),
    SetInterval(Duration),
    SetFrameRate(u32),
}

/// Capture-thread end of the UI connection.
///
/// Samples and errors are queued on `tx`. Previews go to a single `watch`
/// slot that only ever holds the newest frame, so a UI that stops repainting
/// never accumulates a backlog of bitmaps.
pub struct UiLink {
    pub tx: StdSender<CameraMessage>,
    pub preview: watch::Sender<Option<Bitmap>>,
    pub ctx: egui::Context,
}

impl UiLink {
    /// Send `msg` and wake the UI. Returns `false` once the UI is gone.
    fn forward(&self, msg: CameraMessage) -> bool {
        if self.tx.send(msg).is_err() {
            return false;
        }
        self.ctx.request_repaint();
        true
    }

    /// Replace the pending preview. Returns `false` once the UI is gone.
    fn show(&self, preview: Bitmap) -> bool {
        if self.preview.send(Some(preview)).is_err() {
            return false;
        }
        self.ctx.request_repaint();
        true
    }
}

fn frame_period(frame_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / frame_rate.max(1) as f64)
}

fn ticker(frame_rate: u32) -> tokio::time::Interval {
    let mut ticker = tokio::time::interval(frame_period(frame_rate));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Open `spec`, reporting a binding failure to the UI instead of failing.
fn bind(spec: &SourceSpec, link: &UiLink) -> Option<Box<dyn FrameSource>> {
    match spec.open() {
        Ok(source) => {
            log::info!("camera bound: {}", source.describe());
            Some(source)
        }
        Err(e) => {
            log::error!("Use case binding failed: {e}");
            link.forward(CameraMessage::Error(e.to_string()));
            None
        }
    }
}

/// Long-running async loop: pulls frames from the bound source at
/// `frame_rate`, publishes a preview of every frame and a color sample
/// whenever the analyzer interval allows.
///
/// Exits cleanly when `control_rx` is closed or the UI side is dropped.
pub async fn run_capture_loop(
    link: &UiLink,
    mut control_rx: Receiver<Control>,
    spec: SourceSpec,
    interval: Duration,
    frame_rate: u32,
) {
    let mut analyzer = ColorAnalyzer::new(interval);
    let mut source = bind(&spec, link);
    let mut paused = false;
    let mut ticks = ticker(frame_rate);

    loop {
        tokio::select! {
            ctrl = control_rx.recv() => {
                let Some(ctrl) = ctrl else {
                    break; // UI shut down
                };
                log::debug!("capture control: {ctrl:?}");
                match ctrl {
                    Control::Pause => paused = true,
                    Control::Resume => {
                        paused = false;
                        analyzer.reset();
                    }
                    Control::ChangeSource(spec) => {
                        source = bind(&spec, link);
                        analyzer.reset();
                    }
                    Control::SetInterval(interval) => analyzer.set_interval(interval),
                    Control::SetFrameRate(rate) => ticks = ticker(rate),
                }
            }
            _ = ticks.tick() => {
                if paused {
                    continue;
                }
                let Some(src) = source.as_mut() else {
                    continue;
                };
                let frame = match src.next_frame() {
                    Ok(Some(frame)) => frame,
                    Ok(None) => continue,
                    Err(e) => {
                        log::warn!("camera frame error from {}: {e}", src.describe());
                        source = None;
                        if !link.forward(CameraMessage::Error(e.to_string())) {
                            break;
                        }
                        continue;
                    }
                };
                let now = tokio::time::Instant::now().into_std();
                if let Some(sample) = analyzer.analyze(&frame, now) {
                    if !link.forward(CameraMessage::Color(sample)) {
                        break;
                    }
                }
                if !link.show(frame.to_bitmap()) {
                    break;
                }
            }
        }
    }
    log::info!("capture loop stopped");
}
