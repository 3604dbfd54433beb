//! The HoverPad capture loop: one background thread that reads frames,
//! classifies the region of interest and publishes the result.

use crate::classifier::{Classifier, Verbosity};
use crate::config::PadConfig;
use crate::device::{CaptureDevice, CaptureError, PreviewError, PreviewSurface};
use crate::geometry::{self, GeometryError};
use crate::pipeline::FramePipeline;
use crate::publisher::{Snapshot, StatePublisher};
use crate::types::{Event, Frame, Region, Size};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PadError {
    #[error("invalid pad size {0} (both dimensions must be positive)")]
    InvalidSize(Size),
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("pad already started")]
    AlreadyStarted,
    #[error("pad was not started or has already been joined")]
    NotStarted,
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),
    #[error("preview error: {0}")]
    Preview(#[from] PreviewError),
    #[error("failed to spawn capture loop: {0}")]
    Spawn(std::io::Error),
    #[error("capture loop panicked")]
    LoopPanicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadState {
    Stopped,
    Running,
}

/// Everything the loop thread takes ownership of when the pad starts.
struct LoopResources {
    device: Box<dyn CaptureDevice>,
    classifier: Box<dyn Classifier>,
    opener: crate::device::SurfaceOpener,
}

/// A live region-of-interest overlay on a camera feed.
///
/// Construction validates the configuration and computes the region;
/// [`start`](Self::start) moves the device, classifier and preview opener
/// onto a dedicated thread. The latest result can be read from any thread
/// through [`get_event`](Self::get_event), [`get_image`](Self::get_image)
/// or a [`PadReader`].
pub struct HoverPad {
    config: PadConfig,
    pipeline: FramePipeline,
    publisher: Arc<StatePublisher>,
    running: Arc<AtomicBool>,
    resources: Mutex<Option<LoopResources>>,
    handle: Mutex<Option<JoinHandle<Result<(), PadError>>>>,
}

impl HoverPad {
    pub fn new<D, C, O>(
        config: PadConfig,
        device: D,
        classifier: C,
        opener: O,
    ) -> Result<Self, PadError>
    where
        D: CaptureDevice + 'static,
        C: Classifier + 'static,
        O: FnOnce() -> Result<Box<dyn PreviewSurface>, PreviewError> + Send + 'static,
    {
        if config.size.is_empty() {
            return Err(PadError::InvalidSize(config.size));
        }
        let region = geometry::compute_roi(config.size, config.ratio, config.anchor)?;
        let pipeline = FramePipeline::new(config.size, region, config.roi_style())?;

        tracing::debug!(
            size = %config.size,
            anchor = %config.anchor,
            ?region,
            verbose = config.verbose,
            "pad configured"
        );

        Ok(Self {
            config,
            pipeline,
            publisher: Arc::new(StatePublisher::new()),
            running: Arc::new(AtomicBool::new(false)),
            resources: Mutex::new(Some(LoopResources {
                device: Box::new(device),
                classifier: Box::new(classifier),
                opener: Box::new(opener),
            })),
            handle: Mutex::new(None),
        })
    }

    /// Spawn the capture loop. A pad runs at most once; any later call
    /// returns [`PadError::AlreadyStarted`].
    pub fn start(&self) -> Result<(), PadError> {
        let mut resources = lock(&self.resources);
        let Some(taken) = resources.take() else {
            return Err(PadError::AlreadyStarted);
        };

        let capture_loop = CaptureLoop {
            title: self.config.title.clone(),
            verbosity: Verbosity::from(self.config.verbose),
            poll_timeout: self.config.poll_timeout(),
            frame_interval: self.config.frame_interval(),
            pipeline: self.pipeline.clone(),
            publisher: Arc::clone(&self.publisher),
        };

        self.running.store(true, Ordering::SeqCst);
        let running = RunningGuard(Arc::clone(&self.running));
        let spawned = thread::Builder::new()
            .name("hoverpad-loop".into())
            .spawn(move || {
                let _running = running;
                capture_loop.run(taken)
            });

        match spawned {
            Ok(handle) => {
                *lock(&self.handle) = Some(handle);
                tracing::info!(device_id = self.config.device_id, "pad started");
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(PadError::Spawn(e))
            }
        }
    }

    /// Block until the capture loop exits and return how it ended.
    pub fn join(&self) -> Result<(), PadError> {
        let handle = lock(&self.handle).take().ok_or(PadError::NotStarted)?;
        handle.join().map_err(|_| PadError::LoopPanicked)?
    }

    pub fn state(&self) -> PadState {
        state_of(&self.running)
    }

    /// Most recently published event; [`Event::None`] until the first one.
    pub fn get_event(&self) -> Event {
        self.publisher.event()
    }

    /// Most recently published image, if any.
    pub fn get_image(&self) -> Option<Arc<Frame>> {
        self.publisher.image()
    }

    /// Event and image as one consistent pair.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.publisher.snapshot()
    }

    pub fn region(&self) -> Region {
        self.pipeline.region()
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    /// A cloneable read-only handle for other threads.
    pub fn reader(&self) -> PadReader {
        PadReader {
            publisher: Arc::clone(&self.publisher),
            running: Arc::clone(&self.running),
        }
    }
}

/// Read side of a [`HoverPad`]; cheap to clone and `Send + Sync`.
#[derive(Clone)]
pub struct PadReader {
    publisher: Arc<StatePublisher>,
    running: Arc<AtomicBool>,
}

impl PadReader {
    pub fn get_event(&self) -> Event {
        self.publisher.event()
    }

    pub fn get_image(&self) -> Option<Arc<Frame>> {
        self.publisher.image()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.publisher.snapshot()
    }

    pub fn state(&self) -> PadState {
        state_of(&self.running)
    }
}

fn state_of(running: &AtomicBool) -> PadState {
    if running.load(Ordering::SeqCst) {
        PadState::Running
    } else {
        PadState::Stopped
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Flips the pad back to `Stopped` when the loop thread finishes,
/// including by panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// State owned by the loop thread.
struct CaptureLoop {
    title: String,
    verbosity: Verbosity,
    poll_timeout: Duration,
    frame_interval: Option<Duration>,
    pipeline: FramePipeline,
    publisher: Arc<StatePublisher>,
}

impl CaptureLoop {
    fn run(self, resources: LoopResources) -> Result<(), PadError> {
        let LoopResources {
            mut device,
            mut classifier,
            opener,
        } = resources;

        let mut surface = opener().map_err(|e| {
            tracing::error!(error = %e, "could not open preview surface");
            e
        })?;
        tracing::info!(title = %self.title, "capture loop started");

        let result = self.drive(device.as_mut(), classifier.as_mut(), surface.as_mut());

        surface.destroy(&self.title);
        tracing::info!(ok = result.is_ok(), "capture loop exiting");
        result
    }

    fn drive(
        &self,
        device: &mut dyn CaptureDevice,
        classifier: &mut dyn Classifier,
        surface: &mut dyn PreviewSurface,
    ) -> Result<(), PadError> {
        let mut stats = LoopStats::new();
        let mut last_event = self.publisher.event();

        loop {
            let started = Instant::now();

            if let Some(key) = surface.poll_key(self.poll_timeout) {
                if key.is_quit() {
                    tracing::info!(?key, "quit key pressed");
                    return Ok(());
                }
            }

            let raw = device.read().map_err(|e| {
                tracing::error!(error = %e, "capture failed; stopping loop");
                e
            })?;
            let output = self.pipeline.process(&raw)?;

            match classifier.classify(&output.crop, self.verbosity) {
                Ok(classification) => {
                    let (event, image) = classification.into_parts(output.crop);
                    if event != last_event {
                        tracing::debug!(from = %last_event, to = %event, "event changed");
                        last_event = event;
                    }
                    self.publisher.publish(event, image);
                }
                Err(e) => {
                    stats.failures += 1;
                    tracing::warn!(error = %e, "classification failed; keeping previous state");
                }
            }

            if let Err(e) = surface.show(&self.title, &output.preview) {
                tracing::warn!(error = %e, "failed to show preview frame");
            }

            stats.tick();

            if let Some(interval) = self.frame_interval {
                let elapsed = started.elapsed();
                if elapsed < interval {
                    thread::sleep(interval - elapsed);
                }
            }
        }
    }
}

/// Iteration counters, reported once per second at debug level.
struct LoopStats {
    window_start: Instant,
    iterations: u32,
    failures: u32,
}

impl LoopStats {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            iterations: 0,
            failures: 0,
        }
    }

    fn tick(&mut self) {
        self.iterations += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            let fps = self.iterations as f32 / elapsed.as_secs_f32();
            tracing::debug!(fps, classifier_failures = self.failures, "loop stats");
            *self = Self::new();
        }
    }
}
