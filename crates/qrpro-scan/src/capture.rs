//! Live capture: camera lifecycle and the frame polling task.
//!
//! A [`CaptureSession`] moves through `Idle -> Starting -> Active -> Idle`.
//! Frames are only sampled while `Active`. The polling task spawned by
//! [`CaptureController::start`] samples once per tick and exits as soon as
//! the session it was started for is no longer active, so a decode, a read
//! failure and an explicit stop all end the loop the same way.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use kanal::AsyncSender;
use qrpro_core::Decoder;
use qrpro_types::{AppEvent, FacingMode, Frame};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::CaptureError;

/// Grants access to a camera
pub trait CameraProvider: Send + Sync {
    fn acquire(&self, facing: FacingMode) -> Result<Box<dyn CameraStream>, CaptureError>;
}

/// An acquired camera. Hardware stays reserved until `stop` is called.
pub trait CameraStream: Send {
    fn read_frame(&mut self) -> Result<FrameRead, CaptureError>;

    /// Release the device. Must tolerate repeated calls.
    fn stop(&mut self);
}

#[derive(Debug)]
pub enum FrameRead {
    /// Not enough buffered data yet
    Pending,
    Ready(Frame),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Starting,
    Active,
}

/// Result of one sample attempt
#[derive(Debug, PartialEq, Eq)]
pub enum Sample {
    Inactive,
    NotReady,
    Decoded(Option<String>),
    Failed(CaptureError),
}

/// What the polling loop does next
#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Terminated,
    Continue,
    Decoded(String),
    Failed(CaptureError),
}

pub struct CaptureSession {
    state: CaptureState,
    stream: Option<Box<dyn CameraStream>>,
    epoch: u64,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            stream: None,
            epoch: 0,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn holds_camera(&self) -> bool {
        self.stream.is_some()
    }

    /// Identifies the current activation
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn begin_start(&mut self) -> bool {
        if self.state != CaptureState::Idle {
            return false;
        }
        self.state = CaptureState::Starting;
        true
    }

    fn abort_start(&mut self) {
        self.state = CaptureState::Idle;
    }

    fn activate(&mut self, stream: Box<dyn CameraStream>) -> u64 {
        self.release();
        self.stream = Some(stream);
        self.state = CaptureState::Active;
        self.epoch += 1;
        self.epoch
    }

    /// One sample attempt against the current stream
    pub fn sample_frame(&mut self, decoder: &dyn Decoder) -> Sample {
        if self.state != CaptureState::Active {
            return Sample::Inactive;
        }
        let Some(stream) = self.stream.as_mut() else {
            return Sample::Inactive;
        };

        match stream.read_frame() {
            Ok(FrameRead::Pending) => Sample::NotReady,
            Ok(FrameRead::Ready(frame)) => {
                Sample::Decoded(decoder.decode(&frame.data, frame.width, frame.height))
            }
            Err(e) => Sample::Failed(e),
        }
    }

    /// A match ends the session; a miss waits for the next tick
    pub fn on_frame_result(&mut self, result: Option<String>) -> TickOutcome {
        match result {
            Some(payload) => {
                self.release();
                TickOutcome::Decoded(payload)
            }
            None => TickOutcome::Continue,
        }
    }

    /// Sample once for the activation identified by `epoch`
    pub fn tick(&mut self, epoch: u64, decoder: &dyn Decoder) -> TickOutcome {
        if epoch != self.epoch {
            return TickOutcome::Terminated;
        }
        match self.sample_frame(decoder) {
            Sample::Inactive => TickOutcome::Terminated,
            Sample::NotReady => TickOutcome::Continue,
            Sample::Decoded(result) => self.on_frame_result(result),
            Sample::Failed(e) => {
                self.release();
                TickOutcome::Failed(e)
            }
        }
    }

    /// Returns whether a camera was held
    pub fn release(&mut self) -> bool {
        self.state = CaptureState::Idle;
        match self.stream.take() {
            Some(mut stream) => {
                stream.stop();
                true
            }
            None => false,
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Owns the capture session and its polling task
pub struct CaptureController {
    provider: Arc<dyn CameraProvider>,
    decoder: Arc<dyn Decoder>,
    session: Arc<Mutex<CaptureSession>>,
    facing: FacingMode,
    tick: Duration,
    events: AsyncSender<AppEvent>,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl CaptureController {
    /// `events` receives `FrameDecoded` and `CaptureFailed`
    pub fn new(
        provider: Arc<dyn CameraProvider>,
        decoder: Arc<dyn Decoder>,
        facing: FacingMode,
        tick: Duration,
        events: AsyncSender<AppEvent>,
    ) -> Self {
        Self {
            provider,
            decoder,
            session: Arc::new(Mutex::new(CaptureSession::new())),
            facing,
            tick,
            events,
            cancel: None,
            task: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        lock(&self.session).state()
    }

    pub fn is_active(&self) -> bool {
        self.state() == CaptureState::Active
    }

    pub fn holds_camera(&self) -> bool {
        lock(&self.session).holds_camera()
    }

    /// Epoch of the latest activation, carried on every event it sends
    pub fn epoch(&self) -> u64 {
        lock(&self.session).epoch()
    }

    /// Acquire the camera and start polling. `Ok(false)` when already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<bool, CaptureError> {
        if !lock(&self.session).begin_start() {
            tracing::debug!("Capture start ignored, session not idle");
            return Ok(false);
        }

        let stream = match self.provider.acquire(self.facing) {
            Ok(stream) => stream,
            Err(e) => {
                lock(&self.session).abort_start();
                tracing::warn!("Camera acquisition failed: {e}");
                return Err(e);
            }
        };

        let epoch = lock(&self.session).activate(stream);
        tracing::info!("Capture session {epoch} active");

        self.stop_task();
        let cancel = CancellationToken::new();
        self.task = Some(tokio::spawn(poll_frames(
            self.session.clone(),
            self.decoder.clone(),
            epoch,
            self.tick,
            cancel.child_token(),
            self.events.clone(),
        )));
        self.cancel = Some(cancel);

        Ok(true)
    }

    /// Cancel polling and release the camera. Safe to call at any time.
    pub fn stop(&mut self) -> bool {
        self.stop_task();
        let released = lock(&self.session).release();
        if released {
            tracing::info!("Capture session stopped, camera released");
        }
        released
    }

    fn stop_task(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.task = None;
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(session: &Mutex<CaptureSession>) -> MutexGuard<'_, CaptureSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn poll_frames(
    session: Arc<Mutex<CaptureSession>>,
    decoder: Arc<dyn Decoder>,
    epoch: u64,
    tick: Duration,
    cancel: CancellationToken,
    events: AsyncSender<AppEvent>,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut samples: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Capture session {epoch} polling cancelled");
                break;
            }
            _ = interval.tick() => {}
        }

        let outcome = lock(&session).tick(epoch, decoder.as_ref());
        samples += 1;

        match outcome {
            TickOutcome::Continue => continue,
            TickOutcome::Terminated => {
                tracing::debug!("Capture session {epoch} no longer active");
                break;
            }
            TickOutcome::Decoded(payload) => {
                tracing::info!("Decoded payload after {samples} tick(s)");
                let event = AppEvent::FrameDecoded {
                    epoch,
                    data: payload,
                };
                if let Err(e) = events.send(event).await {
                    tracing::error!("Failed to deliver decoded payload: {e}");
                }
                break;
            }
            TickOutcome::Failed(e) => {
                tracing::error!("Capture session {epoch} failed: {e}");
                let event = AppEvent::CaptureFailed {
                    epoch,
                    reason: e.to_string(),
                };
                if let Err(e) = events.send(event).await {
                    tracing::error!("Failed to deliver capture error: {e}");
                }
                break;
            }
        }
    }
}
