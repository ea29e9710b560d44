//! Camera capture session and detector plumbing
//!
//! The camera and the landmark detector are external collaborators injected
//! as trait objects. The session owns the background thread that reads
//! frames, submits them for asynchronous detection, runs the control state
//! machine on each delivered result, and publishes the latest control
//! snapshot under a mutex held only for the copy-out. The game loop reads
//! the most recent snapshot without blocking; if detection lags, the
//! previous values are reused on purpose.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use crate::control::{ControlSnapshot, HandControls, SwipeDirection};
use crate::gesture::HandFrame;

/// One captured camera frame (pixel data is opaque to the simulation)
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB bytes as delivered by the camera
    pub pixels: Vec<u8>,
}

impl CameraFrame {
    /// Horizontally mirrored copy, so on-screen left matches the player's left
    pub fn mirrored(&self) -> CameraFrame {
        let stride = self.width as usize * 3;
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(stride) {
            for pixel in row.chunks_exact(3).rev() {
                pixels.extend_from_slice(pixel);
            }
        }
        CameraFrame {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

/// Single-slot mailbox holding only the most recent value
///
/// The detector publishes into it from its completion callback; readers pull
/// the latest value without blocking and without queueing history.
#[derive(Debug)]
pub struct LatestSlot<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for LatestSlot<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the stored value with a newer one
    pub fn publish(&self, value: T) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = Some(value);
        }
    }

    /// Remove and return the latest value, if any
    pub fn take(&self) -> Option<T> {
        self.slot.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl<T: Clone> LatestSlot<T> {
    /// Clone the latest value without consuming it
    pub fn peek(&self) -> Option<T> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }
}

/// Camera abstraction; `read_frame` blocks until the next frame (or fails)
pub trait FrameSource: Send {
    fn read_frame(&mut self) -> Result<CameraFrame, String>;
}

/// Asynchronous hand-landmark detector
///
/// `detect_async` is fire-and-forget: results arrive later on the `results`
/// mailbox, possibly out of step with submitted frames.
pub trait HandDetector: Send {
    fn detect_async(&mut self, frame: &CameraFrame, timestamp_ms: u64);
    fn results(&self) -> LatestSlot<HandFrame>;
}

/// State shared between the capture thread and the game loop
#[derive(Debug)]
struct SharedState {
    running: AtomicBool,
    require_two_hands: AtomicBool,
    snapshot: Mutex<ControlSnapshot>,
    preview: Mutex<Option<CameraFrame>>,
}

/// Webcam-based hand control session
///
/// Owns the capture thread and the control state machine. `stop` (also run
/// on drop) signals the loop to exit and joins it before the camera handle
/// is released, so no in-flight detection call is left dangling.
pub struct CaptureSession {
    shared: Arc<SharedState>,
    thread: Option<JoinHandle<()>>,
}

impl CaptureSession {
    /// Start the capture thread over the injected camera and detector
    pub fn start(
        mut source: Box<dyn FrameSource>,
        mut detector: Box<dyn HandDetector>,
    ) -> Self {
        let shared = Arc::new(SharedState {
            running: AtomicBool::new(true),
            require_two_hands: AtomicBool::new(true),
            snapshot: Mutex::new(ControlSnapshot::default()),
            preview: Mutex::new(None),
        });

        let thread_shared = Arc::clone(&shared);
        let thread = std::thread::spawn(move || {
            let results = detector.results();
            let mut controls = HandControls::new();
            let start_time = Instant::now();
            log::info!("capture thread started");

            while thread_shared.running.load(Ordering::Acquire) {
                let frame = match source.read_frame() {
                    Ok(frame) => frame.mirrored(),
                    Err(err) => {
                        // Transient camera fault: log and retry next iteration
                        log::error!("failed to read frame from camera: {err}");
                        continue;
                    }
                };

                let timestamp_ms = start_time.elapsed().as_millis() as u64;
                detector.detect_async(&frame, timestamp_ms);

                controls
                    .set_require_two_hands(thread_shared.require_two_hands.load(Ordering::Acquire));

                // Run the state machine only when a new result arrived; the
                // published snapshot simply stays stale otherwise.
                if let Some(hands) = results.take() {
                    controls.update(&hands);
                }

                Self::publish(&thread_shared, &controls);

                if let Ok(mut preview) = thread_shared.preview.lock() {
                    *preview = Some(frame);
                }
            }
            log::info!("capture thread stopped");
        });

        Self {
            shared,
            thread: Some(thread),
        }
    }

    /// Merge the machine's state into the shared snapshot
    ///
    /// One-shot flags accumulate (logical OR) until consumed so a pulse that
    /// lands between two game ticks is not lost.
    fn publish(shared: &SharedState, controls: &HandControls) {
        let fresh = controls.snapshot();
        if let Ok(mut snap) = shared.snapshot.lock() {
            let shift_up = snap.shift_up_requested || fresh.shift_up_requested;
            let shift_down = snap.shift_down_requested || fresh.shift_down_requested;
            let select = snap.question_select_requested || fresh.question_select_requested;
            let swipe = fresh.swipe.or(snap.swipe);
            *snap = fresh;
            snap.shift_up_requested = shift_up;
            snap.shift_down_requested = shift_down;
            snap.question_select_requested = select;
            snap.swipe = swipe;
        }
    }

    /// Switch the control machine between driving and question mode
    pub fn set_require_two_hands(&self, require: bool) {
        self.shared
            .require_two_hands
            .store(require, Ordering::Release);
    }

    /// Latest control snapshot; one-shot flags are left pending
    pub fn controls(&self) -> ControlSnapshot {
        self.shared
            .snapshot
            .lock()
            .map(|snap| snap.clone())
            .unwrap_or_default()
    }

    /// Return and clear pending `(down, up)` shift requests
    pub fn consume_shift_requests(&self) -> (bool, bool) {
        let Ok(mut snap) = self.shared.snapshot.lock() else {
            return (false, false);
        };
        let down = std::mem::take(&mut snap.shift_down_requested);
        let up = std::mem::take(&mut snap.shift_up_requested);
        (down, up)
    }

    /// Return and clear a pending question-select request
    pub fn consume_question_select(&self) -> bool {
        self.shared
            .snapshot
            .lock()
            .map(|mut snap| std::mem::take(&mut snap.question_select_requested))
            .unwrap_or(false)
    }

    /// Return and clear a pending swipe
    pub fn consume_swipe(&self) -> Option<SwipeDirection> {
        self.shared
            .snapshot
            .lock()
            .ok()
            .and_then(|mut snap| snap.swipe.take())
    }

    /// Most recent camera frame for the preview overlay
    pub fn preview_frame(&self) -> Option<CameraFrame> {
        self.shared
            .preview
            .lock()
            .ok()
            .and_then(|preview| preview.clone())
    }

    /// Signal the capture loop to exit and join it
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("capture thread panicked during shutdown");
            }
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}
