//! Run lifecycle and frame driver
//!
//! A `Session` owns the current run, the best score and the store it is
//! persisted in. The platform calls `frame` once per display refresh with a
//! monotonic timestamp, then renders `state()`.

use crate::consts::MAX_FRAME_DT;
use crate::highscores::BestScore;
use crate::persistence::KeyValueStore;
use crate::platform::Viewport;
use crate::settings::Settings;
use crate::sim::{DriveInput, EndReason, GamePhase, GameState, Snapshot, StepOutcome, step};

/// Frames averaged for the FPS estimate
const FPS_WINDOW: usize = 60;

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub snapshot: Snapshot,
    /// False once the run has ended (or never started); stop scheduling frames
    pub keep_running: bool,
}

pub struct Session<S: KeyValueStore> {
    store: S,
    settings: Settings,
    viewport: Viewport,
    state: GameState,
    best: BestScore,
    last_time: Option<f64>,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,
}

impl<S: KeyValueStore> Session<S> {
    /// Idle session; loads the best score from `store`
    pub fn new(store: S, viewport: Viewport, settings: Settings, seed: u64) -> Self {
        let best = BestScore::load(&store);
        let state = Self::fresh_state(&viewport, &settings, seed);
        Self {
            store,
            settings,
            viewport,
            state,
            best,
            last_time: None,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
        }
    }

    fn fresh_state(viewport: &Viewport, settings: &Settings, seed: u64) -> GameState {
        GameState::new(
            viewport.width,
            viewport.height,
            settings.effective_lane_count(),
            seed,
        )
    }

    /// Begin a new run, discarding whatever state came before
    pub fn start(&mut self, seed: u64) {
        self.state = Self::fresh_state(&self.viewport, &self.settings, seed);
        self.state.phase = GamePhase::Running;
        self.last_time = None;
        log::info!(
            "Run started with seed {} ({} lanes, {}x{})",
            seed,
            self.state.road.lane_count,
            self.viewport.width,
            self.viewport.height
        );
    }

    /// Advance one frame at timestamp `time_ms`
    ///
    /// The first frame of a run uses dt = 0; later frames use the elapsed
    /// time clamped to `[0, MAX_FRAME_DT]`.
    pub fn frame(&mut self, time_ms: f64, input: &DriveInput) -> Frame {
        self.track_fps(time_ms);

        if self.state.is_running() {
            let dt = match self.last_time {
                Some(last) => (time_ms - last).clamp(0.0, MAX_FRAME_DT as f64) as f32,
                None => 0.0,
            };
            self.last_time = Some(time_ms);

            if let StepOutcome::Ended(reason) = step(&mut self.state, input, dt) {
                self.finish_run(reason);
            }
        }

        Frame {
            snapshot: self.snapshot(),
            keep_running: self.state.is_running(),
        }
    }

    fn finish_run(&mut self, reason: EndReason) {
        let score = self.state.score;
        log::info!(
            "Run over ({:?}): score {}, distance {:.0}, {} steps",
            reason,
            score,
            self.state.distance,
            self.state.steps
        );
        if self.best.record(score) {
            log::info!("New best score: {}", score);
            self.best.save(&mut self.store);
        }
    }

    fn track_fps(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_seen += 1;

        if self.frames_seen >= FPS_WINDOW {
            // The slot about to be overwritten holds the oldest sample
            let elapsed = time_ms - self.frame_times[self.frame_index];
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Adopt a new canvas size
    ///
    /// Road and car geometry derive from the canvas, so the run is rebuilt:
    /// a running game restarts fresh, anything else returns to idle.
    pub fn resize(&mut self, viewport: Viewport) {
        let was_running = self.state.is_running();
        let seed = self.state.seed;
        self.viewport = viewport;
        log::info!(
            "Viewport resized to {}x{} @{}x",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
        if was_running {
            self.start(seed);
        } else {
            self.state = Self::fresh_state(&self.viewport, &self.settings, seed);
            self.last_time = None;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.best.value)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable run state, for tooling that needs to stage a scenario
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn best(&self) -> u64 {
        self.best.value
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames per second over the last 60 frames (0 until enough samples)
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
