//! The game aggregate: one owner for the round machine, the session, the
//! sketch pad and the display settings. Every event callback in the browser
//! layer funnels through here, so only one transition is ever in flight.

use log::debug;

use crate::round::{CountdownTask, GameMode, Phase, RoundMachine, RoundOutcome};
use crate::session::Session;
use crate::sketch::{Point, SketchPad};
use crate::surface::{CanvasSize, CanvasType, EncodeError, Rgb, Surface};

// --- Scoring -----------------------------------------------------------------

/// Score delta applied when an evaluation matches the prompt.
pub const MATCH_REWARD: i64 = 10;
/// Score delta magnitude applied when it does not.
pub const MISS_PENALTY: i64 = 5;

/// Pluggable drawing evaluation: a signed score delta per submission.
pub trait Scorer {
    fn score(&self, prompt: &str, encoding: &str) -> i64;
}

/// Looks for a per-prompt byte marker inside the encoded snapshot and pays
/// the fixed reward when found, the fixed penalty otherwise. Real PNG
/// payloads practically never contain a marker, so this is the honest floor
/// for evaluation until an actual recognizer lands behind [`Scorer`].
pub struct MarkerScorer {
    markers: &'static [(&'static str, &'static str)],
}

const SHAPE_MARKERS: &[(&str, &str)] = &[
    ("circle", "marker:circle"),
    ("square", "marker:square"),
    ("triangle", "marker:triangle"),
    ("star", "marker:star"),
];

impl Default for MarkerScorer {
    fn default() -> Self {
        MarkerScorer { markers: SHAPE_MARKERS }
    }
}

impl Scorer for MarkerScorer {
    fn score(&self, prompt: &str, encoding: &str) -> i64 {
        let matched = self
            .markers
            .iter()
            .any(|(p, marker)| *p == prompt && encoding.contains(marker));
        if matched { MATCH_REWARD } else { -MISS_PENALTY }
    }
}

// --- Theme -------------------------------------------------------------------

/// Dark-mode flag with a single mutator, passed explicitly to whoever
/// renders it. Lives for the process; never persisted.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    dark: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Theme { dark: true }
    }
}

impl Theme {
    pub fn dark(self) -> bool {
        self.dark
    }

    pub fn toggle(&mut self) {
        self.dark = !self.dark;
    }
}

// --- Submission result -------------------------------------------------------

pub struct SubmitOutcome {
    pub encoding: String,
    pub delta: i64,
    pub next: RoundOutcome,
}

// --- Game --------------------------------------------------------------------

pub struct Game<S: Scorer = MarkerScorer> {
    machine: RoundMachine,
    session: Session,
    pad: SketchPad,
    canvas_type: CanvasType,
    canvas_size: CanvasSize,
    theme: Theme,
    scorer: S,
}

impl Default for Game<MarkerScorer> {
    fn default() -> Self {
        Game::new(MarkerScorer::default())
    }
}

impl<S: Scorer> Game<S> {
    pub fn new(scorer: S) -> Self {
        let canvas_type = CanvasType::default();
        let canvas_size = CanvasSize::default();
        Game {
            machine: RoundMachine::new(),
            session: Session::new(),
            pad: SketchPad::new(canvas_size, canvas_type),
            canvas_type,
            canvas_size,
            theme: Theme::default(),
            scorer,
        }
    }

    // --- Accessors ---

    pub fn phase(&self) -> &Phase {
        self.machine.phase()
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.machine.mode()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.machine.prompt()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.machine.remaining()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn surface(&self) -> &Surface {
        self.pad.surface()
    }

    pub fn canvas_type(&self) -> CanvasType {
        self.canvas_type
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
    }

    // --- Round flow ---

    pub fn select_mode(&mut self, mode: GameMode) {
        self.machine.select_mode(mode);
    }

    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Feeds a resolved prompt in. The surface is refilled before the new
    /// round's first stroke can land. Returns true when the caller must
    /// start the countdown timer.
    pub fn prompt_ready(&mut self, prompt: String) -> bool {
        if self.machine.phase() != &Phase::AwaitingPrompt {
            return false;
        }
        self.pad.reset(self.canvas_type);
        self.machine.prompt_ready(prompt)
    }

    pub fn prompt_failed(&mut self, message: String) {
        self.machine.prompt_failed(message);
    }

    pub fn retry_prompt(&mut self) -> bool {
        self.machine.retry_prompt()
    }

    pub fn attach_countdown(&mut self, task: Box<dyn CountdownTask>) {
        self.machine.attach_countdown(task);
    }

    pub fn tick(&mut self) {
        self.machine.tick();
    }

    /// Finalizes the sketch and runs the evaluation pipeline: encode, score,
    /// record, then either a fresh round or `Finished`. A no-op (Ok(None))
    /// whenever no round is in `Drawing`. An encoding failure leaves the
    /// round in `Drawing` with its countdown intact, so the player can
    /// simply submit again.
    pub fn submit(&mut self) -> Result<Option<SubmitOutcome>, EncodeError> {
        if self.machine.phase() != &Phase::Drawing {
            return Ok(None);
        }
        let prompt = self.machine.prompt().unwrap_or_default().to_owned();
        let encoding = self.pad.submit()?;
        self.machine.begin_evaluation();
        let delta = self.scorer.score(&prompt, &encoding);
        self.session.apply_score_delta(delta);
        self.session.record_drawing(encoding.clone());
        let next = self.machine.finish_evaluation();
        debug!("evaluated {prompt:?}: delta {delta}, score now {}", self.session.score());
        Ok(Some(SubmitOutcome { encoding, delta, next }))
    }

    // --- Canvas settings ---

    /// Switches the background theme. The surface resets immediately; a
    /// stale background must never stay visible.
    pub fn set_canvas_type(&mut self, ty: CanvasType) {
        self.canvas_type = ty;
        self.pad.reset(ty);
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.canvas_size = size;
        self.pad.resize(size, self.canvas_type);
    }

    pub fn set_brush_color(&mut self, color: Rgb) {
        self.pad.set_color(color);
    }

    pub fn set_brush_width(&mut self, width: u32) {
        self.pad.set_width(width);
    }

    pub fn brush_color(&self) -> Rgb {
        self.pad.brush().color
    }

    pub fn brush_width(&self) -> u32 {
        self.pad.brush().width
    }

    // --- Pointer input ---
    // Gated on the Drawing phase: pointer traffic outside an active round
    // is ignored, never an error.

    pub fn pointer_down(&mut self, p: Point) {
        if self.machine.phase() == &Phase::Drawing {
            self.pad.begin_stroke(p);
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        if self.machine.phase() == &Phase::Drawing {
            self.pad.extend_stroke(p);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pad.end_stroke();
    }

    pub fn stroke_open(&self) -> bool {
        self.pad.stroke_open()
    }
}
