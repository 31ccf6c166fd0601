//! Round sequencing: mode selection, prompt fetch, the timed drawing window
//! and evaluation hand-off.
//!
//! The machine owns the countdown as an explicit cancellable task handle.
//! The browser layer supplies the real repeating timer (and calls [`
//! RoundMachine::tick`] from it); the machine cancels the handle on reaching
//! zero, on every exit from `Drawing` and on teardown, so a timer can never
//! keep decrementing after its round ended.

use log::debug;

// --- Game modes --------------------------------------------------------------

/// Fixed mode table. The budget is the whole allotment for one round;
/// `Creative` is untimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    Creative,
    Easy,
    Normal,
    Hard,
}

impl GameMode {
    pub const ALL: [GameMode; 4] =
        [GameMode::Creative, GameMode::Easy, GameMode::Normal, GameMode::Hard];

    /// Time budget in seconds; 0 means untimed.
    pub fn time_budget(self) -> u32 {
        match self {
            GameMode::Creative => 0,
            GameMode::Easy => 15,
            GameMode::Normal => 10,
            GameMode::Hard => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::Creative => "creative",
            GameMode::Easy => "easy",
            GameMode::Normal => "normal",
            GameMode::Hard => "hard",
        }
    }
}

// --- Countdown task handle ---------------------------------------------------

/// A scheduled repeating task driving the per-second countdown. `cancel`
/// must stop the underlying timer; the machine calls it exactly once per
/// attached handle.
pub trait CountdownTask {
    fn cancel(&mut self);
}

// --- Round -------------------------------------------------------------------

/// One prompt-drawing cycle.
#[derive(Clone, Debug)]
pub struct Round {
    pub prompt: String,
    pub budget: u32,
    pub remaining: u32,
}

impl Round {
    pub fn timed(&self) -> bool {
        self.budget > 0
    }

    pub fn expired(&self) -> bool {
        self.timed() && self.remaining == 0
    }
}

// --- Machine -----------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Initial state; also reachable from anywhere via explicit reset.
    ModeSelect,
    /// A prompt fetch is in flight.
    AwaitingPrompt,
    /// The fetch failed; the message is shown with a retry affordance.
    PromptFailed(String),
    /// The player is sketching; the countdown runs here when timed.
    Drawing,
    /// A submission is being scored and recorded.
    Evaluating,
    /// The time budget ran out. Only an explicit mode pick restarts play.
    Finished,
}

/// Outcome of finishing an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A fresh round starts: fetch the next prompt, full budget again.
    NextRound,
    /// The countdown had already reached zero; play is over.
    Finished,
}

pub struct RoundMachine {
    phase: Phase,
    mode: Option<GameMode>,
    round: Option<Round>,
    countdown: Option<Box<dyn CountdownTask>>,
}

impl Default for RoundMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundMachine {
    pub fn new() -> Self {
        RoundMachine {
            phase: Phase::ModeSelect,
            mode: None,
            round: None,
            countdown: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.round.as_ref().map(|r| r.prompt.as_str())
    }

    pub fn remaining(&self) -> Option<u32> {
        self.round.as_ref().map(|r| r.remaining)
    }

    /// Picks a mode and moves to `AwaitingPrompt`. Valid from any state;
    /// selecting a mode mid-game is the explicit reset-and-restart path.
    pub fn select_mode(&mut self, mode: GameMode) {
        self.clear_countdown();
        self.mode = Some(mode);
        self.round = None;
        self.phase = Phase::AwaitingPrompt;
        debug!("mode selected: {} ({}s budget)", mode.label(), mode.time_budget());
    }

    /// Returns to `ModeSelect`, dropping the round and the countdown.
    pub fn reset(&mut self) {
        self.clear_countdown();
        self.mode = None;
        self.round = None;
        self.phase = Phase::ModeSelect;
    }

    /// A prompt fetch resolved. Starts a round with the full mode budget and
    /// enters `Drawing`. Returns true when the caller must start the
    /// per-second countdown (nonzero budget) and hand the task in via
    /// [`RoundMachine::attach_countdown`]. A no-op outside `AwaitingPrompt`.
    pub fn prompt_ready(&mut self, prompt: String) -> bool {
        if self.phase != Phase::AwaitingPrompt {
            return false;
        }
        let budget = self.mode.map(GameMode::time_budget).unwrap_or(0);
        debug!("prompt ready: {prompt:?}");
        self.round = Some(Round { prompt, budget, remaining: budget });
        self.phase = Phase::Drawing;
        budget > 0
    }

    /// A prompt fetch failed. Surfaces a retryable error state instead of
    /// hanging in `AwaitingPrompt`.
    pub fn prompt_failed(&mut self, message: String) {
        if self.phase != Phase::AwaitingPrompt {
            return;
        }
        self.phase = Phase::PromptFailed(message);
    }

    /// Retries a failed prompt fetch.
    pub fn retry_prompt(&mut self) -> bool {
        if let Phase::PromptFailed(_) = self.phase {
            self.phase = Phase::AwaitingPrompt;
            true
        } else {
            false
        }
    }

    /// Hands the machine the running countdown task. Cancelled immediately
    /// if the machine already left `Drawing` (a late attach after a quick
    /// transition must not leave a live timer behind).
    pub fn attach_countdown(&mut self, mut task: Box<dyn CountdownTask>) {
        self.clear_countdown();
        if self.phase == Phase::Drawing {
            self.countdown = Some(task);
        } else {
            task.cancel();
        }
    }

    /// One second elapsed. Decrements the remaining time; on reaching zero
    /// the round is over: the task is cancelled and play moves to
    /// `Finished`. Never decrements below zero; a no-op outside `Drawing`.
    pub fn tick(&mut self) {
        if self.phase != Phase::Drawing {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if !round.timed() {
            return;
        }
        round.remaining = round.remaining.saturating_sub(1);
        if round.remaining == 0 {
            self.clear_countdown();
            self.phase = Phase::Finished;
            debug!("time budget exhausted");
        }
    }

    /// A submission arrived: leaves `Drawing` for `Evaluating`, cancelling
    /// the countdown. Returns false (and does nothing) in any other phase,
    /// so a stray submit with no active round is harmless.
    pub fn begin_evaluation(&mut self) -> bool {
        if self.phase != Phase::Drawing {
            return false;
        }
        self.clear_countdown();
        self.phase = Phase::Evaluating;
        true
    }

    /// Scoring and recording are done; clears the prompt. Moves to
    /// `Finished` when the countdown had already reached zero, otherwise a
    /// fresh round begins with the next prompt.
    pub fn finish_evaluation(&mut self) -> RoundOutcome {
        let expired = self.round.as_ref().map(Round::expired).unwrap_or(false);
        self.round = None;
        if expired {
            self.phase = Phase::Finished;
            RoundOutcome::Finished
        } else {
            self.phase = Phase::AwaitingPrompt;
            RoundOutcome::NextRound
        }
    }

    fn clear_countdown(&mut self) {
        if let Some(mut task) = self.countdown.take() {
            task.cancel();
        }
    }
}

impl Drop for RoundMachine {
    // Teardown must not leak a ticking timer.
    fn drop(&mut self) {
        self.clear_countdown();
    }
}
