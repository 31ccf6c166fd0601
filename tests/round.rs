// Round machine transitions and countdown ownership. The recording task
// stands in for the browser interval so cancellation is observable on the
// host.

use std::cell::Cell;
use std::rc::Rc;

use quickdraw::round::{CountdownTask, GameMode, Phase, RoundMachine, RoundOutcome};

struct RecordingTask(Rc<Cell<bool>>);

impl CountdownTask for RecordingTask {
    fn cancel(&mut self) {
        self.0.set(true);
    }
}

fn cancelled_flag() -> (Box<RecordingTask>, Rc<Cell<bool>>) {
    let flag = Rc::new(Cell::new(false));
    (Box::new(RecordingTask(flag.clone())), flag)
}

#[test]
fn starts_in_mode_select() {
    let machine = RoundMachine::new();
    assert_eq!(machine.phase(), &Phase::ModeSelect);
    assert!(machine.round().is_none());
}

#[test]
fn selecting_a_mode_awaits_a_prompt() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Hard);
    assert_eq!(machine.phase(), &Phase::AwaitingPrompt);
    assert_eq!(machine.mode(), Some(GameMode::Hard));
}

#[test]
fn prompt_ready_enters_drawing_with_the_full_budget() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Hard);
    let wants_timer = machine.prompt_ready("cat".to_owned());
    assert!(wants_timer);
    assert_eq!(machine.phase(), &Phase::Drawing);
    assert_eq!(machine.prompt(), Some("cat"));
    assert_eq!(machine.remaining(), Some(5));
}

#[test]
fn creative_mode_wants_no_countdown() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Creative);
    assert!(!machine.prompt_ready("house".to_owned()));
    // Untimed rounds ignore ticks entirely.
    machine.tick();
    assert_eq!(machine.phase(), &Phase::Drawing);
    assert_eq!(machine.remaining(), Some(0));
}

#[test]
fn prompt_ready_outside_awaiting_is_a_noop() {
    let mut machine = RoundMachine::new();
    assert!(!machine.prompt_ready("stray".to_owned()));
    assert_eq!(machine.phase(), &Phase::ModeSelect);
    assert!(machine.round().is_none());
}

#[test]
fn countdown_reaches_exactly_zero_and_stops() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Hard);
    machine.prompt_ready("sun".to_owned());
    let (task, cancelled) = cancelled_flag();
    machine.attach_countdown(task);
    for expected in (0..5).rev() {
        machine.tick();
        assert_eq!(machine.remaining(), Some(expected));
    }
    assert_eq!(machine.phase(), &Phase::Finished);
    assert!(cancelled.get(), "the countdown task must be cancelled at zero");
    // Further ticks never push the remaining time below zero.
    machine.tick();
    machine.tick();
    assert_eq!(machine.remaining(), Some(0));
}

#[test]
fn hard_mode_times_out_after_five_ticks() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Hard);
    machine.prompt_ready("boat".to_owned());
    for _ in 0..5 {
        assert_eq!(machine.phase(), &Phase::Drawing);
        machine.tick();
    }
    assert_eq!(machine.phase(), &Phase::Finished);
    assert_eq!(machine.remaining(), Some(0));
}

#[test]
fn submission_cancels_the_countdown() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Easy);
    machine.prompt_ready("tree".to_owned());
    let (task, cancelled) = cancelled_flag();
    machine.attach_countdown(task);
    assert!(machine.begin_evaluation());
    assert!(cancelled.get(), "leaving Drawing must cancel the timer");
    assert_eq!(machine.phase(), &Phase::Evaluating);
}

#[test]
fn evaluation_rolls_into_a_fresh_round() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Easy);
    machine.prompt_ready("tree".to_owned());
    machine.tick();
    machine.tick();
    assert_eq!(machine.remaining(), Some(13));
    machine.begin_evaluation();
    assert_eq!(machine.finish_evaluation(), RoundOutcome::NextRound);
    assert_eq!(machine.phase(), &Phase::AwaitingPrompt);
    assert!(machine.prompt().is_none(), "the prompt is cleared after evaluation");
    // The next round gets the whole budget again.
    machine.prompt_ready("river".to_owned());
    assert_eq!(machine.remaining(), Some(15));
}

#[test]
fn begin_evaluation_outside_drawing_is_a_noop() {
    let mut machine = RoundMachine::new();
    assert!(!machine.begin_evaluation());
    machine.select_mode(GameMode::Hard);
    assert!(!machine.begin_evaluation());
    machine.prompt_ready("dog".to_owned());
    for _ in 0..5 {
        machine.tick();
    }
    assert_eq!(machine.phase(), &Phase::Finished);
    assert!(!machine.begin_evaluation(), "no active round, submit must be ignored");
}

#[test]
fn prompt_failure_is_retryable() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Normal);
    machine.prompt_failed("connection refused".to_owned());
    assert_eq!(machine.phase(), &Phase::PromptFailed("connection refused".to_owned()));
    assert!(machine.retry_prompt());
    assert_eq!(machine.phase(), &Phase::AwaitingPrompt);
    assert!(machine.prompt_ready("fish".to_owned()));
}

#[test]
fn retry_outside_the_error_state_is_a_noop() {
    let mut machine = RoundMachine::new();
    assert!(!machine.retry_prompt());
    machine.select_mode(GameMode::Normal);
    assert!(!machine.retry_prompt());
}

#[test]
fn reset_is_available_from_any_state() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Hard);
    machine.prompt_ready("moon".to_owned());
    let (task, cancelled) = cancelled_flag();
    machine.attach_countdown(task);
    machine.reset();
    assert_eq!(machine.phase(), &Phase::ModeSelect);
    assert!(machine.mode().is_none());
    assert!(machine.round().is_none());
    assert!(cancelled.get(), "reset must cancel a live countdown");
}

#[test]
fn selecting_a_new_mode_cancels_a_live_countdown() {
    let mut machine = RoundMachine::new();
    machine.select_mode(GameMode::Hard);
    machine.prompt_ready("star".to_owned());
    let (task, cancelled) = cancelled_flag();
    machine.attach_countdown(task);
    machine.select_mode(GameMode::Easy);
    assert!(cancelled.get());
    assert_eq!(machine.phase(), &Phase::AwaitingPrompt);
}

#[test]
fn a_late_attach_is_cancelled_immediately() {
    let mut machine = RoundMachine::new();
    let (task, cancelled) = cancelled_flag();
    machine.attach_countdown(task);
    assert!(cancelled.get(), "attaching outside Drawing must not leave a live timer");
}

#[test]
fn teardown_cancels_the_countdown() {
    let flag = Rc::new(Cell::new(false));
    {
        let mut machine = RoundMachine::new();
        machine.select_mode(GameMode::Normal);
        machine.prompt_ready("cloud".to_owned());
        machine.attach_countdown(Box::new(RecordingTask(flag.clone())));
    }
    assert!(flag.get(), "dropping the machine must cancel the timer");
}

#[test]
fn ticks_outside_drawing_are_ignored() {
    let mut machine = RoundMachine::new();
    machine.tick();
    assert_eq!(machine.phase(), &Phase::ModeSelect);
    machine.select_mode(GameMode::Hard);
    machine.tick();
    assert_eq!(machine.phase(), &Phase::AwaitingPrompt);
    assert!(machine.round().is_none());
}
