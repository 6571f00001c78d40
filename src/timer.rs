//! Focus timer state machine: a focus/break countdown with explicit
//! two-phase completion. `tick()` reports the completed mode exactly once;
//! the caller runs its side effects (chime, session persistence) and then
//! calls `advance_after_completion()` to flip the mode and reset the clock.

/// Timer mode. Focus intervals are logged on completion; breaks are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    pub fn other(&self) -> Mode {
        match self {
            Mode::Focus => Mode::Break,
            Mode::Break => Mode::Focus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::Break => "Break",
        }
    }
}

/// Result of a single one-second tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is paused; nothing happened
    Idle,
    /// Countdown decremented, still above zero
    Ticked,
    /// Countdown reached zero this tick. The timer has paused itself;
    /// the caller must run completion side effects and then call
    /// `advance_after_completion()`.
    Completed(Mode),
}

#[derive(Debug, Clone)]
pub struct FocusTimer {
    mode: Mode,
    remaining: u32, // seconds
    running: bool,
    focus_duration: u32,
    break_duration: u32,
}

impl FocusTimer {
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        // A zero-length interval would complete on its first tick forever
        let focus_duration = focus_minutes.max(1) * 60;
        let break_duration = break_minutes.max(1) * 60;
        Self {
            mode: Mode::Focus,
            remaining: focus_duration,
            running: false,
            focus_duration,
            break_duration,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Full duration of the given mode, in seconds
    pub fn duration_of(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus_duration,
            Mode::Break => self.break_duration,
        }
    }

    /// Focus interval length in minutes (the duration recorded per session)
    pub fn focus_minutes(&self) -> i64 {
        (self.focus_duration / 60) as i64
    }

    /// Fraction of the current interval still remaining, for the gauge
    pub fn progress(&self) -> f64 {
        let total = self.duration_of(self.mode);
        if total == 0 {
            return 0.0;
        }
        self.remaining as f64 / total as f64
    }

    /// Flip running/paused. Never touches the countdown value.
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Pause and restore the current mode's full duration
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining = self.duration_of(self.mode);
    }

    /// Pause and jump to the target mode at its full duration, discarding
    /// any in-progress countdown. Switching to the current mode resets it.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.running = false;
        self.remaining = self.duration_of(mode);
    }

    /// One-second tick. Pauses the timer the moment the countdown hits zero
    /// so a completion can never fire twice for the same interval.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TickOutcome::Completed(self.mode)
        } else {
            TickOutcome::Ticked
        }
    }

    /// Second phase of completion: flip to the opposite mode and reset the
    /// countdown. Called after the caller's completion side effects so that
    /// session persistence observes the finished mode, not the next one.
    pub fn advance_after_completion(&mut self) {
        self.mode = self.mode.other();
        self.remaining = self.duration_of(self.mode);
        self.running = false;
    }
}

/// Format a seconds value as MM:SS
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_paused_in_focus_at_full_duration() {
        let timer = FocusTimer::new(25, 5);
        assert_eq!(timer.mode(), Mode::Focus);
        assert_eq!(timer.remaining(), 25 * 60);
        assert!(!timer.is_running());
    }

    #[test]
    fn toggle_does_not_touch_countdown() {
        let mut timer = FocusTimer::new(25, 5);
        timer.toggle();
        assert!(timer.is_running());
        assert_eq!(timer.remaining(), 25 * 60);
        timer.toggle();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 25 * 60);
    }

    #[test]
    fn tick_only_advances_while_running() {
        let mut timer = FocusTimer::new(25, 5);
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining(), 25 * 60);

        timer.toggle();
        assert_eq!(timer.tick(), TickOutcome::Ticked);
        assert_eq!(timer.remaining(), 25 * 60 - 1);
    }

    #[test]
    fn reset_pauses_and_restores_full_duration() {
        let mut timer = FocusTimer::new(25, 5);
        timer.toggle();
        for _ in 0..10 {
            timer.tick();
        }
        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 25 * 60);
    }

    #[test]
    fn switch_mode_discards_progress() {
        let mut timer = FocusTimer::new(25, 5);
        timer.toggle();
        for _ in 0..100 {
            timer.tick();
        }
        timer.switch_mode(Mode::Break);
        assert_eq!(timer.mode(), Mode::Break);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 5 * 60);

        // Switching to the current mode behaves like reset
        timer.toggle();
        timer.tick();
        timer.switch_mode(Mode::Break);
        assert_eq!(timer.remaining(), 5 * 60);
    }

    #[test]
    fn full_focus_interval_completes_exactly_once() {
        let mut timer = FocusTimer::new(25, 5);
        timer.toggle();

        let mut completions = 0;
        for _ in 0..1500 {
            if let TickOutcome::Completed(finished) = timer.tick() {
                completions += 1;
                assert_eq!(finished, Mode::Focus);
                timer.advance_after_completion();
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(timer.mode(), Mode::Break);
        assert_eq!(timer.remaining(), 5 * 60);
        assert!(!timer.is_running());

        // Paused after completion: further ticks are no-ops
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining(), 5 * 60);
    }

    #[test]
    fn break_completion_returns_to_focus() {
        let mut timer = FocusTimer::new(25, 5);
        timer.switch_mode(Mode::Break);
        timer.toggle();

        let mut finished_mode = None;
        for _ in 0..(5 * 60) {
            if let TickOutcome::Completed(mode) = timer.tick() {
                finished_mode = Some(mode);
                timer.advance_after_completion();
            }
        }

        assert_eq!(finished_mode, Some(Mode::Break));
        assert_eq!(timer.mode(), Mode::Focus);
        assert_eq!(timer.remaining(), 25 * 60);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
    }
}
