use log::{debug, error, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::{Notice, WidgetError};
use crate::puzzle_variant::PuzzleVariant;
use crate::scramble::{self, move_count_of, Scramble};
use crate::widget::{
    PollOutcome, PuzzleWidget, ReadinessPoll, WidgetConfig, READY_POLL_INTERVAL_MS,
};

// The widget has no "animation finished" event. These delays were picked to
// outlast its internal settle time; they are a heuristic, not a signal.
pub const SCRAMBLE_SETTLE_MS: u32 = 2000;
pub const SOLVE_SETTLE_MS: u32 = 500;
pub const INITIAL_SCRAMBLE_DELAY_MS: u32 = 1500;

const PREVIEW_CHARS: usize = 50;

/// Which puzzles a session can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Starts on `primary` and toggles between the two.
    Switchable {
        primary: PuzzleVariant,
        secondary: PuzzleVariant,
    },
    /// A single puzzle; switching is not supported.
    Fixed(PuzzleVariant),
}

impl SessionMode {
    pub fn initial_variant(self) -> PuzzleVariant {
        match self {
            SessionMode::Switchable { primary, .. } => primary,
            SessionMode::Fixed(variant) => variant,
        }
    }

    /// The puzzle a switch from `current` goes to.
    pub fn other(self, current: PuzzleVariant) -> Option<PuzzleVariant> {
        match self {
            SessionMode::Switchable { primary, secondary } => {
                Some(if current == primary { secondary } else { primary })
            }
            SessionMode::Fixed(_) => None,
        }
    }
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Switchable {
            primary: PuzzleVariant::Cube3x3,
            secondary: PuzzleVariant::Megaminx,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: SessionMode,
    /// Overrides the per-puzzle scramble length when set.
    pub scramble_length: Option<usize>,
}

/// Everything the UI reads back from a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub variant: PuzzleVariant,
    pub current_algorithm: Scramble,
    pub move_count: usize,
    pub busy: bool,
}

impl SessionState {
    fn new(variant: PuzzleVariant) -> Self {
        Self {
            variant,
            current_algorithm: Scramble::default(),
            move_count: 0,
            busy: false,
        }
    }

    fn clear_algorithm(&mut self) {
        self.current_algorithm = Scramble::default();
        self.move_count = 0;
    }

    pub fn moves_readout(&self) -> String {
        format!("Moves: {}", self.move_count)
    }

    pub fn algorithm_readout(&self) -> String {
        if self.current_algorithm.is_empty() {
            "Current Algorithm: None".to_string()
        } else {
            format!("Current Algorithm: {}", self.current_algorithm)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Startup,
    Scramble,
    Solve,
    SwitchVariant,
}

/// Handed to the host when an operation has to wait. Pass it back to
/// [`PuzzleSession::complete`] once `delay_ms` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    operation: Operation,
    delay_ms: u32,
    ticket: u64,
}

impl Pending {
    #[inline]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[inline]
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Wait(Pending),
    /// The operation is over and the session is idle again.
    Done {
        operation: Operation,
        notice: Option<Notice>,
    },
    /// Startup mounted a widget (ready or not) and the session is idle.
    /// The host should call [`PuzzleSession::scramble`] after
    /// `scramble_after_ms`. A startup that failed to build the widget ends
    /// with [`Step::Done`] instead.
    Started {
        notice: Option<Notice>,
        scramble_after_ms: u32,
    },
    /// The session was busy (or cannot switch); nothing changed.
    Rejected,
    /// The pending token does not belong to the operation in flight.
    Stale,
}

#[derive(Debug)]
struct InFlight {
    ticket: u64,
    operation: Operation,
    poll: ReadinessPoll,
}

/// Owns the session state and drives the visualization widget.
///
/// Every operation is synchronous. When the widget needs time the session
/// returns [`Step::Wait`] and stays busy until the host completes the pending
/// token. Requests made while busy are dropped.
pub struct PuzzleSession<W, R = ThreadRng> {
    state: SessionState,
    config: SessionConfig,
    widget: W,
    rng: R,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl<W: PuzzleWidget> PuzzleSession<W, ThreadRng> {
    pub fn new(widget: W) -> Self {
        Self::with_config(SessionConfig::default(), widget, rand::thread_rng())
    }
}

impl<W: PuzzleWidget, R: Rng> PuzzleSession<W, R> {
    pub fn with_config(config: SessionConfig, widget: W, rng: R) -> Self {
        Self {
            state: SessionState::new(config.mode.initial_variant()),
            config,
            widget,
            rng,
            in_flight: None,
            next_ticket: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn widget(&self) -> &W {
        &self.widget
    }

    #[inline]
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.state.busy
    }

    pub fn scramble_length(&self) -> usize {
        self.config
            .scramble_length
            .unwrap_or_else(|| self.state.variant.scramble_length())
    }

    /// Build the first widget and wait for it to become ready.
    pub fn start(&mut self) -> Step {
        if self.state.busy {
            return Step::Rejected;
        }
        let variant = self.state.variant;
        info!("initializing {}", variant.display_name());
        self.begin(Operation::Startup);
        match self.widget.mount(&WidgetConfig::new(variant, String::new())) {
            Ok(()) => self.poll_ready(),
            Err(e) => {
                error!("error initializing puzzle: {}", e);
                self.finish(Some(Notice::new(
                    "Failed to load puzzle. Please refresh the page.",
                )))
            }
        }
    }

    pub fn scramble(&mut self) -> Step {
        if self.state.busy {
            debug!("busy, ignoring scramble");
            return Step::Rejected;
        }
        self.begin(Operation::Scramble);

        let variant = self.state.variant;
        let length = self.scramble_length();
        let scramble = scramble::generate_with_rng(variant, length, &mut self.rng);
        let algorithm = scramble.to_string();
        info!("applying scramble: {}", scramble.preview(PREVIEW_CHARS));

        self.state.move_count = move_count_of(algorithm.as_str());
        self.state.current_algorithm = scramble;

        match self.widget.mount(&WidgetConfig::new(variant, algorithm)) {
            Ok(()) => self.wait(SCRAMBLE_SETTLE_MS),
            Err(e) => {
                error!("error scrambling puzzle: {}", e);
                self.finish(Some(Notice::new("Failed to scramble puzzle")))
            }
        }
    }

    /// There is no solver: solving shows the puzzle with an empty algorithm.
    pub fn solve(&mut self) -> Step {
        if self.state.busy {
            debug!("busy, ignoring solve");
            return Step::Rejected;
        }
        self.begin(Operation::Solve);
        self.state.clear_algorithm();
        info!("solving {}", self.state.variant.display_name());

        match self
            .widget
            .mount(&WidgetConfig::new(self.state.variant, String::new()))
        {
            Ok(()) => self.wait(SOLVE_SETTLE_MS),
            Err(e) => {
                error!("error solving puzzle: {}", e);
                self.finish(Some(Notice::new("Failed to solve puzzle")))
            }
        }
    }

    pub fn switch_variant(&mut self) -> Step {
        if self.state.busy {
            debug!("busy, ignoring switch");
            return Step::Rejected;
        }
        let next = match self.config.mode.other(self.state.variant) {
            Some(next) => next,
            None => {
                debug!("{} session cannot switch puzzles", self.state.variant);
                return Step::Rejected;
            }
        };
        self.begin(Operation::SwitchVariant);
        self.state.variant = next;
        self.state.clear_algorithm();
        info!("switching to {}", next.display_name());

        match self.widget.mount(&WidgetConfig::new(next, String::new())) {
            Ok(()) => self.poll_ready(),
            Err(e) => {
                error!("error switching puzzle: {}", e);
                self.finish(Some(Notice::new(
                    "Failed to load puzzle. Please refresh the page.",
                )))
            }
        }
    }

    /// Continue the operation that handed out `pending`.
    pub fn complete(&mut self, pending: Pending) -> Step {
        match &self.in_flight {
            Some(in_flight) if in_flight.ticket == pending.ticket => {}
            _ => {
                debug!("ignoring stale {:?} completion", pending.operation);
                return Step::Stale;
            }
        }
        match pending.operation {
            Operation::Startup | Operation::SwitchVariant => self.poll_ready(),
            Operation::Scramble => {
                let notice = match self.widget.jump_to_end() {
                    Ok(()) => {
                        debug!("jumped to end of scramble");
                        None
                    }
                    Err(WidgetError::TimelineUnavailable) => {
                        info!("no timeline control, scramble is set but the view may not change");
                        Some(Notice::new("Scramble set, but the puzzle view may not show it"))
                    }
                    Err(e) => {
                        warn!("{}", e);
                        Some(Notice::new("Scramble set, but the puzzle view may not show it"))
                    }
                };
                info!("scramble completed");
                self.finish(notice)
            }
            Operation::Solve => self.finish(None),
        }
    }

    fn begin(&mut self, operation: Operation) {
        self.next_ticket += 1;
        self.in_flight = Some(InFlight {
            ticket: self.next_ticket,
            operation,
            poll: ReadinessPoll::default(),
        });
        self.state.busy = true;
    }

    fn wait(&self, delay_ms: u32) -> Step {
        match &self.in_flight {
            Some(in_flight) => Step::Wait(Pending {
                operation: in_flight.operation,
                delay_ms,
                ticket: in_flight.ticket,
            }),
            None => Step::Stale,
        }
    }

    fn finish(&mut self, notice: Option<Notice>) -> Step {
        self.state.busy = false;
        match self.in_flight.take() {
            Some(in_flight) => Step::Done {
                operation: in_flight.operation,
                notice,
            },
            None => Step::Stale,
        }
    }

    // A mounted widget ends startup with the automatic scramble queued,
    // whether or not it reported ready in time.
    fn settle(&mut self, notice: Option<Notice>) -> Step {
        match self.finish(notice) {
            Step::Done {
                operation: Operation::Startup,
                notice,
            } => Step::Started {
                notice,
                scramble_after_ms: INITIAL_SCRAMBLE_DELAY_MS,
            },
            step => step,
        }
    }

    fn poll_ready(&mut self) -> Step {
        let ready = self.widget.is_ready();
        let poll = match self.in_flight.as_mut() {
            Some(in_flight) => &mut in_flight.poll,
            None => return Step::Stale,
        };
        match poll.check(ready) {
            PollOutcome::Ready => {
                info!("puzzle widget ready after {} checks", poll.attempts());
                self.settle(None)
            }
            PollOutcome::Retry => self.wait(READY_POLL_INTERVAL_MS),
            PollOutcome::Exhausted => {
                let attempts = poll.attempts();
                warn!("{}, proceeding anyway", WidgetError::NotReady { attempts });
                self.settle(Some(Notice::new(
                    "The puzzle is taking longer than usual to load",
                )))
            }
        }
    }
}
