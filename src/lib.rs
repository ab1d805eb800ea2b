use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use js_sys::Function;
use log::{debug, warn, LevelFilter};
use wasm_bindgen::prelude::*;

mod adjacency;
mod error;
mod logger;
mod moves;
mod puzzle_variant;
mod scramble;
mod session;
mod widget;

pub use adjacency::AdjacencyPolicy;
pub use error::{Notice, WidgetError, NOTICE_DISMISS_MS};
pub use moves::{moves_for, Modifier, Move};
pub use puzzle_variant::{PuzzleVariant, UnknownPuzzle};
pub use scramble::{generate, generate_with_rng, move_count_of, Scramble, MAX_DRAW_ATTEMPTS};
pub use session::{
    Operation, Pending, PuzzleSession, SessionConfig, SessionMode, SessionState, Step,
    INITIAL_SCRAMBLE_DELAY_MS, SCRAMBLE_SETTLE_MS, SOLVE_SETTLE_MS,
};
pub use widget::{
    PollOutcome, PuzzleWidget, ReadinessPoll, WidgetConfig, READY_POLL_INTERVAL_MS,
    READY_POLL_MAX_ATTEMPTS,
};

#[wasm_bindgen]
extern "C" {
    /// Page-side wrapper around the twisty puzzle player.
    ///
    /// `mount(configJson)` replaces the displayed player, `isReady()` reports
    /// whether it accepts commands and `jumpToEnd()` returns false when the
    /// player has no timeline to jump with.
    ///
    /// These run while the app holds its session. Reading the app's getters
    /// from inside them is fine; actions called from inside them are ignored.
    pub type JsPuzzleWidget;

    #[wasm_bindgen(method, catch, js_name = mount)]
    fn js_mount(this: &JsPuzzleWidget, config: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = isReady)]
    fn js_is_ready(this: &JsPuzzleWidget) -> bool;

    #[wasm_bindgen(method, catch, js_name = jumpToEnd)]
    fn js_jump_to_end(this: &JsPuzzleWidget) -> Result<bool, JsValue>;
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl PuzzleWidget for JsPuzzleWidget {
    fn mount(&mut self, config: &WidgetConfig) -> Result<(), WidgetError> {
        let json = config
            .to_json()
            .map_err(|e| WidgetError::Construction(e.to_string()))?;
        self.js_mount(&json)
            .map_err(|e| WidgetError::Construction(describe(&e)))
    }

    fn is_ready(&self) -> bool {
        self.js_is_ready()
    }

    fn jump_to_end(&mut self) -> Result<(), WidgetError> {
        match self.js_jump_to_end() {
            Ok(true) => Ok(()),
            Ok(false) => Err(WidgetError::TimelineUnavailable),
            Err(e) => Err(WidgetError::Timeline(describe(&e))),
        }
    }
}

struct AppInner {
    session: RefCell<PuzzleSession<JsPuzzleWidget>>,
    // Copy of the session state for the getters. The session stays borrowed
    // while the page widget runs `mount` or `jumpToEnd`, and a widget that
    // reads the app from inside those calls must not touch that borrow.
    state: RefCell<SessionState>,
    mode: SessionMode,
    wait_timer: RefCell<Option<Timeout>>,
    scramble_timer: RefCell<Option<Timeout>>,
    on_change: Function,
    on_notice: Function,
}

impl AppInner {
    fn notify(&self) {
        if let Err(e) = self.on_change.call0(&JsValue::NULL) {
            warn!("change listener failed: {}", describe(&e));
        }
    }

    fn show_notice(&self, notice: &Notice) {
        let message = JsValue::from_str(&notice.message);
        let dismiss_after_ms = JsValue::from(notice.dismiss_after_ms);
        if let Err(e) = self
            .on_notice
            .call2(&JsValue::NULL, &message, &dismiss_after_ms)
        {
            warn!("notice listener failed: {}", describe(&e));
        }
    }

    fn refresh_state(&self) {
        if let Ok(session) = self.session.try_borrow() {
            *self.state.borrow_mut() = session.state().clone();
        }
    }
}

/// Run `action` on the session unless it is already borrowed. That only
/// happens when the page widget calls back into the app from inside `mount`
/// or `jumpToEnd`; such a call is dropped like any request made while busy.
fn run_session<S>(session: &RefCell<S>, action: impl FnOnce(&mut S) -> Step) -> Step {
    match session.try_borrow_mut() {
        Ok(mut session) => action(&mut session),
        Err(_) => {
            debug!("session in use, ignoring re-entrant call");
            Step::Rejected
        }
    }
}

/// Feed a session step to the browser: schedule timers for waits, surface
/// notices, and tell the page to re-read the state.
fn drive(inner: &Rc<AppInner>, step: Step) {
    match step {
        Step::Wait(pending) => {
            let timer_inner = Rc::clone(inner);
            *inner.wait_timer.borrow_mut() = Some(Timeout::new(pending.delay_ms(), move || {
                timer_inner.wait_timer.borrow_mut().take();
                let step = run_session(&timer_inner.session, |session| session.complete(pending));
                drive(&timer_inner, step);
            }));
        }
        Step::Done { notice, .. } => {
            if let Some(notice) = notice {
                inner.show_notice(&notice);
            }
        }
        Step::Started {
            notice,
            scramble_after_ms,
        } => {
            if let Some(notice) = notice {
                inner.show_notice(&notice);
            }
            let timer_inner = Rc::clone(inner);
            *inner.scramble_timer.borrow_mut() = Some(Timeout::new(scramble_after_ms, move || {
                timer_inner.scramble_timer.borrow_mut().take();
                let step = run_session(&timer_inner.session, |session| session.scramble());
                drive(&timer_inner, step);
            }));
        }
        Step::Rejected | Step::Stale => return,
    }
    inner.refresh_state();
    inner.notify();
}

#[wasm_bindgen]
pub struct ScrambleApp {
    inner: Rc<AppInner>,
}

impl ScrambleApp {
    fn build(
        mode: SessionMode,
        widget: JsPuzzleWidget,
        on_change: Function,
        on_notice: Function,
    ) -> ScrambleApp {
        logger::init(LevelFilter::Info);
        let config = SessionConfig {
            mode,
            scramble_length: None,
        };
        let session = PuzzleSession::with_config(config, widget, rand::thread_rng());
        let state = session.state().clone();
        ScrambleApp {
            inner: Rc::new(AppInner {
                session: RefCell::new(session),
                state: RefCell::new(state),
                mode,
                wait_timer: RefCell::new(None),
                scramble_timer: RefCell::new(None),
                on_change,
                on_notice,
            }),
        }
    }
}

#[wasm_bindgen]
impl ScrambleApp {
    /// A session that toggles between the 3x3x3 cube and the megaminx.
    #[wasm_bindgen(constructor)]
    pub fn new(widget: JsPuzzleWidget, on_change: Function, on_notice: Function) -> ScrambleApp {
        Self::build(SessionMode::default(), widget, on_change, on_notice)
    }

    /// A session locked to one puzzle, e.g. `"7x7x7"`.
    pub fn fixed(
        puzzle: &str,
        widget: JsPuzzleWidget,
        on_change: Function,
        on_notice: Function,
    ) -> Result<ScrambleApp, JsValue> {
        let variant: PuzzleVariant = puzzle
            .parse()
            .map_err(|e: UnknownPuzzle| JsValue::from_str(&e.to_string()))?;
        Ok(Self::build(
            SessionMode::Fixed(variant),
            widget,
            on_change,
            on_notice,
        ))
    }

    /// Mount the first player and scramble it shortly after it is ready.
    pub fn start(&self) {
        let step = run_session(&self.inner.session, |session| session.start());
        drive(&self.inner, step);
    }

    pub fn scramble(&self) {
        let step = run_session(&self.inner.session, |session| session.scramble());
        drive(&self.inner, step);
    }

    pub fn solve(&self) {
        let step = run_session(&self.inner.session, |session| session.solve());
        drive(&self.inner, step);
    }

    #[wasm_bindgen(js_name = switchVariant)]
    pub fn switch_variant(&self) {
        let step = run_session(&self.inner.session, |session| session.switch_variant());
        drive(&self.inner, step);
    }

    #[wasm_bindgen(getter)]
    pub fn busy(&self) -> bool {
        self.inner.state.borrow().busy
    }

    #[wasm_bindgen(getter)]
    pub fn puzzle(&self) -> String {
        self.inner.state.borrow().variant.widget_id().to_string()
    }

    #[wasm_bindgen(getter, js_name = moveCount)]
    pub fn move_count(&self) -> usize {
        self.inner.state.borrow().move_count
    }

    #[wasm_bindgen(getter)]
    pub fn algorithm(&self) -> String {
        self.inner.state.borrow().current_algorithm.to_string()
    }

    #[wasm_bindgen(js_name = movesReadout)]
    pub fn moves_readout(&self) -> String {
        self.inner.state.borrow().moves_readout()
    }

    #[wasm_bindgen(js_name = algorithmReadout)]
    pub fn algorithm_readout(&self) -> String {
        self.inner.state.borrow().algorithm_readout()
    }

    #[wasm_bindgen(js_name = displayName)]
    pub fn display_name(&self) -> String {
        self.inner.state.borrow().variant.display_name().to_string()
    }

    #[wasm_bindgen(js_name = loadingText)]
    pub fn loading_text(&self) -> String {
        self.inner.state.borrow().variant.loading_text()
    }

    /// Label for the switch control, or `undefined` when switching is off.
    #[wasm_bindgen(js_name = switchLabel)]
    pub fn switch_label(&self) -> Option<String> {
        self.inner
            .mode
            .other(self.inner.state.borrow().variant)
            .map(PuzzleVariant::switch_label)
    }
}

/// Generate a scramble without a session, e.g. for a "copy scramble" button.
#[wasm_bindgen(js_name = generateScramble)]
pub fn generate_scramble(puzzle: &str, length: Option<usize>) -> Result<String, JsValue> {
    let variant: PuzzleVariant = puzzle
        .parse()
        .map_err(|e: UnknownPuzzle| JsValue::from_str(&e.to_string()))?;
    let length = length.unwrap_or_else(|| variant.scramble_length());
    Ok(generate(variant, length).to_string())
}

#[wasm_bindgen(js_name = moveCountOf)]
pub fn move_count_of_js(algorithm: Option<String>) -> usize {
    move_count_of(algorithm.as_deref())
}
