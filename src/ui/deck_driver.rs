//! Timers and rendering for one mounted slide deck.
//!
//! A [`DeckDriver`] owns every timer that touches its deck: the autoplay
//! interval, the single-shot that settles a painted wrap frame, and the
//! single-shot that re-renders when the paging lock runs out. Dropping the
//! driver stops all three, and callbacks only hold a weak handle to it, so no
//! callback outlives the deck it drives.

use crate::config::WRAP_SETTLE_DELAY;
use crate::state::SlideDeck;
use crate::state::clock::Clock;
use crate::ui::state_helpers::{self, DeckSurface};
use log::{debug, warn};
use slint::{ModelRc, Timer, TimerMode, VecModel};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Single-shot timers a deck needs after its state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FollowUps {
    /// Delay before a painted wrap frame is settled.
    pub settle_after: Option<Duration>,
    /// Delay before the paging lock runs out.
    pub unlock_after: Option<Duration>,
}

impl FollowUps {
    pub fn for_deck<C: Clock>(deck: &SlideDeck<C>) -> Self {
        Self {
            settle_after: deck.is_wrap_pending().then_some(WRAP_SETTLE_DELAY),
            unlock_after: deck.lock_remaining(),
        }
    }
}

/// Runs `f` only while `owner` is still alive.
fn if_mounted<T>(owner: &Weak<T>, f: impl FnOnce(Rc<T>)) {
    if let Some(owner) = owner.upgrade() {
        f(owner);
    }
}

#[derive(Default)]
struct DeckTimers {
    autoplay: Timer,
    settle: Timer,
    unlock: Timer,
}

impl DeckTimers {
    fn stop_all(&self) {
        self.autoplay.stop();
        self.settle.stop();
        self.unlock.stop();
    }

    #[cfg(test)]
    fn any_running(&self) -> bool {
        self.autoplay.running() || self.settle.running() || self.unlock.running()
    }
}

pub struct DeckDriver {
    ui: slint::Weak<crate::AppWindow>,
    surface: DeckSurface,
    deck: Arc<Mutex<SlideDeck>>,
    slides: Rc<VecModel<crate::SlideItem>>,
    timers: DeckTimers,
    last_tick: Cell<Instant>,
}

impl DeckDriver {
    /// Binds `deck` to its Slint surface, paints the first frame and starts autoplay.
    pub fn mount(
        ui: &crate::AppWindow,
        surface: DeckSurface,
        deck: Arc<Mutex<SlideDeck>>,
    ) -> Rc<Self> {
        let items = match deck.lock() {
            Ok(deck) => state_helpers::slide_items(deck.slides()),
            Err(_) => {
                warn!("{:?} deck lock poisoned; mounting without slides", surface);
                Vec::new()
            }
        };
        let slides = Rc::new(VecModel::from(items));
        state_helpers::set_deck_slides(ui, surface, ModelRc::from(slides.clone()));

        let driver = Rc::new(Self {
            ui: slint::ComponentHandle::as_weak(ui),
            surface,
            deck,
            slides,
            timers: DeckTimers::default(),
            last_tick: Cell::new(Instant::now()),
        });
        driver.render();
        driver.start_autoplay();
        driver
    }

    pub fn next(self: &Rc<Self>) {
        self.apply("next", |deck| deck.next());
    }

    pub fn previous(self: &Rc<Self>) {
        self.apply("previous", |deck| deck.previous());
    }

    pub fn select(self: &Rc<Self>, index: i32) {
        let Ok(index) = usize::try_from(index) else {
            warn!("Ignoring selection of negative slide index {}", index);
            return;
        };
        self.apply("select", |deck| deck.select_slide(index));
    }

    pub fn collapse(self: &Rc<Self>) {
        self.apply("collapse", |deck| deck.collapse());
    }

    /// Runs an intent against the deck and repaints when it changed anything.
    fn apply<F>(self: &Rc<Self>, intent: &str, f: F)
    where
        F: FnOnce(&mut SlideDeck) -> bool,
    {
        let changed = match self.deck.lock() {
            Ok(mut deck) => {
                let changed = f(&mut deck);
                if changed {
                    debug!(
                        "{:?} deck: {} -> {} ({:?})",
                        self.surface,
                        intent,
                        deck.current_slide().image_alt_text,
                        deck.last_direction()
                    );
                }
                changed
            }
            Err(_) => {
                warn!("{:?} deck lock poisoned; dropping {}", self.surface, intent);
                return;
            }
        };

        if changed {
            self.render();
            self.schedule_followups();
        }
    }

    fn start_autoplay(self: &Rc<Self>) {
        let autoplay = self.deck.lock().ok().and_then(|deck| deck.config().autoplay);
        let Some(autoplay) = autoplay else {
            return;
        };

        self.last_tick.set(Instant::now());
        let driver = Rc::downgrade(self);
        self.timers
            .autoplay
            .start(TimerMode::Repeated, autoplay.step_interval, move || {
                if_mounted(&driver, |driver| driver.on_autoplay_tick());
            });
        debug!(
            "{:?} autoplay started every {:?}",
            self.surface, autoplay.step_interval
        );
    }

    fn on_autoplay_tick(self: &Rc<Self>) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick.replace(now));

        let advanced = match self.deck.lock() {
            Ok(mut deck) => deck.tick(elapsed),
            Err(_) => return,
        };

        self.render();
        if advanced {
            self.schedule_followups();
        }
    }

    /// Arms the settle and unlock single-shots the current state calls for.
    fn schedule_followups(self: &Rc<Self>) {
        let followups = match self.deck.lock() {
            Ok(deck) => FollowUps::for_deck(&deck),
            Err(_) => return,
        };

        if let Some(delay) = followups.settle_after {
            let driver = Rc::downgrade(self);
            self.timers
                .settle
                .start(TimerMode::SingleShot, delay, move || {
                    if_mounted(&driver, |driver| driver.apply("settle", |deck| deck.settle()));
                });
        }

        if let Some(remaining) = followups.unlock_after {
            let driver = Rc::downgrade(self);
            self.timers
                .unlock
                .start(TimerMode::SingleShot, remaining, move || {
                    if_mounted(&driver, |driver| driver.render());
                });
        }
    }

    fn render(&self) {
        let Some(ui) = self.ui.upgrade() else {
            return;
        };
        let view = match self.deck.lock() {
            Ok(deck) => deck.view(),
            Err(_) => return,
        };

        state_helpers::update_slide_items(&self.slides, &view);
        state_helpers::set_deck_frame(&ui, self.surface, &view);
    }
}

impl Drop for DeckDriver {
    fn drop(&mut self) {
        self.timers.stop_all();
        debug!("{:?} deck unmounted; timers stopped", self.surface);
    }
}
