//! Slide deck state machine shared by the hero banner and the gallery.
//!
//! The deck tracks the active slide and derives, for every slide, a horizontal
//! offset in percent of the track width plus whether the move to that offset
//! should be animated. Slides are laid out as a ring: the last slide waits just
//! left of the first one, and the first slide waits just right of the last one,
//! so paging across the ends never sweeps a slide over the whole deck.

use crate::config::DeckConfig;
use crate::content::{self, Slide};
use crate::state::clock::{Clock, SystemClock};
use log::{debug, warn};
use std::time::{Duration, Instant};

/// One slide-width, in percent.
const SLIDE_WIDTH: i32 = 100;
const FULL_PROGRESS: f32 = 100.0;

/// Grid view or full-screen single-slide view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckMode {
    #[default]
    Collapsed,
    Expanded,
}

/// Direction of the most recent paging action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    None,
    Forward,
    Backward,
}

/// How the current layout was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Initial,
    /// Direct selection; rendered without transitions.
    Jump,
    /// One slide forward or back, inside the deck.
    Step,
    /// Paging across an end of the deck, before the renderer settles it.
    Wrap(Direction),
}

/// Read-only snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckView {
    pub mode: DeckMode,
    pub current_index: usize,
    pub shift: i32,
    pub offsets: Vec<i32>,
    pub animate: Vec<bool>,
    pub autoplay_progress: f32,
    pub nav_locked: bool,
}

/// Index and shift bookkeeping for one mounted carousel.
pub struct SlideDeck<C: Clock = SystemClock> {
    slides: Vec<Slide>,
    config: DeckConfig,
    clock: C,
    mode: DeckMode,
    current_index: usize,
    last_direction: Direction,
    frame: Frame,
    /// Offsets as they were painted before the latest transition.
    painted: Vec<i32>,
    locked_until: Option<Instant>,
    autoplay_progress: f32,
}

impl SlideDeck<SystemClock> {
    pub fn with_system_clock(slides: Vec<Slide>, config: DeckConfig) -> Self {
        Self::new(slides, config, SystemClock)
    }
}

impl<C: Clock> SlideDeck<C> {
    /// Creates a deck at the first slide, collapsed.
    ///
    /// An empty `slides` list is replaced by the placeholder sequence.
    pub fn new(slides: Vec<Slide>, config: DeckConfig, clock: C) -> Self {
        let slides = if slides.is_empty() {
            warn!("Slide deck created without slides; using placeholders");
            content::placeholder_slides()
        } else {
            slides
        };

        let mut deck = Self {
            slides,
            config,
            clock,
            mode: DeckMode::Collapsed,
            current_index: 0,
            last_direction: Direction::None,
            frame: Frame::Initial,
            painted: Vec::new(),
            locked_until: None,
            autoplay_progress: 0.0,
        };
        deck.painted = deck.offsets();
        deck
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn mode(&self) -> DeckMode {
        self.mode
    }

    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Translation of the whole track, in slide-widths. Always `-current_index`.
    pub fn shift(&self) -> i32 {
        -(self.current_index as i32)
    }

    pub fn autoplay_progress(&self) -> f32 {
        self.autoplay_progress
    }

    /// True while a recent next/previous still blocks further paging.
    pub fn is_nav_locked(&self) -> bool {
        self.locked_until.is_some_and(|until| self.clock.now() < until)
    }

    /// Time left until paging is accepted again.
    pub fn lock_remaining(&self) -> Option<Duration> {
        let until = self.locked_until?;
        let remaining = until.saturating_duration_since(self.clock.now());
        (!remaining.is_zero()).then_some(remaining)
    }

    /// Whether the renderer still has to call [`settle`](Self::settle).
    pub fn is_wrap_pending(&self) -> bool {
        matches!(self.frame, Frame::Wrap(_))
    }

    /// Expands the deck onto the slide at `index`.
    ///
    /// Out-of-range indices are ignored. Selection bypasses the cooldown.
    pub fn select_slide(&mut self, index: usize) -> bool {
        if index >= self.len() {
            warn!(
                "Ignoring selection of slide {} in a deck of {}",
                index,
                self.len()
            );
            return false;
        }

        self.painted = self.offsets();
        self.mode = DeckMode::Expanded;
        self.current_index = index;
        self.last_direction = Direction::None;
        self.frame = Frame::Jump;
        self.autoplay_progress = 0.0;
        debug!("Selected slide {}", index);
        true
    }

    /// Returns to the grid, keeping the current slide.
    pub fn collapse(&mut self) -> bool {
        if self.mode == DeckMode::Collapsed {
            return false;
        }
        self.mode = DeckMode::Collapsed;
        debug!("Collapsed deck at slide {}", self.current_index);
        true
    }

    /// Pages one slide forward, wrapping from the last slide to the first.
    pub fn next(&mut self) -> bool {
        self.page(Direction::Forward)
    }

    /// Pages one slide back, wrapping from the first slide to the last.
    pub fn previous(&mut self) -> bool {
        self.page(Direction::Backward)
    }

    /// Releases the pinned offsets of a painted wrap frame.
    pub fn settle(&mut self) -> bool {
        if !self.is_wrap_pending() {
            return false;
        }
        self.painted = self.offsets();
        self.frame = Frame::Step;
        true
    }

    /// Advances autoplay progress by `elapsed`, paging forward once it is full.
    ///
    /// Returns true when the tick moved to another slide. Full progress is held
    /// while paging is locked and released on the first tick after the lock.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let Some(autoplay) = self.config.autoplay else {
            return false;
        };

        self.autoplay_progress =
            (self.autoplay_progress + autoplay.progress_for(elapsed)).clamp(0.0, FULL_PROGRESS);
        if self.autoplay_progress < FULL_PROGRESS {
            return false;
        }

        if self.len() < 2 {
            self.autoplay_progress = 0.0;
            return false;
        }
        if self.is_nav_locked() {
            return false;
        }

        self.advance(Direction::Forward);
        self.lock_navigation();
        true
    }

    /// Offset of every slide in percent of the track width.
    pub fn offsets(&self) -> Vec<i32> {
        (0..self.len()).map(|i| self.offset_of(i)).collect()
    }

    /// Whether every slide should transition to its offset.
    pub fn animate_flags(&self) -> Vec<bool> {
        match self.frame {
            Frame::Initial | Frame::Jump | Frame::Wrap(_) => vec![false; self.len()],
            Frame::Step => self
                .offsets()
                .iter()
                .zip(&self.painted)
                .map(|(to, from)| (to - from).abs() <= SLIDE_WIDTH)
                .collect(),
        }
    }

    pub fn view(&self) -> DeckView {
        DeckView {
            mode: self.mode,
            current_index: self.current_index,
            shift: self.shift(),
            offsets: self.offsets(),
            animate: self.animate_flags(),
            autoplay_progress: self.autoplay_progress,
            nav_locked: self.is_nav_locked(),
        }
    }

    fn page(&mut self, direction: Direction) -> bool {
        if self.is_nav_locked() {
            debug!("Dropping {:?} paging during cooldown", direction);
            return false;
        }
        if self.len() < 2 {
            return false;
        }

        self.advance(direction);
        self.lock_navigation();
        true
    }

    fn advance(&mut self, direction: Direction) {
        let last = self.len() - 1;
        self.painted = self.offsets();

        let (index, frame) = match direction {
            Direction::Forward if self.current_index == last => (0, Frame::Wrap(direction)),
            Direction::Forward => (self.current_index + 1, Frame::Step),
            Direction::Backward if self.current_index == 0 => (last, Frame::Wrap(direction)),
            Direction::Backward => (self.current_index - 1, Frame::Step),
            Direction::None => return,
        };

        if let Frame::Wrap(_) = frame {
            debug!(
                "Wrapping {:?} from slide {} to {}",
                direction, self.current_index, index
            );
        }

        self.current_index = index;
        self.frame = frame;
        self.last_direction = direction;
        self.autoplay_progress = 0.0;
    }

    fn lock_navigation(&mut self) {
        self.locked_until = Some(self.clock.now() + self.config.cooldown);
    }

    fn offset_of(&self, index: usize) -> i32 {
        let last = self.len() - 1;
        if self.frame == Frame::Wrap(Direction::Forward) {
            // The first slide waits at the right edge and the outgoing last
            // slide stays in view until the renderer settles the frame.
            if index == 0 {
                return SLIDE_WIDTH;
            }
            if index == last {
                return 0;
            }
        }
        resting_offset(index, self.current_index, self.len())
    }
}

fn resting_offset(index: usize, current: usize, len: usize) -> i32 {
    let last = len - 1;
    if len >= 2 {
        if current == 0 && index == last {
            return -SLIDE_WIDTH;
        }
        if current == last && index == 0 {
            return SLIDE_WIDTH;
        }
    }
    (index as i32 - current as i32) * SLIDE_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutoplayConfig;
    use crate::state::clock::ManualClock;

    const COOLDOWN: Duration = Duration::from_millis(1000);

    fn slides(n: usize) -> Vec<Slide> {
        (0..n)
            .map(|i| Slide::new(format!("{}.jpg", i), format!("Slide {}", i)))
            .collect()
    }

    fn deck(n: usize) -> (SlideDeck<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = DeckConfig {
            cooldown: COOLDOWN,
            autoplay: None,
        };
        (SlideDeck::new(slides(n), config, clock.clone()), clock)
    }

    fn unlocked_deck(n: usize) -> SlideDeck<ManualClock> {
        let config = DeckConfig {
            cooldown: Duration::ZERO,
            autoplay: None,
        };
        SlideDeck::new(slides(n), config, ManualClock::new())
    }

    fn autoplay_deck(n: usize) -> (SlideDeck<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = DeckConfig {
            cooldown: COOLDOWN,
            autoplay: Some(AutoplayConfig::default()),
        };
        (SlideDeck::new(slides(n), config, clock.clone()), clock)
    }

    #[test]
    fn empty_deck_uses_placeholders() {
        let deck = SlideDeck::new(Vec::new(), DeckConfig::default(), ManualClock::new());
        assert_eq!(deck.len(), 4);
        assert_eq!(deck.current_slide().image_alt_text, "Image 1");
    }

    #[test]
    fn starts_collapsed_at_first_slide_without_animation() {
        let (deck, _) = deck(4);
        let view = deck.view();
        assert_eq!(view.mode, DeckMode::Collapsed);
        assert_eq!(view.current_index, 0);
        assert_eq!(view.shift, 0);
        assert_eq!(view.offsets, vec![0, 100, 200, -100]);
        assert_eq!(view.animate, vec![false; 4]);
        assert!(!view.nav_locked);
    }

    #[test]
    fn next_cycles_with_period_of_deck_length() {
        for n in 1..=6 {
            let mut deck = unlocked_deck(n);
            let mut seen = Vec::new();
            for _ in 0..(2 * n) {
                seen.push(deck.current_index());
                deck.next();
                assert_eq!(deck.shift(), -(deck.current_index() as i32));
            }
            let expected: Vec<usize> = (0..n).chain(0..n).collect();
            assert_eq!(seen, expected, "deck of {}", n);
        }
    }

    #[test]
    fn previous_undoes_next_inside_the_deck() {
        let mut deck = unlocked_deck(5);
        deck.select_slide(2);
        assert!(deck.next());
        assert_eq!((deck.current_index(), deck.shift()), (3, -3));
        assert!(deck.previous());
        assert_eq!((deck.current_index(), deck.shift()), (2, -2));
        assert_eq!(deck.offsets(), vec![-200, -100, 0, 100, 200]);
    }

    #[test]
    fn previous_from_first_slide_wraps_with_pinned_left_edge() {
        let (mut deck, _) = deck(4);
        assert!(deck.previous());

        let view = deck.view();
        assert_eq!(view.current_index, 3);
        assert_eq!(view.shift, -3);
        assert_eq!(view.offsets[3], 0);
        assert!(!view.animate[3]);
        assert_eq!(view.offsets, vec![100, -200, -100, 0]);
        assert_eq!(deck.last_direction(), Direction::Backward);
    }

    #[test]
    fn next_from_last_slide_wraps_with_pinned_right_edge() {
        let (mut deck, _) = deck(4);
        deck.select_slide(3);
        assert_eq!(deck.shift(), -3);
        assert!(deck.next());

        let view = deck.view();
        assert_eq!(view.current_index, 0);
        assert_eq!(view.shift, 0);
        assert_eq!(view.offsets[0], 100);
        assert!(!view.animate[0]);
        assert_eq!(view.offsets[3], 0);
        assert_eq!(view.animate, vec![false; 4]);
        assert!(deck.is_wrap_pending());
    }

    #[test]
    fn settling_a_forward_wrap_slides_both_edges_one_width() {
        let (mut deck, _) = deck(4);
        deck.select_slide(3);
        deck.next();
        assert!(deck.settle());

        let view = deck.view();
        assert_eq!(view.offsets, vec![0, 100, 200, -100]);
        assert!(view.animate[0]);
        assert!(view.animate[3]);
        assert!(!deck.is_wrap_pending());
        assert!(!deck.settle());
    }

    #[test]
    fn next_and_previous_wrap_back_to_the_same_frame() {
        let mut deck = unlocked_deck(4);
        deck.previous();
        assert_eq!(deck.offsets(), vec![100, -200, -100, 0]);
        deck.next();
        assert_eq!((deck.current_index(), deck.shift()), (0, 0));
        assert_eq!(deck.offsets()[0], 100);
        deck.settle();
        assert_eq!(deck.offsets(), vec![0, 100, 200, -100]);
    }

    #[test]
    fn steps_never_animate_a_slide_across_the_viewport() {
        let mut deck = unlocked_deck(5);
        deck.next();
        let view = deck.view();
        assert_eq!(view.offsets, vec![-100, 0, 100, 200, 300]);
        assert_eq!(view.animate, vec![true, true, true, true, false]);

        deck.next();
        deck.next();
        deck.next();
        let view = deck.view();
        assert_eq!(view.current_index, 4);
        assert_eq!(view.offsets, vec![100, -300, -200, -100, 0]);
        assert!(!view.animate[0]);
        assert!(view.animate[3] && view.animate[4]);
    }

    #[test]
    fn selection_expands_without_animation() {
        for k in 0..4 {
            let mut deck = unlocked_deck(4);
            deck.next();
            assert!(deck.select_slide(k));

            let view = deck.view();
            assert_eq!(view.mode, DeckMode::Expanded);
            assert_eq!(view.current_index, k);
            assert_eq!(view.shift, -(k as i32));
            assert_eq!(view.animate, vec![false; 4]);
            assert_eq!(deck.last_direction(), Direction::None);
        }
    }

    #[test]
    fn select_two_from_any_state() {
        let (mut deck, _) = deck(4);
        deck.previous();
        deck.select_slide(2);
        assert_eq!(
            (deck.mode(), deck.current_index(), deck.shift()),
            (DeckMode::Expanded, 2, -2)
        );
        assert!(deck.select_slide(2));
        assert_eq!(deck.current_index(), 2);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let (mut deck, _) = deck(4);
        assert!(!deck.select_slide(4));
        assert_eq!(deck.mode(), DeckMode::Collapsed);
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn selection_bypasses_the_cooldown() {
        let (mut deck, _) = deck(4);
        deck.next();
        assert!(deck.is_nav_locked());
        assert!(deck.select_slide(3));
        assert_eq!(deck.current_index(), 3);
    }

    #[test]
    fn collapse_keeps_the_current_slide() {
        let (mut deck, _) = deck(4);
        assert!(!deck.collapse());
        deck.select_slide(2);
        deck.next();
        assert!(deck.collapse());
        assert_eq!(deck.mode(), DeckMode::Collapsed);
        assert_eq!((deck.current_index(), deck.shift()), (3, -3));
    }

    #[test]
    fn paging_inside_cooldown_is_dropped() {
        let (mut deck, clock) = deck(4);
        assert!(deck.next());
        clock.advance(Duration::from_millis(500));
        assert!(!deck.next());
        assert!(!deck.previous());
        assert_eq!(deck.current_index(), 1);
        assert_eq!(deck.lock_remaining(), Some(Duration::from_millis(500)));

        clock.advance(Duration::from_millis(500));
        assert!(!deck.is_nav_locked());
        assert_eq!(deck.lock_remaining(), None);
        assert!(deck.next());
        assert_eq!(deck.current_index(), 2);
    }

    #[test]
    fn single_slide_deck_does_not_page() {
        let (mut deck, _) = deck(1);
        assert!(!deck.next());
        assert!(!deck.previous());
        assert_eq!(deck.offsets(), vec![0]);
        assert!(!deck.is_nav_locked());
    }

    #[test]
    fn two_slide_deck_keeps_neighbours_on_opposite_sides() {
        let mut deck = unlocked_deck(2);
        assert_eq!(deck.offsets(), vec![0, -100]);
        deck.next();
        assert_eq!(deck.offsets(), vec![100, 0]);
        assert_eq!(deck.animate_flags(), vec![true, true]);
    }

    #[test]
    fn tick_without_autoplay_does_nothing() {
        let (mut deck, _) = deck(4);
        assert!(!deck.tick(Duration::from_secs(60)));
        assert_eq!(deck.autoplay_progress(), 0.0);
    }

    #[test]
    fn autoplay_advances_once_progress_is_full() {
        let (mut deck, _) = autoplay_deck(3);
        for _ in 0..199 {
            assert!(!deck.tick(Duration::from_millis(50)));
        }
        assert!(deck.autoplay_progress() > 99.0);
        assert!(deck.tick(Duration::from_millis(50)));
        assert_eq!(deck.current_index(), 1);
        assert_eq!(deck.autoplay_progress(), 0.0);
    }

    #[test]
    fn long_tick_advances_exactly_one_slide() {
        let (mut deck, _) = autoplay_deck(3);
        assert!(deck.tick(Duration::from_secs(45)));
        assert_eq!(deck.current_index(), 1);
        assert_eq!(deck.autoplay_progress(), 0.0);
    }

    #[test]
    fn autoplay_waits_for_the_lock() {
        let (mut deck, clock) = autoplay_deck(3);
        deck.tick(Duration::from_secs(9));
        deck.next();
        assert_eq!(deck.autoplay_progress(), 0.0);

        deck.tick(Duration::from_secs(10));
        assert_eq!(deck.autoplay_progress(), 100.0);
        assert!(!deck.tick(Duration::from_millis(50)));
        assert_eq!(deck.current_index(), 1);

        clock.advance(COOLDOWN);
        assert!(deck.tick(Duration::from_millis(50)));
        assert_eq!(deck.current_index(), 2);
    }

    #[test]
    fn selection_restarts_the_dwell() {
        let (mut deck, _) = autoplay_deck(3);
        deck.tick(Duration::from_secs(5));
        assert!(deck.autoplay_progress() > 0.0);
        deck.select_slide(2);
        assert_eq!(deck.autoplay_progress(), 0.0);
    }

    #[test]
    fn progress_never_drops_below_zero() {
        let config = DeckConfig {
            cooldown: COOLDOWN,
            autoplay: Some(AutoplayConfig {
                step_percent: -1.0,
                ..AutoplayConfig::default()
            }),
        };
        let mut deck = SlideDeck::new(slides(3), config, ManualClock::new());
        assert!(!deck.tick(Duration::from_secs(1)));
        assert_eq!(deck.autoplay_progress(), 0.0);
    }

    #[test]
    fn autoplay_wraps_like_next() {
        let (mut deck, clock) = autoplay_deck(2);
        deck.tick(Duration::from_secs(10));
        clock.advance(COOLDOWN);
        assert!(deck.tick(Duration::from_secs(10)));
        assert_eq!(deck.current_index(), 0);
        assert!(deck.is_wrap_pending());
    }
}
