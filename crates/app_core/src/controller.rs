//! Gallery controller: navigation and display state
//!
//! The controller owns the view state and is its only mutation surface.
//! Everything the renderer needs is derived on read from
//! (catalog, current index, stored toggles); nothing derived is cached.
//!
//! The original/processed flip is a two-phase transition. Phase one marks
//! the gallery as transitioning and arms a one-shot timer; phase two runs
//! from [`GalleryController::poll`] once the delay has elapsed and commits
//! the new rendition. Navigating away cancels a flip that has not landed.

use crate::catalog::{Catalog, GalleryItem, ImageRef, ItemInfo};
use crate::command::GalleryCommand;
use crate::timer::OneShotTimer;
use std::time::{Duration, Instant};

/// Delay between starting a flip and committing the new rendition
pub const DEFAULT_FLIP_DELAY: Duration = Duration::from_millis(300);

/// Mutable display state of the gallery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GalleryViewState {
    current_index: usize,
    show_alternate: bool,
    story_panel_open: bool,
    transitioning: bool,
}

impl GalleryViewState {
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_showing_alternate(&self) -> bool {
        self.show_alternate
    }

    pub fn is_story_panel_open(&self) -> bool {
        self.story_panel_open
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }
}

/// Read-only snapshot handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct GalleryView<'a> {
    pub title: &'a str,
    pub items: &'a [GalleryItem],
    pub current_index: usize,
    pub current: &'a GalleryItem,
    pub displayed_image: &'a ImageRef,
    pub has_alternate: bool,
    pub showing_alternate: bool,
    pub story_panel_open: bool,
    pub transitioning: bool,
}

impl<'a> GalleryView<'a> {
    pub fn info(&self) -> &'a ItemInfo {
        &self.current.info
    }

    /// 1-based position, e.g. "3 / 20"
    pub fn position_text(&self) -> String {
        format!("{} / {}", self.current_index + 1, self.items.len())
    }

    /// Identity of what the frame shows; changes whenever the image must be swapped
    pub fn frame_key(&self) -> String {
        format!("{}{}", self.current.id, self.displayed_image)
    }
}

/// Owner of the gallery view state
pub struct GalleryController {
    catalog: Catalog,
    state: GalleryViewState,
    flip_timer: OneShotTimer,
    flip_delay: Duration,
}

impl GalleryController {
    /// Mount a gallery over a catalog: first item, all toggles off
    pub fn new(catalog: Catalog) -> Self {
        tracing::debug!("Gallery mounted with {} items", catalog.len());

        Self {
            catalog,
            state: GalleryViewState::default(),
            flip_timer: OneShotTimer::new(),
            flip_delay: DEFAULT_FLIP_DELAY,
        }
    }

    pub fn with_flip_delay(mut self, delay: Duration) -> Self {
        self.flip_delay = delay;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn items(&self) -> &[GalleryItem] {
        self.catalog.items()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn flip_delay(&self) -> Duration {
        self.flip_delay
    }

    /// Current view state, with the alternate flag already reconciled
    /// against the current item
    pub fn state(&self) -> GalleryViewState {
        GalleryViewState {
            show_alternate: self.is_showing_alternate(),
            ..self.state
        }
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_item(&self) -> &GalleryItem {
        &self.catalog[self.state.current_index]
    }

    pub fn has_alternate(&self) -> bool {
        self.current_item().has_alternate()
    }

    /// Never true for an item without an alternate rendition
    pub fn is_showing_alternate(&self) -> bool {
        self.state.show_alternate && self.has_alternate()
    }

    pub fn is_story_panel_open(&self) -> bool {
        self.state.story_panel_open
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.transitioning
    }

    pub fn displayed_image(&self) -> &ImageRef {
        let item = self.current_item();
        match item.alternate() {
            Some(original) if self.state.show_alternate => original,
            _ => &item.image,
        }
    }

    /// The current index followed by its neighbours out to `radius` steps
    /// in both directions, wrapping, without repeats
    pub fn indices_around(&self, radius: usize) -> Vec<usize> {
        let len = self.catalog.len();
        let index = self.state.current_index;
        let mut indices = vec![index];

        for step in 1..=radius.min(len) {
            for i in [(index + step) % len, (index + len - step) % len] {
                if !indices.contains(&i) {
                    indices.push(i);
                }
            }
        }
        indices
    }

    pub fn view(&self) -> GalleryView<'_> {
        GalleryView {
            title: self.catalog.title(),
            items: self.catalog.items(),
            current_index: self.state.current_index,
            current: self.current_item(),
            displayed_image: self.displayed_image(),
            has_alternate: self.has_alternate(),
            showing_alternate: self.is_showing_alternate(),
            story_panel_open: self.state.story_panel_open,
            transitioning: self.state.transitioning,
        }
    }

    /// Show the item at `index`. Switching items always returns to the
    /// processed rendition.
    pub fn go_to(&mut self, index: usize) {
        if index >= self.catalog.len() {
            tracing::warn!("Ignoring go_to({}) outside of {} items", index, self.catalog.len());
            return;
        }
        if index == self.state.current_index {
            return;
        }

        tracing::debug!("Gallery: {} -> {}", self.state.current_index, index);
        self.state.current_index = index;
        self.state.show_alternate = false;

        if self.state.transitioning {
            self.flip_timer.cancel();
            self.state.transitioning = false;
            tracing::debug!("Pending flip cancelled by navigation");
        }
    }

    /// Next item, wrapping from last to first
    pub fn next(&mut self) {
        let len = self.catalog.len();
        self.go_to((self.state.current_index + 1) % len);
    }

    /// Previous item, wrapping from first to last
    pub fn previous(&mut self) {
        let len = self.catalog.len();
        self.go_to((self.state.current_index + len - 1) % len);
    }

    pub fn first(&mut self) {
        self.go_to(0);
    }

    pub fn last(&mut self) {
        self.go_to(self.catalog.len() - 1);
    }

    pub fn toggle_story_panel(&mut self) {
        self.state.story_panel_open = !self.state.story_panel_open;
    }

    /// Start an animated flip between the processed and original rendition.
    ///
    /// Returns `false` when the request is dropped: the item has no
    /// alternate, or a flip is already in flight.
    pub fn toggle_alternate_image(&mut self, now: Instant) -> bool {
        if !self.has_alternate() || self.state.transitioning {
            return false;
        }

        self.state.transitioning = true;
        self.flip_timer.arm(now, self.flip_delay);
        tracing::debug!("Flip started on {}", self.current_item().id);
        true
    }

    /// Run the delayed half of a pending flip. Returns `true` if state changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.flip_timer.fire(now) {
            return false;
        }

        self.state.show_alternate = !self.state.show_alternate && self.has_alternate();
        self.state.transitioning = false;

        tracing::debug!(
            "Flip committed on {} (original: {})",
            self.current_item().id,
            self.state.show_alternate
        );
        true
    }

    /// When the host must call [`poll`](Self::poll) next
    pub fn next_deadline(&self) -> Option<Instant> {
        self.flip_timer.deadline()
    }

    /// Progress of the running flip in `[0, 1]`
    pub fn transition_progress(&self, now: Instant) -> Option<f32> {
        if !self.state.transitioning || self.flip_delay.is_zero() {
            return None;
        }

        let remaining = self.flip_timer.remaining(now)?;
        let total = self.flip_delay.as_secs_f32();
        Some((1.0 - remaining.as_secs_f32() / total).clamp(0.0, 1.0))
    }

    /// Execute a command. Returns `true` if it was accepted.
    pub fn execute(&mut self, command: &GalleryCommand, now: Instant) -> bool {
        tracing::debug!("Executing gallery command: {:?}", command);

        match *command {
            GalleryCommand::Next => self.next(),
            GalleryCommand::Previous => self.previous(),
            GalleryCommand::First => self.first(),
            GalleryCommand::Last => self.last(),
            GalleryCommand::GoTo(index) => {
                if index >= self.catalog.len() {
                    tracing::warn!("Ignoring go_to({}) outside of {} items", index, self.catalog.len());
                    return false;
                }
                self.go_to(index);
            }
            GalleryCommand::ToggleStoryPanel => self.toggle_story_panel(),
            GalleryCommand::ToggleAlternate => return self.toggle_alternate_image(now),
        }
        true
    }
}
