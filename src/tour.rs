//! First-run guided tour.
//!
//! A linear sequence of steps followed by a terminal `Closed` state. Leaving
//! the tour releases the highlighted targets and, if the user ticked
//! "don't show again", writes the hide flag once through [`GuidanceStore`].

use crate::notify::Notifications;
use crate::settings::GuidanceStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourStep {
    pub title: String,
    pub text: String,
    /// UI element ids to spotlight. Empty for a centered dialog.
    pub targets: Vec<String>,
    pub next_label: String,
    pub show_skip: bool,
    pub show_dont_show_again: bool,
}

impl TourStep {
    fn new(title: &str, text: &str, targets: &[&str], next_label: &str) -> Self {
        Self {
            title: title.to_string(),
            text: text.to_string(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
            next_label: next_label.to_string(),
            show_skip: false,
            show_dont_show_again: false,
        }
    }

    fn skippable(mut self) -> Self {
        self.show_skip = true;
        self
    }

    fn offers_dont_show_again(mut self) -> Self {
        self.show_dont_show_again = true;
        self
    }
}

pub fn default_steps() -> Vec<TourStep> {
    vec![
        TourStep::new(
            "Welcome to the image cleanup assistant!",
            "Tidy up the images on your PC in a few simple steps. Here is a quick tour of the main features.",
            &[],
            "Next",
        )
        .skippable()
        .offers_dont_show_again(),
        TourStep::new(
            "Step 1: Choose a folder to scan",
            "First pick the folder that holds the images you want to tidy up.",
            &["targetFolderBtn"],
            "Next",
        ),
        TourStep::new(
            "Step 2: Start the scan",
            "Once a folder is selected, press this button to find blurry and similar images.",
            &["scanBtn"],
            "Next",
        ),
        TourStep::new(
            "Step 3: Review the results",
            "Results appear here when the scan finishes. Switch tabs to review each kind of finding and check the preview.",
            &["tabContainer", "leftPane"],
            "Next",
        ),
        TourStep::new(
            "Step 4: Select and clean up",
            "Select the images you no longer need and use the buttons below to delete or move them.",
            &["centerPane", "footerActionsContainer"],
            "Next",
        ),
        TourStep::new(
            "All set!",
            "That covers the basics. Let's start tidying up your images.",
            &[],
            "Get started",
        )
        .offers_dont_show_again(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourState {
    Step(usize),
    Closed,
}

#[derive(Debug)]
pub struct GuidedTour {
    steps: Vec<TourStep>,
    state: TourState,
    dont_show_again: bool,
    highlighted: Vec<String>,
}

impl Default for GuidedTour {
    fn default() -> Self {
        Self::new(default_steps())
    }
}

impl GuidedTour {
    /// A tour that has not been started yet.
    pub fn new(steps: Vec<TourStep>) -> Self {
        Self {
            steps,
            state: TourState::Closed,
            dont_show_again: false,
            highlighted: Vec::new(),
        }
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, TourState::Step(_))
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step(&self) -> Option<&TourStep> {
        match self.state {
            TourState::Step(i) => self.steps.get(i),
            TourState::Closed => None,
        }
    }

    pub fn highlighted(&self) -> &[String] {
        &self.highlighted
    }

    pub fn dont_show_again(&self) -> bool {
        self.dont_show_again
    }

    /// Only meaningful while the tour is open.
    pub fn set_dont_show_again(&mut self, checked: bool) {
        if self.is_open() {
            self.dont_show_again = checked;
        }
    }

    /// Open at step 0 unless the persisted hide flag is set.
    pub fn start(&mut self, hidden: bool) {
        self.dont_show_again = false;
        if hidden || self.steps.is_empty() {
            self.state = TourState::Closed;
            self.highlighted.clear();
            return;
        }
        self.show(0);
    }

    fn show(&mut self, index: usize) {
        self.state = TourState::Step(index);
        self.highlighted = self.steps[index].targets.clone();
    }

    pub fn next(&mut self, store: &dyn GuidanceStore, notes: &mut Notifications) {
        if let TourState::Step(i) = self.state {
            if i + 1 < self.steps.len() {
                self.show(i + 1);
            } else {
                self.close(store, notes);
            }
        }
    }

    pub fn skip(&mut self, store: &dyn GuidanceStore, notes: &mut Notifications) {
        self.close(store, notes);
    }

    /// Idempotent. Returns true if this call closed the tour.
    pub fn close(&mut self, store: &dyn GuidanceStore, notes: &mut Notifications) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = TourState::Closed;
        self.highlighted.clear();

        log::debug!("guided tour closed, don't show again: {}", self.dont_show_again);
        if self.dont_show_again {
            if let Err(e) = store.save_guidance_hidden(true) {
                notes.error(format!("Could not save the guidance setting: {:#}", e));
            }
        }
        true
    }
}
