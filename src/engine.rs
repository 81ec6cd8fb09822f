use crate::catalog::{Round, RoundCatalog};
use crate::config::Config;
use crate::presentation::{Element, ImageSlot, Navigation, Presentation, ResultSink};
use crate::projector::{Projector, SlotChange};
use crate::scoring::{compute_skill_vector, SkillVector};
use crate::tracker::WordTracker;
use crate::tween::Fade;
use log::{error, info, warn};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("round index {index} outside catalog range 0..{count}")]
    InvalidRoundIndex { index: usize, count: usize },
}

/// Presentation phases of one round, cyclic over rounds, then terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    ShowingPrimary,
    AwaitingSelection,
    Transitioning,
    ShowingSummary,
    Completed,
}

/// Engine-facing slice of the kiosk config.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fade_secs: f64,
    pub cloud_anim_secs: f64,
    pub confirm_label: String,
    pub continue_label: String,
    pub follow_up_prompt: String,
    pub results_screen: String,
}

impl From<&Config> for EngineConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            fade_secs: cfg.fade_secs,
            cloud_anim_secs: cfg.cloud_anim_secs,
            confirm_label: cfg.confirm_label.clone(),
            continue_label: cfg.continue_label.clone(),
            follow_up_prompt: cfg.follow_up_prompt.clone(),
            results_screen: cfg.results_screen.clone(),
        }
    }
}

/// Round-sequencing state machine for one kiosk session.
///
/// Owns the per-session state exclusively; collaborators (presentation,
/// navigation, result sink, word tracker) are passed in at construction.
/// Input callbacks and `on_tick` run on the same single thread; calls that
/// are invalid for the current phase are logged no-ops so rapid double
/// input cannot corrupt the session.
pub struct SessionEngine {
    catalog: RoundCatalog,
    tracker: Arc<WordTracker>,
    projector: Projector,
    presentation: Box<dyn Presentation>,
    navigation: Box<dyn Navigation>,
    results: Arc<dyn ResultSink>,
    cfg: EngineConfig,

    phase: Phase,
    current_round: usize,
    cumulative_score: i32,
    selections: Vec<bool>,
    fade: Option<Fade>,
}

impl SessionEngine {
    pub fn new(
        catalog: RoundCatalog,
        tracker: Arc<WordTracker>,
        projector: Projector,
        presentation: Box<dyn Presentation>,
        navigation: Box<dyn Navigation>,
        results: Arc<dyn ResultSink>,
        cfg: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            tracker,
            projector,
            presentation,
            navigation,
            results,
            cfg,
            phase: Phase::NotStarted,
            current_round: 0,
            cumulative_score: 0,
            selections: Vec::new(),
            fade: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn cumulative_score(&self) -> i32 {
        self.cumulative_score
    }

    pub fn selections(&self) -> &[bool] {
        &self.selections
    }

    pub fn round(&self) -> Option<&Round> {
        self.catalog.round(self.current_round)
    }

    pub fn round_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn tracker(&self) -> &Arc<WordTracker> {
        &self.tracker
    }

    /// Skill vector for the finished session; None before `Completed`.
    pub fn final_skills(&self) -> Option<SkillVector> {
        (self.phase == Phase::Completed).then(|| compute_skill_vector(self.cumulative_score))
    }

    /// Starts (or restarts) a session from round 0. Idempotent from any
    /// phase; cancels an in-flight fade and drops the current round's
    /// transient selection state. The shared word tracker is untouched.
    pub fn begin_session(&mut self) {
        info!("session begin (previous phase {:?})", self.phase);

        self.fade = None;
        self.phase = Phase::NotStarted;
        self.current_round = 0;
        self.cumulative_score = 0;
        self.selections.clear();
        self.projector.clear();

        self.presentation.clear_all();
        self.presentation.set_confirm_label(&self.cfg.confirm_label);

        if let Err(e) = self.start_round(0) {
            error!("cannot start session: {}", e);
        }
    }

    /// Advances the active fade; phase transitions fire when it completes.
    pub fn on_tick(&mut self, dt: f64) {
        let complete = match self.fade.as_mut() {
            Some(fade) => fade.advance(dt),
            None => return,
        };
        if !complete {
            return;
        }
        self.fade = None;

        match self.phase {
            Phase::ShowingPrimary => {
                for i in 0..self.selections.len() {
                    self.presentation.set_choice_visible(i, true);
                }
                self.phase = Phase::AwaitingSelection;
            }
            Phase::Transitioning => {
                self.presentation.set_caption(&self.cfg.follow_up_prompt);
                self.show_summary();
            }
            _ => {}
        }
    }

    /// Flips choice `index` during the selection phase; otherwise a no-op.
    pub fn toggle_selection(&mut self, index: usize) {
        if self.phase != Phase::AwaitingSelection {
            warn!("toggle_selection({}) ignored in phase {:?}", index, self.phase);
            return;
        }
        match self.selections.get_mut(index) {
            Some(selected) => *selected = !*selected,
            None => warn!("toggle_selection({}) out of range", index),
        }
    }

    /// One honored confirmation per phase: scores the round during
    /// selection, continues past the summary, and is ignored anywhere else.
    pub fn confirm(&mut self) {
        match self.phase {
            Phase::AwaitingSelection => self.score_round(),
            Phase::ShowingSummary => self.continue_from_summary(),
            _ => warn!("confirm ignored in phase {:?}", self.phase),
        }
    }

    fn start_round(&mut self, index: usize) -> Result<(), EngineError> {
        let round = self
            .catalog
            .round(index)
            .ok_or(EngineError::InvalidRoundIndex {
                index,
                count: self.catalog.len(),
            })?
            .clone();

        info!("round {} starting: {}", index, round.situation);

        self.current_round = index;
        self.selections = vec![false; round.choices.len()];

        // choices stay hidden until the primary image lands
        for i in 0..round.choices.len() {
            self.presentation.set_choice_visible(i, false);
        }
        self.presentation.set_caption(&round.situation);
        self.presentation
            .show_image(ImageSlot::Primary, &round.primary_image);
        self.presentation
            .fade(Element::PrimaryImage, 0.0, 1.0, self.cfg.fade_secs);

        self.fade = Some(Fade::new(0.0, 1.0, self.cfg.fade_secs));
        self.phase = Phase::ShowingPrimary;
        Ok(())
    }

    fn score_round(&mut self) {
        let Some(round) = self.catalog.round(self.current_round).cloned() else {
            error!("no round data for index {}", self.current_round);
            return;
        };

        let mut round_score = 0;
        for (choice, selected) in round.choices.iter().zip(&self.selections) {
            if !*selected {
                continue;
            }
            // every selected word enters the cloud; only empathic ones score
            self.tracker.add_points(&choice.text, 1);
            if choice.is_empathic {
                round_score += 1;
            }
        }

        self.cumulative_score += round_score;
        info!(
            "round {} scored {} (cumulative {})",
            self.current_round, round_score, self.cumulative_score
        );

        self.refresh_cloud();

        self.presentation
            .show_image(ImageSlot::Secondary, &round.secondary_image);
        self.presentation
            .fade(Element::SecondaryImage, 0.0, 1.0, self.cfg.fade_secs);

        self.fade = Some(Fade::new(0.0, 1.0, self.cfg.fade_secs));
        self.phase = Phase::Transitioning;
    }

    fn show_summary(&mut self) {
        for i in 0..self.selections.len() {
            self.presentation.set_choice_visible(i, false);
        }
        self.refresh_cloud();
        self.presentation
            .fade(Element::SummaryPanel, 0.0, 1.0, 0.0);
        self.presentation.set_confirm_label(&self.cfg.continue_label);
        self.phase = Phase::ShowingSummary;
    }

    fn continue_from_summary(&mut self) {
        self.presentation
            .fade(Element::SummaryPanel, 1.0, 0.0, 0.0);
        self.presentation.set_confirm_label(&self.cfg.confirm_label);

        if self.current_round + 1 >= self.catalog.len() {
            self.complete();
        } else {
            self.presentation.clear_all();
            if let Err(e) = self.start_round(self.current_round + 1) {
                error!("cannot advance round: {}", e);
            }
        }
    }

    fn complete(&mut self) {
        self.phase = Phase::Completed;
        let skills = compute_skill_vector(self.cumulative_score);
        info!(
            "session complete: total {} -> empathy:{} active_listening:{} self_awareness:{}",
            self.cumulative_score, skills.empathy, skills.active_listening, skills.self_awareness
        );

        self.results.submit(skills);
        self.navigation.activate_screen(&self.cfg.results_screen);
    }

    /// Re-projects the tracker's ranking and forwards displacement fades to
    /// the presentation. Slot fades are decorative and never gate phases.
    fn refresh_cloud(&mut self) {
        let ranked = self.tracker.ranked(self.projector.slot_count());
        for change in self.projector.refresh(&ranked) {
            if let SlotChange::Animated { slot, .. } = change {
                let out = self.cfg.cloud_anim_secs * 0.3;
                let back = self.cfg.cloud_anim_secs * 0.7;
                self.presentation.fade(Element::SlotText(slot), 1.0, 0.0, out);
                self.presentation.fade(Element::SlotText(slot), 0.0, 1.0, back);
            }
        }
    }
}
