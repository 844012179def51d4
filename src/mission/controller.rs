use std::{collections::BTreeMap, sync::Arc};

use crate::{
    clock::Clock,
    error::MissionError,
    log_debug, log_error, log_info, log_warn,
    metrics::MetricsTracker,
    models::{difficulty_for_position, Difficulty, Mode, Question, QuestionId, QuestionPool, UserProfile},
};

use super::{
    collaborators::Collaborators,
    state::{MissionEvent, MissionPhase, ModeSession, Outcome},
    streak::update_streak,
    view::{MissionView, ProgressInfo},
};

const ENABLE_LOGS: bool = true;
const LOG_TARGET: &str = "bitvoyager::mission";

/// Drives one mission from mode choice to completion, reporting every
/// transition to the metrics tracker.
pub struct MissionController {
    tracker: MetricsTracker,
    collaborators: Collaborators,
    clock: Arc<dyn Clock>,
    question_count: u32,

    phase: MissionPhase,
    session: Option<ModeSession>,
    pool: QuestionPool,
    selected: Vec<Question>,
    completed_difficulties: Vec<Difficulty>,
    current_attempts: u32,
    code_map: BTreeMap<QuestionId, String>,
    export_available: bool,
}

impl MissionController {
    pub fn new(
        tracker: MetricsTracker,
        collaborators: Collaborators,
        clock: Arc<dyn Clock>,
        question_count: u32,
    ) -> Self {
        Self {
            tracker,
            collaborators,
            clock,
            question_count,
            phase: MissionPhase::ModeUnselected,
            session: None,
            pool: QuestionPool::new(),
            selected: Vec::new(),
            completed_difficulties: Vec::new(),
            current_attempts: 0,
            code_map: BTreeMap::new(),
            export_available: false,
        }
    }

    pub fn phase(&self) -> &MissionPhase {
        &self.phase
    }

    pub fn mode(&self) -> Option<Mode> {
        self.session.as_ref().map(ModeSession::mode)
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.session.as_ref().and_then(ModeSession::profile)
    }

    pub fn selected_questions(&self) -> &[Question] {
        &self.selected
    }

    pub fn question_pool(&self) -> &QuestionPool {
        &self.pool
    }

    pub fn completed_difficulties(&self) -> &[Difficulty] {
        &self.completed_difficulties
    }

    pub fn current_attempts(&self) -> u32 {
        self.current_attempts
    }

    pub fn is_complete(&self) -> bool {
        self.phase == MissionPhase::Complete
    }

    pub fn export_available(&self) -> bool {
        self.export_available
    }

    pub fn tracker(&self) -> &MetricsTracker {
        &self.tracker
    }

    /// Choose the mode for this mission and build its challenge sequence.
    pub fn select_mode(&mut self, mode: Mode) {
        if self.phase != MissionPhase::ModeUnselected {
            log_warn!("Mode already chosen ({:?}), ignoring {mode}", self.mode());
            return;
        }

        self.enter_mode(mode);
    }

    /// Try building the mission again after an initialization failure.
    pub fn retry(&mut self) {
        let MissionPhase::Errored { .. } = self.phase else {
            log_warn!("Retry requested outside of a failed initialization");
            return;
        };

        match self.mode() {
            Some(mode) => self.enter_mode(mode),
            None => {
                log_error!("Failed mission has no mode; returning to mode selection");
                self.phase = MissionPhase::ModeUnselected;
            }
        }
    }

    /// Start the mode clock, load what the mode needs and initialize.
    fn enter_mode(&mut self, mode: Mode) {
        self.tracker.begin_mode(mode);

        self.session = Some(match mode {
            Mode::Standard => ModeSession::Standard,
            Mode::Learning => ModeSession::Learning {
                profile: self.collaborators.profiles.load_profile(),
            },
        });

        self.initialize(mode);
    }

    fn initialize(&mut self, mode: Mode) {
        self.phase = MissionPhase::Initializing { mode };
        self.pool = self.load_pool();

        let profile = self.session.as_ref().and_then(ModeSession::profile);
        let selection = self
            .collaborators
            .selector
            .select_questions(mode, profile, &self.pool);

        let questions = match selection {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => return self.fail(MissionError::NotEnoughQuestions),
            Err(err) => return self.fail(MissionError::Selection(err.to_string())),
        };

        self.code_map = questions
            .iter()
            .map(|question| (question.id, question.code.clone()))
            .collect();
        self.selected = questions;
        self.completed_difficulties.clear();
        self.current_attempts = 0;
        self.phase = MissionPhase::Active { index: 0 };

        log_info!(
            "Mission ready: {} {mode} challenges from a pool of {}",
            self.selected.len(),
            self.pool.len()
        );
    }

    fn load_pool(&self) -> QuestionPool {
        let mut pool = QuestionPool::new();
        for raw_id in 1..=self.question_count {
            let id = QuestionId(raw_id);
            match self.collaborators.bank.load_question(id) {
                Ok(question) => {
                    pool.insert(id, question);
                }
                Err(err) => log_warn!("Could not load question {id}: {err:#}"),
            }
        }
        pool
    }

    fn fail(&mut self, error: MissionError) {
        let message = error.to_string();
        log_warn!("Mission initialization failed: {message}");
        self.phase = MissionPhase::Errored { message };
    }

    fn active_index(&self) -> Option<usize> {
        match self.phase {
            MissionPhase::Active { index } => Some(index),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: MissionEvent) {
        match event {
            MissionEvent::Attempt { success } => self.record_attempt(success),
            MissionEvent::Complete => self.complete_challenge(),
            MissionEvent::Skip => self.skip_challenge(),
            MissionEvent::CodeChanged { question_id, code } => self.update_code(question_id, code),
        }
    }

    /// A graded run of the participant's code that did not finish the
    /// challenge on its own.
    pub fn record_attempt(&mut self, success: bool) {
        if self.active_index().is_none() {
            log_warn!("Attempt recorded with no active challenge");
            return;
        }
        self.current_attempts += 1;
        self.tracker.record_attempt(success);
    }

    /// The current challenge was solved. Counts the solving run as an attempt.
    pub fn complete_challenge(&mut self) {
        let Some((index, question)) = self.current_entry() else {
            log_warn!("Completion reported with no active challenge");
            return;
        };

        let prior_attempts = self.current_attempts;
        self.current_attempts += 1;
        self.tracker.record_attempt(true);
        self.tracker
            .record_challenge_completion(question.id, question.difficulty, prior_attempts);

        self.advance(
            index,
            &question,
            Outcome::Completed {
                attempts: prior_attempts + 1,
            },
        );
    }

    pub fn skip_challenge(&mut self) {
        let Some((index, question)) = self.current_entry() else {
            log_warn!("Skip reported with no active challenge");
            return;
        };

        self.tracker.record_skip();
        self.advance(index, &question, Outcome::Skipped);
    }

    fn current_entry(&self) -> Option<(usize, Question)> {
        let index = self.active_index()?;
        self.selected.get(index).cloned().map(|q| (index, q))
    }

    fn advance(&mut self, index: usize, question: &Question, outcome: Outcome) {
        let is_last = index + 1 >= self.selected.len();

        match &mut self.session {
            Some(ModeSession::Standard) => {
                if outcome.completed() {
                    match difficulty_for_position(index) {
                        Some(difficulty) => self.completed_difficulties.push(difficulty),
                        None => log_warn!("No difficulty label for standard position {index}"),
                    }
                }
            }
            Some(ModeSession::Learning { profile }) => {
                let mut updated = self.collaborators.skills.update_skill_levels(
                    profile,
                    question,
                    outcome.completed(),
                    outcome.effective_attempts(),
                    outcome.skipped(),
                );
                if outcome.completed() {
                    updated.completed_questions.push(question.id);
                }
                if is_last {
                    update_streak(&mut updated, self.clock.today());
                }
                if let Err(err) = self.collaborators.profiles.save_profile(&updated) {
                    log_error!("Failed to save learning profile: {err:#}");
                }
                *profile = updated;
            }
            None => {
                log_error!("Active mission without a mode session");
            }
        }

        if is_last {
            self.phase = MissionPhase::Complete;
            self.tracker.complete_mode();
            self.export_available = true;
            log_info!("Mission complete");
        } else {
            self.phase = MissionPhase::Active { index: index + 1 };
            self.current_attempts = 0;
            if outcome.skipped() {
                self.tracker.start_challenge();
            }
            log_debug!("Advanced to challenge {}", index + 2);
        }
    }

    pub fn update_code(&mut self, question_id: QuestionId, code: String) {
        self.code_map.insert(question_id, code);
    }

    /// Draft code for a question, if the participant has one.
    pub fn code_for(&self, question_id: QuestionId) -> Option<&str> {
        self.code_map.get(&question_id).map(String::as_str)
    }

    /// The current question with the participant's draft in place of the
    /// starter code.
    pub fn current_question(&self) -> Option<Question> {
        let index = self.active_index()?;
        let mut question = self.selected.get(index)?.clone();
        if let Some(draft) = self.code_for(question.id).filter(|code| !code.is_empty()) {
            question.code = draft.to_string();
        }
        Some(question)
    }

    pub fn progress_info(&self) -> Option<ProgressInfo> {
        let index = self.active_index()?;
        let question = self.selected.get(index)?;
        let mode = self.mode()?;
        let profile = self.profile();

        let difficulty = match mode {
            Mode::Standard => difficulty_for_position(index).unwrap_or(question.difficulty),
            Mode::Learning => question.difficulty,
        };

        Some(ProgressInfo {
            current: index + 1,
            total: self.selected.len(),
            difficulty,
            completed_difficulties: self.completed_difficulties.clone(),
            mode,
            user_profile: profile.cloned(),
            attempts: self.current_attempts,
            is_retry: profile.is_some_and(|p| p.has_skipped(question.id)),
            previously_failed: profile.is_some_and(|p| p.has_failed(question.id)),
        })
    }

    /// Show or hide the export panel while a mission is running.
    pub fn toggle_export_panel(&mut self) -> bool {
        if self.active_index().is_none() {
            log_warn!("Export panel only toggles during an active mission");
            return self.export_available;
        }
        self.export_available = !self.export_available;
        self.export_available
    }

    pub fn view(&self) -> MissionView {
        match &self.phase {
            MissionPhase::ModeUnselected => MissionView::ModeSelection,
            MissionPhase::Initializing { mode } => MissionView::Loading { mode: *mode },
            MissionPhase::Errored { message } => MissionView::Failed {
                message: message.clone(),
            },
            MissionPhase::Complete => MissionView::Complete {
                export_available: self.export_available,
            },
            MissionPhase::Active { .. } => match (self.current_question(), self.progress_info()) {
                (Some(question), Some(progress)) => MissionView::Challenge { question, progress },
                _ => MissionView::MissingQuestion,
            },
        }
    }
}
