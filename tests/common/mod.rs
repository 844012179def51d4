#![allow(dead_code)]

use std::{
    collections::BTreeSet,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, bail, Result};
use bitvoyager_lib::{
    clock::ManualClock,
    metrics::{ExportSink, MetricsTracker},
    mission::{
        Collaborators, MissionController, ProfileStore, QuestionBank, QuestionSelector, SkillModel,
    },
    models::{Difficulty, Mode, Question, QuestionId, QuestionPool, UserProfile},
    storage::MemoryStore,
};
use chrono::{TimeZone, Utc};

pub fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 10, 15, 14, 0, 0).unwrap(),
    ))
}

pub fn question(id: u32, difficulty: Difficulty) -> Question {
    Question::new(
        QuestionId(id),
        format!("Challenge {id}"),
        difficulty,
        format!("# starter code for {id}\n"),
    )
}

/// Nine questions, three per difficulty: ids 1-3 easy, 4-6 medium, 7-9 hard.
pub struct FakeBank {
    pub broken: BTreeSet<u32>,
}

impl QuestionBank for FakeBank {
    fn load_question(&self, id: QuestionId) -> Result<Question> {
        if self.broken.contains(&id.0) {
            bail!("question {id} failed to parse");
        }
        let difficulty = match id.0 {
            1..=3 => Difficulty::Easy,
            4..=6 => Difficulty::Medium,
            7..=9 => Difficulty::Hard,
            _ => bail!("no question {id}"),
        };
        Ok(question(id.0, difficulty))
    }
}

#[derive(Clone)]
pub enum Selection {
    /// First available question of each difficulty, easiest first.
    OnePerDifficulty,
    /// These ids, in order, skipping any missing from the pool.
    Ids(Vec<u32>),
    Empty,
    Fail(String),
}

pub struct FakeSelector {
    pub selection: Arc<Mutex<Selection>>,
    pub calls: Arc<Mutex<Vec<(Mode, bool)>>>,
}

impl QuestionSelector for FakeSelector {
    fn select_questions(
        &self,
        mode: Mode,
        profile: Option<&UserProfile>,
        pool: &QuestionPool,
    ) -> Result<Vec<Question>> {
        self.calls.lock().unwrap().push((mode, profile.is_some()));
        match self.selection.lock().unwrap().clone() {
            Selection::OnePerDifficulty => {
                let mut picked = Vec::new();
                for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                    if let Some(q) = pool.values().find(|q| q.difficulty == difficulty) {
                        picked.push(q.clone());
                    }
                }
                Ok(picked)
            }
            Selection::Ids(ids) => Ok(ids
                .iter()
                .filter_map(|id| pool.get(&QuestionId(*id)).cloned())
                .collect()),
            Selection::Empty => Ok(Vec::new()),
            Selection::Fail(message) => Err(anyhow!(message)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCall {
    pub question_id: QuestionId,
    pub completed: bool,
    pub attempts: u32,
    pub skipped: bool,
}

/// Records every call and bumps a counter in the profile's opaque fields so
/// tests can see the returned profile was kept.
pub struct FakeSkills {
    pub calls: Arc<Mutex<Vec<SkillCall>>>,
}

impl SkillModel for FakeSkills {
    fn update_skill_levels(
        &self,
        profile: &UserProfile,
        question: &Question,
        completed: bool,
        attempts: u32,
        skipped: bool,
    ) -> UserProfile {
        self.calls.lock().unwrap().push(SkillCall {
            question_id: question.id,
            completed,
            attempts,
            skipped,
        });

        let mut updated = profile.clone();
        let updates = updated
            .extra
            .get("skillUpdates")
            .and_then(|value| value.as_u64())
            .unwrap_or(0);
        updated
            .extra
            .insert("skillUpdates".into(), serde_json::json!(updates + 1));
        if skipped {
            updated.skipped_questions.push(question.id);
        }
        updated
    }
}

pub struct FakeProfiles {
    pub initial: UserProfile,
    pub saves: Arc<Mutex<Vec<UserProfile>>>,
}

impl ProfileStore for FakeProfiles {
    fn load_profile(&self) -> UserProfile {
        self.saves
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_else(|| self.initial.clone())
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.saves.lock().unwrap().push(profile.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<(String, String)>>,
}

impl ExportSink for RecordingSink {
    fn deliver(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        self.delivered
            .lock()
            .unwrap()
            .push((file_name.to_string(), contents.to_string()));
        Ok(PathBuf::from(file_name))
    }
}

pub struct Harness {
    pub controller: MissionController,
    pub tracker: MetricsTracker,
    pub clock: Arc<ManualClock>,
    pub selection: Arc<Mutex<Selection>>,
    pub selector_calls: Arc<Mutex<Vec<(Mode, bool)>>>,
    pub skill_calls: Arc<Mutex<Vec<SkillCall>>>,
    pub profile_saves: Arc<Mutex<Vec<UserProfile>>>,
}

pub struct HarnessBuilder {
    selection: Selection,
    profile: UserProfile,
    broken: BTreeSet<u32>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            selection: Selection::OnePerDifficulty,
            profile: UserProfile::default(),
            broken: BTreeSet::new(),
        }
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn broken(mut self, ids: &[u32]) -> Self {
        self.broken.extend(ids.iter().copied());
        self
    }

    pub fn build(self) -> Harness {
        let clock = start_clock();
        let tracker = MetricsTracker::new(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            Arc::new(RecordingSink::default()),
        );

        let selection = Arc::new(Mutex::new(self.selection));
        let selector_calls = Arc::new(Mutex::new(Vec::new()));
        let skill_calls = Arc::new(Mutex::new(Vec::new()));
        let profile_saves = Arc::new(Mutex::new(Vec::new()));

        let collaborators = Collaborators {
            bank: Box::new(FakeBank {
                broken: self.broken,
            }),
            selector: Box::new(FakeSelector {
                selection: selection.clone(),
                calls: selector_calls.clone(),
            }),
            skills: Box::new(FakeSkills {
                calls: skill_calls.clone(),
            }),
            profiles: Box::new(FakeProfiles {
                initial: self.profile,
                saves: profile_saves.clone(),
            }),
        };

        let controller =
            MissionController::new(tracker.clone(), collaborators, clock.clone(), 9);

        Harness {
            controller,
            tracker,
            clock,
            selection,
            selector_calls,
            skill_calls,
            profile_saves,
        }
    }
}
