//! lessons::progress
//!
//! Per-lesson cursors and the tracker that moves them.
//!
//! # Completion rule
//!
//! Steps are numbered `1..=N`. Advancing from a step before the last always
//! moves the cursor forward. Advancing on the last step is a no-op unless
//! that step is satisfied, in which case the lesson becomes completed and the
//! cursor stays at `N`. Progress is `current_step / N` once the cursor has
//! moved, and `0.0` for a lesson nobody has touched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::catalog::{self, Lesson, LessonStep};
use crate::core::graph::GraphState;
use crate::engine::OperationKind;

/// Errors from lesson selection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LessonError {
    #[error("no lesson with id '{0}'")]
    UnknownLesson(String),
}

/// A learner's position within one lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub lesson_id: String,
    /// 1-based
    pub current_step: usize,
    pub completed: bool,
    pub total_steps: usize,
    /// `current_step / total_steps`, or `0.0` before the first move
    pub progress: f64,
}

impl LessonProgress {
    /// Fresh progress: step 1, not completed.
    pub fn start(lesson: &Lesson) -> Self {
        Self {
            lesson_id: lesson.id.clone(),
            current_step: 1,
            completed: false,
            total_steps: lesson.len(),
            progress: 0.0,
        }
    }

    fn recompute(&mut self) {
        self.progress = if self.total_steps == 0 {
            0.0
        } else {
            self.current_step as f64 / self.total_steps as f64
        };
    }

    fn is_untouched(&self) -> bool {
        self.current_step == 1 && !self.completed
    }

    fn is_last_step(&self) -> bool {
        self.current_step >= self.total_steps
    }
}

/// What an advance did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonEvent {
    /// Moved to `step` (1-based).
    Advanced { lesson_id: String, step: usize },
    /// Finished the lesson.
    Completed { lesson_id: String },
}

/// Owns the catalog, every lesson's progress, and the active selection.
#[derive(Debug, Clone)]
pub struct LessonTracker {
    catalog: Vec<Lesson>,
    progress: BTreeMap<String, LessonProgress>,
    active: Option<String>,
}

impl Default for LessonTracker {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LessonTracker {
    /// Tracker over a custom catalog, every lesson at step 1.
    pub fn new(catalog: Vec<Lesson>) -> Self {
        let progress = catalog
            .iter()
            .map(|l| (l.id.clone(), LessonProgress::start(l)))
            .collect();
        Self {
            catalog,
            progress,
            active: None,
        }
    }

    /// Tracker over the built-in lessons.
    pub fn builtin() -> Self {
        Self::new(catalog::builtin())
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.catalog
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.catalog.iter().find(|l| l.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_lesson(&self) -> Option<&Lesson> {
        self.active.as_deref().and_then(|id| self.lesson(id))
    }

    pub fn progress(&self, id: &str) -> Option<&LessonProgress> {
        self.progress.get(id)
    }

    pub fn all_progress(&self) -> &BTreeMap<String, LessonProgress> {
        &self.progress
    }

    /// Progress of the active lesson.
    pub fn active_progress(&self) -> Option<&LessonProgress> {
        self.active.as_deref().and_then(|id| self.progress.get(id))
    }

    /// The active lesson's current step.
    pub fn current_step(&self) -> Option<&LessonStep> {
        let progress = self.active_progress()?;
        self.active_lesson()?.step(progress.current_step)
    }

    /// Make a lesson active. Its progress is kept.
    pub fn select(&mut self, id: &str) -> Result<(), LessonError> {
        if self.lesson(id).is_none() {
            return Err(LessonError::UnknownLesson(id.to_string()));
        }
        self.active = Some(id.to_string());
        debug!(lesson = id, "lesson selected");
        Ok(())
    }

    /// Move the active lesson forward.
    ///
    /// Returns `None` when nothing changed: no active lesson, already
    /// completed, or on the last step without its predicate satisfied.
    pub fn advance(&mut self, state: &GraphState) -> Option<LessonEvent> {
        let satisfied = self.is_current_step_satisfied(state);
        let id = self.active.clone()?;
        let progress = self.progress.get_mut(&id)?;

        if progress.completed || progress.total_steps == 0 {
            return None;
        }

        let event = if progress.is_last_step() {
            if !satisfied {
                return None;
            }
            progress.completed = true;
            LessonEvent::Completed {
                lesson_id: id.clone(),
            }
        } else {
            progress.current_step += 1;
            LessonEvent::Advanced {
                lesson_id: id.clone(),
                step: progress.current_step,
            }
        };
        progress.recompute();

        debug!(lesson = %id, step = progress.current_step, completed = progress.completed, "lesson advanced");
        Some(event)
    }

    /// Move the active lesson back one step (floor 1) and clear completion.
    ///
    /// Returns whether anything changed.
    pub fn retreat(&mut self) -> bool {
        let Some(progress) = self.active.as_ref().and_then(|id| self.progress.get_mut(id)) else {
            return false;
        };

        let before = (progress.current_step, progress.completed);
        if progress.current_step > 1 {
            progress.current_step -= 1;
        }
        progress.completed = false;

        let moved = before != (progress.current_step, progress.completed);
        if moved {
            progress.recompute();
        }
        moved
    }

    /// Whether the active step's predicate holds for `state`.
    ///
    /// `false` with no active lesson; `true` for a manual step.
    pub fn is_current_step_satisfied(&self, state: &GraphState) -> bool {
        self.current_step().is_some_and(|step| step.is_satisfied(state))
    }

    /// Every lesson back to step 1 and no active lesson.
    pub fn reset_all(&mut self) {
        *self = Self::new(std::mem::take(&mut self.catalog));
    }

    /// Merge persisted progress into the catalog.
    ///
    /// Unknown lesson ids are dropped, cursors are clamped to the lesson's
    /// step range, and totals come from the catalog.
    pub fn restore(
        &mut self,
        saved: BTreeMap<String, LessonProgress>,
        active: Option<String>,
    ) {
        for (id, entry) in saved {
            let Some(lesson) = self.catalog.iter().find(|l| l.id == id) else {
                debug!(lesson = %id, "dropping progress for unknown lesson");
                continue;
            };
            let total = lesson.len();
            let mut restored = LessonProgress {
                lesson_id: id.clone(),
                current_step: entry.current_step.clamp(1, total.max(1)),
                completed: entry.completed && total > 0,
                total_steps: total,
                progress: 0.0,
            };
            if !restored.is_untouched() || entry.progress > 0.0 {
                restored.recompute();
            }
            self.progress.insert(id, restored);
        }

        self.active = active.filter(|id| self.lesson(id).is_some());
    }

    /// Auto-advance after an operation of `kind` produced `state`.
    ///
    /// Advances only when the current step expects `kind` and is satisfied.
    pub fn observe(&mut self, kind: OperationKind, state: &GraphState) -> Option<LessonEvent> {
        let step = self.current_step()?;
        if step.expected != kind || !step.is_satisfied(state) {
            return None;
        }
        if self.active_progress().is_some_and(|p| p.completed) {
            return None;
        }
        self.advance(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, SequentialStamper};
    use crate::lessons::Predicate;

    fn three_commit_lesson() -> Lesson {
        let step = |text: &str| LessonStep {
            title: text.into(),
            description: String::new(),
            expected: OperationKind::Commit,
            hint: None,
            predicate: Some(Predicate::commit_message_contains(text)),
        };
        Lesson {
            id: "triple".into(),
            title: "Three commits".into(),
            description: String::new(),
            steps: vec![step("alpha"), step("beta"), step("gamma")],
        }
    }

    #[test]
    fn starts_at_step_one() {
        let tracker = LessonTracker::builtin();
        for progress in tracker.all_progress().values() {
            assert_eq!(progress.current_step, 1);
            assert!(!progress.completed);
            assert_eq!(progress.progress, 0.0);
        }
        assert!(tracker.active_id().is_none());
    }

    #[test]
    fn select_unknown_lesson() {
        let mut tracker = LessonTracker::builtin();
        assert_eq!(
            tracker.select("nope"),
            Err(LessonError::UnknownLesson("nope".into()))
        );
        assert!(tracker.active_id().is_none());
    }

    #[test]
    fn advance_without_active_is_noop() {
        let mut tracker = LessonTracker::builtin();
        assert!(tracker.advance(&GraphState::initial()).is_none());
        assert!(!tracker.retreat());
        assert!(!tracker.is_current_step_satisfied(&GraphState::initial()));
    }

    #[test]
    fn last_step_needs_predicate() {
        let mut s = SequentialStamper::default();
        let mut tracker = LessonTracker::new(vec![three_commit_lesson()]);
        tracker.select("triple").unwrap();

        let state = engine::commit(&GraphState::initial(), "alpha", &mut s).unwrap();
        tracker.advance(&state);
        let state = engine::commit(&state, "beta", &mut s).unwrap();
        tracker.advance(&state);

        let p = tracker.active_progress().unwrap();
        assert_eq!(p.current_step, 3);
        assert!(!p.completed);

        // Not yet satisfied: nothing happens.
        assert!(tracker.advance(&state).is_none());
        assert!(!tracker.active_progress().unwrap().completed);

        let state = engine::commit(&state, "gamma", &mut s).unwrap();
        assert_eq!(
            tracker.advance(&state),
            Some(LessonEvent::Completed {
                lesson_id: "triple".into()
            })
        );
        let p = tracker.active_progress().unwrap();
        assert!(p.completed);
        assert_eq!(p.current_step, 3);
        assert_eq!(p.progress, 1.0);

        // Completed lessons don't move further.
        assert!(tracker.advance(&state).is_none());
    }

    #[test]
    fn retreat_floors_and_clears_completion() {
        let mut tracker = LessonTracker::builtin();
        tracker.select("git-basics").unwrap();
        assert!(!tracker.retreat());
        assert_eq!(tracker.active_progress().unwrap().current_step, 1);
        assert_eq!(tracker.active_progress().unwrap().progress, 0.0);

        let empty = GraphState::initial();
        tracker.advance(&empty);
        tracker.advance(&empty);
        assert_eq!(tracker.active_progress().unwrap().current_step, 3);
        assert!(tracker.retreat());
        let p = tracker.active_progress().unwrap();
        assert_eq!(p.current_step, 2);
        assert!(!p.completed);
        assert!((p.progress - 2.0 / 3.0).abs() < 1e-9);

        assert!(tracker.retreat());
        assert!((tracker.active_progress().unwrap().progress - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn progress_follows_the_cursor() {
        let mut tracker = LessonTracker::builtin();
        tracker.select("git-basics").unwrap();
        assert_eq!(tracker.active_progress().unwrap().progress, 0.0);

        tracker.advance(&GraphState::initial());
        let p = tracker.active_progress().unwrap();
        assert_eq!(p.current_step, 2);
        assert!((p.progress - 2.0 / 3.0).abs() < 1e-9);

        tracker.reset_all();
        assert_eq!(tracker.progress("git-basics").unwrap().progress, 0.0);
    }

    #[test]
    fn selection_keeps_progress() {
        let mut tracker = LessonTracker::builtin();
        tracker.select("git-basics").unwrap();
        tracker.advance(&GraphState::initial());
        tracker.select("advanced-git").unwrap();
        tracker.select("git-basics").unwrap();
        assert_eq!(tracker.active_progress().unwrap().current_step, 2);
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut tracker = LessonTracker::builtin();
        tracker.select("git-basics").unwrap();
        tracker.advance(&GraphState::initial());
        tracker.reset_all();
        assert!(tracker.active_id().is_none());
        assert_eq!(tracker.progress("git-basics").unwrap().current_step, 1);
        assert_eq!(tracker.lessons().len(), 3);
    }

    #[test]
    fn restore_clamps_and_drops() {
        let mut tracker = LessonTracker::builtin();
        let mut saved = BTreeMap::new();
        saved.insert(
            "git-basics".to_string(),
            LessonProgress {
                lesson_id: "git-basics".into(),
                current_step: 99,
                completed: true,
                total_steps: 7,
                progress: 0.2,
            },
        );
        saved.insert(
            "retired".to_string(),
            LessonProgress {
                lesson_id: "retired".into(),
                current_step: 2,
                completed: false,
                total_steps: 2,
                progress: 0.5,
            },
        );
        tracker.restore(saved, Some("retired".into()));

        let p = tracker.progress("git-basics").unwrap();
        assert_eq!(p.current_step, 3);
        assert_eq!(p.total_steps, 3);
        assert_eq!(p.progress, 1.0);
        assert!(tracker.progress("retired").is_none());
        assert!(tracker.active_id().is_none());
    }

    #[test]
    fn observe_requires_matching_kind() {
        let mut s = SequentialStamper::default();
        let mut tracker = LessonTracker::builtin();
        tracker.select("git-basics").unwrap();
        let state = engine::commit(&GraphState::initial(), "Initial commit", &mut s).unwrap();

        assert!(tracker.observe(OperationKind::Checkout, &state).is_none());
        assert_eq!(
            tracker.observe(OperationKind::Commit, &state),
            Some(LessonEvent::Advanced {
                lesson_id: "git-basics".into(),
                step: 2
            })
        );
        // Step 2 wants a README commit.
        assert!(tracker.observe(OperationKind::Commit, &state).is_none());
    }
}
