//! session
//!
//! The per-session state owner.
//!
//! # Architecture
//!
//! A [`Session`] owns the current [`GraphState`], the [`LessonTracker`],
//! and the [`Persistence`] adapter over an injected store. Every graph
//! operation flows through [`Session::apply`]:
//!
//! ```text
//! Operation -> engine transition -> lesson auto-advance -> autosave
//! ```
//!
//! Consumers read through `&` accessors or take a [`SessionSnapshot`]
//! clone; nothing outside the session mutates its state.
//!
//! # Saving
//!
//! With `autosave` on, each change schedules a [`DebouncedSaver`] write
//! when a tokio runtime is available and saves synchronously otherwise.
//! With `autosave` off, callers save explicitly with [`Session::save`].
//! Dropping a session with a pending debounced save writes it immediately.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::config::{Config, DEFAULT_DEBOUNCE_MS};
use crate::core::graph::GraphState;
use crate::engine::{self, EngineError, Operation, Stamper, SystemStamper};
use crate::lessons::{LessonError, LessonEvent, LessonTracker};
use crate::store::{DebouncedSaver, KeyValueStore, PersistError, Persistence, SessionSnapshot};

/// Behavior switches for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub autosave: bool,
    pub debounce: Duration,
    pub auto_advance: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            autosave: true,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            auto_advance: true,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            autosave: config.autosave(),
            debounce: config.debounce(),
            auto_advance: config.auto_advance(),
        }
    }

    /// Same options with autosave off.
    pub fn manual_save(self) -> Self {
        Self {
            autosave: false,
            ..self
        }
    }
}

/// Outcome of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Applied {
    /// Lesson movement caused by auto-advance
    pub lesson: Option<LessonEvent>,
}

/// Graph, lessons, and persistence for one learner.
pub struct Session {
    graph: GraphState,
    lessons: LessonTracker,
    persistence: Persistence,
    saver: Option<DebouncedSaver>,
    stamper: Box<dyn Stamper>,
    options: SessionOptions,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("graph", &self.graph)
            .field("active_lesson", &self.lessons.active_id())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open a session over `store`, restoring whatever it holds.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use gitquest::session::{Session, SessionOptions};
    /// use gitquest::store::MemoryStore;
    ///
    /// let mut session = Session::open(Arc::new(MemoryStore::new()), SessionOptions::default());
    /// session.commit("Initial commit").unwrap();
    /// assert_eq!(session.graph().commits.len(), 1);
    /// ```
    pub fn open(store: Arc<dyn KeyValueStore>, options: SessionOptions) -> Self {
        let persistence = Persistence::new(store);
        let snapshot = persistence.load();

        let mut lessons = LessonTracker::builtin();
        lessons.restore(snapshot.lessons, snapshot.active_lesson);

        let saver = if options.autosave {
            DebouncedSaver::try_new(persistence.clone(), options.debounce)
        } else {
            None
        };

        debug!(
            commits = snapshot.graph.commits.len(),
            debounced = saver.is_some(),
            "session opened"
        );

        Self {
            graph: snapshot.graph,
            lessons,
            persistence,
            saver,
            stamper: Box::new(SystemStamper),
            options,
        }
    }

    /// Replace the id and clock source.
    pub fn with_stamper(mut self, stamper: impl Stamper + 'static) -> Self {
        self.stamper = Box::new(stamper);
        self
    }

    pub fn graph(&self) -> &GraphState {
        &self.graph
    }

    pub fn lessons(&self) -> &LessonTracker {
        &self.lessons
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// A detached copy of everything the session persists.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            graph: self.graph.clone(),
            lessons: self.lessons.all_progress().clone(),
            active_lesson: self.lessons.active_id().map(str::to_string),
        }
    }

    /// Whether a debounced save is waiting to run.
    pub fn save_pending(&self) -> bool {
        self.saver.as_ref().is_some_and(DebouncedSaver::is_pending)
    }

    /// Apply one graph operation.
    ///
    /// Commit references accept unique id prefixes. On failure nothing
    /// changes.
    pub fn apply(&mut self, op: Operation) -> Result<Applied, EngineError> {
        let op = self.expand_refs(op);
        let next = engine::apply(&self.graph, &op, self.stamper.as_mut())?;
        self.graph = next;

        let lesson = if self.options.auto_advance {
            self.lessons.observe(op.kind(), &self.graph)
        } else {
            None
        };

        self.changed();
        Ok(Applied { lesson })
    }

    pub fn commit(&mut self, message: &str) -> Result<Applied, EngineError> {
        self.apply(Operation::Commit {
            message: message.to_string(),
        })
    }

    pub fn create_branch(&mut self, name: &str) -> Result<Applied, EngineError> {
        self.apply(Operation::Branch {
            name: name.to_string(),
        })
    }

    pub fn merge(&mut self, source: &str) -> Result<Applied, EngineError> {
        self.apply(Operation::Merge {
            source: source.to_string(),
        })
    }

    pub fn checkout(&mut self, target: &str) -> Result<Applied, EngineError> {
        self.apply(Operation::Checkout {
            target: target.to_string(),
        })
    }

    pub fn revert(&mut self, commit: &str) -> Result<Applied, EngineError> {
        self.apply(Operation::Revert {
            commit: commit.to_string(),
        })
    }

    pub fn create_issue(&mut self, title: &str, description: &str) -> Result<Applied, EngineError> {
        self.apply(Operation::Issue {
            title: title.to_string(),
            description: description.to_string(),
        })
    }

    /// Back to the initial graph. Lesson progress is kept.
    pub fn reset_graph(&mut self) {
        self.graph = engine::reset();
        self.changed();
    }

    /// Replace the graph with serialized JSON after validation.
    pub fn load_graph(&mut self, serialized: &str) -> Result<(), EngineError> {
        self.graph = engine::load_json(serialized)?;
        self.changed();
        Ok(())
    }

    /// Write the current state now, superseding any pending save.
    pub fn save(&mut self) -> Result<(), PersistError> {
        let snapshot = self.snapshot();
        self.write_now(|p| p.save(&snapshot))
    }

    /// Initial graph, fresh lessons, and an empty store.
    pub fn reset_all(&mut self) -> Result<(), PersistError> {
        self.graph = engine::reset();
        self.lessons.reset_all();
        self.write_now(Persistence::clear)
    }

    /// Cancel any scheduled save and write once an in-flight one is done.
    fn write_now<R>(&mut self, write: impl FnOnce(&Persistence) -> R) -> R {
        match self.saver.as_mut() {
            Some(saver) => {
                saver.cancel();
                saver.exclusive(|| write(&self.persistence))
            }
            None => write(&self.persistence),
        }
    }

    pub fn select_lesson(&mut self, id: &str) -> Result<(), LessonError> {
        self.lessons.select(id)?;
        self.changed();
        Ok(())
    }

    pub fn advance_lesson(&mut self) -> Option<LessonEvent> {
        let event = self.lessons.advance(&self.graph);
        if event.is_some() {
            self.changed();
        }
        event
    }

    pub fn retreat_lesson(&mut self) -> bool {
        let moved = self.lessons.retreat();
        if moved {
            self.changed();
        }
        moved
    }

    pub fn is_current_step_satisfied(&self) -> bool {
        self.lessons.is_current_step_satisfied(&self.graph)
    }

    pub fn reset_lessons(&mut self) {
        self.lessons.reset_all();
        self.changed();
    }

    /// Resolve unique commit-id prefixes where a commit is expected.
    ///
    /// Checkout targets that name a branch are left alone.
    fn expand_refs(&self, op: Operation) -> Operation {
        let expand = |input: String| {
            self.graph
                .resolve_commit(&input)
                .map(|id| id.to_string())
                .unwrap_or(input)
        };
        match op {
            Operation::Revert { commit } => Operation::Revert {
                commit: expand(commit),
            },
            Operation::Checkout { target } if self.graph.branch(&target).is_none() => {
                Operation::Checkout {
                    target: expand(target),
                }
            }
            other => other,
        }
    }

    fn changed(&mut self) {
        if !self.options.autosave {
            return;
        }
        let snapshot = self.snapshot();
        match self.saver.as_mut() {
            Some(saver) => saver.schedule(snapshot),
            None => {
                if let Err(e) = self.persistence.save(&snapshot) {
                    warn!(error = %e, "autosave failed");
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.saver.as_ref().is_some_and(DebouncedSaver::is_pending) {
            return;
        }
        let snapshot = self.snapshot();
        if let Err(e) = self.write_now(|p| p.save(&snapshot)) {
            warn!(error = %e, "final save failed");
        }
    }
}
