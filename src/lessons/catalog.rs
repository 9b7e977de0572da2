//! lessons::catalog
//!
//! Static lesson definitions.

use serde::{Deserialize, Serialize};

use super::predicate::Predicate;
use crate::engine::OperationKind;

/// One unit of guided instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonStep {
    pub title: String,
    pub description: String,
    /// The operation the learner is expected to perform
    pub expected: OperationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// `None` means the step is advanced manually
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Predicate>,
}

impl LessonStep {
    fn new(
        title: &str,
        description: &str,
        expected: OperationKind,
        hint: &str,
        predicate: Predicate,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            expected,
            hint: Some(hint.to_string()),
            predicate: Some(predicate),
        }
    }

    /// Whether the step's predicate holds (manual steps always do).
    pub fn is_satisfied(&self, state: &crate::core::graph::GraphState) -> bool {
        self.predicate.as_ref().map_or(true, |p| p.evaluate(state))
    }
}

/// An ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub steps: Vec<LessonStep>,
}

impl Lesson {
    /// Step by 1-based index.
    pub fn step(&self, index: usize) -> Option<&LessonStep> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// The built-in lessons, in presentation order.
pub fn builtin() -> Vec<Lesson> {
    use OperationKind::*;

    vec![
        Lesson {
            id: "git-basics".into(),
            title: "Git Basics".into(),
            description: "Learn the fundamental Git commands and concepts.".into(),
            steps: vec![
                LessonStep::new(
                    "Your First Commit",
                    "Create your first commit to start tracking your project.",
                    Commit,
                    "Create a commit with the message \"Initial commit\"",
                    Predicate::commit_message_contains("Initial commit"),
                ),
                LessonStep::new(
                    "Adding Documentation",
                    "Good projects have documentation. Create a commit that adds a README file.",
                    Commit,
                    "Create a commit with the message \"Add README file\"",
                    Predicate::commit_message_contains("Add README file"),
                ),
                LessonStep::new(
                    "Project Structure",
                    "Set up your project structure and create a commit to track it.",
                    Commit,
                    "Create a commit with the message \"Add project structure\"",
                    Predicate::commit_message_contains("Add project structure"),
                ),
            ],
        },
        Lesson {
            id: "branching-merging".into(),
            title: "Branching and Merging".into(),
            description:
                "Learn how to create branches, work on features separately, and merge changes."
                    .into(),
            steps: vec![
                LessonStep::new(
                    "Create a Feature Branch",
                    "Create a new branch called \"feature\" to work on a new feature.",
                    Branch,
                    "Create a branch named \"feature\"",
                    Predicate::branch_exists("feature"),
                ),
                LessonStep::new(
                    "Checkout the Feature Branch",
                    "Switch to the \"feature\" branch to start working on your feature.",
                    Checkout,
                    "Checkout the \"feature\" branch",
                    Predicate::active_branch_is("feature"),
                ),
                LessonStep::new(
                    "Add Feature Commit",
                    "Add a commit for your new login feature while on the feature branch.",
                    Commit,
                    "Create a commit mentioning \"login functionality\"",
                    Predicate::commit_message_contains("login functionality"),
                ),
                LessonStep::new(
                    "Switch Back to Main",
                    "Switch back to the main branch to prepare for merging.",
                    Checkout,
                    "Checkout the \"main\" branch",
                    Predicate::active_branch_is("main"),
                ),
                LessonStep::new(
                    "Merge the Feature",
                    "Merge the feature branch into the main branch to incorporate your changes.",
                    Merge,
                    "Merge the \"feature\" branch into \"main\"",
                    Predicate::merged("feature", "main"),
                ),
            ],
        },
        Lesson {
            id: "advanced-git".into(),
            title: "Advanced Git Operations".into(),
            description: "Learn more advanced Git operations like reverting changes.".into(),
            steps: vec![
                LessonStep::new(
                    "Important Milestone Commit",
                    "Create a commit for an important milestone in your project.",
                    Commit,
                    "Create a commit with \"Important milestone\" in the message",
                    Predicate::commit_message_contains("Important milestone"),
                ),
                LessonStep::new(
                    "Problem Commit",
                    "Oops! Create a commit that introduces a bug or problem.",
                    Commit,
                    "Create a commit with \"Fix bug\" in the message",
                    Predicate::commit_message_contains("Fix bug"),
                ),
                LessonStep::new(
                    "Revert the Problem",
                    "Revert the problematic commit to undo the changes.",
                    Revert,
                    "Revert the commit that introduced the bug",
                    Predicate::RevertExists,
                ),
            ],
        },
    ]
}
