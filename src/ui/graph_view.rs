//! ui::graph_view
//!
//! Text visualization of the commit graph.
//!
//! # Layout
//!
//! Each commit sits in a lane and a row:
//! - lane: position of its branch label among branches, `main` first and
//!   the rest by name
//! - row: depth along the parent chain (a root commit is row 0)
//!
//! Positions are scaled by the viewport. Both entry points return empty
//! output for a graph with no commits.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::graph::GraphState;
use crate::core::types::{BranchName, CommitId};

/// Horizontal distance between lanes at scale 1.
pub const LANE_SPACING: f64 = 60.0;
/// Vertical distance between rows at scale 1.
pub const ROW_SPACING: f64 = 80.0;
/// Offset of lane 0 / row 0 from the viewport origin.
pub const MARGIN: f64 = 40.0;

const SHORT_ID_LEN: usize = 7;

/// The area a renderer draws into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scale: 1.0,
        }
    }
}

/// Where one commit is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: CommitId,
    pub lane: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    /// Inside the viewport bounds
    pub visible: bool,
}

/// Positions for every commit plus the drawing's extent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    /// In commit-log order
    pub nodes: Vec<NodePosition>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lane order: `main` first, then by name.
fn lane_order(state: &GraphState) -> Vec<&BranchName> {
    let main = BranchName::main();
    let mut names: Vec<_> = state.branches.keys().collect();
    names.sort_by(|a, b| (**a != main).cmp(&(**b != main)).then_with(|| a.cmp(b)));
    names
}

fn lanes(state: &GraphState) -> HashMap<&BranchName, usize> {
    lane_order(state)
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, i))
        .collect()
}

/// Parent-chain depth of every commit.
///
/// Parents precede children in the log, so one pass suffices.
fn depths(state: &GraphState) -> HashMap<&CommitId, usize> {
    let mut depth = HashMap::with_capacity(state.commits.len());
    for commit in &state.commits {
        let d = commit
            .parent
            .as_ref()
            .and_then(|p| depth.get(p))
            .map_or(0, |d| d + 1);
        depth.insert(&commit.id, d);
    }
    depth
}

/// Assign every commit a lane, a row, and scaled coordinates.
///
/// # Example
///
/// ```
/// use gitquest::core::graph::GraphState;
/// use gitquest::ui::graph_view::{layout, Viewport};
///
/// assert!(layout(&GraphState::initial(), Viewport::default()).is_empty());
/// ```
pub fn layout(state: &GraphState, viewport: Viewport) -> Layout {
    if state.commits.is_empty() {
        return Layout::default();
    }

    let lanes = lanes(state);
    let depths = depths(state);
    let overflow_lane = lanes.len();
    let scale = if viewport.scale > 0.0 { viewport.scale } else { 1.0 };

    let nodes: Vec<_> = state
        .commits
        .iter()
        .map(|commit| {
            let lane = lanes.get(&commit.branch).copied().unwrap_or(overflow_lane);
            let row = depths.get(&commit.id).copied().unwrap_or(0);
            let x = (MARGIN + lane as f64 * LANE_SPACING) * scale;
            let y = (MARGIN + row as f64 * ROW_SPACING) * scale;
            NodePosition {
                id: commit.id.clone(),
                lane,
                row,
                x,
                y,
                visible: x <= viewport.width && y <= viewport.height,
            }
        })
        .collect();

    let width = nodes.iter().map(|n| n.x).fold(0.0, f64::max) + MARGIN * scale;
    let height = nodes.iter().map(|n| n.y).fold(0.0, f64::max) + MARGIN * scale;

    Layout {
        nodes,
        width,
        height,
    }
}

/// Render the log newest-first, one commit per line.
///
/// Lane markers show `*` for the commit's own lane and `|` for lanes that
/// already have older commits. Decorations name `HEAD` and branch heads.
///
/// ```text
/// * | c000000 Merge branch 'feature' into main (HEAD -> main) [main]
/// | * c000000 add login (feature) [feature]
/// * c000000 Initial commit [main]
/// ```
pub fn render_log(state: &GraphState) -> String {
    if state.commits.is_empty() {
        return String::new();
    }

    let lanes = lanes(state);
    let overflow_lane = lanes.len();
    let lane_of = |branch: &BranchName| lanes.get(branch).copied().unwrap_or(overflow_lane);

    // Lanes with at least one commit so far, walking oldest to newest.
    let mut occupied = vec![false; overflow_lane + 1];
    let mut rows = Vec::with_capacity(state.commits.len());
    for commit in &state.commits {
        let lane = lane_of(&commit.branch);
        occupied[lane] = true;
        let width = occupied.iter().rposition(|o| *o).map_or(0, |i| i + 1);

        let markers: Vec<&str> = (0..width)
            .map(|i| {
                if i == lane {
                    "*"
                } else if occupied[i] {
                    "|"
                } else {
                    " "
                }
            })
            .collect();

        let mut line = format!(
            "{} {} {}",
            markers.join(" "),
            commit.id.short(SHORT_ID_LEN),
            commit.message
        );
        let decorations = decorations(state, &commit.id);
        if !decorations.is_empty() {
            line.push_str(&format!(" ({})", decorations.join(", ")));
        }
        line.push_str(&format!(" [{}]", commit.branch));
        rows.push(line);
    }

    rows.reverse();
    rows.join("\n")
}

fn decorations(state: &GraphState, id: &CommitId) -> Vec<String> {
    let mut labels = Vec::new();
    let is_current = state.current_commit.as_ref() == Some(id);
    let detached = state.is_detached();

    if is_current && detached {
        labels.push("HEAD".to_string());
    }
    for name in lane_order(state) {
        let Some(branch) = state.branches.get(name) else {
            continue;
        };
        if branch.head.as_ref() != Some(id) {
            continue;
        }
        if is_current && !detached && branch.is_active {
            labels.insert(0, format!("HEAD -> {}", name));
        } else {
            labels.push(name.to_string());
        }
    }
    labels
}
