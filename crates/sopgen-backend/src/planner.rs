//! SLA merge-range planning
//!
//! Scans the step sequence once and groups contiguous steps that share a
//! service-level value into [`MergeRange`]s. The scan is a two-state machine:
//!
//! | state           | step                          | transition                 |
//! |-----------------|-------------------------------|----------------------------|
//! | `Idle`          | gateway                       | skip                       |
//! | `Idle`          | has group `g`                 | open (group `g`)           |
//! | `Idle`          | has SLA, no group             | open (task)                |
//! | `Idle`          | neither                       | skip                       |
//! | `Open`          | gateway                       | extend                     |
//! | `Open(group g)` | non-gateway in group `g`      | extend                     |
//! | `Open`          | any other non-gateway         | close, then re-run as Idle |
//!
//! Gateways (branch outcomes) therefore never own a range: they join the range
//! of the nearest preceding owner, or no range at all. Grouping is adjacency
//! scoped; two runs of the same group key split by an unrelated step become
//! two ranges.

use serde::{Deserialize, Serialize};
use sopgen_core::Step;

/// A contiguous span of steps sharing one SLA value (inclusive indices)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRange {
    /// First step index
    pub start: usize,
    /// Last step index
    pub end: usize,
    /// SLA value shown in the merged cell
    pub value: String,
}

impl MergeRange {
    /// Number of steps covered
    #[inline]
    #[must_use = "returns range length"]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Ranges always cover at least one step
    #[inline]
    #[must_use = "always false"]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether the range spans more than one row
    #[inline]
    #[must_use = "checks for a multi-row span"]
    pub const fn is_merged(&self) -> bool {
        self.end > self.start
    }

    /// Whether `index` falls inside the range
    #[inline]
    #[must_use = "checks range membership"]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

/// Who opened the current range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner<'a> {
    /// A task with its own SLA
    Task,
    /// A run of tasks sharing a group key
    Group(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PlannerState<'a> {
    Idle,
    Open {
        owner: Owner<'a>,
        start: usize,
        end: usize,
        value: &'a str,
    },
}

/// Effect of one step on the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Skip,
    OpenTask,
    OpenGroup,
    Extend,
    Close,
}

fn transition(state: &PlannerState<'_>, step: &Step) -> Transition {
    match state {
        PlannerState::Idle => {
            if step.is_gateway {
                Transition::Skip
            } else if step.group_key().is_some() {
                Transition::OpenGroup
            } else if step.sla_value().is_some() {
                Transition::OpenTask
            } else {
                Transition::Skip
            }
        }
        PlannerState::Open { owner, .. } => {
            if step.is_gateway {
                return Transition::Extend;
            }
            match (owner, step.group_key()) {
                (Owner::Group(open), Some(key)) if *open == key => Transition::Extend,
                _ => Transition::Close,
            }
        }
    }
}

/// Incremental merge planner; feed steps in order, then call [`finish`].
///
/// [`finish`]: MergePlanner::finish
#[derive(Debug, Clone)]
pub struct MergePlanner<'a> {
    state: PlannerState<'a>,
    ranges: Vec<MergeRange>,
}

impl Default for MergePlanner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MergePlanner<'a> {
    /// Create a planner in the idle state
    #[must_use = "creates a planner"]
    pub const fn new() -> Self {
        Self {
            state: PlannerState::Idle,
            ranges: Vec::new(),
        }
    }

    /// Consume the step at `index`
    pub fn feed(&mut self, index: usize, step: &'a Step) {
        match transition(&self.state, step) {
            Transition::Skip => {}
            Transition::Extend => {
                if let PlannerState::Open { end, .. } = &mut self.state {
                    *end = index;
                }
            }
            Transition::OpenTask => {
                self.state = PlannerState::Open {
                    owner: Owner::Task,
                    start: index,
                    end: index,
                    value: step.sla_value().unwrap_or_default(),
                };
            }
            Transition::OpenGroup => {
                self.state = PlannerState::Open {
                    owner: Owner::Group(step.group_key().unwrap_or_default()),
                    start: index,
                    end: index,
                    value: step.sla_value().unwrap_or_default(),
                };
            }
            Transition::Close => {
                self.close();
                // Idle never answers Close, so this recurses at most once
                self.feed(index, step);
            }
        }
    }

    fn close(&mut self) {
        if let PlannerState::Open {
            start, end, value, ..
        } = std::mem::replace(&mut self.state, PlannerState::Idle)
        {
            log::debug!("SLA merge range {start}..={end} '{value}'");
            self.ranges.push(MergeRange {
                start,
                end,
                value: value.to_string(),
            });
        }
    }

    /// Close any open range and return all ranges in step order
    #[must_use = "returns the planned ranges"]
    pub fn finish(mut self) -> Vec<MergeRange> {
        self.close();
        self.ranges
    }
}

/// Plan SLA merge ranges over a full step sequence
///
/// # Examples
///
/// ```
/// use sopgen_backend::planner::plan_merge_ranges;
/// use sopgen_core::Step;
///
/// let steps = vec![
///     Step::task("1").with_sla("4h"),
///     Step::gateway(),
///     Step::gateway(),
///     Step::task("2"),
/// ];
/// let ranges = plan_merge_ranges(&steps);
/// assert_eq!(ranges.len(), 1);
/// assert_eq!((ranges[0].start, ranges[0].end), (0, 2));
/// assert_eq!(ranges[0].value, "4h");
/// ```
#[must_use = "returns the planned ranges"]
pub fn plan_merge_ranges(steps: &[Step]) -> Vec<MergeRange> {
    let mut planner = MergePlanner::new();
    for (index, step) in steps.iter().enumerate() {
        planner.feed(index, step);
    }
    planner.finish()
}
