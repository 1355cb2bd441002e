//! MPC re-planning controller ("ReplanController", C9).
//!
//! One controller owns one ride's [`ReplanState`]. It answers two
//! questions only: *should* a replan be attempted now (§4.9
//! "should-replan predicate"), and, given a freshly searched candidate
//! route, *should it be committed* (§4.9 "commit (hysteresis)"). It never
//! runs a search itself — that's [`eco_routing::AStarEngine`], invoked by
//! the facade.

use eco_core::{elapsed_secs, Instant, RoutingConfig};
use eco_routing::Route;

use crate::state::{ReplanState, ReplanSummary};

/// Caller-observed conditions that can force an out-of-cycle replan (§4.9).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplanTriggers {
    /// Fraction change in observed traffic since the last plan, e.g. `0.25`
    /// for a 25% change. Threshold is fixed at `0.20` by the spec, not
    /// configurable.
    pub traffic_change_pct: f64,
    pub off_route: bool,
    pub incident_on_route: bool,
}

/// Outcome of [`ReplanController::decide`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplanDecision {
    /// At least one should-replan condition holds; the facade should run a
    /// fresh search and call [`ReplanController::try_commit`].
    ShouldReplan,
    /// None of the should-replan conditions hold; keep the current route.
    NotDue,
    /// `replan_count >= max_replans`; no further replans for this ride.
    CeilingReached,
}

/// Outcome of [`ReplanController::try_commit`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CommitOutcome {
    /// Candidate replaced the current route.
    Committed,
    /// Candidate's improvement did not clear the hysteresis margin;
    /// current route is retained and `last_replan_time` is unchanged.
    RejectedHysteresis,
}

/// Read-only view of a ride's replan state, returned to callers (§4.9
/// "observable state").
#[derive(Clone, Debug)]
pub struct ReplanStatus<'a> {
    pub replan_count: u32,
    pub last_replan: Option<Instant>,
    pub current_cost: Option<f64>,
    pub recent_history: Vec<&'a ReplanSummary>,
}

/// MPC controller for one ride. Holds no graph reference; the facade drives
/// the search and hands the result back in.
pub struct ReplanController {
    state: ReplanState,
}

impl ReplanController {
    pub fn new() -> Self {
        Self { state: ReplanState::new() }
    }

    pub fn state(&self) -> &ReplanState {
        &self.state
    }

    pub fn status(&self) -> ReplanStatus<'_> {
        ReplanStatus {
            replan_count: self.state.replan_count(),
            last_replan: self.state.last_replan_time(),
            current_cost: self.state.current_route().map(|r| r.scalar_cost),
            recent_history: self.state.history().collect(),
        }
    }

    /// Should-replan predicate, OR'd (§4.9). Checked before the ceiling so
    /// a ride that has exhausted its budget always reports
    /// `CeilingReached` rather than `NotDue`.
    #[tracing::instrument(skip(self, config, triggers), fields(replan_count = self.state.replan_count))]
    pub fn decide(&self, now: Instant, config: &RoutingConfig, triggers: ReplanTriggers) -> ReplanDecision {
        if self.state.replan_count >= config.max_replans {
            tracing::debug!("replan ceiling reached");
            return ReplanDecision::CeilingReached;
        }

        let no_prior_plan = self.state.current_route.is_none();
        let interval_elapsed = self
            .state
            .last_replan_time
            .map(|t| elapsed_secs(t, now) >= config.replan_interval_s)
            .unwrap_or(true);
        let traffic_changed = triggers.traffic_change_pct > 0.20;

        if no_prior_plan || interval_elapsed || traffic_changed || triggers.off_route || triggers.incident_on_route {
            ReplanDecision::ShouldReplan
        } else {
            ReplanDecision::NotDue
        }
    }

    /// Commit `candidate` if it clears the hysteresis margin against the
    /// current route's scalar cost, or unconditionally if there is no
    /// current route yet (§4.9).
    ///
    /// `last_replan_time` only advances on commit, so transient churn from
    /// a rejected candidate does not starve the next interval check.
    pub fn try_commit(&mut self, candidate: Route, now: Instant, config: &RoutingConfig) -> CommitOutcome {
        let previous_cost = self.state.current_route.as_ref().map(|r| r.scalar_cost);
        let should_commit = match previous_cost {
            None => true,
            Some(current_cost) => candidate.scalar_cost < (1.0 - config.hysteresis_threshold) * current_cost,
        };

        let summary = ReplanSummary {
            at: now,
            previous_cost,
            candidate_cost: candidate.scalar_cost,
            committed: should_commit,
        };
        self.state.push_history(summary);

        if should_commit {
            self.state.current_route = Some(candidate);
            self.state.last_replan_time = Some(now);
            self.state.replan_count += 1;
            tracing::info!(replan_count = self.state.replan_count, "replan committed");
            CommitOutcome::Committed
        } else {
            tracing::debug!(candidate_cost = candidate.scalar_cost, previous_cost, "replan rejected by hysteresis");
            CommitOutcome::RejectedHysteresis
        }
    }
}

impl Default for ReplanController {
    fn default() -> Self {
        Self::new()
    }
}
