//! Depth-first branch-and-bound over the selection model.
//!
//! Candidates are visited in best-value-first order; each node
//! branches over the candidate's allowed roles (best value first)
//! and, unless the rider is required, over leaving them out. Pruning:
//!
//! - optimistic bound: current value plus an upper bound on the
//!   remaining contribution must beat the incumbent. Two admissible
//!   tails are combined: the best `slots_left` remaining candidates
//!   at their best role value (O(1) via prefix sums over the sorted
//!   order), and a window decomposition - since a base rider's value
//!   is exactly its early plus late EV, no completion can beat the
//!   top early EVs over the starting-window slots plus the top late
//!   EVs over the post-transfer slots;
//! - feasibility: remaining candidates must fill the remaining slots,
//!   per-race coverage must stay reachable (suffix counts), the
//!   budget floor must stay reachable (suffix price sums), and the
//!   budget caps hold on every partial assignment.
//!
//! An exhausted tree certifies the incumbent optimal (or certifies
//! infeasibility); a deadline hit reports the incumbent unproven.

use crate::model::{Role, SelectionModel};
use crate::termination::Deadline;

/// Deadline checks happen every this many nodes.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// What the search found.
#[derive(Debug)]
pub(crate) struct SearchOutcome {
    /// Best assignment found (role per candidate, `None` = out) and
    /// its objective value.
    pub best: Option<(Vec<Option<Role>>, f64)>,
    /// Whether the tree was exhausted: a `true` here certifies the
    /// result (optimal, or infeasible when `best` is empty).
    pub proven: bool,
    pub nodes: u64,
}

pub(crate) fn branch_and_bound(model: &SelectionModel, deadline: Deadline) -> SearchOutcome {
    Search::new(model, deadline).run()
}

struct Search<'a> {
    model: &'a SelectionModel,
    deadline: Deadline,

    // Precomputed pruning tables.
    value_prefix: Vec<f64>,
    early_top: Vec<Vec<f64>>,
    late_top: Vec<Vec<f64>>,
    early_cover_suffix: Vec<Vec<usize>>,
    late_cover_suffix: Vec<Vec<usize>>,
    start_price_suffix: Vec<u64>,
    role_order: Vec<Vec<Role>>,

    // Mutable search state.
    assignment: Vec<Option<Role>>,
    slots_left: [usize; 3],
    spend_start: u64,
    spend_late: u64,
    cover_early: Vec<usize>,
    cover_late: Vec<usize>,
    value: f64,
    best: Option<(Vec<Option<Role>>, f64)>,
    nodes: u64,
    timed_out: bool,
}

impl<'a> Search<'a> {
    fn new(model: &'a SelectionModel, deadline: Deadline) -> Self {
        let n = model.candidates.len();

        let mut value_prefix = Vec::with_capacity(n + 1);
        value_prefix.push(0.0);
        for candidate in &model.candidates {
            value_prefix.push(value_prefix[value_prefix.len() - 1] + candidate.max_value());
        }

        let early_values: Vec<f64> = model
            .candidates
            .iter()
            .map(|c| {
                if c.can_start_early() {
                    c.value[Role::EarlyOnly.index()]
                } else {
                    0.0
                }
            })
            .collect();
        let late_values: Vec<f64> = model
            .candidates
            .iter()
            .map(|c| {
                if c.can_start_late() {
                    c.value[Role::LateOnly.index()]
                } else {
                    0.0
                }
            })
            .collect();
        let early_top = suffix_top_sums(
            &early_values,
            model.role_slots[Role::Base.index()] + model.role_slots[Role::EarlyOnly.index()],
        );
        let late_top = suffix_top_sums(
            &late_values,
            model.role_slots[Role::Base.index()] + model.role_slots[Role::LateOnly.index()],
        );

        let early_cover_suffix = cover_suffix(model, true);
        let late_cover_suffix = cover_suffix(model, false);

        let mut start_price_suffix = vec![0u64; n + 1];
        for i in (0..n).rev() {
            let candidate = &model.candidates[i];
            let price = if candidate.can_start_early() {
                candidate.price
            } else {
                0
            };
            start_price_suffix[i] = start_price_suffix[i + 1] + price;
        }

        let role_order = model
            .candidates
            .iter()
            .map(|c| {
                let mut roles: Vec<Role> = Role::ALL
                    .into_iter()
                    .filter(|r| c.allowed[r.index()])
                    .collect();
                roles.sort_by(|a, b| {
                    c.value[b.index()]
                        .partial_cmp(&c.value[a.index()])
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.index().cmp(&b.index()))
                });
                roles
            })
            .collect();

        Search {
            model,
            deadline,
            value_prefix,
            early_top,
            late_top,
            early_cover_suffix,
            late_cover_suffix,
            start_price_suffix,
            role_order,
            assignment: vec![None; n],
            slots_left: model.role_slots,
            spend_start: 0,
            spend_late: 0,
            cover_early: vec![0; model.early_races.len()],
            cover_late: vec![0; model.late_races.len()],
            value: 0.0,
            best: None,
            nodes: 0,
            timed_out: false,
        }
    }

    fn run(mut self) -> SearchOutcome {
        self.node(0);
        SearchOutcome {
            best: self.best,
            proven: !self.timed_out,
            nodes: self.nodes,
        }
    }

    fn node(&mut self, i: usize) {
        if self.timed_out {
            return;
        }
        self.nodes += 1;
        if self.nodes % DEADLINE_CHECK_INTERVAL == 1 && self.deadline.is_exhausted() {
            self.timed_out = true;
            return;
        }

        let n = self.model.candidates.len();
        if i == n {
            self.record_leaf();
            return;
        }

        let total_left: usize = self.slots_left.iter().sum();
        if n - i < total_left {
            return;
        }
        if let Some((_, best)) = &self.best {
            let tail_master = self.value_prefix[(i + total_left).min(n)] - self.value_prefix[i];
            let early_sums = &self.early_top[i];
            let late_sums = &self.late_top[i];
            let early_slots =
                (self.slots_left[0] + self.slots_left[1]).min(early_sums.len() - 1);
            let late_slots = (self.slots_left[0] + self.slots_left[2]).min(late_sums.len() - 1);
            let tail = tail_master.min(early_sums[early_slots] + late_sums[late_slots]);
            if self.value + tail <= *best {
                return;
            }
        }
        for (r, row) in self.model.early_races.iter().enumerate() {
            if self.cover_early[r] + self.early_cover_suffix[r][i] < row.min {
                return;
            }
        }
        for (r, row) in self.model.late_races.iter().enumerate() {
            if self.cover_late[r] + self.late_cover_suffix[r][i] < row.min {
                return;
            }
        }
        if self.spend_start + self.start_price_suffix[i] < self.model.budget_min {
            return;
        }

        for k in 0..self.role_order[i].len() {
            let role = self.role_order[i][k];
            self.try_role(i, role);
        }
        if !self.model.candidates[i].required {
            self.node(i + 1);
        }
    }

    fn try_role(&mut self, i: usize, role: Role) {
        if self.slots_left[role.index()] == 0 {
            return;
        }
        let model = self.model;
        let candidate = &model.candidates[i];
        let (delta_start, delta_late) = match role {
            Role::Base => (candidate.price, candidate.price),
            Role::EarlyOnly => (candidate.price, 0),
            Role::LateOnly => (0, candidate.price),
        };
        if self.spend_start + delta_start > model.budget_max
            || self.spend_late + delta_late > model.budget_max
        {
            return;
        }

        self.slots_left[role.index()] -= 1;
        self.spend_start += delta_start;
        self.spend_late += delta_late;
        if role != Role::LateOnly {
            for &r in &candidate.early_starts {
                self.cover_early[r] += 1;
            }
        }
        if role != Role::EarlyOnly {
            for &r in &candidate.late_starts {
                self.cover_late[r] += 1;
            }
        }
        self.value += candidate.value[role.index()];
        self.assignment[i] = Some(role);

        self.node(i + 1);

        self.assignment[i] = None;
        self.value -= candidate.value[role.index()];
        if role != Role::EarlyOnly {
            for &r in &candidate.late_starts {
                self.cover_late[r] -= 1;
            }
        }
        if role != Role::LateOnly {
            for &r in &candidate.early_starts {
                self.cover_early[r] -= 1;
            }
        }
        self.spend_start -= delta_start;
        self.spend_late -= delta_late;
        self.slots_left[role.index()] += 1;
    }

    fn record_leaf(&mut self) {
        if self.slots_left != [0, 0, 0] {
            return;
        }
        if self.spend_start < self.model.budget_min {
            return;
        }
        let covered = self
            .model
            .early_races
            .iter()
            .enumerate()
            .all(|(r, row)| self.cover_early[r] >= row.min)
            && self
                .model
                .late_races
                .iter()
                .enumerate()
                .all(|(r, row)| self.cover_late[r] >= row.min);
        if !covered {
            return;
        }
        let improved = match &self.best {
            None => true,
            Some((_, best)) => self.value > *best,
        };
        if improved {
            tracing::debug!(
                event = "new_incumbent",
                objective = self.value,
                nodes = self.nodes,
            );
            self.best = Some((self.assignment.clone(), self.value));
        }
    }
}

/// `result[i][j]`: sum of the `j` largest entries of `values[i..]`,
/// for `j` up to `cap`.
fn suffix_top_sums(values: &[f64], cap: usize) -> Vec<Vec<f64>> {
    let n = values.len();
    let mut result = vec![Vec::new(); n + 1];
    result[n] = vec![0.0];
    let mut buffer: Vec<f64> = Vec::new();
    for i in (0..n).rev() {
        let pos = buffer.partition_point(|&v| v > values[i]);
        buffer.insert(pos, values[i]);
        buffer.truncate(cap);
        let mut sums = Vec::with_capacity(buffer.len() + 1);
        sums.push(0.0);
        for &v in &buffer {
            sums.push(sums[sums.len() - 1] + v);
        }
        result[i] = sums;
    }
    result
}

/// `suffix[r][i]`: candidates at position `i` or later that can still
/// cover race `r` in the given window.
fn cover_suffix(model: &SelectionModel, early: bool) -> Vec<Vec<usize>> {
    let n = model.candidates.len();
    let races = if early {
        model.early_races.len()
    } else {
        model.late_races.len()
    };
    let mut suffix = vec![vec![0usize; n + 1]; races];
    for i in (0..n).rev() {
        let starts = if early {
            &model.candidates[i].early_starts
        } else {
            &model.candidates[i].late_starts
        };
        for r in 0..races {
            suffix[r][i] = suffix[r][i + 1] + usize::from(starts.contains(&r));
        }
    }
    suffix
}
