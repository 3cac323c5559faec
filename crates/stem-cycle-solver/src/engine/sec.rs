// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::core::numeric::TourNumeric;
use crate::engine::config::{SearchConfig, SearchPolicy};
use crate::engine::err::{RootListExhaustedError, SearchError};
use crate::eval::closure::{materialize_and_maybe_accept, trial_closure_gain};
use crate::eval::objective::Objective;
use crate::search::apply::{apply_cycle_move, apply_stem_move};
use crate::search::context::SecContext;
use crate::search::scan::{find_best_on_cycle, find_best_on_stem};
use fixedbitset::FixedBitSet;
use rand::Rng;
use stem_cycle_model::prelude::{CandidateLists, NodeIndex, SolutionRecord};

fn draw_root<R: Rng>(
    roots: &mut Vec<NodeIndex>,
    rng: &mut R,
) -> Result<NodeIndex, RootListExhaustedError> {
    if roots.is_empty() {
        return Err(RootListExhaustedError::new());
    }
    let at = rng.random_range(0..roots.len());
    Ok(roots.swap_remove(at))
}

fn full_root_list(dimension: usize) -> Vec<NodeIndex> {
    (0..dimension).map(NodeIndex::new).collect()
}

/// The stem-and-cycle engine: owns the tuning configuration and drives the
/// nested search phases over a caller-supplied incumbent.
#[derive(Debug, Clone, Default)]
pub struct StemCycleSearch {
    config: SearchConfig,
}

impl StemCycleSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the configured search policy, leaving the best tour found in
    /// `incumbent`. The incumbent's length never increases.
    #[tracing::instrument(level = "debug", skip_all, fields(policy = ?self.config.policy(), dimension = objective.dimension()))]
    pub fn run<T, O, R>(
        &self,
        objective: &mut O,
        candidates: &CandidateLists,
        rng: &mut R,
        incumbent: &mut SolutionRecord<T>,
    ) -> Result<(), SearchError>
    where
        T: TourNumeric,
        O: Objective<T>,
        R: Rng,
    {
        debug_assert_eq!(objective.dimension(), incumbent.tour().len());
        let mut ctx = SecContext::new(objective.dimension());
        match self.config.policy() {
            SearchPolicy::RootVarying => {
                self.run_root_varying(&mut ctx, objective, rng, incumbent)?;
            }
            SearchPolicy::CandidateRestricted => {
                self.run_candidate_restricted(&mut ctx, objective, candidates, rng, incumbent)?;
            }
        }
        tracing::debug!(length = %incumbent.length(), "search finished");
        Ok(())
    }

    /// One root-fixed descent of at most `level` moves.
    ///
    /// Every move picks the better of the cycle and stem scans (ties favor
    /// the cycle), applies it, and re-estimates the closed tour length as
    /// `base - accumulated gain - trial closure gain`. Only when the
    /// estimate beats the incumbent is the tour materialized and the
    /// authoritative evaluation spent. Returns whether the incumbent
    /// improved.
    fn run_partial<T, O>(
        &self,
        ctx: &mut SecContext<T>,
        objective: &mut O,
        incumbent: &mut SolutionRecord<T>,
        base_length: T,
        level: usize,
        mut touched: Option<&mut Vec<NodeIndex>>,
    ) -> Result<bool, SearchError>
    where
        T: TourNumeric,
        O: Objective<T>,
    {
        ctx.clear_level();
        let mut improved = false;
        for _ in 0..level {
            if objective.should_terminate() {
                break;
            }
            let on_cycle = find_best_on_cycle(ctx, &*objective)?;
            let on_stem = find_best_on_stem(ctx, &*objective)?;
            let (at, removed) = match (on_cycle, on_stem) {
                (None, None) => break,
                (Some(c), None) => {
                    apply_cycle_move(ctx, &c)?;
                    (c.at, c.removed)
                }
                (None, Some(s)) => {
                    apply_stem_move(ctx, &s)?;
                    (s.at, s.removed)
                }
                (Some(c), Some(s)) => {
                    if c.gain >= s.gain {
                        apply_cycle_move(ctx, &c)?;
                        (c.at, c.removed)
                    } else {
                        apply_stem_move(ctx, &s)?;
                        (s.at, s.removed)
                    }
                }
            };
            if let Some(list) = touched.as_mut() {
                list.push(at);
                list.push(removed);
            }
            let closure = trial_closure_gain(ctx, &*objective)?;
            let estimate = base_length - ctx.sum_gain() - closure;
            if estimate < incumbent.length()
                && materialize_and_maybe_accept(ctx, objective, incumbent)?
            {
                improved = true;
            }
        }
        Ok(improved)
    }

    /// Root-varying search: random roots off the root list, one partial
    /// descent each, until at most `root_list_floor` untried roots remain
    /// or the budget runs out. Improvements refill the list and re-seed the
    /// structure from the incumbent. Returns the untried roots.
    fn run_root_varying<T, O, R>(
        &self,
        ctx: &mut SecContext<T>,
        objective: &mut O,
        rng: &mut R,
        incumbent: &mut SolutionRecord<T>,
    ) -> Result<Vec<NodeIndex>, SearchError>
    where
        T: TourNumeric,
        O: Objective<T>,
        R: Rng,
    {
        let n = objective.dimension();
        let level = self.config.partial_level(n);
        let floor = self.config.root_list_floor(n);
        ctx.reset_from_tour(incumbent.tour());
        let mut working_length = incumbent.length();
        let mut roots = full_root_list(n);
        while roots.len() > floor && !objective.should_terminate() {
            let root = draw_root(&mut roots, rng)?;
            ctx.select_root(root);
            let improved =
                self.run_partial(ctx, objective, incumbent, working_length, level, None)?;
            let closure = ctx.close_in_place(&*objective)?;
            working_length = working_length - ctx.sum_gain() - closure;
            if improved {
                tracing::debug!(length = %incumbent.length(), "root list refilled");
                roots = full_root_list(n);
                ctx.reset_from_tour(incumbent.tour());
                working_length = incumbent.length();
            }
        }
        Ok(roots)
    }

    /// Candidate-restricted search: a root-varying warm-up, then shallow
    /// descents over the untried roots recording which nodes lost an edge,
    /// and finally deep descents from the nearest-neighbor candidates of
    /// those nodes, tracked against a loop-local best buffer.
    fn run_candidate_restricted<T, O, R>(
        &self,
        ctx: &mut SecContext<T>,
        objective: &mut O,
        candidates: &CandidateLists,
        rng: &mut R,
        incumbent: &mut SolutionRecord<T>,
    ) -> Result<(), SearchError>
    where
        T: TourNumeric,
        O: Objective<T>,
        R: Rng,
    {
        let n = objective.dimension();
        let remaining = self.run_root_varying(ctx, objective, rng, incumbent)?;

        ctx.reset_from_tour(incumbent.tour());
        let mut working_length = incumbent.length();
        let mut touched: Vec<NodeIndex> = Vec::new();
        for root in remaining {
            if objective.should_terminate() {
                break;
            }
            ctx.select_root(root);
            let improved = self.run_partial(
                ctx,
                objective,
                incumbent,
                working_length,
                self.config.shallow_level(),
                Some(&mut touched),
            )?;
            let closure = ctx.close_in_place(&*objective)?;
            working_length = working_length - ctx.sum_gain() - closure;
            if improved {
                ctx.reset_from_tour(incumbent.tour());
                working_length = incumbent.length();
            }
        }

        let mut seen = FixedBitSet::with_capacity(n);
        let mut restricted: Vec<NodeIndex> = Vec::new();
        for &node in &touched {
            for &candidate in candidates.neighbors(node) {
                if !seen.contains(candidate.get()) {
                    seen.insert(candidate.get());
                    restricted.push(candidate);
                }
            }
        }
        tracing::debug!(
            touched = touched.len(),
            restricted = restricted.len(),
            "deep pass root list built"
        );

        let mut local_best = incumbent.clone();
        let deep = self.config.deep_level(n);
        ctx.reset_from_tour(local_best.tour());
        let mut working_length = local_best.length();
        for root in restricted {
            if objective.should_terminate() {
                break;
            }
            ctx.select_root(root);
            let improved =
                self.run_partial(ctx, objective, &mut local_best, working_length, deep, None)?;
            let closure = ctx.close_in_place(&*objective)?;
            working_length = working_length - ctx.sum_gain() - closure;
            if improved {
                ctx.reset_from_tour(local_best.tour());
                working_length = local_best.length();
            }
        }
        if local_best.length() < incumbent.length() {
            incumbent.install(local_best.tour(), local_best.length());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::objective::InstanceObjective;
    use crate::monitor::budget::SearchBudget;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use stem_cycle_model::prelude::Instance;

    fn nodes(ids: &[usize]) -> Vec<NodeIndex> {
        ids.iter().copied().map(NodeIndex::new).collect()
    }

    fn octagon() -> Instance<i64> {
        Instance::from_euclidean(&[
            (0.0, 0.0),
            (30.0, -10.0),
            (60.0, 0.0),
            (75.0, 30.0),
            (60.0, 60.0),
            (30.0, 70.0),
            (0.0, 60.0),
            (-15.0, 30.0),
        ])
        .unwrap()
    }

    fn scrambled_octagon_start(inst: &Instance<i64>) -> SolutionRecord<i64> {
        SolutionRecord::from_tour(inst, nodes(&[0, 4, 1, 5, 2, 6, 3, 7])).unwrap()
    }

    #[test]
    fn test_root_varying_stays_within_bounds() {
        let inst = octagon();
        let optimal = inst.tour_length(&nodes(&[0, 1, 2, 3, 4, 5, 6, 7]));
        let mut incumbent = scrambled_octagon_start(&inst);
        let start_length = incumbent.length();
        let candidates = CandidateLists::build(&inst, 3);
        let mut objective = InstanceObjective::new(&inst);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let search = StemCycleSearch::new(SearchConfig::new(SearchPolicy::RootVarying));
        search
            .run(&mut objective, &candidates, &mut rng, &mut incumbent)
            .unwrap();
        assert!(incumbent.length() <= start_length);
        assert!(incumbent.length() >= optimal);
    }

    #[test]
    fn test_candidate_restricted_stays_within_bounds() {
        let inst = octagon();
        let optimal = inst.tour_length(&nodes(&[0, 1, 2, 3, 4, 5, 6, 7]));
        let mut incumbent = scrambled_octagon_start(&inst);
        let start_length = incumbent.length();
        let candidates = CandidateLists::build(&inst, 3);
        let mut objective = InstanceObjective::new(&inst);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let search = StemCycleSearch::new(SearchConfig::new(SearchPolicy::CandidateRestricted));
        search
            .run(&mut objective, &candidates, &mut rng, &mut incumbent)
            .unwrap();
        assert!(incumbent.length() <= start_length);
        assert!(incumbent.length() >= optimal);
    }

    #[test]
    fn test_exhausted_budget_changes_nothing() {
        let inst = octagon();
        let mut incumbent = scrambled_octagon_start(&inst);
        let before = incumbent.clone();
        let candidates = CandidateLists::build(&inst, 3);
        let mut objective = InstanceObjective::new(&inst)
            .with_budget(SearchBudget::new().with_max_evaluations(0));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let search = StemCycleSearch::new(SearchConfig::new(SearchPolicy::RootVarying));
        search
            .run(&mut objective, &candidates, &mut rng, &mut incumbent)
            .unwrap();
        assert_eq!(incumbent, before);
        assert_eq!(objective.evaluations(), 0);
    }

    #[test]
    fn test_incumbent_is_monotone_across_runs() {
        let inst = octagon();
        let mut incumbent = scrambled_octagon_start(&inst);
        let candidates = CandidateLists::build(&inst, 3);
        let search = StemCycleSearch::new(SearchConfig::new(SearchPolicy::RootVarying));
        let mut previous = incumbent.length();
        for seed in 0..4 {
            let mut objective = InstanceObjective::new(&inst);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            search
                .run(&mut objective, &candidates, &mut rng, &mut incumbent)
                .unwrap();
            assert!(incumbent.length() <= previous);
            previous = incumbent.length();
        }
    }

    #[test]
    fn test_five_node_canonical_start_stays_within_bounds() {
        // Hull order is 0-2-1-3-4, so the canonical tour crosses itself.
        let inst = Instance::<i64>::from_euclidean(&[
            (0.0, 0.0),
            (50.0, 30.0),
            (40.0, 0.0),
            (20.0, 50.0),
            (-10.0, 30.0),
        ])
        .unwrap();
        let optimal = inst.tour_length(&nodes(&[0, 2, 1, 3, 4]));
        let mut incumbent = SolutionRecord::canonical(&inst);
        let canonical_length = incumbent.length();
        assert!(canonical_length > optimal);
        let candidates = CandidateLists::build(&inst, 3);
        let mut objective = InstanceObjective::new(&inst);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let search = StemCycleSearch::new(SearchConfig::new(SearchPolicy::RootVarying));
        search
            .run(&mut objective, &candidates, &mut rng, &mut incumbent)
            .unwrap();
        assert!(incumbent.length() <= canonical_length);
        assert!(incumbent.length() >= optimal);
    }

    #[test]
    fn test_seeded_runs_keep_the_solution_valid() {
        let policies = [SearchPolicy::RootVarying, SearchPolicy::CandidateRestricted];
        for seed in 0..6 {
            for policy in policies {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let points: Vec<(f64, f64)> = (0..12)
                    .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
                    .collect();
                let inst = Instance::<i64>::from_euclidean(&points).unwrap();
                let candidates = CandidateLists::build(&inst, 5);
                let mut incumbent =
                    SolutionRecord::from_tour(&inst, nodes(&[3, 7, 1, 9, 0, 5, 11, 2, 8, 4, 10, 6]))
                        .unwrap();
                let start_length = incumbent.length();
                let mut objective = InstanceObjective::new(&inst);
                let search = StemCycleSearch::new(SearchConfig::new(policy));
                search
                    .run(&mut objective, &candidates, &mut rng, &mut incumbent)
                    .unwrap();
                assert!(incumbent.length() <= start_length);
                assert_eq!(incumbent.length(), inst.tour_length(incumbent.tour()));
                let mut seen = vec![false; 12];
                for &node in incumbent.tour() {
                    assert!(!seen[node.get()]);
                    seen[node.get()] = true;
                }
            }
        }
    }

    #[test]
    fn test_tiny_instances_run_without_error() {
        for n in 3..=6usize {
            let points: Vec<(f64, f64)> = (0..n)
                .map(|i| {
                    let angle = i as f64 / n as f64 * std::f64::consts::TAU;
                    (100.0 * angle.cos(), 100.0 * angle.sin())
                })
                .collect();
            let inst = Instance::<i64>::from_euclidean(&points).unwrap();
            let candidates = CandidateLists::build(&inst, 2);
            for policy in [SearchPolicy::RootVarying, SearchPolicy::CandidateRestricted] {
                let mut incumbent = SolutionRecord::canonical(&inst);
                let mut objective = InstanceObjective::new(&inst);
                let mut rng = ChaCha8Rng::seed_from_u64(n as u64);
                let search = StemCycleSearch::new(SearchConfig::new(policy));
                search
                    .run(&mut objective, &candidates, &mut rng, &mut incumbent)
                    .unwrap();
                assert_eq!(incumbent.tour().len(), n);
            }
        }
    }

    #[test]
    fn test_draw_root_errors_on_empty_list() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut roots: Vec<NodeIndex> = Vec::new();
        assert!(draw_root(&mut roots, &mut rng).is_err());
    }

    #[test]
    fn test_draw_root_removes_the_drawn_node() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut roots = nodes(&[0, 1, 2, 3]);
        let drawn = draw_root(&mut roots, &mut rng).unwrap();
        assert_eq!(roots.len(), 3);
        assert!(!roots.contains(&drawn));
    }
}
