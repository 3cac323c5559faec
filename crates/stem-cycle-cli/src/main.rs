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

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use stem_cycle_model::prelude::{
    CandidateLists, Instance, NodeIndex, SolutionRecord, DEFAULT_CANDIDATES,
};
use stem_cycle_solver::engine::config::{SearchConfig, SearchPolicy};
use stem_cycle_solver::engine::sec::StemCycleSearch;
use stem_cycle_solver::eval::objective::InstanceObjective;
use stem_cycle_solver::monitor::budget::SearchBudget;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT | FmtSpan::CLOSE)
        .init();
}

#[derive(Serialize)]
struct RunRecord {
    iteration: usize,
    dimension: usize,
    seed: u64,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    start_length: i64,
    final_length: Option<i64>,
}

/// Uniform random points in a square, TSPLIB-style rounded distances.
fn random_instance(dimension: usize, rng: &mut ChaCha8Rng) -> Instance<i64> {
    let points: Vec<(f64, f64)> = (0..dimension)
        .map(|_| (rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
        .collect();
    Instance::from_euclidean(&points).expect("valid random instance")
}

fn shuffled_start(instance: &Instance<i64>, rng: &mut ChaCha8Rng) -> SolutionRecord<i64> {
    let mut tour: Vec<NodeIndex> = (0..instance.dimension()).map(NodeIndex::new).collect();
    tour.shuffle(rng);
    SolutionRecord::from_tour(instance, tour).expect("shuffled permutation")
}

fn main() {
    enable_tracing();

    let mut args = std::env::args().skip(1);
    let dimension: usize = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(200);
    let runs: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(3);
    let base_seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);

    let mut results: Vec<RunRecord> = Vec::new();
    let mut failures = 0usize;

    for iter in 0..runs {
        let iteration = iter + 1;
        let seed = base_seed + iter as u64;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let instance = random_instance(dimension, &mut rng);
        let candidates = CandidateLists::build(&instance, DEFAULT_CANDIDATES);
        let mut incumbent = shuffled_start(&instance, &mut rng);
        let start_length = incumbent.length();

        tracing::info!(
            "Solving [{}] n={} seed={} start_length={}",
            iteration,
            dimension,
            seed,
            start_length
        );

        let start_ts = Utc::now();
        let t0 = Instant::now();

        let mut objective = InstanceObjective::new(&instance)
            .with_budget(SearchBudget::new().with_time_limit(Duration::from_secs(10)));
        let search = StemCycleSearch::new(SearchConfig::new(SearchPolicy::CandidateRestricted));
        let outcome = search.run(&mut objective, &candidates, &mut rng, &mut incumbent);

        let runtime = t0.elapsed();
        let end_ts = Utc::now();

        let final_length = match outcome {
            Ok(()) => {
                tracing::info!(
                    "Finished [{}]: length={} ({} evaluations, runtime={:?})",
                    iteration,
                    incumbent.length(),
                    objective.evaluations(),
                    runtime
                );
                Some(incumbent.length())
            }
            Err(e) => {
                failures += 1;
                tracing::error!("Failed [{}]: {} (runtime={:?})", iteration, e, runtime);
                None
            }
        };

        results.push(RunRecord {
            iteration,
            dimension,
            seed,
            start_ts,
            end_ts,
            runtime_ms: runtime.as_millis(),
            start_length,
            final_length,
        });
    }

    let out_path = PathBuf::from("stem_cycle_results.json");
    match File::create(&out_path).and_then(|mut f| {
        let json = serde_json::to_string_pretty(&results).expect("serialize results");
        f.write_all(json.as_bytes())
    }) {
        Ok(()) => {
            tracing::info!(
                "Wrote {} run record(s) to {}",
                results.len(),
                out_path.display()
            );
        }
        Err(e) => {
            tracing::error!("Failed to write results to {}: {}", out_path.display(), e);
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
