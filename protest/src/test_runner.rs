//! Drives a property's outcome stream to completion and reports the result.
//!
//! Kept as a static-utility struct plus a plain `println!`-based reporter,
//! matching this codebase's existing `TestRunner`/`is_verbose_output`
//! convention rather than introducing a logging crate.

use crate::quantifier::{Outcome, PropertyNode};
use crate::rng::PrngHandle;
use crate::value::Env;
use std::fmt;

/// What running one property to completion produced: the first failure
/// encountered (if any stopped the stream early) plus how many outcomes
/// were observed before it.
#[derive(Debug)]
pub struct PropertyRunResult {
    pub samples_checked: usize,
    pub outcome: Outcome,
}

impl PropertyRunResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Aggregate counters across every property a run evaluated.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub properties_run: usize,
    pub properties_passed: usize,
    pub samples_checked: usize,
    pub counterexamples: usize,
    pub predicate_errors: usize,
    pub eval_errors: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: &PropertyRunResult) {
        self.properties_run += 1;
        self.samples_checked += result.samples_checked;
        match &result.outcome {
            Outcome::Ok => self.properties_passed += 1,
            Outcome::CounterExample(_) => self.counterexamples += 1,
            Outcome::PredicateError { .. } => self.predicate_errors += 1,
            Outcome::Error(_) => self.eval_errors += 1,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.properties_passed == self.properties_run
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} properties passed, {} samples checked, {} counterexamples, {} predicate errors, {} eval errors",
            self.properties_passed,
            self.properties_run,
            self.samples_checked,
            self.counterexamples,
            self.predicate_errors,
            self.eval_errors,
        )
    }
}

/// Static utility that evaluates a property's outcome stream against an
/// initial (typically empty) environment and a seeded `PrngHandle`,
/// stopping at the first non-`Ok` outcome.
pub struct TestRunner;

impl TestRunner {
    /// Runs `root` to its first failure (or exhaustion), returning how many
    /// samples were checked and what stopped the stream.
    pub fn run(root: &dyn PropertyNode, env: &Env, rng: &PrngHandle) -> PropertyRunResult {
        let mut samples_checked = 0;
        let mut last = Outcome::Ok;
        for outcome in root.evaluate(env, rng) {
            samples_checked += 1;
            let is_failure = outcome.is_failure();
            last = outcome;
            if is_failure {
                break;
            }
        }
        PropertyRunResult {
            samples_checked,
            outcome: last,
        }
    }

    /// Runs `root` with a seed, printing a one-line verdict the way this
    /// codebase's other `println!`-based reporting does. Returns the result
    /// so callers can fold it into a `RunSummary`.
    pub fn run_and_report(name: &str, root: &dyn PropertyNode, seed: u64) -> PropertyRunResult {
        let rng = PrngHandle::new(seed);
        let result = Self::run(root, &Env::new(), &rng);
        if Self::is_verbose_output() {
            match &result.outcome {
                Outcome::Ok => println!(
                    "protest: {} PASSED after {} samples (seed: {})",
                    name, result.samples_checked, seed
                ),
                Outcome::CounterExample(env) => println!(
                    "protest: {} FAILED after {} samples (seed: {}): counterexample {}",
                    name, result.samples_checked, seed, env
                ),
                Outcome::PredicateError { error, env } => println!(
                    "protest: {} FAILED after {} samples (seed: {}): predicate raised {} at {}",
                    name, result.samples_checked, seed, error, env
                ),
                Outcome::Error(err) => println!(
                    "protest: {} ABORTED after {} samples (seed: {}): {}",
                    name, result.samples_checked, seed, err
                ),
            }
        }
        result
    }

    /// Whether we're running under `cargo test`.
    pub fn is_cargo_test() -> bool {
        std::env::var("CARGO").is_ok() || std::env::var("CARGO_PKG_NAME").is_ok()
    }

    /// Whether verbose output was requested on the command line.
    pub fn is_verbose_output() -> bool {
        std::env::args().any(|arg| arg == "--nocapture" || arg == "-v" || arg == "--verbose")
    }

    pub fn print_summary(summary: &RunSummary) {
        println!("protest: {}", summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainExt;
    use crate::primitives::{Boolean, Int};
    use crate::property::PropertyBuilder;

    #[test]
    fn run_reports_pass_for_a_true_predicate() {
        let root = PropertyBuilder::infallible_predicate(|_| true)
            .for_all_n("x", Boolean::new().erase(), 10)
            .build();
        let rng = PrngHandle::new(1);
        let result = TestRunner::run(&*root, &Env::new(), &rng);
        assert!(result.passed());
    }

    #[test]
    fn run_stops_at_first_counterexample() {
        let root = PropertyBuilder::infallible_predicate(|env| env.get("x").unwrap().as_int().unwrap() >= 0)
            .for_all_n("x", Int::new(-100, 100).unwrap().erase(), 500)
            .build();
        let rng = PrngHandle::new(3);
        let result = TestRunner::run(&*root, &Env::new(), &rng);
        assert!(!result.passed());
        assert!(result.samples_checked <= 500);
    }

    #[test]
    fn run_summary_tallies_across_properties() {
        let mut summary = RunSummary::default();
        let passing = PropertyBuilder::infallible_predicate(|_| true)
            .for_all_n("x", Boolean::new().erase(), 5)
            .build();
        let rng = PrngHandle::new(1);
        summary.record(&TestRunner::run(&*passing, &Env::new(), &rng));

        let failing = PropertyBuilder::infallible_predicate(|_| false)
            .for_all_n("y", Boolean::new().erase(), 5)
            .build();
        summary.record(&TestRunner::run(&*failing, &Env::new(), &rng));

        assert_eq!(summary.properties_run, 2);
        assert_eq!(summary.properties_passed, 1);
        assert_eq!(summary.counterexamples, 1);
        assert!(!summary.all_passed());
    }
}
