//! Thin runner-invocation surface.
//!
//! File/module discovery and reflective collection are explicitly out of
//! scope: there's no mechanical way to scan an arbitrary Rust source tree
//! for property-tree values the way a dynamic language's module
//! introspection can. What's here is the part that *is* in scope: a
//! minimal argument surface and the `Candidate` interface a real collector
//! (built against this engine, but living outside it) would implement to
//! hand properties to [`protest::test_runner::TestRunner`].

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use protest::rng::PrngHandle;
use protest::quantifier::PropertyNode;
use protest::test_runner::{RunSummary, TestRunner};
use protest::value::Env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "protest")]
#[command(about = "Run Protest properties discovered by a Candidate collector", long_about = None)]
#[command(version)]
struct Cli {
    /// Files or directories to search for properties. Collection itself is
    /// left to a `Candidate` implementation; this binary only reports what
    /// it's handed.
    paths: Vec<PathBuf>,

    /// Seed to replay with (random if omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Print per-property progress in addition to the final summary.
    #[arg(short, long)]
    verbose: bool,
}

/// A source a collector recognises as holding one named property.
///
/// `protest-cli` has no file/module discovery of its own; this trait is the
/// seam an embedding collector implements, e.g. by registering properties
/// through `inventory` or a build-time macro, neither of which this crate
/// assumes.
pub trait Candidate {
    /// Whether this candidate wants to run a discovered item at `path`.
    fn wants_to_run_file(&self, path: &std::path::Path) -> bool;

    /// Builds and returns the property tree root for this candidate.
    fn build(&self) -> std::rc::Rc<dyn PropertyNode>;

    /// Display name used in per-property reporting.
    fn name(&self) -> &str;
}

/// Runs every candidate `collector` recognises under `paths`, printing a
/// per-property verdict (when `verbose`) and a final [`RunSummary`].
/// Returns the process exit code: non-zero if any counterexample or
/// predicate error was found.
pub fn run_candidates(
    collector: &[Box<dyn Candidate>],
    paths: &[PathBuf],
    seed: u64,
    verbose: bool,
) -> (RunSummary, i32) {
    let mut summary = RunSummary::default();
    for candidate in collector {
        let recognised = paths.is_empty()
            || paths
                .iter()
                .any(|p| candidate.wants_to_run_file(p));
        if !recognised {
            continue;
        }
        let root = candidate.build();
        let rng = PrngHandle::new(seed);
        let result = TestRunner::run(&*root, &Env::new(), &rng);
        if verbose {
            if result.passed() {
                println!("{} {}", candidate.name().bold(), "PASSED".green());
            } else {
                println!("{} {}", candidate.name().bold(), "FAILED".red());
            }
        }
        summary.record(&result);
    }
    let exit_code = if summary.all_passed() { 0 } else { 1 };
    (summary, exit_code)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(|| PrngHandle::from_entropy().get_seed());

    // No collector is wired up by default: this binary alone cannot find
    // properties in arbitrary source files (see the module doc comment).
    // An embedding project supplies its own `Vec<Box<dyn Candidate>>`.
    let collector: Vec<Box<dyn Candidate>> = Vec::new();

    let (summary, exit_code) = run_candidates(&collector, &cli.paths, seed, cli.verbose);
    TestRunner::print_summary(&summary);
    println!("protest: seed {} (pass --seed {} to replay)", seed, seed);

    std::process::exit(exit_code);
}
