#![allow(clippy::too_many_arguments)]

//! # Protest - Property-Based Testing for Rust
//!
//! Protest is a property-based testing engine: compose sampling domains,
//! quantify a predicate over them with `ForAll`/`Exists`, and run the
//! resulting property to its first counterexample.
//!
//! Shrinking, size-directed generation, parallel sample evaluation,
//! persistent corpora, CLI test discovery, and pretty-printed reporting are
//! all out of scope here — this crate is the domain algebra, the
//! quantifier tree, and the runner underneath those.
//!
//! ## Quick Start
//!
//! ```rust
//! use protest::domain::DomainExt;
//! use protest::primitives::Int;
//! use protest::property::PropertyBuilder;
//! use protest::test_runner::TestRunner;
//! use protest::value::Env;
//! use protest::rng::PrngHandle;
//!
//! let property = PropertyBuilder::infallible_predicate(|env| {
//!     let x = env.get("x").unwrap().as_int().unwrap();
//!     x + x == 2 * x
//! })
//! .for_all_n("x", Int::new(-1000, 1000).unwrap().erase(), 200)
//! .build();
//!
//! let rng = PrngHandle::new(42);
//! let result = TestRunner::run(&*property, &Env::new(), &rng);
//! assert!(result.passed());
//! ```

pub mod collections;
pub mod config;
pub mod domain;
pub mod error;
pub mod primitives;
pub mod property;
pub mod quantifier;
pub mod rng;
pub mod test_runner;
pub mod value;

pub use config::{TestConfig, DEFAULT_MAX_DEPTH, DEFAULT_N_SAMPLES};
pub use domain::{recursive, AnyDomain, Domain, DomainBinding, DomainExpr, DomainExt, RecSelf, Union};
pub use error::{ConfigError, EvalError, PredicateError};
pub use primitives::{Boolean, Char, Coding, Int, Name, Singleton, Str};
pub use property::PropertyBuilder;
pub use quantifier::{Exists, ForAll, Outcome, Predicate, PropertyNode};
pub use rng::{DefaultRngProvider, Prng, PrngHandle, RngProvider};
pub use test_runner::{PropertyRunResult, RunSummary, TestRunner};
pub use value::{Env, Value, VarName};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = TestConfig::default();
        assert_eq!(cfg.default_n_samples, DEFAULT_N_SAMPLES);
        assert_eq!(cfg.default_max_depth, DEFAULT_MAX_DEPTH);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn public_api_builds_and_runs_a_passing_property() {
        let property = PropertyBuilder::infallible_predicate(|env| {
            env.get("x").unwrap().as_int().unwrap() >= -1_000_000
        })
        .for_all_n("x", Int::new(-10, 10).unwrap().erase(), 50)
        .build();

        let rng = PrngHandle::new(7);
        let result = TestRunner::run(&*property, &Env::new(), &rng);
        assert!(result.passed());
    }

    #[test]
    fn public_api_union_of_primitive_domains() {
        let combined = Boolean::new().erase() | Int::new(0, 3).unwrap().erase();
        let rng = PrngHandle::new(5);
        let samples: Vec<_> = combined.canonical(&rng).take(20).collect();
        assert_eq!(samples.len(), 20);
        assert!(samples.iter().all(|s| s.is_ok()));
    }

    #[test]
    fn public_api_exists_over_exhaustible_domain() {
        let property = PropertyBuilder::infallible_predicate(|env| {
            env.get("x").unwrap().as_bool().unwrap()
        })
        .exists("x", Boolean::new().erase())
        .unwrap()
        .build();

        let rng = PrngHandle::new(1);
        let result = TestRunner::run(&*property, &Env::new(), &rng);
        assert!(result.passed());
    }
}
