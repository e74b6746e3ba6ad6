//! Error taxonomy for domain construction, predicate evaluation, and the
//! quantifier tree.
//!
//! Three distinct kinds: "configuration error" (raised at construction),
//! "predicate exception" (wrapped and surfaced as a first-class outcome,
//! never a panic), and "fatal evaluation error" (shadowing, escaped
//! recursion-depth signal).

use std::fmt;

/// Raised at domain or quantifier-node construction time: invalid bounds,
/// unknown character coding, `Exists` over a non-`Predicate` child or a
/// non-exhaustible domain, a `DomainExpr` with zero bound variables, a
/// decorator binding zero or more than one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLengthBounds { min_len: usize, max_len: usize },
    /// `Name`'s minimum length must be at least one — identifiers cannot be
    /// empty ("no identifier names with fewer than one character").
    NameMinLenTooSmall { min_len: usize },
    UnknownCharCoding { coding: String },
    ExistsOverNonPredicate,
    ExistsOverNonExhaustibleDomain,
    DomainExprWithNoBoundVars,
    WrongBindingCount { count: usize },
    IsExhaustibleHintConflict,
    /// `TestConfig` validation: iteration/depth knobs must be positive.
    InvalidIterations(usize),
    InvalidMaxDepth(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLengthBounds { min_len, max_len } => write!(
                f,
                "invalid length bounds: min_len ({}) must be <= max_len ({})",
                min_len, max_len
            ),
            ConfigError::NameMinLenTooSmall { min_len } => write!(
                f,
                "no identifier names with fewer than one character (min_len = {})",
                min_len
            ),
            ConfigError::UnknownCharCoding { coding } => {
                write!(f, "unknown character coding: {:?}", coding)
            }
            ConfigError::ExistsOverNonPredicate => {
                write!(f, "Exists can only quantify directly over a Predicate")
            }
            ConfigError::ExistsOverNonExhaustibleDomain => {
                write!(f, "Exists requires an exhaustible domain")
            }
            ConfigError::DomainExprWithNoBoundVars => {
                write!(f, "DomainExpr must bind at least one free variable")
            }
            ConfigError::WrongBindingCount { count } => write!(
                f,
                "quantifier decorator must bind exactly one variable, got {}",
                count
            ),
            ConfigError::IsExhaustibleHintConflict => write!(
                f,
                "explicit is_exhaustible hint conflicts with the domain's own flag"
            ),
            ConfigError::InvalidIterations(n) => {
                write!(f, "invalid iterations count: {} (must be > 0)", n)
            }
            ConfigError::InvalidMaxDepth(n) => {
                write!(f, "invalid recursion max_depth: {} (must be > 0)", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// An exception thrown by a predicate during evaluation (spec's
/// `PredicateError(exc, env)`). The env is attached by the quantifier node
/// that caught it, not by the predicate itself.
#[derive(Debug, Clone)]
pub struct PredicateError {
    pub message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PredicateError {}

/// Fatal faults raised during property-tree evaluation that are not part of
/// the predicate/counterexample vocabulary: a shadowed variable, or a
/// recursion-depth signal that escaped every `Union` alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    ShadowedVariable { name: String },
    RecursionDepthExceeded,
    /// An `Exists` bound to a `DomainExpr` reduced, at evaluation time, to a
    /// domain that isn't exhaustible. A `Fixed` binding is caught earlier as
    /// `ConfigError::ExistsOverNonExhaustibleDomain`; a dependent one can
    /// only be checked once its free variables are resolved against `Env`.
    ExistsOverNonExhaustibleDomain { var: String },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::ShadowedVariable { name } => {
                write!(f, "variable `{}` is already bound in this environment", name)
            }
            EvalError::RecursionDepthExceeded => write!(
                f,
                "recursion depth exceeded and no union alternative could absorb it"
            ),
            EvalError::ExistsOverNonExhaustibleDomain { var } => write!(
                f,
                "Exists over `{}` reduced to a non-exhaustible domain",
                var
            ),
        }
    }
}

impl std::error::Error for EvalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_mentions_field_values() {
        let e = ConfigError::NameMinLenTooSmall { min_len: 0 };
        assert!(format!("{}", e).contains("fewer than one character"));
    }

    #[test]
    fn eval_error_display_names_the_variable() {
        let e = EvalError::ShadowedVariable { name: "x".into() };
        assert!(format!("{}", e).contains("x"));
    }
}
