//! The fluent builder surface over the quantifier tree.
//!
//! Quantifiers stack innermost-first: start from `PropertyBuilder::predicate(...)`,
//! then each `.for_all(...)`/`.exists(...)` call wraps the previous node one
//! level out, mirroring how nested decorators read outermost-first around a
//! predicate body.

use crate::config::DEFAULT_N_SAMPLES;
use crate::domain::DomainBinding;
use crate::error::{ConfigError, PredicateError};
use crate::quantifier::{Exists, ForAll, Predicate, PropertyNode};
use crate::value::Env;
use std::rc::Rc;

enum Node {
    Predicate(Rc<Predicate>),
    Tree(Rc<dyn PropertyNode>),
}

impl Node {
    fn as_tree(&self) -> Rc<dyn PropertyNode> {
        match self {
            Node::Predicate(p) => p.clone() as Rc<dyn PropertyNode>,
            Node::Tree(t) => t.clone(),
        }
    }
}

/// A property under construction. Build the leaf predicate first, then
/// layer quantifiers around it with `.for_all`/`.exists`, and call
/// `.build()` to get the root node a runner can evaluate.
pub struct PropertyBuilder {
    node: Node,
}

impl PropertyBuilder {
    /// Starts a new property from its leaf predicate.
    pub fn predicate(f: impl Fn(&Env) -> Result<bool, PredicateError> + 'static) -> Self {
        Self {
            node: Node::Predicate(Rc::new(Predicate::new(f))),
        }
    }

    /// Convenience for predicates that can't fail: wraps the closure's
    /// `bool` result as always-`Ok`.
    pub fn infallible_predicate(f: impl Fn(&Env) -> bool + 'static) -> Self {
        Self::predicate(move |env| Ok(f(env)))
    }

    /// Wraps the current node in a `ForAll` over `domain`, using the engine
    /// default sample count for non-exhaustible domains.
    pub fn for_all(self, var: impl Into<String>, domain: impl Into<DomainBinding>) -> Self {
        self.for_all_n(var, domain, DEFAULT_N_SAMPLES)
    }

    /// Like `.for_all`, with an explicit sample count.
    pub fn for_all_n(
        self,
        var: impl Into<String>,
        domain: impl Into<DomainBinding>,
        n_samples: usize,
    ) -> Self {
        let child = self.node.as_tree();
        Self {
            node: Node::Tree(Rc::new(ForAll::new(var, domain, child, n_samples))),
        }
    }

    /// Wraps the current node in an `Exists`. Fails with
    /// `ConfigError::ExistsOverNonPredicate` unless this is called directly
    /// on a bare `.predicate(...)` — `Exists` cannot quantify over a
    /// sub-tree that itself contains quantifiers.
    ///
    /// A domain bound directly (not via a `DomainExpr`) is checked for
    /// exhaustibility right here, at construction: there's no reason to
    /// wait for evaluation when the answer is already known. A dependent
    /// domain can only be checked once its free variables are resolved
    /// against an `Env`, so that case surfaces as
    /// `EvalError::ExistsOverNonExhaustibleDomain` instead, at evaluation
    /// time (see `Exists::evaluate`).
    pub fn exists(
        self,
        var: impl Into<String>,
        domain: impl Into<DomainBinding>,
    ) -> Result<Self, ConfigError> {
        let domain = domain.into();
        if let DomainBinding::Fixed(d) = &domain {
            if !d.is_exhaustible() {
                return Err(ConfigError::ExistsOverNonExhaustibleDomain);
            }
        }
        match self.node {
            Node::Predicate(p) => Ok(Self {
                node: Node::Tree(Rc::new(Exists::new(var, domain, p))),
            }),
            Node::Tree(_) => Err(ConfigError::ExistsOverNonPredicate),
        }
    }

    /// Finishes construction, producing the root a runner can evaluate.
    pub fn build(self) -> Rc<dyn PropertyNode> {
        self.node.as_tree()
    }
}
