//! The property-quantifier tree: `Predicate`, `ForAll`, `Exists`, and the
//! `Outcome` each evaluation step yields.

use crate::domain::DomainBinding;
use crate::error::{EvalError, PredicateError};
use crate::rng::PrngHandle;
use crate::value::Env;
use std::rc::Rc;

/// What a single evaluation step of a property node produced.
///
/// Beyond pass / counterexample / predicate exception, there's a fourth
/// case, `Error`, for faults outside that vocabulary — a shadowed variable
/// caught at construction time doesn't reach here, but a recursion-depth
/// signal that escapes every `Union` alternative does, and it surfaces as a
/// terminal stream item rather than a panic.
#[derive(Debug, Clone)]
pub enum Outcome {
    Ok,
    CounterExample(Env),
    PredicateError { error: PredicateError, env: Env },
    Error(EvalError),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_ok()
    }
}

/// A node in the property tree: `Predicate`, `ForAll`, or `Exists`.
pub trait PropertyNode {
    /// Evaluates this node against the bindings accumulated so far,
    /// producing a (possibly infinite) stream of outcomes.
    fn evaluate(&self, env: &Env, rng: &PrngHandle) -> Box<dyn Iterator<Item = Outcome>>;
}

/// A leaf predicate: a boolean check over the accumulated environment.
/// Exceptions raised inside the closure are the caller's responsibility to
/// convert into a `PredicateError` before it escapes — in Rust this means
/// the closure itself returns `Result<bool, PredicateError>` rather than
/// panicking.
pub struct Predicate {
    f: Rc<dyn Fn(&Env) -> Result<bool, PredicateError>>,
}

impl Predicate {
    pub fn new(f: impl Fn(&Env) -> Result<bool, PredicateError> + 'static) -> Self {
        Self { f: Rc::new(f) }
    }
}

impl PropertyNode for Predicate {
    fn evaluate(&self, env: &Env, _rng: &PrngHandle) -> Box<dyn Iterator<Item = Outcome>> {
        let outcome = match (self.f)(env) {
            Ok(true) => Outcome::Ok,
            Ok(false) => Outcome::CounterExample(env.clone()),
            Err(error) => Outcome::PredicateError {
                error,
                env: env.clone(),
            },
        };
        Box::new(std::iter::once(outcome))
    }
}

/// `ForAll(var, domain, child, n_samples)`: binds `var` to each of up to
/// `n_samples` draws (or every value, if the domain is exhaustible) and
/// streams the child's outcome for each one, short-circuiting on the first
/// failure.
pub struct ForAll {
    var: String,
    domain: DomainBinding,
    child: Rc<dyn PropertyNode>,
    n_samples: usize,
}

impl ForAll {
    pub fn new(
        var: impl Into<String>,
        domain: impl Into<DomainBinding>,
        child: Rc<dyn PropertyNode>,
        n_samples: usize,
    ) -> Self {
        Self {
            var: var.into(),
            domain: domain.into(),
            child,
            n_samples,
        }
    }
}

impl PropertyNode for ForAll {
    fn evaluate(&self, env: &Env, rng: &PrngHandle) -> Box<dyn Iterator<Item = Outcome>> {
        if env.contains(&self.var) {
            let err = EvalError::ShadowedVariable {
                name: self.var.clone(),
            };
            return Box::new(std::iter::once(Outcome::Error(err)));
        }

        let domain = self.domain.reduce(env);
        let var = self.var.clone();
        let child = self.child.clone();
        let rng = rng.clone();
        let env = env.clone();

        if domain.is_exhaustible() {
            let values = domain
                .exhaustive()
                .expect("is_exhaustible() true implies exhaustive() is Some");
            Box::new(values.flat_map(move |v| {
                let bound_env = env.extended(var.clone(), v);
                child.evaluate(&bound_env, &rng).collect::<Vec<_>>()
            }))
        } else {
            let n_samples = self.n_samples;
            let mut canonical = domain.canonical(&rng);
            Box::new(
                std::iter::from_fn(move || canonical.next())
                    .take(n_samples)
                    .flat_map(move |draw| -> Box<dyn Iterator<Item = Outcome>> {
                        match draw {
                            Ok(v) => {
                                let bound_env = env.extended(var.clone(), v);
                                Box::new(child.evaluate(&bound_env, &rng).collect::<Vec<_>>().into_iter())
                            }
                            Err(_) => Box::new(std::iter::once(Outcome::Error(
                                EvalError::RecursionDepthExceeded,
                            ))),
                        }
                    }),
            )
        }
    }
}

/// `Exists(var, domain, predicate)`: requires an exhaustible domain (there
/// is no bound on how long an unbounded search for a witness would run) and
/// a direct `Predicate` child — nesting another quantifier inside an
/// `Exists` is rejected at construction, matching the source's `Exists`
/// contract.
pub struct Exists {
    var: String,
    domain: DomainBinding,
    predicate: Rc<Predicate>,
}

impl Exists {
    pub fn new(
        var: impl Into<String>,
        domain: impl Into<DomainBinding>,
        predicate: Rc<Predicate>,
    ) -> Self {
        Self {
            var: var.into(),
            domain: domain.into(),
            predicate,
        }
    }
}

impl PropertyNode for Exists {
    fn evaluate(&self, env: &Env, rng: &PrngHandle) -> Box<dyn Iterator<Item = Outcome>> {
        if env.contains(&self.var) {
            let err = EvalError::ShadowedVariable {
                name: self.var.clone(),
            };
            return Box::new(std::iter::once(Outcome::Error(err)));
        }

        let domain = self.domain.reduce(env);
        if !domain.is_exhaustible() {
            return Box::new(std::iter::once(Outcome::Error(
                EvalError::ExistsOverNonExhaustibleDomain {
                    var: self.var.clone(),
                },
            )));
        }

        let values = domain
            .exhaustive()
            .expect("is_exhaustible() true implies exhaustive() is Some");
        let var = self.var.clone();
        let predicate = self.predicate.clone();
        let env = env.clone();
        let rng = rng.clone();

        let mut found_witness = false;
        let mut fault: Option<Outcome> = None;
        for v in values {
            let bound_env = env.extended(var.clone(), v);
            match predicate.evaluate(&bound_env, &rng).next() {
                Some(Outcome::Ok) => {
                    found_witness = true;
                    break;
                }
                Some(Outcome::PredicateError { error, env }) => {
                    fault = Some(Outcome::PredicateError { error, env });
                    break;
                }
                Some(other) if !other.is_ok() => continue,
                _ => continue,
            }
        }

        if let Some(fault) = fault {
            return Box::new(std::iter::once(fault));
        }
        if found_witness {
            Box::new(std::iter::once(Outcome::Ok))
        } else {
            Box::new(std::iter::once(Outcome::CounterExample(env)))
        }
    }
}
