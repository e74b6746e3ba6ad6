//! The `Domain` abstraction: typed combinators, type-erasure at the
//! `Value` boundary, the `|` union operator, recursive domains, the
//! `that(samples_limit)` decorator, eager-iterable coercion, and
//! `DomainExpr` dependent domains.
//!
//! Two traits carry the weight here:
//!
//! - [`Domain<T>`] is what built-in and user domains implement directly —
//!   strongly typed, generic over the element type.
//! - [`ErasedDomain`] is the type-erased form used wherever heterogeneous
//!   domains must live side by side: `Union`, recursive domains, and every
//!   domain bound by a quantifier. [`AnyDomain`] is its `Rc`-backed handle.
//!
//! Any `Domain<T>` gets an `ErasedDomain` for free via [`DomainExt::erase`],
//! as long as `T: Into<Value>`.

use crate::error::ConfigError;
use crate::rng::PrngHandle;
use crate::value::{Env, Value};
use std::any::Any;
use std::rc::Rc;

/// Signals that a recursive domain's depth budget has been exhausted.
///
/// Modeled as an explicit value propagated through the canonical iterator's
/// item type rather than a panic or native stack unwind — see the
/// "Recursion depth signalling" redesign note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthExceeded;

/// A typed, non-erased domain: the shape built-in and user domains
/// implement directly.
pub trait Domain<T> {
    /// Whether the exhaustive iterator is available.
    fn is_exhaustible(&self) -> bool;

    /// An unbounded (for a non-empty domain) lazy sample stream, ordered by
    /// draws from the shared `rng`.
    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = T>>;

    /// The finite enumeration of every value, if `is_exhaustible()`.
    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = T>>>;
}

/// Type-erased form of [`Domain`], operating over the dynamically-typed
/// [`Value`]. The canonical iterator's item is fallible so a recursion-depth
/// signal can propagate uniformly through `Union` without a panic.
pub trait ErasedDomain: 'static {
    fn is_exhaustible(&self) -> bool;
    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Result<Value, DepthExceeded>>>;
    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>>;
    fn as_any(&self) -> &dyn Any;
}

/// Bridges any `Domain<T>` into `ErasedDomain`; typed domains are always
/// infallible, so every item is wrapped `Ok`.
struct ErasedAdapter<D> {
    inner: D,
}

impl<D, T> ErasedDomain for ErasedAdapter<D>
where
    D: Domain<T> + 'static,
    T: Into<Value> + 'static,
{
    fn is_exhaustible(&self) -> bool {
        self.inner.is_exhaustible()
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Result<Value, DepthExceeded>>> {
        Box::new(self.inner.canonical(rng).map(|v| Ok(v.into())))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        self.inner
            .exhaustive()
            .map(|it| Box::new(it.map(Into::into)) as Box<dyn Iterator<Item = Value>>)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Extension trait giving every `Domain<T>` an `.erase()` adapter into
/// [`AnyDomain`].
pub trait DomainExt<T>: Domain<T> + Sized + 'static
where
    T: Into<Value> + 'static,
{
    fn erase(self) -> AnyDomain {
        AnyDomain::new(ErasedAdapter { inner: self })
    }
}

impl<D, T> DomainExt<T> for D
where
    D: Domain<T> + 'static,
    T: Into<Value> + 'static,
{
}

/// Type-erased, reference-counted handle to a domain. This is the currency
/// `Union`, `DomainExpr`, and the quantifier tree all traffic in.
#[derive(Clone)]
pub struct AnyDomain(Rc<dyn ErasedDomain>);

impl AnyDomain {
    pub fn new(inner: impl ErasedDomain + 'static) -> Self {
        AnyDomain(Rc::new(inner))
    }

    pub fn is_exhaustible(&self) -> bool {
        self.0.is_exhaustible()
    }

    pub fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Result<Value, DepthExceeded>>> {
        self.0.canonical(rng)
    }

    pub fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        self.0.exhaustive()
    }

    /// Wraps so any *fresh* canonical iterator stops after `limit` values.
    /// Exhaustive iteration is unaffected.
    pub fn that(self, limit: usize) -> AnyDomain {
        AnyDomain::new(That { inner: self, limit })
    }

    /// An eager-iterable domain: shuffles a snapshot once per fresh
    /// canonical iterator, then loops it forever; the exhaustive iterator
    /// (if `is_exhaustible`) yields the unshuffled snapshot order once.
    ///
    /// Rust's static typing makes the coercion explicit rather than
    /// inferred at runtime from a value's shape, so this crate exposes the
    /// eager-iterable and singleton coercion rules as explicit constructors
    /// rather than an implicit `Into<Domain>` that
    /// would have to guess the caller's intent from a trait object.
    pub fn from_iterable<T: Into<Value>>(items: Vec<T>, is_exhaustible: bool) -> AnyDomain {
        AnyDomain::new(IterableDomain {
            snapshot: items.into_iter().map(Into::into).collect(),
            is_exhaustible,
        })
    }

    fn alternatives_if_union(&self) -> Option<Vec<AnyDomain>> {
        self.0
            .as_any()
            .downcast_ref::<Union>()
            .map(|u| u.alternatives.clone())
    }
}

impl std::ops::BitOr for AnyDomain {
    type Output = AnyDomain;

    /// Flattens nested unions into one alternative list.
    fn bitor(self, rhs: AnyDomain) -> AnyDomain {
        let mut alternatives = Vec::new();
        match self.alternatives_if_union() {
            Some(alts) => alternatives.extend(alts),
            None => alternatives.push(self),
        }
        match rhs.alternatives_if_union() {
            Some(alts) => alternatives.extend(alts),
            None => alternatives.push(rhs),
        }
        AnyDomain::new(Union { alternatives })
    }
}

/// Eager-iterable / singleton-fallback coercion target.
struct IterableDomain {
    snapshot: Vec<Value>,
    is_exhaustible: bool,
}

impl ErasedDomain for IterableDomain {
    fn is_exhaustible(&self) -> bool {
        self.is_exhaustible
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Result<Value, DepthExceeded>>> {
        let order = rng.sample_indices(self.snapshot.len());
        let shuffled: Vec<Value> = order.into_iter().map(|i| self.snapshot[i].clone()).collect();
        Box::new(ShuffleLoop {
            items: shuffled,
            pos: 0,
        })
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        if self.is_exhaustible {
            Some(Box::new(self.snapshot.clone().into_iter()))
        } else {
            None
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct ShuffleLoop {
    items: Vec<Value>,
    pos: usize,
}

impl Iterator for ShuffleLoop {
    type Item = Result<Value, DepthExceeded>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.items.is_empty() {
            return None;
        }
        let v = self.items[self.pos % self.items.len()].clone();
        self.pos += 1;
        Some(Ok(v))
    }
}

/// `A | B`: tries alternatives in a freshly-permuted order every draw,
/// rerolling any alternative whose iterator signals `DepthExceeded` rather
/// than aborting the whole union.
pub struct Union {
    alternatives: Vec<AnyDomain>,
}

impl Union {
    pub fn new(alternatives: Vec<AnyDomain>) -> Self {
        let mut flat = Vec::new();
        for alt in alternatives {
            match alt.alternatives_if_union() {
                Some(nested) => flat.extend(nested),
                None => flat.push(alt),
            }
        }
        Self {
            alternatives: flat,
        }
    }
}

impl ErasedDomain for Union {
    fn is_exhaustible(&self) -> bool {
        !self.alternatives.is_empty() && self.alternatives.iter().all(|a| a.is_exhaustible())
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Result<Value, DepthExceeded>>> {
        let iters = self
            .alternatives
            .iter()
            .map(|a| a.canonical(rng))
            .collect();
        Box::new(UnionIter {
            alternatives: self.alternatives.clone(),
            iters,
            rng: rng.clone(),
        })
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        if !self.is_exhaustible() {
            return None;
        }
        let chained = self
            .alternatives
            .iter()
            .filter_map(|a| a.exhaustive())
            .fold(
                Box::new(std::iter::empty()) as Box<dyn Iterator<Item = Value>>,
                |acc, it| Box::new(acc.chain(it)),
            );
        Some(chained)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct UnionIter {
    alternatives: Vec<AnyDomain>,
    iters: Vec<Box<dyn Iterator<Item = Result<Value, DepthExceeded>>>>,
    rng: PrngHandle,
}

impl Iterator for UnionIter {
    type Item = Result<Value, DepthExceeded>;

    fn next(&mut self) -> Option<Self::Item> {
        let order = self.rng.sample_indices(self.iters.len());
        for idx in order {
            match self.iters[idx].next() {
                Some(Ok(v)) => return Some(Ok(v)),
                Some(Err(DepthExceeded)) | None => {
                    // Reroll only this alternative, keep trying the rest of
                    // this round.
                    self.iters[idx] = self.alternatives[idx].canonical(&self.rng);
                }
            }
        }
        // Every alternative signalled depth exhaustion this round.
        Some(Err(DepthExceeded))
    }
}

/// Wraps a domain so any fresh canonical iterator yields at most `limit`
/// values. Exhaustive iteration passes through unchanged.
struct That {
    inner: AnyDomain,
    limit: usize,
}

impl ErasedDomain for That {
    fn is_exhaustible(&self) -> bool {
        self.inner.is_exhaustible()
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Result<Value, DepthExceeded>>> {
        Box::new(self.inner.canonical(rng).take(self.limit))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        self.inner.exhaustive()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A recursive domain's view of itself, handed to the user's `step`
/// closure so it can ask for a one-level-deeper instance.
#[derive(Clone)]
pub struct RecSelf {
    step: Rc<dyn Fn(RecSelf) -> AnyDomain>,
    sub_i: usize,
    max_depth: usize,
}

impl RecSelf {
    /// A recursive instance one level deeper than `self`.
    pub fn next_level(&self) -> AnyDomain {
        AnyDomain::new(RecDomain {
            step: self.step.clone(),
            sub_i: self.sub_i + 1,
            max_depth: self.max_depth,
        })
    }
}

struct RecDomain {
    step: Rc<dyn Fn(RecSelf) -> AnyDomain>,
    sub_i: usize,
    max_depth: usize,
}

impl ErasedDomain for RecDomain {
    fn is_exhaustible(&self) -> bool {
        false
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Result<Value, DepthExceeded>>> {
        if self.sub_i > self.max_depth {
            return Box::new(std::iter::repeat_with(|| Err(DepthExceeded)));
        }
        let self_ref = RecSelf {
            step: self.step.clone(),
            sub_i: self.sub_i,
            max_depth: self.max_depth,
        };
        let sub_domain = (self.step)(self_ref);
        sub_domain.canonical(rng)
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds a recursive domain from a `step` function describing one level
/// of the recursion; `step` receives a [`RecSelf`] it can call
/// `.next_level()` on to refer to a deeper recursive instance, typically
/// inside a `|` union alongside a non-recursive base case.
pub fn recursive(max_depth: usize, step: impl Fn(RecSelf) -> AnyDomain + 'static) -> AnyDomain {
    AnyDomain::new(RecDomain {
        step: Rc::new(step),
        sub_i: 0,
        max_depth,
    })
}

/// A deferred domain definition with free variables, reduced against an
/// `Env` at evaluation time.
///
/// Bound variables are named explicitly by the caller rather than inferred
/// by inspecting the closure at call sites, so there's no ambiguity about
/// which names a `DomainExpr` depends on.
#[derive(Clone)]
pub struct DomainExpr {
    bound_vars: Vec<String>,
    f: Rc<dyn Fn(&Env) -> AnyDomain>,
}

impl DomainExpr {
    pub fn bound(
        vars: &[&str],
        f: impl Fn(&Env) -> AnyDomain + 'static,
    ) -> Result<Self, ConfigError> {
        if vars.is_empty() {
            return Err(ConfigError::DomainExprWithNoBoundVars);
        }
        Ok(Self {
            bound_vars: vars.iter().map(|s| s.to_string()).collect(),
            f: Rc::new(f),
        })
    }

    pub fn bound_vars(&self) -> &[String] {
        &self.bound_vars
    }

    /// Resolves against `env`. Absent bound variables are not special-cased
    /// here — the closure itself will fail naturally (typically a lookup
    /// returning `None`) if `env` doesn't yet carry everything it needs.
    pub fn reduce(&self, env: &Env) -> AnyDomain {
        (self.f)(env)
    }
}

/// What a quantifier binds: either a domain fixed at construction time, or
/// one deferred until the surrounding environment is known.
#[derive(Clone)]
pub enum DomainBinding {
    Fixed(AnyDomain),
    Dependent(DomainExpr),
}

impl DomainBinding {
    pub fn reduce(&self, env: &Env) -> AnyDomain {
        match self {
            DomainBinding::Fixed(d) => d.clone(),
            DomainBinding::Dependent(expr) => expr.reduce(env),
        }
    }
}

impl From<AnyDomain> for DomainBinding {
    fn from(d: AnyDomain) -> Self {
        DomainBinding::Fixed(d)
    }
}

impl From<DomainExpr> for DomainBinding {
    fn from(expr: DomainExpr) -> Self {
        DomainBinding::Dependent(expr)
    }
}
