//! PRNG context shared by every domain in one evaluation run.
//!
//! The source implementation keeps a single process-wide random generator.
//! This port keeps the same contract (one seed, one sequence of draws, full
//! reproducibility) but threads the generator explicitly through an
//! interior-mutable handle instead of a true global, per the redesign note
//! on process-wide PRNGs.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

/// Trait for providing random number generators, mirroring the provider
/// indirection used elsewhere in this codebase so alternate backends (e.g.
/// a fixed-sequence provider for tests) can be swapped in without touching
/// the domain algebra.
pub trait RngProvider {
    fn create_rng(&self, seed: Option<u64>) -> StdRng;
}

/// Default provider: `rand::rngs::StdRng` seeded deterministically when a
/// seed is given, or from OS entropy otherwise.
#[derive(Debug, Clone, Default)]
pub struct DefaultRngProvider;

impl RngProvider for DefaultRngProvider {
    fn create_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// A single run's deterministic random source.
///
/// `Prng` owns the actual generator state; `PrngHandle` (a cheap `Rc<RefCell<_>>`
/// clone) is what gets passed down into domains and quantifier nodes, so
/// every part of one evaluation draws from the same advancing stream.
#[derive(Debug)]
pub struct Prng {
    seed: u64,
    rng: StdRng,
}

impl Prng {
    /// Seed explicitly. Two `Prng::new(s)` instances draw identical
    /// sequences for identical call sequences — the reproducibility
    /// contract this whole engine depends on.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy; the resulting seed is still recorded so a
    /// failing run can be reported and replayed, even though it wasn't
    /// chosen by the caller.
    pub fn from_entropy() -> Self {
        let mut seed_rng = StdRng::from_entropy();
        let seed: u64 = seed_rng.r#gen();
        Self::new(seed)
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    /// Re-seed in place. Any outstanding `PrngHandle` clones observe the
    /// new stream immediately, since they share the same `RefCell`.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn randint(&mut self, a: i64, b: i64) -> i64 {
        self.rng.gen_range(a..=b)
    }

    pub fn choice<'a, T>(&mut self, seq: &'a [T]) -> &'a T {
        let idx = self.rng.gen_range(0..seq.len());
        &seq[idx]
    }

    /// `k` distinct elements of `seq`, drawn without replacement (`k` is
    /// clamped to `seq.len()`).
    pub fn sample<T: Clone>(&mut self, seq: &[T], k: usize) -> Vec<T> {
        use rand::seq::SliceRandom;
        seq.choose_multiple(&mut self.rng, k).cloned().collect()
    }

    /// A uniform permutation of `0..n`, used by `Union`'s round-robin draw
    /// order and by the shuffle-once-then-loop semantics of eager-iterable
    /// domain coercion.
    pub fn sample_indices(&mut self, n: usize) -> Vec<usize> {
        use rand::seq::SliceRandom;
        let mut idx: Vec<usize> = (0..n).collect();
        idx.shuffle(&mut self.rng);
        idx
    }

    pub fn gen_bool(&mut self) -> bool {
        self.rng.r#gen()
    }

    pub fn gen_char_in(&mut self, candidates: &[char]) -> char {
        *self.choice(candidates)
    }
}

/// Shared handle to a run's `Prng`. Cloning is cheap (reference-count bump)
/// and every clone observes the same advancing stream.
#[derive(Debug, Clone)]
pub struct PrngHandle(Rc<RefCell<Prng>>);

impl PrngHandle {
    pub fn new(seed: u64) -> Self {
        Self(Rc::new(RefCell::new(Prng::new(seed))))
    }

    pub fn from_entropy() -> Self {
        Self(Rc::new(RefCell::new(Prng::from_entropy())))
    }

    pub fn get_seed(&self) -> u64 {
        self.0.borrow().get_seed()
    }

    pub fn set_seed(&self, seed: u64) {
        self.0.borrow_mut().set_seed(seed);
    }

    pub fn randint(&self, a: i64, b: i64) -> i64 {
        self.0.borrow_mut().randint(a, b)
    }

    /// A clone of a uniformly-chosen element of `seq`. `Prng::choice` itself
    /// returns a borrow, which a `RefCell`-backed handle can't re-expose
    /// past the guard's lifetime.
    pub fn choice<T: Clone>(&self, seq: &[T]) -> T {
        self.0.borrow_mut().choice(seq).clone()
    }

    /// `k` distinct elements of `seq`, drawn without replacement.
    pub fn sample<T: Clone>(&self, seq: &[T], k: usize) -> Vec<T> {
        self.0.borrow_mut().sample(seq, k)
    }

    pub fn sample_indices(&self, n: usize) -> Vec<usize> {
        self.0.borrow_mut().sample_indices(n)
    }

    pub fn gen_bool(&self) -> bool {
        self.0.borrow_mut().gen_bool()
    }

    pub fn gen_char_in(&self, candidates: &[char]) -> char {
        self.0.borrow_mut().gen_char_in(candidates)
    }
}
