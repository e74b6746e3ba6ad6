//! Compound built-in domains: `List`, `Sublists`, `Tuple`, `Dict`, and the
//! user-extension point `Object`.

use crate::domain::{AnyDomain, Domain, DomainExt};
use crate::error::ConfigError;
use crate::rng::PrngHandle;
use crate::value::Value;
use std::rc::Rc;

/// `List(elem, min_len, max_len)`. Not exhaustible (the element domain
/// itself need not be). If `min_len == 0` the first sample is `[]`;
/// subsequent samples draw a fresh length uniform in
/// `[max(1, min_len), max_len]` and pull that many values from a
/// freshly-started iterator over `elem`'s canonical stream — fresh per
/// draw, so elements across different list samples don't share draw
/// position.
pub struct List {
    elem: AnyDomain,
    min_len: usize,
    max_len: usize,
}

impl List {
    pub fn new(elem: AnyDomain, min_len: usize, max_len: usize) -> Result<Self, ConfigError> {
        if min_len > max_len {
            return Err(ConfigError::InvalidLengthBounds { min_len, max_len });
        }
        Ok(Self {
            elem,
            min_len,
            max_len,
        })
    }
}

impl Domain<Vec<Value>> for List {
    fn is_exhaustible(&self) -> bool {
        false
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Vec<Value>>> {
        let elem = self.elem.clone();
        let min_len = self.min_len;
        let max_len = self.max_len;
        let rng = rng.clone();
        let mut first_is_empty = min_len == 0;
        Box::new(std::iter::repeat_with(move || {
            if first_is_empty {
                first_is_empty = false;
                return Vec::new();
            }
            let floor = min_len.max(1).min(max_len);
            let len = rng.randint(floor as i64, max_len as i64) as usize;
            let mut it = elem.canonical(&rng);
            (0..len)
                .map(|_| it.next().expect("canonical iterators are unbounded").expect(
                    "list elements must not signal recursion-depth exceeded at draw time",
                ))
                .collect()
        }))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Vec<Value>>>> {
        None
    }
}

impl List {
    pub fn erase(self) -> AnyDomain {
        DomainExt::erase(self)
    }
}

/// `Sublists(l)`: every contiguous slice of a fixed list `l`, including the
/// empty one first. Exhaustible iff `l` is non-empty or empty-sublist-only.
#[derive(Clone)]
pub struct Sublists {
    items: Vec<Value>,
}

impl Sublists {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    fn all_contiguous_slices(&self) -> Vec<Vec<Value>> {
        let n = self.items.len();
        let mut out = vec![Vec::new()];
        for start in 0..n {
            for end in (start + 1)..=n {
                out.push(self.items[start..end].to_vec());
            }
        }
        out
    }
}

impl Domain<Vec<Value>> for Sublists {
    fn is_exhaustible(&self) -> bool {
        true
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Vec<Value>>> {
        let all = self.all_contiguous_slices();
        let rng = rng.clone();
        Box::new(std::iter::repeat_with(move || {
            let idx = rng.sample_indices(all.len());
            all[idx[0]].clone()
        }))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Vec<Value>>>> {
        Some(Box::new(self.all_contiguous_slices().into_iter()))
    }
}

/// `Tuple(d1, d2, ...)`: fixed arity ≥ 2, zipping one persistent canonical
/// iterator per sub-domain (created once, at construction of the iterator,
/// not re-created per draw — unlike `List`, where arity and hence iterator
/// count varies per sample).
pub struct Tuple {
    parts: Vec<AnyDomain>,
}

impl Tuple {
    pub fn new(parts: Vec<AnyDomain>) -> Result<Self, ConfigError> {
        if parts.len() < 2 {
            return Err(ConfigError::InvalidLengthBounds {
                min_len: 2,
                max_len: parts.len(),
            });
        }
        Ok(Self { parts })
    }

    /// Erases to `Value::Tuple`, not `Value::List` — the generic
    /// `Vec<Value>: Into<Value>` bridge `DomainExt::erase` relies on always
    /// lands on `Value::List` (see that `impl` in `value.rs`), so `Tuple`
    /// needs its own `ErasedDomain` wrapper to keep tuple and list samples
    /// distinguishable once they cross the `Value` boundary.
    pub fn erase(self) -> AnyDomain {
        AnyDomain::new(ErasedTuple { inner: self })
    }
}

struct ErasedTuple {
    inner: Tuple,
}

impl crate::domain::ErasedDomain for ErasedTuple {
    fn is_exhaustible(&self) -> bool {
        Domain::is_exhaustible(&self.inner)
    }

    fn canonical(
        &self,
        rng: &PrngHandle,
    ) -> Box<dyn Iterator<Item = Result<Value, crate::domain::DepthExceeded>>> {
        Box::new(Domain::canonical(&self.inner, rng).map(|row| Ok(Value::Tuple(row))))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        Domain::exhaustive(&self.inner)
            .map(|it| Box::new(it.map(Value::Tuple)) as Box<dyn Iterator<Item = Value>>)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Domain<Vec<Value>> for Tuple {
    fn is_exhaustible(&self) -> bool {
        !self.parts.is_empty() && self.parts.iter().all(|p| p.is_exhaustible())
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Vec<Value>>> {
        let mut iters: Vec<_> = self.parts.iter().map(|p| p.canonical(rng)).collect();
        Box::new(std::iter::from_fn(move || {
            let mut row = Vec::with_capacity(iters.len());
            for it in iters.iter_mut() {
                match it.next()? {
                    Ok(v) => row.push(v),
                    Err(_) => return None,
                }
            }
            Some(row)
        }))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Vec<Value>>>> {
        if !self.is_exhaustible() {
            return None;
        }
        let columns: Vec<Vec<Value>> = self
            .parts
            .iter()
            .map(|p| p.exhaustive().expect("checked is_exhaustible above").collect())
            .collect();
        let min_len = columns.iter().map(|c| c.len()).min().unwrap_or(0);
        let rows = (0..min_len)
            .map(|i| columns.iter().map(|c| c[i].clone()).collect())
            .collect::<Vec<_>>();
        Some(Box::new(rows.into_iter()))
    }
}

/// `Dict(key, value, min_len, max_len)`: a list of `(key, value)` pairs with
/// duplicate keys collapsed (later draws overwrite earlier ones for the same
/// key, matching ordinary dict-building semantics). Unlike `List`, the
/// key and value iterators are created once when the canonical iterator is
/// built and then persist across every subsequent dict sample — draw
/// position keeps advancing from one dict to the next rather than
/// restarting.
pub struct Dict {
    key: AnyDomain,
    value: AnyDomain,
    min_len: usize,
    max_len: usize,
}

impl Dict {
    pub fn new(
        key: AnyDomain,
        value: AnyDomain,
        min_len: usize,
        max_len: usize,
    ) -> Result<Self, ConfigError> {
        if min_len > max_len {
            return Err(ConfigError::InvalidLengthBounds { min_len, max_len });
        }
        Ok(Self {
            key,
            value,
            min_len,
            max_len,
        })
    }

    /// Erases to `Value::Dict`, not `Value::List` — the generic
    /// `Vec<T>: Into<Value>` bridge `DomainExt::erase` relies on has no
    /// `From<(Value, Value)> for Value`, so it can't even be reached for
    /// `Vec<(Value, Value)>`; and reaching it would land on `Value::List`
    /// regardless, collapsing dict/list distinguishability the way `Tuple`
    /// (see `ErasedTuple` above) avoids for tuples and lists. `Dict` needs
    /// its own `ErasedDomain` wrapper for the same reason.
    pub fn erase(self) -> AnyDomain {
        AnyDomain::new(ErasedDict { inner: self })
    }
}

struct ErasedDict {
    inner: Dict,
}

impl crate::domain::ErasedDomain for ErasedDict {
    fn is_exhaustible(&self) -> bool {
        Domain::is_exhaustible(&self.inner)
    }

    fn canonical(
        &self,
        rng: &PrngHandle,
    ) -> Box<dyn Iterator<Item = Result<Value, crate::domain::DepthExceeded>>> {
        Box::new(Domain::canonical(&self.inner, rng).map(|entries| Ok(Value::Dict(entries))))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        Domain::exhaustive(&self.inner)
            .map(|it| Box::new(it.map(Value::Dict)) as Box<dyn Iterator<Item = Value>>)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Domain<Vec<(Value, Value)>> for Dict {
    fn is_exhaustible(&self) -> bool {
        false
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Vec<(Value, Value)>>> {
        let min_len = self.min_len;
        let max_len = self.max_len;
        let rng = rng.clone();
        let mut first_is_empty = min_len == 0;
        let mut keys = self.key.canonical(&rng);
        let mut values = self.value.canonical(&rng);
        Box::new(std::iter::repeat_with(move || {
            if first_is_empty {
                first_is_empty = false;
                return Vec::new();
            }
            let floor = min_len.max(1).min(max_len);
            let target_len = rng.randint(floor as i64, max_len as i64) as usize;
            let mut entries: Vec<(Value, Value)> = Vec::new();
            // Draw exactly target_len (key, value) pairs; a key domain
            // narrower than target_len collapses down, it does not retry
            // to fill the count back up.
            for _ in 0..target_len {
                let k = keys.next().expect("canonical key iterator is unbounded").expect("key draw failed");
                let v = values
                    .next()
                    .expect("canonical value iterator is unbounded")
                    .expect("value draw failed");
                match entries.iter_mut().find(|(ek, _)| *ek == k) {
                    Some(entry) => entry.1 = v,
                    None => entries.push((k, v)),
                }
            }
            entries
        }))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Vec<(Value, Value)>>>> {
        None
    }
}

/// `Object(factory, args...)`: draws one tuple of argument values per
/// sample and hands it to `factory`, which produces an arbitrary
/// `Value::Object`. The escape hatch for domains over user types that don't
/// fit the built-in `Value` shapes.
pub struct ObjectDomain {
    args: Tuple,
    factory: Rc<dyn Fn(&[Value]) -> Value>,
}

impl ObjectDomain {
    pub fn new(args: Vec<AnyDomain>, factory: impl Fn(&[Value]) -> Value + 'static) -> Result<Self, ConfigError> {
        Ok(Self {
            args: Tuple::new(args)?,
            factory: Rc::new(factory),
        })
    }

    pub fn erase(self) -> AnyDomain {
        DomainExt::erase(self)
    }
}

impl Domain<Value> for ObjectDomain {
    fn is_exhaustible(&self) -> bool {
        self.args.is_exhaustible()
    }

    fn canonical(&self, rng: &PrngHandle) -> Box<dyn Iterator<Item = Value>> {
        let factory = self.factory.clone();
        Box::new(self.args.canonical(rng).map(move |row| factory(&row)))
    }

    fn exhaustive(&self) -> Option<Box<dyn Iterator<Item = Value>>> {
        let factory = self.factory.clone();
        self.args
            .exhaustive()
            .map(|it| Box::new(it.map(move |row| factory(&row))) as Box<dyn Iterator<Item = Value>>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Boolean, Int};

    #[test]
    fn list_respects_length_bounds() {
        let d = List::new(Int::new(0, 10).unwrap().erase(), 1, 4).unwrap();
        let rng = PrngHandle::new(1);
        for sample in d.canonical(&rng).take(50) {
            assert!((1..=4).contains(&sample.len()));
        }
    }

    #[test]
    fn list_first_sample_is_empty_when_min_len_zero() {
        let d = List::new(Int::new(0, 10).unwrap().erase(), 0, 5).unwrap();
        let rng = PrngHandle::new(2);
        let mut it = d.canonical(&rng);
        assert_eq!(it.next(), Some(Vec::new()));
        for sample in it.take(50) {
            assert!(sample.len() <= 5);
        }
    }

    #[test]
    fn dict_first_sample_is_empty_when_min_len_zero() {
        let d = Dict::new(
            Boolean::new().erase(),
            Int::new(0, 10).unwrap().erase(),
            0,
            5,
        )
        .unwrap();
        let rng = PrngHandle::new(3);
        let mut it = d.canonical(&rng);
        assert_eq!(it.next(), Some(Vec::new()));
    }

    #[test]
    fn sublists_exhaustive_includes_empty_first() {
        let d = Sublists::new(vec![Value::Int(1), Value::Int(2)]);
        let all: Vec<_> = d.exhaustive().unwrap().collect();
        assert_eq!(all[0], Vec::<Value>::new());
        assert!(all.contains(&vec![Value::Int(1)]));
        assert!(all.contains(&vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn tuple_rejects_single_part() {
        assert!(Tuple::new(vec![Boolean::new().erase()]).is_err());
    }

    #[test]
    fn tuple_zips_sub_domains() {
        let d = Tuple::new(vec![Boolean::new().erase(), Boolean::new().erase()]).unwrap();
        let all: Vec<_> = d.exhaustive().unwrap().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].len(), 2);
    }

    #[test]
    fn tuple_erases_to_value_tuple_not_value_list() {
        let d = Tuple::new(vec![Boolean::new().erase(), Boolean::new().erase()])
            .unwrap()
            .erase();
        let rng = PrngHandle::new(1);
        let v = d.canonical(&rng).next().unwrap().unwrap();
        assert!(matches!(v, Value::Tuple(_)), "expected Value::Tuple, got {:?}", v);
    }

    #[test]
    fn dict_collapses_duplicate_keys() {
        let d = Dict::new(
            Boolean::new().erase(),
            Int::new(0, 100).unwrap().erase(),
            3,
            3,
        )
        .unwrap();
        let rng = PrngHandle::new(2);
        let sample = d.canonical(&rng).next().unwrap();
        // Only two distinct boolean keys can ever exist, so three draws
        // always collapse to at most two entries.
        assert!(sample.len() <= 2);
    }

    #[test]
    fn dict_erases_to_value_dict_not_value_list() {
        let d = Dict::new(
            Boolean::new().erase(),
            Int::new(0, 100).unwrap().erase(),
            1,
            3,
        )
        .unwrap()
        .erase();
        let rng = PrngHandle::new(1);
        let v = d.canonical(&rng).next().unwrap().unwrap();
        assert!(matches!(v, Value::Dict(_)), "expected Value::Dict, got {:?}", v);
    }

    #[test]
    fn object_domain_applies_factory_to_drawn_args() {
        let d = ObjectDomain::new(
            vec![Int::new(1, 1).unwrap().erase(), Int::new(2, 2).unwrap().erase()],
            |args| Value::Int(args[0].as_int().unwrap() + args[1].as_int().unwrap()),
        )
        .unwrap();
        let rng = PrngHandle::new(1);
        let v = d.canonical(&rng).next().unwrap();
        assert_eq!(v, Value::Int(3));
    }
}
