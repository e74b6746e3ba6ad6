//! End-to-end coverage of the engine's testable invariants: reproducibility,
//! exhaustive coverage, bound respecting, union fairness, recursive-domain
//! termination, the `that(samples_limit)` decorator, counterexample and
//! existential-witness detection, dependent domains, shadowing rejection,
//! and predicate-exception capture.

use protest::domain::{recursive, DomainExt};
use protest::error::EvalError;
use protest::primitives::{Boolean, Int};
use protest::property::PropertyBuilder;
use protest::quantifier::{ForAll, Outcome, Predicate, PropertyNode};
use protest::rng::PrngHandle;
use protest::test_runner::TestRunner;
use protest::value::{Env, Value};
use std::collections::HashSet;
use std::rc::Rc;

#[test]
fn reproducibility_same_seed_same_sequence() {
    let make = || Int::new(-500, 500).unwrap().erase();
    let first = PrngHandle::new(42);
    let a: Vec<_> = make().canonical(&first).take(10_000).map(|v| v.unwrap()).collect();

    let second = PrngHandle::new(42);
    let b: Vec<_> = make().canonical(&second).take(10_000).map(|v| v.unwrap()).collect();

    assert_eq!(a, b);
}

#[test]
fn exhaustive_iterator_covers_boolean_exactly() {
    let d = Boolean::new().erase();
    let all: Vec<_> = d.exhaustive().unwrap().collect();
    assert_eq!(all.len(), 2);
    let distinct: HashSet<_> = all.iter().map(|v| format!("{:?}", v)).collect();
    assert_eq!(distinct.len(), 2);
    for v in &all {
        assert!(matches!(v, Value::Bool(_)));
    }
}

#[test]
fn canonical_int_respects_bounds() {
    let d = Int::new(-10, 10).unwrap();
    let rng = PrngHandle::new(1);
    for v in protest::domain::Domain::canonical(&d, &rng).take(2000) {
        assert!((-10..=10).contains(&v));
    }
}

#[test]
fn union_fairness_every_branch_contributes() {
    let a = Int::new(0, 2).unwrap().erase();
    let b = Int::new(100, 102).unwrap().erase();
    let c = Boolean::new().erase();
    let combined = (a | b) | c;

    let rng = PrngHandle::new(5);
    let samples: Vec<_> = combined.canonical(&rng).take(1000).map(|v| v.unwrap()).collect();

    assert!(samples.iter().any(|v| matches!(v, Value::Int(n) if (0..=2).contains(n))));
    assert!(samples.iter().any(|v| matches!(v, Value::Int(n) if (100..=102).contains(n))));
    assert!(samples.iter().any(|v| matches!(v, Value::Bool(_))));
    assert!(samples.iter().all(|v| matches!(v, Value::Int(_) | Value::Bool(_))));
}

#[test]
fn union_terminates_for_the_classical_recursive_tree() {
    // rec T. Bool | (T, T), max_depth = 6.
    let tree = recursive(6, |self_ref| {
        let leaf = Boolean::new().erase();
        let left = self_ref.next_level();
        let right = self_ref.next_level();
        let pair = protest::collections::Tuple::new(vec![left, right]).unwrap().erase();
        leaf | pair
    });

    let rng = PrngHandle::new(3);
    let samples: Vec<_> = tree.canonical(&rng).take(1000).collect();
    assert_eq!(samples.len(), 1000);
    assert!(samples.iter().all(|s| s.is_ok()));

    fn max_nesting(v: &Value) -> usize {
        match v {
            Value::Bool(_) => 0,
            Value::Tuple(parts) => 1 + parts.iter().map(max_nesting).max().unwrap_or(0),
            other => panic!("unexpected sample shape: {:?}", other),
        }
    }
    for s in samples {
        let v = s.unwrap();
        assert!(max_nesting(&v) <= 6);
    }
}

#[test]
fn samples_limit_decorator_yields_exactly_n() {
    let d = Int::new(0, 10_000).unwrap().erase().that(10);
    let rng = PrngHandle::new(9);
    let samples: Vec<_> = d.canonical(&rng).collect();
    assert_eq!(samples.len(), 10);
}

#[test]
fn counterexample_detection_over_exhaustible_range() {
    // forall x in {0..99} (exhaustible). x > 4 — must fail within the
    // first 5 draws of the exhaustive iterator (x = 0..4 all fail it).
    let domain = protest::domain::AnyDomain::from_iterable((0i64..100).collect(), true);
    let predicate: Rc<dyn PropertyNode> = Rc::new(Predicate::new(|env| {
        Ok(env.get("x").unwrap().as_int().unwrap() > 4)
    }));
    let node = ForAll::new("x", domain, predicate, 100);
    let rng = PrngHandle::new(1);

    let mut checked = 0;
    let mut found_counterexample = false;
    for outcome in node.evaluate(&Env::new(), &rng) {
        checked += 1;
        if matches!(outcome, Outcome::CounterExample(_)) {
            found_counterexample = true;
            break;
        }
    }
    assert!(found_counterexample);
    assert!(checked <= 5);
}

#[test]
fn existential_witness_found_and_not_found() {
    let witness = PropertyBuilder::infallible_predicate(|env| env.get("x").unwrap().as_int().unwrap() > 7)
        .exists("x", protest::domain::AnyDomain::from_iterable((0i64..10).collect(), true))
        .unwrap()
        .build();
    let rng = PrngHandle::new(1);
    assert!(TestRunner::run(&*witness, &Env::new(), &rng).passed());

    let no_witness = PropertyBuilder::infallible_predicate(|env| env.get("x").unwrap().as_int().unwrap() > 100)
        .exists("x", protest::domain::AnyDomain::from_iterable((0i64..10).collect(), true))
        .unwrap()
        .build();
    let result = TestRunner::run(&*no_witness, &Env::new(), &rng);
    assert!(!result.passed());
    assert!(matches!(result.outcome, Outcome::CounterExample(_)));
}

#[test]
fn dependent_domain_element_is_always_drawn_from_its_list() {
    use protest::collections::List;
    use protest::domain::{DomainBinding, DomainExpr};

    let xs_domain: DomainBinding = List::new(Int::new(0, 100).unwrap().erase(), 4, 4).unwrap().erase().into();
    let elem_expr = DomainExpr::bound(&["xs"], |env| {
        let xs = env.get("xs").unwrap().as_list().unwrap().to_vec();
        protest::domain::AnyDomain::from_iterable(xs, true)
    })
    .unwrap();

    let predicate: Rc<dyn PropertyNode> = Rc::new(Predicate::new(|env| {
        let x = env.get("x").unwrap();
        let xs = env.get("xs").unwrap().as_list().unwrap();
        Ok(xs.contains(x))
    }));
    let inner = ForAll::new("x", elem_expr, predicate, 4);
    let outer = ForAll::new("xs", xs_domain, Rc::new(inner), 30);

    let rng = PrngHandle::new(2);
    for outcome in outer.evaluate(&Env::new(), &rng) {
        assert!(outcome.is_ok(), "unexpected outcome: {:?}", outcome);
    }
}

#[test]
fn shadowing_rejection_for_nested_for_all_with_same_name() {
    let predicate: Rc<dyn PropertyNode> = Rc::new(Predicate::new(|_| Ok(true)));
    let inner = ForAll::new("x", Boolean::new().erase(), predicate, 5);
    let outer = ForAll::new("x", Boolean::new().erase(), Rc::new(inner), 5);

    let rng = PrngHandle::new(1);
    let outcome = outer.evaluate(&Env::new(), &rng).next().unwrap();
    assert!(matches!(outcome, Outcome::Error(EvalError::ShadowedVariable { ref name }) if name == "x"));
}

#[test]
fn predicate_exception_is_captured_not_a_crash() {
    let property = PropertyBuilder::predicate(|env| {
        let x = env.get("x").unwrap().as_int().unwrap();
        if x == 0 {
            Err(protest::error::PredicateError::new("division by zero"))
        } else {
            Ok(100 / x >= 0)
        }
    })
    .for_all_n("x", Int::new(0, 0).unwrap().erase(), 10)
    .build();

    let rng = PrngHandle::new(1);
    let result = TestRunner::run(&*property, &Env::new(), &rng);
    assert!(!result.passed());
    assert!(matches!(result.outcome, Outcome::PredicateError { .. }));
}

#[test]
fn commutativity_passes_for_default_sample_count() {
    let property = PropertyBuilder::infallible_predicate(|env| {
        let x = env.get("x").unwrap().as_int().unwrap();
        let y = env.get("y").unwrap().as_int().unwrap();
        x + y == y + x
    })
    .for_all("y", Int::new(-10_000, 10_000).unwrap().erase())
    .for_all("x", Int::new(-10_000, 10_000).unwrap().erase())
    .build();

    let rng = PrngHandle::new(1);
    let result = TestRunner::run(&*property, &Env::new(), &rng);
    assert!(result.passed());
    assert_eq!(result.samples_checked, 100 * 100);
}

#[test]
fn max_of_nonempty_list_is_an_upper_bound() {
    use protest::collections::List;

    let property = PropertyBuilder::infallible_predicate(|env| {
        let xs = env.get("l").unwrap().as_list().unwrap();
        let ints: Vec<i64> = xs.iter().map(|v| v.as_int().unwrap()).collect();
        let max = *ints.iter().max().unwrap();
        ints.iter().all(|v| *v <= max)
    })
    .for_all_n(
        "l",
        List::new(Int::new(-1000, 1000).unwrap().erase(), 1, 20).unwrap().erase(),
        100,
    )
    .build();

    let rng = PrngHandle::new(1);
    let result = TestRunner::run(&*property, &Env::new(), &rng);
    assert!(result.passed());
}

#[test]
fn union_of_bool_and_int_contains_both_types() {
    let combined = Boolean::new().erase() | Int::new(0, 100).unwrap().erase();
    let property = PropertyBuilder::infallible_predicate(|env| {
        matches!(env.get("x").unwrap(), Value::Bool(_) | Value::Int(_))
    })
    .for_all("x", combined.clone())
    .build();

    let rng = PrngHandle::new(1);
    let result = TestRunner::run(&*property, &Env::new(), &rng);
    assert!(result.passed());

    let samples: Vec<_> = combined.canonical(&rng).take(100).map(|v| v.unwrap()).collect();
    assert!(samples.iter().any(|v| matches!(v, Value::Bool(_))));
    assert!(samples.iter().any(|v| matches!(v, Value::Int(_))));
}
