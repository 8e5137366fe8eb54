//! Domain/range restriction gate.

use crate::ontology::{EntityId, OntologyIndex};

use super::Compatibility;

/// Check whether `property` may connect `subject` and `object`.
///
/// The subject side is the subject plus its ancestors; the object side is
/// the object plus its ancestors, or empty when there is no object.
///
/// | declared        | forward (`swap = false`)      | reversed (`swap = true`)      |
/// |-----------------|-------------------------------|-------------------------------|
/// | nothing         | always, swap undecided        | -                             |
/// | range only      | range ∩ O                     | range ∩ S                     |
/// | domain only     | domain ∩ S                    | domain ∩ O                    |
/// | domain + range  | domain ∩ S and range ∩ O      | range ∩ S and domain ∩ O      |
///
/// For single-sided restrictions the object-side test runs first. Anything
/// else scores 0.0.
pub fn restriction_score(
    index: &OntologyIndex,
    property: EntityId,
    subject: EntityId,
    object: Option<EntityId>,
) -> Compatibility {
    let Some(restriction) = index.restriction(property) else {
        return Compatibility::UNCONSTRAINED;
    };
    if restriction.is_unconstrained() {
        return Compatibility::UNCONSTRAINED;
    }

    let subject_side = |classes: &[EntityId]| {
        classes.iter().any(|&c| index.is_ancestor_or_self(c, subject))
    };
    let object_side = |classes: &[EntityId]| match object {
        Some(o) => classes.iter().any(|&c| index.is_ancestor_or_self(c, o)),
        None => false,
    };

    let domain = restriction.domain.as_slice();
    let range = restriction.range.as_slice();

    if domain.is_empty() {
        if object_side(range) {
            Compatibility::new(1.0, false)
        } else if subject_side(range) {
            Compatibility::new(1.0, true)
        } else {
            Compatibility::INCOMPATIBLE
        }
    } else if range.is_empty() {
        if object_side(domain) {
            Compatibility::new(1.0, true)
        } else if subject_side(domain) {
            Compatibility::new(1.0, false)
        } else {
            Compatibility::INCOMPATIBLE
        }
    } else if subject_side(domain) && object_side(range) {
        Compatibility::new(1.0, false)
    } else if subject_side(range) && object_side(domain) {
        Compatibility::new(1.0, true)
    } else {
        Compatibility::INCOMPATIBLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{Category, OntologyBuilder};

    struct Fixture {
        index: OntologyIndex,
        pizza: EntityId,
        topping: EntityId,
        meat: EntityId,
        country: EntityId,
    }

    impl Fixture {
        fn id(&self, iri: &str) -> EntityId {
            self.index.by_iri(iri).unwrap()
        }
    }

    fn fixture() -> Fixture {
        let mut b = OntologyBuilder::new();
        for c in ["Pizza", "PizzaTopping", "MeatTopping", "Country"] {
            b.class(c).unwrap();
        }
        b.subsume("MeatTopping", "PizzaTopping").unwrap();
        for p in ["free", "rangeOnly", "domainOnly", "both"] {
            b.declare(Category::ObjectProperty, p, None, None).unwrap();
        }
        b.add_range("rangeOnly", "PizzaTopping").unwrap();
        b.add_domain("domainOnly", "Pizza").unwrap();
        b.add_domain("both", "Pizza").unwrap();
        b.add_range("both", "PizzaTopping").unwrap();
        let index = b.build();
        Fixture {
            pizza: index.by_iri("Pizza").unwrap(),
            topping: index.by_iri("PizzaTopping").unwrap(),
            meat: index.by_iri("MeatTopping").unwrap(),
            country: index.by_iri("Country").unwrap(),
            index,
        }
    }

    #[test]
    fn unconstrained_property_always_passes() {
        let f = fixture();
        let free = f.id("free");
        for (s, o) in [(f.pizza, Some(f.meat)), (f.country, None), (f.meat, Some(f.pizza))] {
            assert_eq!(restriction_score(&f.index, free, s, o), Compatibility::UNCONSTRAINED);
        }
    }

    #[test]
    fn non_property_is_unconstrained() {
        let f = fixture();
        let r = restriction_score(&f.index, f.pizza, f.meat, None);
        assert_eq!(r, Compatibility::UNCONSTRAINED);
    }

    #[test]
    fn range_only() {
        let f = fixture();
        let p = f.id("rangeOnly");
        // Object under the range: forward.
        assert_eq!(restriction_score(&f.index, p, f.pizza, Some(f.meat)), Compatibility::new(1.0, false));
        // Subject under the range, object not: reversed.
        assert_eq!(restriction_score(&f.index, p, f.meat, Some(f.pizza)), Compatibility::new(1.0, true));
        // Unary template: only the subject side can match.
        assert_eq!(restriction_score(&f.index, p, f.topping, None), Compatibility::new(1.0, true));
        assert_eq!(restriction_score(&f.index, p, f.pizza, Some(f.country)), Compatibility::INCOMPATIBLE);
    }

    #[test]
    fn range_only_prefers_object_side() {
        let f = fixture();
        let p = f.id("rangeOnly");
        // Both sides under the range: the object-side test wins.
        assert_eq!(restriction_score(&f.index, p, f.meat, Some(f.topping)), Compatibility::new(1.0, false));
    }

    #[test]
    fn domain_only() {
        let f = fixture();
        let p = f.id("domainOnly");
        assert_eq!(restriction_score(&f.index, p, f.meat, Some(f.pizza)), Compatibility::new(1.0, true));
        assert_eq!(restriction_score(&f.index, p, f.pizza, Some(f.meat)), Compatibility::new(1.0, false));
        assert_eq!(restriction_score(&f.index, p, f.pizza, None), Compatibility::new(1.0, false));
        assert_eq!(restriction_score(&f.index, p, f.country, None), Compatibility::INCOMPATIBLE);
    }

    #[test]
    fn domain_and_range() {
        let f = fixture();
        let p = f.id("both");
        assert_eq!(restriction_score(&f.index, p, f.pizza, Some(f.meat)), Compatibility::new(1.0, false));
        assert_eq!(restriction_score(&f.index, p, f.meat, Some(f.pizza)), Compatibility::new(1.0, true));
        assert_eq!(restriction_score(&f.index, p, f.pizza, Some(f.country)), Compatibility::INCOMPATIBLE);
        // Both sides required: a unary template cannot satisfy it.
        assert_eq!(restriction_score(&f.index, p, f.pizza, None), Compatibility::INCOMPATIBLE);
    }

    #[test]
    fn gate_is_binary() {
        let f = fixture();
        for p in ["free", "rangeOnly", "domainOnly", "both"] {
            let p = f.id(p);
            for s in [f.pizza, f.topping, f.meat, f.country] {
                for o in [None, Some(f.pizza), Some(f.meat), Some(f.country)] {
                    let r = restriction_score(&f.index, p, s, o);
                    assert!(r.score == 0.0 || r.score == 1.0);
                    if r.score == 0.0 {
                        assert_eq!(r.swap, None);
                    }
                }
            }
        }
    }
}
