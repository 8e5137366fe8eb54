//! Usage compatibility from asserted property usages.
//!
//! A property that the ontology already uses with the same (or more
//! specific) arguments is a likelier reading than one it never uses that way.

use crate::ontology::{EntityId, OntologyIndex, Usage};

use super::Compatibility;

/// Grade one recorded usage against the candidate arguments.
///
/// Checks run from most to least specific; the first that holds decides the
/// grade for this usage:
///
/// | grade | forward (`swap = false`)                        | reversed (`swap = true`)                        |
/// |-------|-------------------------------------------------|-------------------------------------------------|
/// | 1.00  | `pS == s` and `pO == o`                         | `pS == o` and `pO == s`                         |
/// | 0.75  | `s ⊒ pS` and `pO == o`, or `s == pS` and `o ⊒ pO` | `s ⊒ pO` and `pS == o`, or `s == pO` and `o ⊒ pS` |
/// | 0.50  | `s == pS` or `o == pO`                          | `s == pO` or `o == pS`                          |
/// | 0.25  | `s ⊒ pS` or `o ⊒ pO`                            | `s ⊒ pO` or `o ⊒ pS`                            |
///
/// `x ⊒ y` reads "x is y or one of its ancestors". Equality on the object
/// side treats an absent object and an absent (literal) usage object as
/// equal, so a unary template grades against literal usages like any other.
fn grade(index: &OntologyIndex, usage: &Usage, subject: EntityId, object: Option<EntityId>) -> Option<Compatibility> {
    let Usage { subject: ps, object: po } = *usage;
    let covers = |general: EntityId, specific: Option<EntityId>| {
        specific.is_some_and(|s| index.is_ancestor_or_self(general, s))
    };

    if ps == subject && po == object {
        return Some(Compatibility::new(1.0, false));
    }
    if Some(ps) == object && po == Some(subject) {
        return Some(Compatibility::new(1.0, true));
    }

    if (covers(subject, Some(ps)) && po == object)
        || (ps == subject && object.is_some_and(|o| covers(o, po)))
    {
        return Some(Compatibility::new(0.75, false));
    }
    if (covers(subject, po) && Some(ps) == object)
        || (po == Some(subject) && object.is_some_and(|o| covers(o, Some(ps))))
    {
        return Some(Compatibility::new(0.75, true));
    }

    if ps == subject || po == object {
        return Some(Compatibility::new(0.5, false));
    }
    if po == Some(subject) || Some(ps) == object {
        return Some(Compatibility::new(0.5, true));
    }

    // With shared ancestry both 0.25 branches can hold; forward wins.
    if covers(subject, Some(ps)) || object.is_some_and(|o| covers(o, po)) {
        return Some(Compatibility::new(0.25, false));
    }
    if covers(subject, po) || object.is_some_and(|o| covers(o, Some(ps))) {
        return Some(Compatibility::new(0.25, true));
    }

    None
}

/// Score `property` by how the ontology already uses it.
///
/// Scans usages in corpus order and keeps the first grade with a strictly
/// greater score, so a later usage with an equal score never changes the
/// swap decision. A property without any recorded usage scores 0.0 with no
/// swap decision.
pub fn usage_score(
    index: &OntologyIndex,
    property: EntityId,
    subject: EntityId,
    object: Option<EntityId>,
) -> Compatibility {
    let Some(usages) = index.usages_of(property) else {
        return Compatibility::INCOMPATIBLE;
    };

    let mut best = Compatibility::INCOMPATIBLE;
    for usage in usages {
        let Some(g) = grade(index, usage, subject, object) else {
            continue;
        };
        if g.score > best.score {
            best = g;
            if best.score >= 1.0 {
                break;
            }
        }
    }
    best
}
