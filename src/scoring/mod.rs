//! Candidate compatibility scoring against the ontology's axioms.
//!
//! Two independent signals for a (property, subject, object) triple:
//!
//! - [`restriction_score`]: a hard 0/1 gate from declared domain and range
//! - [`usage_score`]: a graded signal from asserted usages of the property
//!
//! Both also report whether the arguments must be swapped to fit the
//! property's direction.

pub mod restriction;
pub mod usage;

pub use restriction::restriction_score;
pub use usage::usage_score;

/// A score with an optional argument-order decision.
///
/// `swap == None` means the signal says nothing about argument order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compatibility {
    pub score: f32,
    pub swap: Option<bool>,
}

impl Compatibility {
    /// No constraint applies: fully compatible, order undecided.
    pub const UNCONSTRAINED: Compatibility = Compatibility { score: 1.0, swap: None };
    /// Incompatible, order undecided.
    pub const INCOMPATIBLE: Compatibility = Compatibility { score: 0.0, swap: None };

    pub fn new(score: f32, swap: bool) -> Self {
        Self { score, swap: Some(swap) }
    }

    /// Whether this passes the restriction gate.
    pub fn is_valid(&self) -> bool {
        self.score >= 1.0
    }
}
