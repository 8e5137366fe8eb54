//! Linking phrases to ontology vocabulary.
//!
//! [`EntityLinker`] proposes ranked candidates for each phrase on its own;
//! [`CombinationSelector`] then picks the jointly consistent binding for a
//! relation and its arguments.

pub mod entity;
pub mod selector;

pub use entity::EntityLinker;
pub use selector::{Combination, CombinationSelector, Selection, TRANSLATION_WEIGHT, USAGE_WEIGHT};
