//! Query templates: chunk placeholders, their roles, and filling.
//!
//! Templates are query strings with placeholders such as `<EC1>`, `<PC1>`
//! or `<HAS_EC2>`. The first two stand for an entity and a relation
//! phrase; `IS_ECn` / `HAS_ECn` use entity chunk `ECn` in a property
//! position.

pub mod fill;
pub mod meta;

use std::sync::LazyLock;

use regex::Regex;

use crate::vocab::{ChunkId, ChunkKind};

pub use fill::QueryFiller;
pub use meta::TemplateMeta;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(IS_EC|HAS_EC|EC|PC)([0-9]+)>").unwrap());

/// One placeholder occurrence in a template string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub start: usize,
    pub end: usize,
    /// The chunk it resolves to; `IS_EC2` resolves to `EC2`.
    pub chunk: ChunkId,
    /// Written as `IS_ECn` or `HAS_ECn`.
    pub as_property: bool,
}

/// All placeholders in `template`, left to right.
pub fn placeholders(template: &str) -> impl Iterator<Item = Placeholder> + '_ {
    RE_PLACEHOLDER.captures_iter(template).filter_map(|caps| {
        let whole = caps.get(0)?;
        let number = caps[2].parse().ok()?;
        let (kind, as_property) = match &caps[1] {
            "PC" => (ChunkKind::Relation, false),
            "EC" => (ChunkKind::Entity, false),
            _ => (ChunkKind::Entity, true),
        };
        Some(Placeholder {
            start: whole.start(),
            end: whole.end(),
            chunk: ChunkId { kind, number },
            as_property,
        })
    })
}
