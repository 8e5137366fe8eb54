//! Merging tagged phrases with direct matches and numbering chunks.

use super::{spans_overlap, ChunkId, ChunkKind, MatchItem};

/// Combine tagger output with explicit vocabulary hits.
///
/// Entities and relations are merged separately. A tagged phrase that
/// overlaps a direct match is replaced by the direct match, widened to the
/// union of both spans with its raw text re-sliced from `question`. Direct
/// matches that overlap nothing are kept as they are. Each kind is then
/// sorted by position and numbered `EC1..` / `PC1..`.
pub fn merge_matches(question: &str, tagged: &[MatchItem], direct: &[MatchItem]) -> Vec<MatchItem> {
    let mut out = Vec::new();
    for kind in [ChunkKind::Entity, ChunkKind::Relation] {
        let is_entity = kind == ChunkKind::Entity;
        let direct: Vec<&MatchItem> = direct.iter().filter(|m| m.is_entity == is_entity).collect();

        let mut merged: Vec<MatchItem> = Vec::new();
        // Position in `merged` of each direct match already absorbed.
        let mut absorbed: Vec<Option<usize>> = vec![None; direct.len()];

        for phrase in tagged.iter().filter(|m| m.is_entity == is_entity) {
            let hit = (0..direct.len()).find(|&i| {
                let span = absorbed[i].map_or(direct[i].span(), |j| merged[j].span());
                spans_overlap(phrase.span(), span)
            });
            let Some(i) = hit else {
                merged.push(phrase.clone());
                continue;
            };

            let slot = *absorbed[i].get_or_insert_with(|| {
                merged.push(direct[i].clone());
                merged.len() - 1
            });
            let target = &mut merged[slot];
            target.begin = target.begin.min(phrase.begin);
            target.end = target.end.max(phrase.end);
            if let Some(text) = question.get(target.begin..target.end) {
                target.raw_text = text.to_string();
            }
        }

        for (d, slot) in direct.iter().zip(&absorbed) {
            if slot.is_none() {
                tracing::debug!(text = %d.raw_text, "direct match kept without a tagged phrase");
                merged.push((*d).clone());
            }
        }

        merged.sort_by_key(|m| m.begin);
        for (n, item) in merged.iter_mut().enumerate() {
            item.chunk = Some(ChunkId {
                kind,
                number: n as u32 + 1,
            });
        }
        out.extend(merged);
    }
    out
}
