//! Coalescing of adjacent candidate windows.

use crate::config::{PredictionConfig, REASONING_SEPARATOR, ReasoningMerge};
use crate::types::DreamPrediction;

/// Sorts candidates by start time and merges windows closer than `merge_gap_ms`.
///
/// A negative gap is treated as zero, so the result never overlaps.
///
/// The sort is stable, so candidates sharing a start keep emission order.
/// Merging is a single left-to-right pass; because the accumulator's end
/// grows with every merge, a chain of close windows collapses into one.
pub fn merge_predictions(
    mut candidates: Vec<DreamPrediction>,
    config: &PredictionConfig,
) -> Vec<DreamPrediction> {
    candidates.sort_by_key(|p| p.interval.start());

    let gap = config.merge_gap();
    let mut merged: Vec<DreamPrediction> = Vec::with_capacity(candidates.len());

    for next in candidates {
        if let Some(current) = merged.last_mut() {
            if next.interval.start() - current.interval.end() < gap {
                tracing::trace!(
                    current_start = %current.interval.start(),
                    next_start = %next.interval.start(),
                    "merging adjacent windows"
                );
                absorb(current, next, config.reasoning_merge);
                continue;
            }
        }
        merged.push(next);
    }

    merged
}

fn absorb(current: &mut DreamPrediction, next: DreamPrediction, policy: ReasoningMerge) {
    current.interval = current.interval.extend_to(&next.interval);
    current.confidence = current.confidence.max(next.confidence);
    current.was_logged |= next.was_logged;

    if policy == ReasoningMerge::Concatenate {
        for clause in next.reasoning.split(REASONING_SEPARATOR) {
            let already_present = current
                .reasoning
                .split(REASONING_SEPARATOR)
                .any(|existing| existing == clause);
            if !already_present {
                current.reasoning.push_str(REASONING_SEPARATOR);
                current.reasoning.push_str(clause);
            }
        }
    }
}
