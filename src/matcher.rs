use crate::data_models::{SearchCandidate, Topic};

/// Case-insensitive containment check of both topic forms against a
/// candidate's title and snippet. True when any of the four pairs hits.
///
/// This is deliberately plain substring matching, no tokenization or scoring,
/// so a topic like "art" also matches "start". When `corrected` equals
/// `original` the four checks collapse to two without special-casing.
pub fn is_relevant(candidate: &SearchCandidate, topic: &Topic) -> bool {
    let title = candidate.title.to_lowercase();
    let snippet = candidate.snippet.to_lowercase();
    let original = topic.original.to_lowercase();
    let corrected = topic.corrected.to_lowercase();

    title.contains(&original)
        || title.contains(&corrected)
        || snippet.contains(&original)
        || snippet.contains(&corrected)
}
