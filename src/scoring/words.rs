//! Fuzzy word matching between an externally-produced transcript and the
//! target lyrics.
//!
//! The transcript oracle (speech recognition) is noisy, especially for
//! low-resource languages, so matching is forgiving: exact after punctuation
//! stripping, substring containment for longer words, and a length-scaled
//! character edit-distance tolerance otherwise.

/// Does a single candidate word count as a match for a target word?
///
/// Both inputs are expected pre-lowercased. Lengths are counted in
/// characters, not bytes, so Cyrillic lyrics behave the same as ASCII.
pub fn words_match(candidate: &str, target: &str) -> bool {
    let candidate = clean(candidate);
    let target = clean(target);
    if candidate == target {
        return true;
    }
    let candidate_len = candidate.chars().count();
    let target_len = target.chars().count();
    if candidate_len > 3
        && target_len > 3
        && (candidate.contains(target.as_str()) || target.contains(candidate.as_str()))
    {
        return true;
    }
    let distance = edit_distance(&candidate, &target);
    // Very short words over-match easily; give them only one edit of slack.
    let tolerance = if candidate_len.max(target_len) <= 3 { 1 } else { 2 };
    distance <= tolerance
}

/// Bag-of-words matching: for each target word, is there *any* word in the
/// candidate transcript that matches it? Order and position are ignored; the
/// returned flags are aligned positionally to `target_words` so the caller
/// can highlight them.
pub fn match_words(candidate_words: &[&str], target_words: &[&str]) -> Vec<bool> {
    target_words
        .iter()
        .map(|target| candidate_words.iter().any(|word| words_match(word, target)))
        .collect()
}

/// Strip punctuation and other non-letter noise from a recognized word.
fn clean(word: &str) -> String {
    word.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Plain character-level Levenshtein distance.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
