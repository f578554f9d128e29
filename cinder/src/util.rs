//! Shared utility functions

/// Levenshtein edit distance between two strings, counted in chars.
/// Keeps only two rows of the table.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest candidate within `threshold` edits. Ties go to the
/// alphabetically first name so the hint does not depend on map order.
pub fn find_similar_name<'a>(name: &str, candidates: &[&'a str], threshold: usize) -> Option<&'a str> {
    candidates
        .iter()
        .filter(|&&c| c != name)
        .map(|&c| (levenshtein_distance(name, c), c))
        .filter(|&(d, _)| d <= threshold)
        .min()
        .map(|(_, c)| c)
}

/// "did you mean" suffix for an unknown name, empty when there is no match
pub fn format_suggestion_hint(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(name) => format!("\n  hint: did you mean `{name}`?"),
        None => String::new(),
    }
}
