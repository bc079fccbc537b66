fn fold(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}

fn distance(input: &str, candidate: &str) -> Option<usize> {
    let a = fold(input);
    let b = fold(candidate);
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if a == b {
        return Some(0);
    }
    if a.contains(&b) || b.contains(&a) {
        return Some(1);
    }
    Some(edit_distance(&a, &b))
}

fn tolerance(input: &str) -> usize {
    match fold(input).len() {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        n => (n * 35 / 100).max(3),
    }
}

/// Closest candidates to `input`, best first, at most `limit` of them.
pub fn suggest(input: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let allowed = tolerance(input);
    if allowed == 0 {
        return Vec::new();
    }
    let mut scored: Vec<(usize, &String)> = candidates
        .iter()
        .filter_map(|c| distance(input, c).filter(|d| *d <= allowed).map(|d| (d, c)))
        .collect();
    scored.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.len().cmp(&b.1.len()))
            .then_with(|| a.1.cmp(b.1))
    });
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit.max(1))
        .map(|(_, c)| c.clone())
        .collect()
}
