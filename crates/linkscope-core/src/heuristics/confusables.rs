//! Folding of common digit/symbol lookalikes onto the letters they imitate.

/// Lowercases `s` and maps `0→o 1→l 3→e 5→s 7→t @→a $→s !→i`.
pub fn normalize_lookalikes(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'l',
            '3' => 'e',
            '5' => 's',
            '7' => 't',
            '@' => 'a',
            '$' => 's',
            '!' => 'i',
            other => other,
        })
        .collect()
}
