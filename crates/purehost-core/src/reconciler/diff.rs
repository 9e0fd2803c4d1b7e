use std::collections::HashSet;

/// Elements of `a` that do not appear in `b`.
///
/// Both inputs are treated as sets of names. The result keeps `a`'s
/// order and drops repeats, so callers issue one remote call per name in
/// a predictable sequence.
pub fn difference(a: &[String], b: &[String]) -> Vec<String> {
    let exclude: HashSet<&str> = b.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    a.iter()
        .filter(|item| !exclude.contains(item.as_str()) && seen.insert(item.as_str()))
        .cloned()
        .collect()
}
