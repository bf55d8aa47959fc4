/// Drops one wrapping pair of parentheses from a directive group, so
/// `(greet('world'))` reaches the handler as `greet('world')`.
///
/// Only the outermost pair is removed; text that does not both start with `(`
/// and end with `)` is returned as is.
pub fn strip_outer_parens(group: &str) -> &str {
    if group.len() >= 2 && group.starts_with('(') && group.ends_with(')') {
        &group[1..group.len() - 1]
    } else {
        group
    }
}
