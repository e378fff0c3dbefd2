//! Content-line handling: unfolding and `NAME;PARAMS:VALUE` splitting.

/// Join folded lines into logical content lines.
///
/// Trailing `\r` is stripped. A line starting with a space or tab continues
/// the previous line; exactly one leading whitespace character is removed.
/// Continuations before the first line are dropped.
pub fn unfold(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw in input.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.starts_with([' ', '\t']) {
            if let Some(last) = lines.last_mut() {
                // Both continuation markers are single-byte.
                last.push_str(&line[1..]);
            }
            continue;
        }
        lines.push(line.to_string());
    }

    lines
}

/// Split a content line into property name and raw value.
///
/// The name ends at the first `;` or `:`; the value starts after the first
/// `:`. Parameters in between are discarded. Lines without a `:` yield
/// `None`.
pub fn split_property(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let name_end = line.find([';', ':']).unwrap_or(colon);
    let name = line[..name_end].trim();
    if name.is_empty() {
        return None;
    }
    Some((name, &line[colon + 1..]))
}
