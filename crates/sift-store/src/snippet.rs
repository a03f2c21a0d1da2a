//! Content excerpts around the first match.

/// Excerpt of at most `length` characters of `content`, centered on the
/// first occurrence of any of `words`.
///
/// Matching ignores case. Without a match the excerpt starts at the
/// beginning of the content. Cut ends are marked with `…`, which does not
/// count towards `length`.
pub fn content_match(content: &str, words: &[String], length: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= length {
        return content.trim().to_string();
    }

    let lowered: Vec<char> = chars.iter().map(|&c| lower(c)).collect();
    let first = words
        .iter()
        .filter(|w| !w.is_empty())
        .filter_map(|word| {
            let needle: Vec<char> = word.chars().map(lower).collect();
            lowered
                .windows(needle.len())
                .position(|window| window == needle.as_slice())
                .map(|start| (start, needle.len()))
        })
        .min();

    let start = match first {
        Some((position, width)) => {
            let before = length.saturating_sub(width) / 2;
            position.saturating_sub(before).min(chars.len() - length)
        }
        None => 0,
    };
    let end = start + length;

    let body: String = chars[start..end].iter().collect();
    let mut excerpt = String::with_capacity(body.len() + 6);
    if start > 0 {
        excerpt.push('…');
    }
    excerpt.push_str(body.trim());
    if end < chars.len() {
        excerpt.push('…');
    }
    excerpt
}

fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
