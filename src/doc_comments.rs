// ==============================================================================
// Documentation Comments
// ==============================================================================
//
// Leading comments double as API documentation. Two readings of the same
// comment are used:
//
// - the *title line*: the first paragraph joined into one line, split on `;`.
//   The text before the first `;` is the title, the text after it is an
//   example value (`// Age; 42` documents an integer field with example 42).
// - the *description*: every line, each cut at its own first `;`, joined with
//   newlines.

use crate::model::proto::Comment;
use crate::model::swagger::Example;

/// Extract the title and optional example from a comment's first paragraph.
///
/// The example is parsed as an integer, then as a (finite) float, and
/// otherwise kept as a string. An empty example segment means no example.
pub fn title_and_example(comment: Option<&Comment>) -> (String, Option<Example>) {
    let Some(comment) = comment else {
        return (String::new(), None);
    };

    let first_paragraph = comment
        .lines
        .iter()
        .map(|line| line.trim())
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut segments = first_paragraph.split(';');
    let title = segments.next().unwrap_or_default().trim().to_string();
    let example = segments.next().and_then(parse_example);
    (title, example)
}

/// The title alone, for declarations that have no use for an example.
pub fn title(comment: Option<&Comment>) -> String {
    title_and_example(comment).0
}

fn parse_example(raw: &str) -> Option<Example> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Example::Integer(n));
    }
    if let Ok(f) = raw.parse::<f64>()
        && f.is_finite()
    {
        return Some(Example::Float(f));
    }
    Some(Example::Text(raw.to_string()))
}

/// Multi-line description: each line trimmed and cut at its first `;`.
pub fn description(comment: Option<&Comment>) -> String {
    let Some(comment) = comment else {
        return String::new();
    };
    comment
        .lines
        .iter()
        .map(|line| {
            let line = line.trim();
            match line.split_once(';') {
                Some((before, _)) => before.trim_end(),
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn the comment text recorded for a declaration into documentation
/// lines, or `None` if nothing but whitespace is left.
///
/// The text arrives without its `//`, `/*` and `*/` markers. A third slash
/// (`///`) and the `*` decoration of block comments are stripped here, as are
/// blank lines at the start and end (left over from `/**` and a closing `*/`
/// on its own line).
pub fn parse_comment(text: &str) -> Option<Comment> {
    let mut lines: Vec<String> = text
        .lines()
        .map(|line| {
            if let Some(rest) = line.strip_prefix('/') {
                return rest.to_string();
            }
            match line.trim_start().strip_prefix('*') {
                Some(rest) => rest.to_string(),
                None => line.to_string(),
            }
        })
        .collect();

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let leading_blank = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading_blank);

    (!lines.is_empty()).then_some(Comment { lines })
}
