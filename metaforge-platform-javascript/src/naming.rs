//! JavaScript naming conventions layered onto the meta-model.

/// Maximum rendered width of a generated comment line.
pub const COMMENT_BUDGET: usize = 80;

/// Translate a package path from the model's delimiter to JavaScript's `.`
/// namespace delimiter.
pub fn js_path(path: &str, delimiter: &str) -> String {
    if delimiter == "." {
        path.to_string()
    } else {
        path.replace(delimiter, ".")
    }
}

/// The identifier used for an attribute in generated JavaScript. Read-only
/// and private attributes follow the `_` prefix convention.
pub fn js_identifier(name: &str, is_public: bool, is_read_only: bool) -> String {
    if is_read_only || !is_public {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

/// A plural form good enough for REST-ish resource names.
pub fn plural(name: &str) -> String {
    if name.ends_with("ch")
        || name.ends_with("sh")
        || name.ends_with('s')
        || name.ends_with('x')
        || name.ends_with('z')
    {
        format!("{name}es")
    } else if let Some(stem) = name.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
        && !stem.is_empty()
    {
        format!("{stem}ies")
    } else {
        format!("{name}s")
    }
}

/// Greedy word-wrap of a free-text comment into lines no wider than
/// `budget` characters.
///
/// A word goes on the current line only when the line plus a separating
/// space plus the word still fits; otherwise the line is flushed and the
/// word starts the next one. A single word wider than the budget stands
/// alone on its own line. Embedded line breaks are normalized to the `<p>`
/// markup token. Returns an empty sequence for an empty comment.
pub fn wrap_comment(comment: &str, budget: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in comment.split(' ').filter(|w| !w.is_empty()) {
        if !line.is_empty() && line.len() + 1 + word.len() > budget {
            lines.push(line.replace('\n', "<p>"));
            line = String::new();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line.replace('\n', "<p>"));
    }
    lines
}
