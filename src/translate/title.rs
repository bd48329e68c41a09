// src/translate/title.rs
// Title extraction heuristic for untitled multi-agent hypotheses

/// Placeholder used when no title can be derived from the content.
pub const PLACEHOLDER_TITLE: &str = "Generated Hypothesis";

const MAX_TITLE_CHARS: usize = 100;

/// Derive a title from free-form hypothesis content.
///
/// Rule order: a marker prefix ("Title:" / "Hypothesis:"), a fully
/// upper-case line, or a short line within the first five lines wins; then
/// the text before the first period (truncated with an ellipsis); then a
/// fixed placeholder. Pure function, tolerant of arbitrary text.
pub fn extract_title(content: &str) -> String {
    if content.trim().is_empty() {
        return PLACEHOLDER_TITLE.to_string();
    }

    for line in content.lines().take(5) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let stripped = line
            .strip_prefix("Title:")
            .or_else(|| line.strip_prefix("Hypothesis:"));
        let qualifies = stripped.is_some()
            || is_upper_case(line)
            || line.chars().count() < MAX_TITLE_CHARS;

        if qualifies {
            let title = stripped.unwrap_or(line).trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
    }

    // Fall back to the first sentence
    let first_sentence = content
        .split('.')
        .next()
        .unwrap_or_default()
        .trim()
        .replace('\n', " ");
    if first_sentence.is_empty() {
        return PLACEHOLDER_TITLE.to_string();
    }
    if first_sentence.chars().count() > MAX_TITLE_CHARS {
        let truncated: String = first_sentence.chars().take(MAX_TITLE_CHARS).collect();
        format!("{truncated}...")
    } else {
        first_sentence
    }
}

fn is_upper_case(line: &str) -> bool {
    line.chars().any(|c| c.is_alphabetic()) && line == line.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    // A line long enough to fail the short-line rule
    fn long_line() -> String {
        "word ".repeat(30).trim_end().to_string()
    }

    #[test]
    fn marker_prefix_wins() {
        let content = format!("{}\nTitle: Mitochondrial transfer drives recovery", long_line());
        assert_eq!(
            extract_title(&content),
            "Mitochondrial transfer drives recovery"
        );

        let content = format!("{}\nHypothesis: ALKBH1 represses repair", long_line());
        assert_eq!(extract_title(&content), "ALKBH1 represses repair");
    }

    #[test]
    fn upper_case_line_qualifies() {
        let shouting = "SYNAPTIC ".repeat(15).trim_end().to_string();
        let content = format!("{}\n{shouting}", long_line());
        assert_eq!(extract_title(&content), shouting);
    }

    #[test]
    fn short_line_qualifies() {
        let content = "A short candidate title\nfollowed by a much longer body of text.";
        assert_eq!(extract_title(content), "A short candidate title");
    }

    #[test]
    fn falls_back_to_first_sentence() {
        let content = format!("Short start. {}", long_line());
        let title = extract_title(&content);
        assert_eq!(title, "Short start");
    }

    #[test]
    fn long_first_sentence_is_truncated() {
        let content = format!("{}{}", "x".repeat(150), ". tail");
        let title = extract_title(&content);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 103);
    }

    #[test]
    fn empty_content_yields_placeholder() {
        assert_eq!(extract_title(""), PLACEHOLDER_TITLE);
        assert_eq!(extract_title("   \n  "), PLACEHOLDER_TITLE);
    }
}
