//! Markdown cleanup for answers
//!
//! Answers usually arrive as markdown. The answer pane keeps the line
//! structure (headings, list items, quotes, code blocks) and drops inline
//! markers; history rows get a single flattened line.

/// Block-level role of one answer line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Heading,
    /// List item with its display marker (`•` or `3.`)
    Item(String),
    Quote,
    Code,
    Text,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerLine {
    pub kind: LineKind,
    /// Leading spaces of nested list items
    pub indent: usize,
    pub text: String,
}

impl AnswerLine {
    fn new(kind: LineKind, indent: usize, text: String) -> Self {
        Self { kind, indent, text }
    }
}

/// Split an answer into display lines with markdown markers removed.
pub fn answer_lines(text: &str) -> Vec<AnswerLine> {
    let mut lines = Vec::new();
    let mut in_code = false;

    for raw in text.lines() {
        let trimmed = raw.trim_start();
        let indent = raw.len() - trimmed.len();

        if trimmed.starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code {
            lines.push(AnswerLine::new(LineKind::Code, 0, raw.to_string()));
            continue;
        }
        if trimmed.is_empty() {
            lines.push(AnswerLine::new(LineKind::Blank, 0, String::new()));
            continue;
        }

        if let Some(rest) = heading_text(trimmed) {
            lines.push(AnswerLine::new(LineKind::Heading, 0, strip_inline(rest)));
        } else if let Some(rest) = quote_text(trimmed) {
            lines.push(AnswerLine::new(LineKind::Quote, 0, strip_inline(rest.trim_start())));
        } else if let Some((marker, rest)) = list_item(trimmed) {
            lines.push(AnswerLine::new(LineKind::Item(marker), indent, strip_inline(rest)));
        } else {
            lines.push(AnswerLine::new(LineKind::Text, 0, strip_inline(trimmed)));
        }
    }
    lines
}

/// One-line plain text for previews: markers gone, lines joined by spaces.
pub fn strip_markdown(text: &str) -> String {
    answer_lines(text)
        .into_iter()
        .filter(|line| line.kind != LineKind::Blank)
        .map(|line| line.text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    line[hashes..].strip_prefix(' ').map(str::trim)
}

/// `> text`, or a bare `>`; `>= 5` is ordinary text
fn quote_text(line: &str) -> Option<&str> {
    if line == ">" {
        return Some("");
    }
    line.strip_prefix("> ")
}

fn list_item(line: &str) -> Option<(String, &str)> {
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return Some(("•".to_string(), rest));
        }
    }

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|rest| (line[..digits + 1].to_string(), rest))
}

/// Remove emphasis asterisks, backticks and link targets.
fn strip_inline(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        match c {
            '`' => {
                rest = &rest[1..];
                continue;
            }
            '*' => {
                let run = rest.len() - rest.trim_start_matches('*').len();
                let next = rest[run..].chars().next();
                let opens = next.is_some_and(|n| !n.is_whitespace());
                let closes = prev.is_some_and(|p| !p.is_whitespace());
                if !(opens || closes) {
                    // A lone `*` between spaces is arithmetic, not emphasis
                    out.push_str(&rest[..run]);
                    prev = Some('*');
                }
                rest = &rest[run..];
                continue;
            }
            '[' => {
                if let Some((label, after)) = split_link(rest) {
                    out.push_str(label);
                    prev = label.chars().last();
                    rest = after;
                    continue;
                }
            }
            _ => {}
        }
        out.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// `[label](target)rest` to `(label, rest)`
fn split_link(s: &str) -> Option<(&str, &str)> {
    let close = s.find("](")?;
    let label = &s[1..close];
    if label.is_empty() || label.contains('[') {
        return None;
    }
    let target_end = s[close + 2..].find(')')?;
    Some((label, &s[close + 2 + target_end + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_markers_removed() {
        assert_eq!(strip_inline("**Total:** 42"), "Total: 42");
        assert_eq!(strip_inline("an *italic* word"), "an italic word");
        assert_eq!(strip_inline("use `mean()` here"), "use mean() here");
        assert_eq!(strip_inline("see [docs](https://x.io/a) now"), "see docs now");
        assert_eq!(strip_inline("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(strip_inline("[not a link]"), "[not a link]");
    }

    #[test]
    fn test_answer_lines_keep_structure() {
        let answer = concat!(
            "## Summary\n\nRevenue is **up**.\n",
            "- EU leads\n  - DE first\n2. Then US\n",
            "> note\n```\nx = 1\n```",
        );
        let lines = answer_lines(answer);

        assert_eq!(lines[0], AnswerLine::new(LineKind::Heading, 0, "Summary".into()));
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[2].text, "Revenue is up.");
        assert_eq!(lines[3], AnswerLine::new(LineKind::Item("•".into()), 0, "EU leads".into()));
        assert_eq!(lines[4], AnswerLine::new(LineKind::Item("•".into()), 2, "DE first".into()));
        assert_eq!(lines[5], AnswerLine::new(LineKind::Item("2.".into()), 0, "Then US".into()));
        assert_eq!(lines[6], AnswerLine::new(LineKind::Quote, 0, "note".into()));
        assert_eq!(lines[7], AnswerLine::new(LineKind::Code, 0, "x = 1".into()));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_lookalike_markers_are_text() {
        let lines = answer_lines("#hashtag and 2024.5 growth\n>= 5 rows");
        assert_eq!(lines[0].kind, LineKind::Text);
        assert_eq!(lines[0].text, "#hashtag and 2024.5 growth");
        assert_eq!(lines[1].kind, LineKind::Text);
    }

    #[test]
    fn test_strip_markdown_flattens() {
        assert_eq!(
            strip_markdown("# Result\n\n- **Mean** age: 27.5\n- Max: `30`"),
            "Result Mean age: 27.5 Max: 30"
        );
    }
}
