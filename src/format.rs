//! Terminal rendering for model output.
//!
//! Not a full markdown parser. Handles the patterns that show up most in
//! LLM answers: headings, bold, inline code, fenced code blocks, bullets and
//! horizontal rules.

use colored::Colorize;

/// Widest a horizontal rule is drawn, even on a wide terminal.
const MAX_RULE_WIDTH: usize = 100;

/// Renders `text` for display on a terminal.
pub fn render_markdown_lite(text: &str) -> String {
    let mut output = String::new();
    let mut in_code_block = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            if in_code_block {
                in_code_block = false;
                output.push('\n');
            } else {
                in_code_block = true;
                let lang = trimmed.trim_start_matches('`').trim();
                if !lang.is_empty() {
                    output.push_str(&format!("  {}\n", lang.dimmed()));
                }
            }
            continue;
        }

        if in_code_block {
            output.push_str(&format!("  {}\n", line.dimmed()));
            continue;
        }

        output.push_str(&render_line(line));
        output.push('\n');
    }

    if output.ends_with('\n') {
        output.pop();
    }
    output
}

fn render_line(line: &str) -> String {
    let trimmed = line.trim();
    if is_rule(trimmed) {
        return "─".repeat(rule_width()).dimmed().to_string();
    }
    if let Some(heading) = heading_text(trimmed) {
        return render_inline(heading).bold().cyan().to_string();
    }
    let indent = &line[..line.len() - line.trim_start().len()];
    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return format!("{indent}• {}", render_inline(item));
    }
    render_inline(line)
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3
        && (line.chars().all(|c| c == '-')
            || line.chars().all(|c| c == '*')
            || line.chars().all(|c| c == '_'))
}

fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        line[hashes..].strip_prefix(' ').map(str::trim)
    } else {
        None
    }
}

fn rule_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
        .clamp(1, MAX_RULE_WIDTH)
}

/// Handle **bold** and `inline code` within a single line.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        if i + 1 < len && chars[i] == '*' && chars[i + 1] == '*' {
            if let Some(end) = find_closing(&chars, i + 2, &['*', '*']) {
                let bold_text: String = chars[i + 2..end].iter().collect();
                result.push_str(&bold_text.bold().to_string());
                i = end + 2;
                continue;
            }
        }

        if chars[i] == '`' {
            if let Some(end) = find_closing(&chars, i + 1, &['`']) {
                let code_text: String = chars[i + 1..end].iter().collect();
                result.push_str(&code_text.yellow().to_string());
                i = end + 1;
                continue;
            }
        }

        result.push(chars[i]);
        i += 1;
    }

    result
}

fn find_closing(chars: &[char], start: usize, pat: &[char]) -> Option<usize> {
    if chars.len() < pat.len() {
        return None;
    }
    (start..=chars.len() - pat.len()).find(|&i| chars[i..i + pat.len()] == *pat)
}

/// Shortens `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_inline_markers_are_stripped() {
        plain();
        assert_eq!(
            render_markdown_lite("Use **cargo** and `rustc`."),
            "Use cargo and rustc."
        );
    }

    #[test]
    fn test_unclosed_markers_are_kept() {
        plain();
        assert_eq!(render_markdown_lite("a ** b ` c"), "a ** b ` c");
        assert_eq!(render_markdown_lite("*"), "*");
    }

    #[test]
    fn test_code_block_is_indented() {
        plain();
        let out = render_markdown_lite("Here:\n```rust\nfn main() {}\n```\nDone.");
        assert_eq!(out, "Here:\n  rust\n  fn main() {}\n\nDone.");
    }

    #[test]
    fn test_headings_and_bullets() {
        plain();
        let out = render_markdown_lite("## Steps\n- one\n  * two");
        assert_eq!(out, "Steps\n• one\n  • two");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long system prompt", 10), "a long ...");
    }
}
