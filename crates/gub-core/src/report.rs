//! Renders a diff result into bounded-size Telegram HTML messages.
//!
//! Chunks never split a line; a line that would overflow the current chunk
//! seals it and opens the next one, so concatenating all chunks in order
//! reproduces the full report.

use crate::diff::DiffResult;

const RECIPROCAL: &str =
    "🎉 Fully reciprocal! Everyone you follow follows you back, and you follow all of your followers.";
const NONE_MISSING_FOLLOW_BACK: &str = "🎉 Everyone you follow is following you back!";
const NONE_UNFOLLOWED: &str = "✅ You follow back all of your followers!";

/// Bulleted hyperlink line for one login.
fn entry_line(login: &str) -> String {
    format!("• <a href=\"https://github.com/{login}\">{login}</a>")
}

/// Build the ordered chunk sequence for a diff result.
///
/// `limit` is the per-chunk ceiling in bytes (the transport's message-size
/// limit with safety margin).
pub fn build_report(diff: &DiffResult, limit: usize) -> Vec<String> {
    if diff.is_reciprocal() {
        return vec![RECIPROCAL.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();

    if diff.not_following_back.is_empty() {
        lines.push(NONE_MISSING_FOLLOW_BACK.to_string());
    } else {
        lines.push(format!(
            "🚫 Not following you back ({}):",
            diff.not_following_back.len()
        ));
        for login in &diff.not_following_back {
            lines.push(entry_line(login));
        }
    }

    lines.push(String::new());

    if diff.not_followed_back.is_empty() {
        lines.push(NONE_UNFOLLOWED.to_string());
    } else {
        lines.push(format!(
            "👀 You don't follow back ({}):",
            diff.not_followed_back.len()
        ));
        for login in &diff.not_followed_back {
            lines.push(entry_line(login));
        }
    }

    chunk_lines(&lines, limit)
}

/// Pack lines into chunks of at most `limit` bytes, joined with newlines.
///
/// A blank separator line that overflows the current chunk survives as a
/// leading newline on the next one, so joining the chunks with newlines
/// reproduces the input lines exactly.
fn chunk_lines(lines: &[String], limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut started = false;

    for line in lines {
        if started && !current.is_empty() && current.len() + 1 + line.len() > limit {
            chunks.push(std::mem::take(&mut current));
            current.push_str(line);
            continue;
        }
        if started {
            current.push('\n');
        }
        current.push_str(line);
        started = true;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(not_following_back: &[&str], not_followed_back: &[&str]) -> DiffResult {
        DiffResult {
            not_following_back: not_following_back.iter().map(|s| s.to_string()).collect(),
            not_followed_back: not_followed_back.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn reciprocal_yields_single_message() {
        let chunks = build_report(&diff(&[], &[]), 3000);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("reciprocal"));
    }

    #[test]
    fn two_single_entry_sections() {
        let chunks = build_report(&diff(&["C"], &["B"]), 3000);
        assert_eq!(chunks.len(), 1);
        let text = &chunks[0];
        assert!(text.contains("Not following you back (1):"));
        assert!(text.contains("https://github.com/C"));
        assert!(text.contains("You don't follow back (1):"));
        assert!(text.contains("https://github.com/B"));
        // Section order is fixed.
        assert!(text.find("Not following").unwrap() < text.find("don't follow back").unwrap());
    }

    #[test]
    fn one_empty_section_gets_a_short_line_instead_of_a_header() {
        let chunks = build_report(&diff(&["C"], &[]), 3000);
        let text = chunks.join("\n");
        assert!(text.contains("You follow back all of your followers!"));
        assert!(!text.contains("don't follow back ("));
    }

    #[test]
    fn chunks_respect_the_ceiling_and_never_split_lines() {
        let logins: Vec<String> = (0..40).map(|i| format!("user-{i:02}")).collect();
        let refs: Vec<&str> = logins.iter().map(String::as_str).collect();
        let limit = 120;
        let chunks = build_report(&diff(&refs, &[]), limit);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= limit, "chunk over ceiling: {}", chunk.len());
            for line in chunk.lines() {
                // Every non-empty line is either a header, a congratulation,
                // or a complete entry line.
                assert!(
                    line.is_empty()
                        || line.starts_with('•')
                        || line.contains(':')
                        || line.contains('!'),
                    "split line: {line:?}"
                );
            }
        }

        // Concatenation reproduces the full report in order.
        let whole = chunks.join("\n");
        let mut last = 0;
        for login in &logins {
            let pos = whole.find(&format!(">{login}<")).expect("login present");
            assert!(pos >= last, "entries out of order");
            last = pos;
        }
    }

    #[test]
    fn separator_overflowing_a_chunk_boundary_is_preserved() {
        let lines: Vec<String> = ["aaaa", "bbbb", "", "cccc"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        // "aaaa\nbbbb" fills the chunk exactly; the blank separator is what
        // overflows it.
        let chunks = chunk_lines(&lines, 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb".to_string(), "\ncccc".to_string()]);
        assert_eq!(chunks.join("\n"), lines.join("\n"));
        for chunk in &chunks {
            assert!(chunk.len() <= 9);
        }
    }

    #[test]
    fn deterministic_for_identical_input() {
        let d = diff(&["a", "b", "c"], &["x"]);
        assert_eq!(build_report(&d, 3000), build_report(&d, 3000));
    }
}
