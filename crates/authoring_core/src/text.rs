//! crates/authoring_core/src/text.rs
//!
//! Plain-text helpers shared by generation and assembly.

/// Characters that mark a bullet line in generated content.
const BULLET_MARKERS: [char; 2] = ['-', '•'];

/// Maximum number of titles taken from a free-text outline.
pub const MAX_OUTLINE_TITLES: usize = 8;

/// Removes markdown emphasis and heading markers and trims the result.
///
/// Content is treated as plain text downstream, so `**`, `*` and `#` runs are
/// dropped wherever they appear.
pub fn clean_markdown(text: &str) -> String {
    ["**", "*", "###", "##", "#"]
        .iter()
        .fold(text.to_string(), |acc, marker| acc.replace(marker, ""))
        .trim()
        .to_string()
}

pub fn is_bullet_line(line: &str) -> bool {
    line.starts_with(BULLET_MARKERS)
}

/// Strips leading bullet markers (and the whitespace around them).
pub fn strip_bullet_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| BULLET_MARKERS.contains(&c) || c.is_whitespace())
        .trim_end()
}

/// Non-empty, trimmed lines of `content`.
pub fn content_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split('\n').map(str::trim).filter(|l| !l.is_empty())
}

/// Parses an outline answer into section titles.
///
/// The model is asked for a JSON array of strings. When the answer is not one
/// (or is wrapped in prose), it falls back to one title per non-empty line,
/// bullet markers removed, capped at `MAX_OUTLINE_TITLES`.
pub fn parse_outline(raw: &str) -> Vec<String> {
    if let Some(titles) = parse_json_titles(raw.trim()) {
        return titles;
    }
    if let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) {
        if start < end {
            if let Some(titles) = parse_json_titles(&raw[start..=end]) {
                return titles;
            }
        }
    }

    raw.lines()
        .map(strip_bullet_marker)
        .filter(|l| !l.is_empty())
        .take(MAX_OUTLINE_TITLES)
        .map(str::to_string)
        .collect()
}

fn parse_json_titles(candidate: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(candidate).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_markdown_removes_emphasis_and_headings() {
        assert_eq!(clean_markdown("**Bold** # Head *x*"), "Bold  Head x");
        assert_eq!(clean_markdown("### Title\n- item"), "Title\n- item");
    }

    #[test]
    fn bullet_markers_are_recognised_and_stripped() {
        assert!(is_bullet_line("- one"));
        assert!(is_bullet_line("• two"));
        assert!(!is_bullet_line("three - four"));
        assert_eq!(strip_bullet_marker("-- • nested"), "nested");
    }

    #[test]
    fn outline_accepts_a_json_array() {
        let titles = parse_outline(r#"["Intro", "Market", "Risks"]"#);
        assert_eq!(titles, vec!["Intro", "Market", "Risks"]);
    }

    #[test]
    fn outline_finds_an_array_inside_prose() {
        let titles = parse_outline("Here you go:\n[\"A\", \"B\"]\nEnjoy");
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn outline_falls_back_to_lines() {
        let raw = "- Intro\n• Market size\n\n  - Risks  \nPlan";
        assert_eq!(
            parse_outline(raw),
            vec!["Intro", "Market size", "Risks", "Plan"]
        );
    }

    #[test]
    fn outline_fallback_is_capped() {
        let raw = (1..=12)
            .map(|i| format!("- Part {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let titles = parse_outline(&raw);
        assert_eq!(titles.len(), MAX_OUTLINE_TITLES);
        assert_eq!(titles[0], "Part 1");
    }

    #[test]
    fn json_object_is_not_an_outline() {
        let titles = parse_outline(r#"{"titles": 3}"#);
        assert_eq!(titles, vec![r#"{"titles": 3}"#]);
    }
}
