//! Splits a raw model reply into at most five clean prompt lines.

/// Upper bound on prompts returned per generation.
pub const MAX_PROMPTS: usize = 5;

/// Returned alone when nothing in the reply survives cleaning.
pub const FALLBACK_PROMPT: &str = "Не удалось сгенерировать промпты. Попробуйте ещё раз.";

const BULLETS: [char; 4] = ['#', '-', '*', '•'];
const NUMBER_TERMINATORS: [char; 3] = ['.', ')', ':'];

/// Parse `raw` into 1–5 non-empty prompts, preserving order.
pub fn parse(raw: &str) -> Vec<String> {
    let prompts: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(BULLETS))
        .map(|line| strip_number(line).trim())
        .filter(|line| !line.is_empty())
        .take(MAX_PROMPTS)
        .map(str::to_string)
        .collect();

    if prompts.is_empty() {
        vec![FALLBACK_PROMPT.to_string()]
    } else {
        prompts
    }
}

/// Remove a leading `D.`, `D)`, `D:` or `DD.`, `DD)`, `DD:` marker.
///
/// The marker is only stripped when something follows it.
fn strip_number(line: &str) -> &str {
    let chars: Vec<char> = line.chars().take(4).collect();
    let is_digit = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_digit());
    let is_term = |i: usize| chars.get(i).is_some_and(|c| NUMBER_TERMINATORS.contains(c));

    // Digits and terminators are single-byte, so char counts equal byte offsets here.
    if chars.len() > 2 && is_digit(0) && is_term(1) {
        &line[2..]
    } else if chars.len() > 3 && is_digit(0) && is_digit(1) && is_term(2) {
        &line[3..]
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_markers() {
        assert_eq!(
            parse("1. Do X\n2) Do Y\n- ignore\nDo Z"),
            vec!["Do X", "Do Y", "Do Z"]
        );
    }

    #[test]
    fn test_empty_input_falls_back() {
        assert_eq!(parse(""), vec![FALLBACK_PROMPT]);
    }

    #[test]
    fn test_only_noise_falls_back() {
        assert_eq!(parse("# Title\n\n* bullet\n• dot\n   \n"), vec![FALLBACK_PROMPT]);
    }

    #[test]
    fn test_truncates_to_five() {
        let raw = (1..=8).map(|i| format!("Prompt {i}")).collect::<Vec<_>>().join("\n");
        let prompts = parse(&raw);
        assert_eq!(prompts.len(), 5);
        assert_eq!(prompts[0], "Prompt 1");
        assert_eq!(prompts[4], "Prompt 5");
    }

    #[test]
    fn test_two_digit_numbers() {
        assert_eq!(parse("10: Tenth\n12) Twelfth"), vec!["Tenth", "Twelfth"]);
    }

    #[test]
    fn test_marker_needs_trailing_text() {
        // "3." alone has nothing after the marker: kept as-is.
        assert_eq!(parse("3."), vec!["3."]);
        // "3. " trims to "3." as well.
        assert_eq!(parse("3. "), vec!["3."]);
        // "3.x" loses the marker.
        assert_eq!(parse("3.x"), vec!["x"]);
    }

    #[test]
    fn test_number_without_terminator_kept() {
        assert_eq!(parse("24/7 support script"), vec!["24/7 support script"]);
    }

    #[test]
    fn test_three_digit_prefix_not_stripped() {
        assert_eq!(parse("100. Hundred"), vec!["100. Hundred"]);
    }

    #[test]
    fn test_crlf_and_cyrillic() {
        let raw = "1. Помоги мне составить план\r\n2. Проанализируй отзывы\r\n";
        assert_eq!(
            parse(raw),
            vec!["Помоги мне составить план", "Проанализируй отзывы"]
        );
    }

    #[test]
    fn test_indented_bullet_is_dropped() {
        assert_eq!(parse("   - nested\nKeep me"), vec!["Keep me"]);
    }
}
