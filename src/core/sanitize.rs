//! Strips reasoning markup that the backend sometimes leaks into answers
//! and memory dumps.

use regex::Regex;
use std::sync::LazyLock;

/// Shown in place of memory content that is empty once cleaned.
pub const NO_MEMORY_PLACEHOLDER: &str = "No memory yet";

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think>.*?</think>").expect("valid think pattern"));
static THINKING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<thinking>.*?</thinking>").expect("valid thinking pattern")
});
static BRACKET_THINK_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\[think\].*?\[/think\]").expect("valid bracket think pattern")
});
static THINK_WITH_ATTRIBUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<think.*?>.*?</think>").expect("valid attributed think pattern")
});
static THINK_PREFIXED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(think|thinking):.*$").expect("valid think line pattern")
});
static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid blank line pattern"));

fn clean_once(content: &str) -> String {
    let mut cleaned = content.to_string();
    for pattern in [
        &*THINK_BLOCK,
        &*THINKING_BLOCK,
        &*BRACKET_THINK_BLOCK,
        &*THINK_WITH_ATTRIBUTES,
        &*THINK_PREFIXED_LINE,
    ] {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    loop {
        let collapsed = BLANK_LINE_RUN.replace_all(&cleaned, "\n").into_owned();
        if collapsed == cleaned {
            break;
        }
        cleaned = collapsed;
    }

    cleaned.trim().to_string()
}

/// Remove think blocks, think-prefixed lines and blank-line runs.
///
/// Returns [`NO_MEMORY_PLACEHOLDER`] when nothing is left. The result is a
/// fixed point: cleaning it again yields the same string, even when a removal
/// stitches a new tag together or trimming exposes a `think:` line.
pub fn clean_memory_content(content: &str) -> String {
    let mut current = clean_once(content);
    loop {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    if current.is_empty() {
        NO_MEMORY_PLACEHOLDER.to_string()
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn removes_inline_think_block() {
        assert_eq!(clean_memory_content("A<think>secret</think>B"), "AB");
    }

    #[test]
    fn removes_think_prefixed_lines() {
        assert_eq!(clean_memory_content("x\nthinking: hidden\ny"), "x\ny");
        assert_eq!(clean_memory_content("THINK: loud\nkept"), "kept");
    }

    #[test]
    fn empty_and_blank_inputs_use_placeholder() {
        assert_eq!(clean_memory_content(""), NO_MEMORY_PLACEHOLDER);
        assert_eq!(clean_memory_content("  \n\t \n"), NO_MEMORY_PLACEHOLDER);
        assert_eq!(
            clean_memory_content("<think>only reasoning</think>"),
            NO_MEMORY_PLACEHOLDER
        );
    }

    #[test]
    fn handles_every_tag_variant_across_lines() {
        let raw = "Start\n<THINK>\nline one\nline two\n</THINK>\nMiddle\n<thinking>a\nb</thinking>\n[think]c[/think]End\n<think class=\"x\">d</think>Tail";
        assert_eq!(clean_memory_content(raw), "Start\nMiddle\nEnd\nTail");
    }

    #[test]
    fn matches_shortest_span_for_each_block() {
        assert_eq!(
            clean_memory_content("a<think>1</think>b<think>2</think>c"),
            "abc"
        );
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(clean_memory_content("one\n\n\n  \ntwo\n\nthree"), "one\ntwo\nthree");
    }

    #[test]
    fn removal_that_forms_new_tag_is_cleaned_too() {
        let raw = "<thi<think>x</think>nk>hidden</think>shown";
        assert_eq!(clean_memory_content(raw), "shown");
    }

    #[test]
    fn trimming_that_exposes_think_line_is_cleaned_too() {
        assert_eq!(clean_memory_content("  think: hidden\nshown"), "shown");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "",
            "   ",
            "plain answer",
            "A<think>secret</think>B",
            "x\nthinking: hidden\ny",
            "<thi<think>x</think>nk>y</think>z",
            "  think: a\n\n\nthinking: b\n c ",
            "[THINK]a[/think]\n\n[think]b",
            "No memory yet",
            "<think attr>\n</think>\n\n\n- item\n\n- item two",
        ];
        for sample in samples {
            let once = clean_memory_content(sample);
            assert_eq!(clean_memory_content(&once), once, "input: {sample:?}");
        }
    }

    const FRAGMENTS: &[&str] = &[
        "<think>", "</think>", "<thinking>", "</thinking>", "[think]", "[/think]",
        "<think a=\"1\">", "<THINK>", "<thi", "nk>", "think:", "Thinking:", "THINK: x",
        "\n", "\n\n", " \n ", "\t", " ", "answer", "- item", "**bold**", "No memory yet",
    ];

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]
        #[test]
        fn cleaning_any_fragment_mix_is_idempotent(
            parts in prop::collection::vec(prop::sample::select(FRAGMENTS), 0..24)
        ) {
            let raw = parts.concat();
            let once = clean_memory_content(&raw);
            prop_assert_eq!(clean_memory_content(&once), once.clone());
            prop_assert!(!once.is_empty());
            prop_assert_eq!(once.trim(), once.as_str());
        }
    }
}
