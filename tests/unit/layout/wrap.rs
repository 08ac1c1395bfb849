use super::*;

fn ten_px_per_char(s: &str) -> f32 {
    s.chars().count() as f32 * 10.0
}

fn wrap(text: &str, max_width: f32) -> String {
    let mut measure = ten_px_per_char;
    wrap_text(text, &mut measure, max_width)
}

#[test]
fn narrow_single_token_is_unchanged() {
    assert_eq!(wrap("hello", 100.0), "hello");
    assert_eq!(wrap("x", 11.0), "x");
}

#[test]
fn greedy_fill_breaks_before_overflowing_word() {
    assert_eq!(wrap("aaa bbb ccc", 75.0), "aaa bbb\nccc");
    assert_eq!(wrap("aaa bbb ccc", 200.0), "aaa bbb ccc");
}

#[test]
fn fit_test_is_strict() {
    // "aaa bbb" measures exactly 70.
    assert_eq!(wrap("aaa bbb", 70.0), "aaa\nbbb");
    assert_eq!(wrap("aaa bbb", 70.5), "aaa bbb");
}

#[test]
fn long_words_are_never_split() {
    assert_eq!(wrap("a verylongword b", 50.0), "a\nverylongword\nb");
    assert_eq!(wrap("verylongword", 50.0), "verylongword");
}

#[test]
fn forced_breaks_are_preserved() {
    assert_eq!(wrap("one\ntwo", 1000.0), "one\ntwo");
    assert_eq!(wrap("a\n\nb", 1000.0), "a\n\nb");
    assert_eq!(wrap("a\n", 1000.0), "a\n");
    assert_eq!(wrap("aaa bbb\nccc", 75.0), "aaa bbb\nccc");
    assert_eq!(wrap("aa bb cc\ndd", 55.0), "aa bb\ncc\ndd");
}

#[test]
fn forced_break_is_not_merged_with_following_words() {
    let out = wrap("x\ny z", 1000.0);
    assert_eq!(out, "x\ny z");
}

#[test]
fn degenerate_widths_give_one_word_per_line() {
    assert_eq!(wrap("a b c", 0.0), "a\nb\nc");
    assert_eq!(wrap("a b c", -40.0), "a\nb\nc");
    assert_eq!(wrap("a\nb", 0.0), "a\nb");
}

#[test]
fn empty_text_is_one_empty_line() {
    assert_eq!(wrap("", 100.0), "");
    assert_eq!(wrap("", 0.0), "");
}

#[test]
fn words_survive_wrapping_in_order() {
    let text = "the quick brown fox jumps over the lazy dog\nand keeps on running";
    for max_width in [0.0, 35.0, 60.0, 120.0, 10_000.0] {
        let out = wrap(text, max_width);
        let before: Vec<&str> = text.split_whitespace().collect();
        let after: Vec<&str> = out.split_whitespace().collect();
        assert_eq!(before, after, "max_width={max_width}");
    }
}

#[test]
fn lines_only_exceed_width_when_a_single_word_does() {
    let text = "aa bbbbbbbb c dd eeeeeeeeeee f";
    let max_width = 55.0;
    for line in wrap(text, max_width).lines() {
        let w = ten_px_per_char(line);
        let widest_word = line
            .split(' ')
            .map(ten_px_per_char)
            .fold(0.0f32, f32::max);
        assert!(w < max_width || w == widest_word, "line '{line}'");
    }
}

#[test]
fn trait_objects_can_measure() {
    let mut closure = ten_px_per_char;
    let measure: &mut dyn TextMeasure = &mut closure;
    assert_eq!(wrap_text("ab cd", measure, 45.0), "ab\ncd");
}
