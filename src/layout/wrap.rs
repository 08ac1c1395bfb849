/// Width oracle used by [`wrap_text`].
///
/// Implemented by the parley-backed [`crate::TextLayoutEngine`] for real fonts; any
/// `FnMut(&str) -> f32` closure works too.
pub trait TextMeasure {
    /// Rendered advance width of `text` on a single line, in pixels.
    fn advance_width(&mut self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: FnMut(&str) -> f32,
{
    fn advance_width(&mut self, text: &str) -> f32 {
        self(text)
    }
}

/// Greedy word wrap of `text` into lines narrower than `max_width`.
///
/// Words are separated by single spaces. `\n` in the input is a hard break that always survives
/// as a line boundary (blank lines included). A word is committed to the current line only when
/// the current line plus that word measures strictly less than `max_width`; otherwise the line is
/// flushed and the word starts the next one. Words are never split, so a word wider than
/// `max_width` sits alone on its own line, and a non-positive `max_width` yields one word per line.
pub fn wrap_text<M>(text: &str, measure: &mut M, max_width: f32) -> String
where
    M: TextMeasure + ?Sized,
{
    let spaced = text.replace('\n', "\n ");
    let mut lines = Vec::<String>::new();
    let mut line = String::new();

    for raw in spaced.split(' ') {
        let forced_break = raw.contains('\n');
        let word = raw.trim();

        let committed = line.len();
        line.push_str(word);
        if measure.advance_width(&line) < max_width {
            line.push(' ');
        } else {
            line.truncate(committed);
            let flushed = line.trim();
            if !flushed.is_empty() {
                lines.push(flushed.to_owned());
            }
            line.clear();
            line.push_str(word);
            line.push(' ');
        }

        if forced_break {
            lines.push(line.trim().to_owned());
            line.clear();
        }
    }
    lines.push(line.trim().to_owned());

    lines.join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
