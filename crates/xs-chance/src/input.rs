//! Sanitation of user-typed percentages and weights.
//!
//! Text fields are edited one keystroke at a time, so intermediate states
//! like `""` or `"7."` must survive unchanged. Anything that cannot be a
//! valid value is clamped and the text replaced with the clamped number.

/// A value parsed from user input together with the text to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    /// The sanitized value.
    pub value: f32,
    /// The text to keep in the input field.
    pub text: String,
}

impl ParsedInput {
    fn new(value: f32, text: impl Into<String>) -> Self {
        Self {
            value,
            text: text.into(),
        }
    }
}

fn is_partial(text: &str) -> bool {
    text.is_empty() || text == "."
}

fn parse(text: &str) -> Option<f32> {
    text.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Interpret a percentage typed by the user. The returned value is a
/// fraction in `0.0..=1.0`; the text keeps at most one decimal.
pub fn interpret_percentage(text: &str) -> ParsedInput {
    let text = text.trim();
    if is_partial(text) {
        return ParsedInput::new(0.0, text);
    }
    let Some(entered) = parse(text) else {
        return ParsedInput::new(0.0, "0");
    };
    if entered < 0.0 {
        return ParsedInput::new(0.0, "0");
    }
    if entered >= 100.0 {
        return ParsedInput::new(1.0, "100");
    }

    match text.find('.') {
        Some(dot) if dot + 2 < text.len() => {
            let truncated = &text[..dot + 2];
            let value = parse(truncated).unwrap_or(entered);
            ParsedInput::new(value / 100.0, truncated)
        }
        _ => ParsedInput::new(entered / 100.0, text),
    }
}

/// Interpret a weight typed by the user. Weights have no upper bound.
pub fn interpret_weight(text: &str) -> ParsedInput {
    let text = text.trim();
    if is_partial(text) {
        return ParsedInput::new(0.0, text);
    }
    match parse(text) {
        Some(weight) if weight >= 0.0 => ParsedInput::new(weight, text),
        _ => ParsedInput::new(0.0, "0"),
    }
}
