//! Parsers for the CSS values that cross the DOM boundary.
//!
//! Note positions are stored as CSS pixel lengths and colors arrive in
//! whatever form the browser hands back (`#rrggbb` from a color picker,
//! `hsl(...)` from the pastel generator, `rgb(...)` when read back from an
//! element's computed style). Built on `winnow` 0.7.

use crate::model::Color;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, opt, preceded, terminated};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse a pixel length such as `"120px"`, `"-4.5px"` or a bare `"0"`.
pub fn parse_px(input: &str) -> Option<f64> {
    delimited(multispace0, parse_length, multispace0)
        .parse(input)
        .ok()
}

/// Format a pixel length the way the DOM style setter does (`12px`, `12.5px`).
pub fn format_px(value: f64) -> String {
    // -0 would otherwise print as "-0px".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}px")
}

/// Pale pastel note color for a hue in degrees, e.g. `hsl(42, 100%, 85%)`.
pub fn format_pastel(hue: u16) -> String {
    format!("hsl({}, 100%, 85%)", hue % 360)
}

/// Parse a CSS color: hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`, or one of the
/// few keywords the app writes itself.
pub fn parse_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    if let Some(named) = named_color(trimmed) {
        return Some(named);
    }
    alt((parse_hex_color, parse_rgb_function, parse_hsl_function))
        .parse(trimmed)
        .ok()
}

fn named_color(name: &str) -> Option<Color> {
    match name.to_ascii_lowercase().as_str() {
        "black" => Some(Color::BLACK),
        "white" => Some(Color::WHITE),
        "transparent" => Some(Color::TRANSPARENT),
        "yellow" => Some(Color::rgb(255, 255, 0)),
        "red" => Some(Color::rgb(255, 0, 0)),
        "green" => Some(Color::rgb(0, 128, 0)),
        "blue" => Some(Color::rgb(0, 0, 255)),
        _ => None,
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn parse_length(input: &mut &str) -> ModalResult<f64> {
    let value = parse_number.parse_next(input)?;
    let _ = opt("px").parse_next(input)?;
    Ok(value)
}

fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    if input.starts_with('-') || input.starts_with('+') {
        *input = &input[1..];
    }
    let int_part = digits.parse_next(input)?;
    let mut frac_len = 0;
    if input.starts_with('.') {
        *input = &input[1..];
        frac_len = digits.parse_next(input)?.len();
    }
    if int_part.is_empty() && frac_len == 0 {
        return Err(winnow::error::ErrMode::Backtrack(ContextError::new()));
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

fn digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    let _ = '#'.parse_next(input)?;
    let hex_digits: &str = take_while(3..=8, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    Color::from_hex(hex_digits).ok_or_else(|| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

fn separator(input: &mut &str) -> ModalResult<()> {
    (multispace0, opt(alt((',', '/'))), multispace0)
        .void()
        .parse_next(input)
}

/// A color component followed by an optional `%`.
fn parse_component(input: &mut &str) -> ModalResult<(f64, bool)> {
    let value = parse_number.parse_next(input)?;
    let percent = opt('%').parse_next(input)?.is_some();
    Ok((value, percent))
}

fn parse_alpha(input: &mut &str) -> ModalResult<u8> {
    let (value, percent) = preceded(separator, parse_component).parse_next(input)?;
    let alpha = if percent { value / 100.0 } else { value };
    Ok((alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn parse_rgb_function(input: &mut &str) -> ModalResult<Color> {
    let _ = terminated(alt(("rgba", "rgb")), (multispace0, '(', multispace0)).parse_next(input)?;
    let mut channels = [0u8; 3];
    for (i, slot) in channels.iter_mut().enumerate() {
        if i > 0 {
            separator.parse_next(input)?;
        }
        let (value, percent) = parse_component.parse_next(input)?;
        let value = if percent { value * 2.55 } else { value };
        *slot = value.round().clamp(0.0, 255.0) as u8;
    }
    let alpha = opt(parse_alpha).parse_next(input)?.unwrap_or(255);
    let _ = (multispace0, ')').parse_next(input)?;
    Ok(Color::rgba(channels[0], channels[1], channels[2], alpha))
}

fn parse_hsl_function(input: &mut &str) -> ModalResult<Color> {
    let _ = terminated(alt(("hsla", "hsl")), (multispace0, '(', multispace0)).parse_next(input)?;
    let hue = terminated(parse_number, opt("deg")).parse_next(input)?;
    separator.parse_next(input)?;
    let (saturation, _) = parse_component.parse_next(input)?;
    separator.parse_next(input)?;
    let (lightness, _) = parse_component.parse_next(input)?;
    let alpha = opt(parse_alpha).parse_next(input)?.unwrap_or(255);
    let _ = (multispace0, ')').parse_next(input)?;
    let mut color = Color::from_hsl(hue, saturation / 100.0, lightness / 100.0);
    color.a = alpha;
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_lengths() {
        assert_eq!(parse_px("120px"), Some(120.0));
        assert_eq!(parse_px(" -4.5px "), Some(-4.5));
        assert_eq!(parse_px("0"), Some(0.0));
        assert_eq!(parse_px(".5px"), Some(0.5));
        assert_eq!(parse_px("px"), None);
        assert_eq!(parse_px("12em"), None);
        assert_eq!(parse_px(""), None);
    }

    #[test]
    fn pixel_formatting_matches_dom() {
        assert_eq!(format_px(120.0), "120px");
        assert_eq!(format_px(48.5), "48.5px");
        assert_eq!(format_px(-0.0), "0px");
    }

    #[test]
    fn pastel_reads_back_as_pale_hsl() {
        assert_eq!(format_pastel(42), "hsl(42, 100%, 85%)");
        assert_eq!(format_pastel(400), "hsl(40, 100%, 85%)");
        assert_eq!(
            parse_color(&format_pastel(200)),
            Some(Color::from_hsl(200.0, 1.0, 0.85))
        );
    }

    #[test]
    fn colors_from_picker_and_style() {
        assert_eq!(parse_color("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color("rgb(255, 249, 177)"), Some(Color::rgb(255, 249, 177)));
        assert_eq!(
            parse_color("rgba(0, 0, 0, 0.5)"),
            Some(Color::rgba(0, 0, 0, 128))
        );
        assert_eq!(parse_color("hsl(0, 100%, 50%)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color("White"), Some(Color::WHITE));
        assert_eq!(parse_color("rgb(1, 2)"), None);
        assert_eq!(parse_color("not-a-color"), None);
    }
}
