//! Block-letter art generator for the banner and the `ansi` command.

use nu_ansi_term::Color;

const GLYPH_ROWS: usize = 5;
const GLYPH_WIDTH: usize = 5;
const GLYPH_SPACING: usize = 1;

fn glyph(ch: char) -> [&'static str; GLYPH_ROWS] {
    match ch {
        'A' => [" ███ ", "█   █", "█████", "█   █", "█   █"],
        'B' => ["████ ", "█   █", "████ ", "█   █", "████ "],
        'C' => [" ███ ", "█   █", "█    ", "█   █", " ███ "],
        'D' => ["████ ", "█   █", "█   █", "█   █", "████ "],
        'E' => ["█████", "█    ", "████ ", "█    ", "█████"],
        'F' => ["█████", "█    ", "████ ", "█    ", "█    "],
        'G' => [" ███ ", "█    ", "█  ██", "█   █", " ███ "],
        'H' => ["█   █", "█   █", "█████", "█   █", "█   █"],
        'I' => ["█████", "  █  ", "  █  ", "  █  ", "█████"],
        'J' => ["█████", "    █", "    █", "█   █", " ███ "],
        'K' => ["█   █", "█  █ ", "███  ", "█  █ ", "█   █"],
        'L' => ["█    ", "█    ", "█    ", "█    ", "█████"],
        'M' => ["█   █", "██ ██", "█ █ █", "█   █", "█   █"],
        'N' => ["█   █", "██  █", "█ █ █", "█  ██", "█   █"],
        'O' => [" ███ ", "█   █", "█   █", "█   █", " ███ "],
        'P' => ["████ ", "█   █", "████ ", "█    ", "█    "],
        'Q' => [" ███ ", "█   █", "█   █", "█  ██", " ████"],
        'R' => ["████ ", "█   █", "████ ", "█  █ ", "█   █"],
        'S' => [" ███ ", "█    ", " ███ ", "    █", " ███ "],
        'T' => ["█████", "  █  ", "  █  ", "  █  ", "  █  "],
        'U' => ["█   █", "█   █", "█   █", "█   █", " ███ "],
        'V' => ["█   █", "█   █", "█   █", " █ █ ", "  █  "],
        'W' => ["█   █", "█   █", "█ █ █", "██ ██", "█   █"],
        'X' => ["█   █", " █ █ ", "  █  ", " █ █ ", "█   █"],
        'Y' => ["█   █", " █ █ ", "  █  ", "  █  ", "  █  "],
        'Z' => ["█████", "   █ ", "  █  ", " █   ", "█████"],
        '0' => [" ███ ", "█  ██", "█ █ █", "██  █", " ███ "],
        '1' => ["  █  ", " ██  ", "  █  ", "  █  ", "█████"],
        '2' => [" ███ ", "    █", " ███ ", "█    ", "█████"],
        '3' => [" ███ ", "    █", " ███ ", "    █", " ███ "],
        '4' => ["█   █", "█   █", "█████", "    █", "    █"],
        '5' => ["█████", "█    ", "████ ", "    █", "████ "],
        '6' => [" ███ ", "█    ", "████ ", "█   █", " ███ "],
        '7' => ["█████", "    █", "   █ ", "  █  ", " █   "],
        '8' => [" ███ ", "█   █", " ███ ", "█   █", " ███ "],
        '9' => [" ███ ", "█   █", " ████", "    █", " ███ "],
        '-' => ["     ", "     ", "█████", "     ", "     "],
        '.' => ["     ", "     ", "     ", "     ", "  █  "],
        '!' => ["  █  ", "  █  ", "  █  ", "     ", "  █  "],
        '?' => [" ███ ", "    █", "  ██ ", "     ", "  █  "],
        _ => ["     "; GLYPH_ROWS],
    }
}

/// Width in columns of `count` glyphs laid out on one line.
pub fn block_art_width(count: usize) -> usize {
    match count {
        0 => 0,
        count => count * GLYPH_WIDTH + (count - 1) * GLYPH_SPACING,
    }
}

fn render_chunk(chars: &[char]) -> Vec<String> {
    (0..GLYPH_ROWS)
        .map(|row| {
            chars
                .iter()
                .map(|ch| glyph(*ch)[row])
                .collect::<Vec<_>>()
                .join(&" ".repeat(GLYPH_SPACING))
        })
        .collect()
}

/// Renders `text` as five-row block letters wrapped in `color`.
///
/// Text is upper-cased; unsupported characters render as blanks. When `max_width` is given and
/// the whole text does not fit, it is split into chunks of as many glyphs as fit, separated by
/// a blank line. Rows are joined with `\n`.
pub fn render_block_art(text: &str, color: Color, max_width: Option<usize>) -> String {
    let chars = text.to_uppercase().chars().collect::<Vec<_>>();
    let per_line = match max_width {
        Some(width) if width > 0 && block_art_width(chars.len()) > width => {
            ((width + GLYPH_SPACING) / (GLYPH_WIDTH + GLYPH_SPACING)).max(1)
        }
        _ => chars.len().max(1),
    };

    let body = chars
        .chunks(per_line)
        .map(|chunk| render_chunk(chunk).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    color.paint(body).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::strip_ansi;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_five_rows_with_spacing() {
        let art = strip_ansi(&render_block_art("hi", Color::Cyan, None));
        assert_eq!(
            art.lines().collect::<Vec<_>>(),
            vec![
                "█   █ █████",
                "█   █   █  ",
                "█████   █  ",
                "█   █   █  ",
                "█   █ █████",
            ]
        );
    }

    #[test]
    fn wraps_only_when_text_overflows() {
        let fits = strip_ansi(&render_block_art("abcdef", Color::Cyan, Some(35)));
        assert_eq!(fits.lines().count(), 5);

        let wrapped = strip_ansi(&render_block_art("abcdef", Color::Cyan, Some(17)));
        let lines = wrapped.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[5], "");
        assert_eq!(lines[0].chars().count(), block_art_width(3));
    }

    #[test]
    fn unknown_glyphs_are_blank() {
        let art = strip_ansi(&render_block_art("#", Color::Cyan, None));
        assert!(art.lines().all(|line| line == "     "));
    }

    #[test]
    fn width_formula() {
        assert_eq!(block_art_width(0), 0);
        assert_eq!(block_art_width(1), 5);
        assert_eq!(block_art_width(12), 71);
    }
}
