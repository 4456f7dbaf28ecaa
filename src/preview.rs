use std::io::Write;

use crossterm::style::{Color as TermColor, Stylize};

use crate::color::Color;
use crate::recolor::Recolor;

fn to_term(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: Color) -> TermColor {
    if c.relative_luminance() > 0.4 {
        TermColor::Black
    } else {
        TermColor::White
    }
}

fn swatch(c: Color) -> String {
    format!(" {:<8} ", c.to_hex())
        .with(contrast_fg(c))
        .on(to_term(c))
        .to_string()
}

/// Write one line per palette slot showing `source -> target` as colored
/// swatches labelled with their hex codes.
pub fn write_mapping(out: &mut impl Write, recolor: &Recolor) -> std::io::Result<()> {
    if recolor.pairs().is_empty() {
        writeln!(out, "(no palette slots)")?;
        return Ok(());
    }
    for (slot, &(src, dst)) in recolor.pairs().iter().enumerate() {
        writeln!(out, "{slot:>3} {} -> {}", swatch(src), swatch(dst))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contrast_fg_picks_readable_text() {
        assert_eq!(contrast_fg(Color::rgb(255, 255, 255)), TermColor::Black);
        assert_eq!(contrast_fg(Color::rgb(0, 0, 80)), TermColor::White);
    }

    #[test]
    fn mapping_lists_every_slot() {
        let recolor = Recolor::new(
            &[vec![Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)]],
            &[vec![Color::rgb(0, 255, 0), Color::rgba(1, 2, 3, 4)]],
        );
        let mut buf = Vec::new();
        write_mapping(&mut buf, &recolor).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("ff0000"));
        assert!(text.contains("00ff00"));
        assert!(text.contains("01020304"));
        assert!(text.contains("->"));
    }

    #[test]
    fn empty_mapping_says_so() {
        let mut buf = Vec::new();
        write_mapping(&mut buf, &Recolor::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "(no palette slots)\n");
    }
}
