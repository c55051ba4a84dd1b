//! Bitfield label expander.
//!
//! Setting formats for list datatypes are comma separated labels. Each
//! label becomes one legend line, indexed from zero; bitfield legends also
//! show the bit weight.

use crate::stream::StreamWriter;
use cnc_common::consts::ASCII_EOL;

/// Legend annotation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendStyle {
    /// `N - label (2^N)`, for bitfields.
    Bitmap,
    /// `N - label`, for radio buttons.
    Sequential,
}

/// One expanded legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry<'a> {
    pub index: u32,
    pub label: &'a str,
    /// Bit weight, present for [`LegendStyle::Bitmap`].
    pub weight: Option<u32>,
}

/// Tokenize `format` into legend entries. Empty tokens are skipped.
pub fn legend(format: &str, style: LegendStyle) -> impl Iterator<Item = LegendEntry<'_>> {
    format
        .split(',')
        .filter(|label| !label.is_empty())
        .enumerate()
        .map(move |(idx, label)| {
            let index = idx as u32;
            LegendEntry {
                index,
                label,
                weight: match style {
                    LegendStyle::Bitmap => 1u32.checked_shl(index),
                    LegendStyle::Sequential => None,
                },
            }
        })
}

/// Write the legend, one indented line per label, each preceded by EOL.
pub fn write_legend(out: &mut dyn StreamWriter, format: &str, style: LegendStyle) {
    for entry in legend(format, style) {
        write!(out, "{ASCII_EOL}    {} - {}", entry.index, entry.label);
        if let Some(weight) = entry.weight {
            write!(out, " ({weight})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_legend_doubles_weights() {
        let mut out = String::new();
        write_legend(&mut out, "Invert X,Invert Y,Invert Z", LegendStyle::Bitmap);
        assert_eq!(
            out,
            "\r\n    0 - Invert X (1)\r\n    1 - Invert Y (2)\r\n    2 - Invert Z (4)"
        );
    }

    #[test]
    fn radio_legend_has_no_weights() {
        let mut out = String::new();
        write_legend(&mut out, "Normal,Laser,Lathe", LegendStyle::Sequential);
        assert_eq!(out, "\r\n    0 - Normal\r\n    1 - Laser\r\n    2 - Lathe");
    }

    #[test]
    fn empty_tokens_are_skipped() {
        let entries: Vec<_> = legend("A,,B,", LegendStyle::Bitmap).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].label, "B");
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].weight, Some(2));
    }
}
