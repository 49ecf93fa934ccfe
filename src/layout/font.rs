//! Font metrics for layout

use crate::settings::Typography;

/// Metrics needed for text layout
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Line height in logical pixels
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::for_typography(&Typography::default())
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Monospace metrics: every character has the same width
    pub fn monospace(line_height: f32, char_width: f32) -> Self {
        Self::new(line_height, vec![char_width; 128], char_width)
    }

    /// Approximate proportional metrics for a typography setting.
    ///
    /// Widths are em fractions typical of book serif faces; the family name
    /// is not consulted.
    pub fn for_typography(typography: &Typography) -> Self {
        let em = typography.font_size_px();
        let mut char_widths = Vec::with_capacity(128);
        for code in 0u8..128 {
            let c = code as char;
            let fraction = match c {
                ' ' => 0.25,
                'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
                'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '"' => 0.35,
                'm' | 'w' => 0.78,
                'M' | 'W' => 0.9,
                '0'..='9' => 0.5,
                'A'..='Z' => 0.68,
                'a'..='z' => 0.5,
                _ if c.is_ascii_control() => 0.0,
                _ => 0.55,
            };
            char_widths.push(em * fraction);
        }

        Self {
            line_height: typography.line_height_px(),
            char_widths,
            default_width: em * 0.6,
        }
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Width of a grapheme cluster
    pub fn grapheme_width(&self, grapheme: &str) -> f32 {
        if grapheme == "\t" {
            self.default_width * 4.0
        } else if grapheme.chars().all(|c| c.is_control()) {
            0.0
        } else {
            grapheme.chars().map(|c| self.width(c)).sum()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_widths() {
        let metrics = FontMetrics::monospace(10.0, 8.0);
        assert_eq!(metrics.width('a'), 8.0);
        assert_eq!(metrics.width('é'), 8.0);
        assert_eq!(metrics.grapheme_width("\t"), 32.0);
        assert_eq!(metrics.grapheme_width("\n"), 0.0);
    }

    #[test]
    fn test_typography_scaling() {
        let small = FontMetrics::for_typography(&Typography {
            font_size_pt: 12.0,
            ..Typography::default()
        });
        let large = FontMetrics::for_typography(&Typography {
            font_size_pt: 24.0,
            ..Typography::default()
        });
        assert!(large.width('m') > small.width('m'));
        assert!(small.width('m') > small.width('i'));
        assert_eq!(large.line_height, small.line_height * 2.0);
    }
}
