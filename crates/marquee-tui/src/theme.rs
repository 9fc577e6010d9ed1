use marquee_core::config::DesignTokens;
use ratatui::style::Color;

/// Runtime colors derived from the site's design tokens
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub text: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_tokens(&DesignTokens::default())
    }
}

impl Theme {
    pub fn from_tokens(tokens: &DesignTokens) -> Self {
        Self {
            primary: parse_color(&tokens.primary, Color::Blue),
            secondary: parse_color(&tokens.secondary, Color::Cyan),
            accent: parse_color(&tokens.accent, Color::Yellow),
            background: parse_color(&tokens.background, Color::Black),
            text: parse_color(&tokens.text, Color::White),
            muted: parse_color(&tokens.muted, Color::Gray),
        }
    }

    /// Blend from the background towards `color`; `t` = 0 is invisible
    pub fn fade_in(&self, color: Color, t: f64) -> Color {
        match (self.background, color) {
            (Color::Rgb(br, bg, bb), Color::Rgb(r, g, b)) => Color::Rgb(
                blend(br, r, t),
                blend(bg, g, t),
                blend(bb, b, t),
            ),
            _ if t < 0.5 => self.background,
            _ => color,
        }
    }
}

fn blend(from: u8, to: u8, t: f64) -> u8 {
    marquee_core::timing::lerp(from as f64, to as f64, t.clamp(0.0, 1.0)).round() as u8
}

fn parse_color(hex: &str, fallback: Color) -> Color {
    match DesignTokens::rgb(hex) {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => {
            tracing::warn!("Invalid token color '{}', using fallback", hex);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens() {
        let theme = Theme::default();
        assert_eq!(theme.primary, Color::Rgb(0x0d, 0x3b, 0x66));
    }

    #[test]
    fn test_invalid_token_falls_back() {
        let tokens = DesignTokens {
            accent: "orange".to_string(),
            ..Default::default()
        };
        assert_eq!(Theme::from_tokens(&tokens).accent, Color::Yellow);
    }

    #[test]
    fn test_fade_in_endpoints() {
        let theme = Theme::default();
        assert_eq!(theme.fade_in(theme.text, 0.0), theme.background);
        assert_eq!(theme.fade_in(theme.text, 1.0), theme.text);
    }
}
