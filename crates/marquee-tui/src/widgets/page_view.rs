use marquee_core::Timestamp;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::content::{CONTACT_LINES, SERVICES, STATS, TESTIMONIALS};
use crate::page::{Page, Section, SectionKind};
use crate::theme::Theme;

/// Columns an item travels while sliding in
const SLIDE_COLUMNS: f64 = 4.0;

#[derive(Debug, Clone, Copy)]
enum Role {
    Heading,
    Body,
    Accent,
    Muted,
}

pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let lines = Self::lines(&app.page, &app.theme, area.width, app.now());
        let paragraph = Paragraph::new(lines)
            .style(Style::default().bg(app.theme.background))
            .scroll((app.page.scroll_offset(), 0));
        frame.render_widget(paragraph, area);
    }

    /// Every row of the page; each section yields exactly its laid-out height
    pub fn lines(page: &Page, theme: &Theme, width: u16, now: Timestamp) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(page.content_height() as usize);
        for section in page.sections() {
            let mut out = Self::section_lines(page, section, theme, width, now);
            out.resize(section.height() as usize, Line::default());
            lines.extend(out);
        }
        lines
    }

    fn section_lines(
        page: &Page,
        section: &Section,
        theme: &Theme,
        width: u16,
        now: Timestamp,
    ) -> Vec<Line<'static>> {
        let kind = section.kind();
        let title_progress = section.item_progress(0, now);
        let title_style = Style::default()
            .fg(theme.fade_in(theme.primary, title_progress))
            .add_modifier(Modifier::BOLD);

        let mut out = vec![
            Line::from(Span::styled(
                slide(&format!(" {}", kind.title().to_uppercase()), title_progress),
                title_style,
            )),
            Line::default(),
        ];

        let columns = kind.columns(page.width_class());
        let col_width = (width as usize / columns).max(1);
        let item_rows = kind.item_rows() as usize;

        for row_start in (0..kind.item_count()).step_by(columns) {
            let row_items: Vec<usize> = (row_start..(row_start + columns).min(kind.item_count())).collect();
            let texts: Vec<Vec<(String, Role)>> = row_items
                .iter()
                .map(|&i| item_text(page, section, i, now))
                .collect();

            for line_idx in 0..item_rows {
                let spans: Vec<Span<'static>> = row_items
                    .iter()
                    .zip(&texts)
                    .map(|(&i, text)| {
                        let p = section.item_progress(i, now);
                        let (content, role) = text
                            .get(line_idx)
                            .cloned()
                            .unwrap_or_else(|| (String::new(), Role::Body));
                        let cell = pad(&slide(&format!("  {}", content), p), col_width);
                        Span::styled(cell, role_style(theme, role, p))
                    })
                    .collect();
                out.push(Line::from(spans));
            }
        }
        out
    }
}

fn item_text(page: &Page, section: &Section, index: usize, now: Timestamp) -> Vec<(String, Role)> {
    match section.kind() {
        SectionKind::Hero => {
            let hero = page.hero();
            match index {
                0 => vec![(hero.headline.clone(), Role::Heading)],
                1 => vec![(hero.description.clone(), Role::Body)],
                _ => vec![(format!("[ {} ]", hero.button_text), Role::Accent)],
            }
        }
        SectionKind::Services => SERVICES
            .get(index)
            .map(|s| {
                vec![
                    (s.name.to_string(), Role::Heading),
                    (s.summary.to_string(), Role::Muted),
                ]
            })
            .unwrap_or_default(),
        SectionKind::Stats => STATS
            .get(index)
            .map(|s| {
                let value = section.counter_value(index, now).unwrap_or(s.value);
                vec![
                    (format!("{}{}", value, s.suffix), Role::Accent),
                    (s.label.to_string(), Role::Muted),
                ]
            })
            .unwrap_or_default(),
        SectionKind::Testimonials => {
            let carousel = page.carousel();
            let current = carousel.current_index();
            let Some(t) = TESTIMONIALS.get(current) else {
                return Vec::new();
            };
            let dots: String = (0..carousel.len())
                .map(|i| if i == current { "● " } else { "○ " })
                .collect();
            let state = if carousel.is_held() {
                "held"
            } else if carousel.is_user_controlled() {
                "paused"
            } else if carousel.is_auto_advancing() {
                "auto"
            } else {
                "manual"
            };
            vec![
                (format!("“{}”", t.quote), Role::Body),
                (format!("- {}, {}", t.author, t.role), Role::Muted),
                (String::new(), Role::Body),
                (dots.trim_end().to_string(), Role::Accent),
                (format!("h/l: prev/next  1-{}: jump  ({})", carousel.len(), state), Role::Muted),
            ]
        }
        SectionKind::Contact => CONTACT_LINES
            .get(index)
            .map(|l| vec![(l.to_string(), Role::Body)])
            .unwrap_or_default(),
    }
}

fn role_style(theme: &Theme, role: Role, progress: f64) -> Style {
    let (color, bold): (Color, bool) = match role {
        Role::Heading => (theme.text, true),
        Role::Body => (theme.text, false),
        Role::Accent => (theme.accent, true),
        Role::Muted => (theme.muted, false),
    };
    let style = Style::default().fg(theme.fade_in(color, progress));
    if bold {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Offset text to the right while it slides in
fn slide(text: &str, progress: f64) -> String {
    let offset = ((1.0 - progress.clamp(0.0, 1.0)) * SLIDE_COLUMNS).round() as usize;
    format!("{}{}", " ".repeat(offset), text)
}

/// Pad or truncate to exactly `width` characters
fn pad(text: &str, width: usize) -> String {
    let mut cell: String = text.chars().take(width).collect();
    let len = cell.chars().count();
    cell.extend(std::iter::repeat(' ').take(width - len));
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::default_hero;
    use marquee_core::AppConfig;
    use std::time::Duration;

    #[test]
    fn test_lines_match_layout() {
        let page = Page::new(&AppConfig::default(), default_hero(), 120, 24, Duration::ZERO).unwrap();
        let lines = PageWidget::lines(&page, &Theme::default(), 120, Duration::from_secs(5));
        assert_eq!(lines.len(), page.content_height() as usize);
    }

    #[test]
    fn test_slide_and_pad() {
        assert_eq!(slide("x", 1.0), "x");
        assert_eq!(slide("x", 0.0), "    x");
        assert_eq!(pad("abcdef", 3), "abc");
        assert_eq!(pad("ab", 4), "ab  ");
    }
}
