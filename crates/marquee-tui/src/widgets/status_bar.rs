use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let page = &app.page;
        let revealed = page.sections().iter().filter(|s| s.is_revealed()).count();

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} {}px | Row {}/{} | Revealed {}/{} | Observers {}",
                page.width_class().to_string().to_uppercase(),
                page.width_px(),
                page.scroll_offset(),
                page.max_scroll(),
                revealed,
                page.sections().len(),
                page.active_observers(),
            )
        };

        let help_hint = " q:quit j/k:scroll h/l:slides space:autoplay p:hold ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.chars().count() + help_hint.len());

        let bar = Style::default().bg(app.theme.primary);
        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(app.theme.text)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(app.theme.muted)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
