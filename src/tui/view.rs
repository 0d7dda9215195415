use crate::kernel::keyboard::HelpDocument;
use crate::kernel::layout::Rect as PaneRect;
use crate::kernel::panes::{PanePhase, PaneState};
use crate::kernel::DashboardSnapshot;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use serde_json::Value;

const HELP_WIDTH: u16 = 60;

pub fn render(frame: &mut Frame, snapshot: &DashboardSnapshot) {
    let area = frame.area();
    for region in &snapshot.layout.panes {
        let rect = clip(to_rect(region.rect), area);
        if rect.width == 0 || rect.height == 0 {
            continue;
        }
        let state = snapshot.panes.iter().find(|state| state.id == region.pane);
        render_pane(frame, rect, region.pane.as_str(), state, region.focused);
    }

    if let Some(help) = snapshot.help.as_ref().filter(|_| snapshot.help_visible) {
        render_help(frame, area, help);
    }
}

fn render_pane(frame: &mut Frame, area: Rect, id: &str, state: Option<&PaneState>, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = match state {
        Some(state) => format!(" {} ", state.kind.title()),
        None => format!(" {id} "),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let lines = match state {
        Some(state) if state.collapsed => Vec::new(),
        Some(state) => pane_lines(state),
        None => vec!["(not registered)".to_string()],
    };
    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Text body for one pane.
pub fn pane_lines(state: &PaneState) -> Vec<String> {
    match state.phase {
        PanePhase::Initializing => return vec!["Loading...".to_string()],
        PanePhase::Error => {
            let reason = state.last_error.as_deref().unwrap_or("unknown error");
            return vec![format!("error: {reason}")];
        }
        PanePhase::Ready => {}
    }
    match &state.data {
        Value::Null => vec!["(no data)".to_string()],
        Value::String(text) => text.lines().map(str::to_string).collect(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        other => serde_json::to_string_pretty(other)
            .map(|json| json.lines().map(str::to_string).collect())
            .unwrap_or_default(),
    }
}

fn render_help(frame: &mut Frame, area: Rect, help: &HelpDocument) {
    let mut lines = vec![
        Line::from(Span::styled(
            help.description.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
    ];
    for section in &help.sections {
        lines.push(Line::from(Span::styled(
            section.heading.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for item in &section.items {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<14}", item.keys), Style::default().fg(Color::Cyan)),
                Span::raw(item.description.clone()),
            ]));
        }
    }

    let width = HELP_WIDTH.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", help.title)),
        ),
        popup,
    );
}

fn to_rect(rect: PaneRect) -> Rect {
    Rect {
        x: rect.x,
        y: rect.y,
        width: rect.w,
        height: rect.h,
    }
}

/// The snapshot may lag a resize by one frame.
fn clip(rect: Rect, area: Rect) -> Rect {
    rect.intersection(area)
}

#[cfg(test)]
#[path = "../../tests/unit/tui/view.rs"]
mod tests;
