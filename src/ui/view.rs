use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use super::analysis::{AnalysisView, ParsedAnalysis};
use super::app::{App, FormField, Notice, Page, ResultPage, ResultTab};

const TITLE: &str = " GitHub Issue Assistant ";

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(frame.area());

    match &app.page {
        Page::Home => draw_home(frame, chunks[0]),
        Page::Form => draw_form(frame, app, chunks[0]),
        Page::Result(page) => draw_result(frame, page, chunks[0]),
    }
    draw_help_bar(frame, app, chunks[1]);
}

fn outer_block() -> Block<'static> {
    Block::default()
        .title(TITLE)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn draw_home(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "AI-Powered GitHub Issue Assistant",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Paste a public GitHub repository and an issue number."),
        Line::from("The assistant reads the issue and its comments and returns"),
        Line::from("a summary, a type, a priority score, suggested labels"),
        Line::from("and the potential impact."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to Get Started",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let widget = Paragraph::new(text)
        .block(outer_block())
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(outer_block(), area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };
    let form = &app.form;
    let width = inner.width;
    let mut y = inner.y;

    let repo_active = form.field == FormField::RepoUrl;
    draw_field_label(frame, inner.x, y, width, "GitHub Repository URL", repo_active);
    y += 1;
    draw_field_input(
        frame,
        Rect { x: inner.x, y, width, height: 1 },
        &form.repo_url,
        "https://github.com/owner/repo",
        repo_active,
    );
    y += 2;

    let number_active = form.field == FormField::IssueNumber;
    draw_field_label(frame, inner.x, y, width, "Issue Number", number_active);
    y += 1;
    draw_field_input(
        frame,
        Rect { x: inner.x, y, width, height: 1 },
        &form.issue_number,
        "e.g. 1",
        number_active,
    );
    y += 2;

    let status_area = Rect {
        x: inner.x,
        y,
        width,
        height: inner.height.saturating_sub(y - inner.y),
    };

    if app.busy {
        let widget = Paragraph::new(Span::styled(
            "Analyzing issue with AI...",
            Style::default().fg(Color::Cyan),
        ));
        frame.render_widget(widget, status_area);
        return;
    }

    if let Some(ref notice) = form.notice {
        let (style, error) = match notice {
            Notice::Warning(error) => (Style::default().fg(Color::Yellow), error),
            Notice::Error(error) => (Style::default().fg(Color::Red), error),
        };
        let mut lines = vec![Line::from(Span::styled(error.to_string(), style))];
        if let Some(suggestion) = error.suggestion() {
            lines.push(Line::from(Span::styled(suggestion, style)));
        }
        let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(widget, status_area);
    }
}

fn draw_field_label(frame: &mut Frame, x: u16, y: u16, w: u16, label: &str, active: bool) {
    let style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let marker = if active { "▸" } else { " " };
    let widget = Paragraph::new(Span::styled(format!("{} {}", marker, label), style));
    frame.render_widget(widget, Rect { x, y, width: w, height: 1 });
}

fn draw_field_input(frame: &mut Frame, area: Rect, value: &str, placeholder: &str, active: bool) {
    // Two columns of indent, one for the cursor past the last char
    let room = area.width.saturating_sub(3);
    let (visible, cursor) = visible_tail(value, room);

    let (text, style) = if value.is_empty() && !active {
        (placeholder, Style::default().fg(Color::DarkGray))
    } else if active {
        (visible, Style::default().fg(Color::White))
    } else {
        (visible, Style::default().fg(Color::Gray))
    };
    frame.render_widget(Paragraph::new(Span::styled(format!("  {}", text), style)), area);
    if active {
        frame.set_cursor_position((area.x + 2 + cursor, area.y));
    }
}

/// The end of `value` that fits in `room` columns, and the cursor offset after it
fn visible_tail(value: &str, room: u16) -> (&str, u16) {
    let count = value.chars().count();
    let room = usize::from(room);
    if count <= room {
        // count <= room <= u16::MAX
        return (value, count as u16);
    }

    let start = value
        .char_indices()
        .nth(count - room)
        .map_or(value.len(), |(index, _)| index);
    (&value[start..], room as u16)
}

fn draw_result(frame: &mut Frame, page: &ResultPage, area: Rect) {
    let block = outer_block().title(format!(
        " Issue #{} of {} ",
        page.result.issue_number, page.result.repo
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let selected = match page.tab {
        ResultTab::Summary => 0,
        ResultTab::Json => 1,
    };
    let tabs = Tabs::new(vec!["Summary View", "JSON View"])
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let lines = match page.tab {
        ResultTab::Summary => summary_lines(&page.parsed),
        ResultTab::Json => json_lines(page),
    };
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((page.scroll, 0));
    frame.render_widget(body, chunks[1]);
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn summary_lines(parsed: &ParsedAnalysis) -> Vec<Line<'static>> {
    match parsed {
        ParsedAnalysis::Structured(view) => structured_lines(view),
        ParsedAnalysis::Empty => vec![Line::from("No structured data available.")],
        ParsedAnalysis::Unparseable => vec![
            Line::from(Span::styled(
                "AI response could not be parsed as structured JSON.",
                Style::default().fg(Color::Yellow),
            )),
            Line::from(""),
            Line::from("No structured data available."),
        ],
    }
}

fn structured_lines(view: &AnalysisView) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Summary"),
        Line::from(view.summary().to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Issue Type: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(view.issue_type().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(view.priority().to_string()),
        ]),
        Line::from(""),
        heading("Suggested Labels"),
    ];

    if view.labels.is_empty() {
        lines.push(Line::from("No labels generated."));
    } else {
        let mut spans = Vec::new();
        for label in &view.labels {
            spans.push(Span::styled(
                format!(" {} ", label),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(heading("Potential Impact"));
    lines.push(Line::from(view.impact().to_string()));
    lines
}

fn json_lines(page: &ResultPage) -> Vec<Line<'static>> {
    let text = match page.parsed {
        ParsedAnalysis::Structured(_) | ParsedAnalysis::Empty => {
            match serde_json::from_str::<serde_json::Value>(page.result.analysis.trim())
                .and_then(|value| serde_json::to_string_pretty(&value))
            {
                Ok(pretty) => pretty,
                Err(_) => page.result.analysis.clone(),
            }
        }
        ParsedAnalysis::Unparseable => page.result.analysis.clone(),
    };
    text.lines().map(|line| Line::from(line.to_string())).collect()
}

fn draw_help_bar(frame: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let entries: &[(&str, &str)] = match app.page {
        Page::Home => &[(" Enter", ":get started  "), ("q", ":quit")],
        Page::Form => &[
            (" Tab", ":next field  "),
            ("Enter", ":analyze  "),
            ("Esc", ":back"),
        ],
        Page::Result(_) => &[
            (" Tab", ":switch view  "),
            ("↑↓", ":scroll  "),
            ("a", ":analyze another  "),
            ("h", ":home  "),
            ("q", ":quit"),
        ],
    };

    let mut spans = Vec::new();
    for (k, label) in entries {
        spans.push(Span::styled(*k, key));
        spans.push(Span::raw(*label));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_result, sample_analysis};
    use crate::ui::backend::SubmitOutcome;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app_with_result(analysis: &str) -> App {
        let mut app = App::new();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.apply_outcome(SubmitOutcome::Analyzed(create_test_result(analysis)));
        app
    }

    #[test]
    fn test_home_screen() {
        let screen = render(&App::new());
        assert!(screen.contains("AI-Powered GitHub Issue Assistant"));
        assert!(screen.contains("Get Started"));
    }

    #[test]
    fn test_form_busy() {
        let mut app = App::new();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.busy = true;

        let screen = render(&app);
        assert!(screen.contains("GitHub Repository URL"));
        assert!(screen.contains("Analyzing issue with AI..."));
    }

    #[test]
    fn test_form_warning() {
        let mut app = App::new();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.apply_outcome(SubmitOutcome::NotFound);

        let screen = render(&app);
        assert!(screen.contains("Issue number not found in this repository."));
    }

    #[test]
    fn test_visible_tail() {
        assert_eq!(visible_tail("", 10), ("", 0));
        assert_eq!(visible_tail("octocat", 10), ("octocat", 7));
        assert_eq!(visible_tail("octocat/Hello-World", 5), ("World", 5));
        assert_eq!(visible_tail("日本語のレポ", 2), ("レポ", 2));
        assert_eq!(visible_tail("abc", 0), ("", 0));
    }

    #[test]
    fn test_long_input_keeps_cursor_in_field() {
        let mut app = App::new();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        let url = format!("https://github.com/{}/tail-of-url", "a".repeat(300));
        for c in url.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }

        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let cursor = terminal.get_cursor_position().unwrap();
        assert!(cursor.x < 60);

        let buffer = terminal.backend().buffer();
        let row: String = (0..buffer.area.width)
            .map(|x| buffer[(x, cursor.y)].symbol().to_string())
            .collect();
        assert!(row.contains("tail-of-url"), "row was {:?}", row);
        assert!(!row.contains("https://"));
    }

    #[test]
    fn test_structured_summary() {
        let screen = render(&app_with_result(&sample_analysis("bug")));
        assert!(screen.contains("Summary View"));
        assert!(screen.contains("Issue Type: bug"));
        assert!(screen.contains("good first issue"));
    }

    #[test]
    fn test_unparseable_analysis() {
        let mut app = app_with_result("not json");

        let screen = render(&app);
        assert!(screen.contains("AI response could not be parsed as structured JSON."));
        assert!(screen.contains("No structured data available."));

        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        let screen = render(&app);
        assert!(screen.contains("not json"));
    }

    #[test]
    fn test_missing_labels_and_fields() {
        let screen = render(&app_with_result(r#"{"summary": "Short"}"#));
        assert!(screen.contains("No labels generated."));
        assert!(screen.contains("Issue Type: N/A"));
    }
}
