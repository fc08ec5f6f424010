mod tui_app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tui_app::{
    format_ms, format_value, truncate, AppState, ConnectionStatus, Page, RadarResponse,
    RangeResponse, SankeyResponse, TrendResponse, ViewResponse,
};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:8050".to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(io::Error::other)?;

    let mut app = AppState::new(base_url);

    // Initial fetch before rendering
    app.refresh(&client).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &client).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
) -> io::Result<()> {
    let refresh_interval = Duration::from_secs(5);
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| render(f, app))?;

        let timeout = refresh_interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match (app.page, key.code) {
                        (_, KeyCode::Char('q') | KeyCode::Char('Q')) => return Ok(()),
                        (_, KeyCode::Char('r') | KeyCode::Char('R')) => {
                            app.refresh(client).await;
                            last_tick = std::time::Instant::now();
                        }
                        (_, KeyCode::Tab) => app.toggle_page(),

                        (Page::Overview, KeyCode::Char('c')) => {
                            if let Some(sel) = app.next_company() {
                                app.select_overview(client, sel).await;
                            }
                        }
                        (Page::Overview, KeyCode::Char('m')) => {
                            if let Some(sel) = app.next_multiple_type() {
                                app.select_overview(client, sel).await;
                            }
                        }
                        (Page::Overview, KeyCode::Left | KeyCode::Right) => {
                            let delta = if key.code == KeyCode::Left { -1 } else { 1 };
                            if let Some(sel) = app.step_overview_year(delta) {
                                app.select_overview(client, sel).await;
                            }
                        }

                        (Page::Comparison, KeyCode::Down | KeyCode::Char('j')) => {
                            app.move_company_cursor(1)
                        }
                        (Page::Comparison, KeyCode::Up | KeyCode::Char('k')) => {
                            app.move_company_cursor(-1)
                        }
                        (Page::Comparison, KeyCode::Char(' ')) => {
                            if let Some(sel) = app.toggle_cursor_company() {
                                app.select_comparison(client, sel).await;
                            }
                        }
                        (Page::Comparison, KeyCode::Left | KeyCode::Right) => {
                            let delta = if key.code == KeyCode::Left { -1 } else { 1 };
                            if let Some(sel) = app.step_comparison_year(delta) {
                                app.select_comparison(client, sel).await;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= refresh_interval {
            app.refresh(client).await;
            last_tick = std::time::Instant::now();
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState) {
    let area = f.area();

    // Outer vertical split: header | body | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    match app.page {
        Page::Overview => render_overview(f, app, chunks[1]),
        Page::Comparison => render_comparison(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let selection = match app.page {
        Page::Overview => {
            let filter = &app.overview.filter;
            format!(
                "{} │ {} │ {}",
                filter.company.as_deref().unwrap_or("—"),
                filter.year.map_or("—".to_string(), |y| y.to_string()),
                filter.multiple_type.as_deref().unwrap_or("—"),
            )
        }
        Page::Comparison => {
            let filter = &app.comparison.filter;
            format!(
                "{} companies │ {}",
                filter.companies.len(),
                filter.year.map_or("—".to_string(), |y| y.to_string()),
            )
        }
    };

    let mut spans = vec![
        Span::styled(
            " Airline Screener  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(selection, Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(
            format!("p99 {}", format_ms(app.latency.p99_ms)),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!(
                "{} recomputes ({} failed)",
                app.health.recomputations, app.health.recompute_failures
            ),
            Style::default().fg(Color::White),
        ),
    ];
    if app.health.coercion_warning {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled(
            "⚠ null monetary cells",
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(
            Style::default().fg(Color::DarkGray),
        ));

    f.render_widget(paragraph, area);
}

fn render_overview(f: &mut Frame, app: &AppState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    match app.overview.views.get("sankey") {
        Some(ViewResponse::Sankey(view)) => render_sankey(f, view, halves[0]),
        other => render_placeholder(f, " SANKEY ", other, halves[0]),
    }
    match app.overview.views.get("trend") {
        Some(ViewResponse::Trend(view)) => render_trend(f, view, halves[1]),
        other => render_placeholder(f, " TREND ", other, halves[1]),
    }
}

fn render_comparison(f: &mut Frame, app: &AppState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(area);
    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    render_company_picker(f, app, columns[0]);
    match app.comparison.views.get("radar") {
        Some(ViewResponse::Radar(view)) => render_radar(f, view, charts[0]),
        other => render_placeholder(f, " RADAR ", other, charts[0]),
    }
    match app.comparison.views.get("range") {
        Some(ViewResponse::Range(view)) => render_range(f, view, charts[1]),
        other => render_placeholder(f, " VALUATION RANGE ", other, charts[1]),
    }
}

fn render_sankey(f: &mut Frame, view: &SankeyResponse, area: Rect) {
    let node = |i: usize| view.nodes.get(i).map_or("?", String::as_str);
    let rows: Vec<Row> = view
        .edges
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(node(e.source).to_string()),
                Cell::from(node(e.target).to_string()),
                Cell::from(format_value(e.value)).style(Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Min(12), Constraint::Min(12), Constraint::Length(10)],
    )
    .header(header_row(&["From", "To", "Value"]))
    .block(titled_block(&format!(" {} [{}] ", view.title, view.topology)));

    f.render_widget(table, area);
}

fn render_trend(f: &mut Frame, view: &TrendResponse, area: Rect) {
    let mut rows: Vec<Row> = view
        .points
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.date.clone()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(format_value(p.value)),
            ])
        })
        .collect();
    rows.extend(view.reference_lines.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.label.clone()).style(Style::default().fg(Color::Yellow)),
            Cell::from(format_value(r.value)).style(Style::default().fg(Color::Yellow)),
        ])
    }));

    let table = Table::new(rows, [Constraint::Min(16), Constraint::Length(10)])
        .header(header_row(&["Date", &view.y_axis_title]))
        .block(titled_block(&format!(" {} · {} ", view.title, view.company)));

    f.render_widget(table, area);
}

fn render_radar(f: &mut Frame, view: &RadarResponse, area: Rect) {
    // The last label closes the polygon; show each metric once.
    let labels: Vec<String> = view
        .polygons
        .first()
        .map(|p| {
            let open = p.labels.len().saturating_sub(1);
            p.labels.iter().take(open).cloned().collect()
        })
        .unwrap_or_default();

    let mut header = vec!["Company".to_string()];
    header.extend(labels.iter().map(|l| truncate(l, 14)));
    let header = Row::new(header.into_iter().map(|h| {
        Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }));

    let rows: Vec<Row> = view
        .polygons
        .iter()
        .map(|p| {
            let mut cells = vec![Cell::from(truncate(&p.company, 12))];
            cells.extend(p.values.iter().take(labels.len()).map(|v| Cell::from(format_value(*v))));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(12)];
    widths.extend(labels.iter().map(|_| Constraint::Min(8)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(&format!(" {} ", view.title)));

    f.render_widget(table, area);
}

fn render_range(f: &mut Frame, view: &RangeResponse, area: Rect) {
    let rows: Vec<Row> = view
        .bars
        .iter()
        .map(|bar| {
            let lower = segment(bar, "lower");
            let span = segment(bar, "span");
            let upper = lower.zip(span).map(|(l, s)| l + s);
            Row::new(vec![
                Cell::from(truncate(&bar.company, 12)),
                Cell::from(format_value(lower)),
                Cell::from(format_value(upper)).style(Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(12), Constraint::Min(10), Constraint::Min(10)],
    )
    .header(header_row(&["Company", "Low EV", "High EV"]))
    .block(titled_block(&format!(" {} ", view.title)));

    f.render_widget(table, area);
}

fn render_company_picker(f: &mut Frame, app: &AppState, area: Rect) {
    let lines: Vec<Line> = app
        .options
        .comparison_companies
        .iter()
        .enumerate()
        .map(|(i, company)| {
            let mark = if app.comparison.filter.companies.contains(company) {
                "[x] "
            } else {
                "[ ] "
            };
            let style = if i == app.company_cursor {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{mark}{}", truncate(company, 16)), style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(titled_block(" COMPANIES ")), area);
}

fn render_placeholder(f: &mut Frame, title: &str, view: Option<&ViewResponse>, area: Rect) {
    let (text, color) = match view {
        Some(ViewResponse::Placeholder(p)) if p.kind == "insufficient_selection" => {
            (p.message.clone(), Color::Yellow)
        }
        Some(ViewResponse::Placeholder(p)) => (p.message.clone(), Color::DarkGray),
        Some(_) => ("Unexpected view type".to_string(), Color::Red),
        None => ("View unavailable".to_string(), Color::Red),
    };
    let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(color)))
        .wrap(Wrap { trim: true })
        .block(titled_block(title));
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("[tab] ", Style::default().fg(Color::Yellow)),
        Span::raw("page  "),
        Span::styled("[← →] ", Style::default().fg(Color::Yellow)),
        Span::raw("year  "),
    ];
    let (recomputed, page_keys): (&[String], [(&str, &str); 2]) = match app.page {
        Page::Overview => (
            app.overview.recomputed.as_slice(),
            [("[c] ", "company  "), ("[m] ", "multiple  ")],
        ),
        Page::Comparison => (
            app.comparison.recomputed.as_slice(),
            [("[↑↓] ", "cursor  "), ("[space] ", "toggle  ")],
        ),
    };
    for (key, label) in page_keys {
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(label));
    }
    if !recomputed.is_empty() {
        spans.push(Span::styled(
            format!("recomputed: {}", recomputed.join(", ")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn header_row<'a>(labels: &[&'a str]) -> Row<'a> {
    Row::new(labels.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .height(1)
}

fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn segment(bar: &tui_app::RangeBarResponse, kind: &str) -> Option<f64> {
    bar.segments.iter().find(|s| s.kind == kind).map(|s| s.value)
}
