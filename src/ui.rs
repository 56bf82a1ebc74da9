// Terminal preview of the lead-count chart

use crate::chart::ChartSpec;
use crate::counts::{LeadCategory, YearlyLeadCounts};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

pub struct App {
    pub counts: YearlyLeadCounts,
    pub title: String,
    pub series: Vec<(LeadCategory, Vec<(f64, f64)>)>,
    pub table_state: TableState,
}

impl App {
    pub fn new(counts: YearlyLeadCounts, spec: &ChartSpec) -> Self {
        let series = LeadCategory::ALL
            .iter()
            .map(|category| {
                let points = counts
                    .rows()
                    .iter()
                    .map(|r| (r.year as f64, r.count(*category) as f64))
                    .collect();
                (*category, points)
            })
            .collect();

        let mut table_state = TableState::default();
        if !counts.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            counts,
            title: spec.title.clone(),
            series,
            table_state,
        }
    }

    /// Inclusive year bounds for the x-axis
    pub fn x_bounds(&self) -> [f64; 2] {
        let years = self.counts.years();
        match (years.first(), years.last()) {
            (Some(&lo), Some(&hi)) => [lo as f64, hi as f64],
            _ => [0.0, 1.0],
        }
    }

    /// Same bounds as the web chart: [0, max + 1]
    pub fn y_bounds(&self) -> [f64; 2] {
        [0.0, (self.counts.max_count() + 1) as f64]
    }

    pub fn next(&mut self) {
        let len = self.counts.len();
        if len == 0 {
            return;
        }
        let i = self.table_state.selected().map(|i| (i + 1) % len).unwrap_or(0);
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.counts.len();
        if len == 0 {
            return;
        }
        let i = self
            .table_state
            .selected()
            .map(|i| if i == 0 { len - 1 } else { i - 1 })
            .unwrap_or(0);
        self.table_state.select(Some(i));
    }
}

fn category_color(category: LeadCategory) -> Color {
    match category {
        LeadCategory::Female => Color::Red,
        LeadCategory::Male => Color::Blue,
        LeadCategory::Custom => Color::Green,
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(f.size());

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(chunks[1]);

    render_chart(f, chunks[0], app);
    render_table(f, right[0], app);
    render_help(f, right[1]);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let datasets: Vec<Dataset> = app
        .series
        .iter()
        .map(|(category, points)| {
            Dataset::default()
                .name(category.column_name())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(category_color(*category)))
                .data(points)
        })
        .collect();

    let [x_lo, x_hi] = app.x_bounds();
    let [_, y_hi] = app.y_bounds();

    let x_labels = vec![
        Span::raw(format!("{}", x_lo as i32)),
        Span::raw(format!("{}", ((x_lo + x_hi) / 2.0) as i32)),
        Span::raw(format!("{}", x_hi as i32)),
    ];
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{}", (y_hi / 2.0) as u64)),
        Span::raw(format!("{}", y_hi as u64)),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(app.title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds(app.x_bounds())
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Count")
                .style(Style::default().fg(Color::Gray))
                .bounds(app.y_bounds())
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Year", "Female", "Male", "Custom"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells).style(Style::default().bg(Color::DarkGray)).height(1);

    let rows = app.counts.rows().iter().map(|r| {
        Row::new(vec![
            Cell::from(r.year.to_string()),
            Cell::from(r.female_lead_count.to_string()).style(Style::default().fg(Color::Red)),
            Cell::from(r.male_lead_count.to_string()).style(Style::default().fg(Color::Blue)),
            Cell::from(r.custom_lead_count.to_string()).style(Style::default().fg(Color::Green)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Leads per year"))
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new("↑/↓ scroll  q quit").block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}
