use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use expense_tracker::{Controller, Filter, TableRow};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddAmount,
    AddCategory,
    AmountFilter,
    CategoryFilter,
}

impl InputMode {
    fn prompt(&self) -> &str {
        match self {
            InputMode::Normal => "",
            InputMode::AddAmount => "Amount",
            InputMode::AddCategory => "Category",
            InputMode::AmountFilter => "Minimum amount",
            InputMode::CategoryFilter => "Category to highlight",
        }
    }
}

pub struct App {
    pub controller: Controller,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input: String,
    pub pending_amount: Option<f64>,
    pub message: Option<String>,
    pub date_format: String,
}

impl App {
    pub fn new(controller: Controller, date_format: String) -> Self {
        Self {
            controller,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input: String::new(),
            pending_amount: None,
            message: None,
            date_format,
        }
    }

    fn start_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
        self.message = None;
    }

    fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.pending_amount = None;
    }

    /// Enter pressed while typing
    fn submit_input(&mut self) {
        let input = self.input.trim().to_string();

        match self.input_mode {
            InputMode::Normal => {}
            InputMode::AddAmount => {
                // Unparseable text becomes an invalid amount so the controller
                // rejects it the same way as a negative one
                self.pending_amount = Some(input.parse().unwrap_or(f64::NAN));
                self.start_input(InputMode::AddCategory);
                return;
            }
            InputMode::AddCategory => {
                let amount = self.pending_amount.take().unwrap_or(f64::NAN);
                if let Err(err) = self.controller.try_add_transaction(amount, &input) {
                    self.message = Some(err.user_message().to_string());
                }
            }
            InputMode::AmountFilter => {
                let filter = self.controller.amount_filter(input.parse().unwrap_or(f64::NAN));
                self.apply(filter);
            }
            InputMode::CategoryFilter => {
                let filter = self.controller.category_filter(&input);
                self.apply(filter);
            }
        }

        self.cancel_input();
    }

    fn apply(&mut self, filter: expense_tracker::Result<Filter>) {
        match filter {
            Ok(filter) => {
                self.controller.set_filter(filter);
                let matched = self.controller.apply_filter().map(|rows| rows.len()).unwrap_or(0);
                self.message = Some(format!("{} matching row(s)", matched));
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(row) = self.state.selected() else {
            self.message = Some("There's no such transaction in the table!".to_string());
            return;
        };

        match self.controller.try_delete_transaction(row) {
            Ok(()) => self.clamp_selection(),
            Err(err) => self.message = Some(err.user_message().to_string()),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.projection().transaction_row_count();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            _ => {}
        }
    }

    /// Selection only moves over transaction rows, never the total row
    pub fn next(&mut self) {
        let len = self.controller.projection().transaction_row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.controller.projection().transaction_row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
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

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        if app.input_mode != InputMode::Normal {
            match key.code {
                KeyCode::Enter => app.submit_input(),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Char(c) => app.input.push(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Char('a') => app.start_input(InputMode::AddAmount),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('f') => app.start_input(InputMode::AmountFilter),
            KeyCode::Char('g') => app.start_input(InputMode::CategoryFilter),
            KeyCode::Char('c') => {
                app.controller.clear_filter();
                app.message = None;
            }
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with totals
            Constraint::Min(0),    // Transaction table
            Constraint::Length(3), // Input / message line
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_input(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let projection = app.controller.projection();

    let spans = vec![
        Span::styled(
            "Expense Tracker",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Transactions: {}", projection.transaction_row_count()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total: {:.2}", projection.total()),
            Style::default().fg(Color::Green),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["#", "Amount", "Category", "Date"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = {
        let projection = app.controller.projection();
        projection
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cells = match row {
                    TableRow::Transaction { number, amount, category, timestamp } => vec![
                        Cell::from(number.to_string()),
                        Cell::from(format!("{:.2}", amount)),
                        Cell::from(truncate(category, 20)),
                        Cell::from(
                            timestamp
                                .with_timezone(&Local)
                                .format(&app.date_format)
                                .to_string(),
                        ),
                    ],
                    TableRow::Total { amount } => vec![
                        Cell::from("Total").style(Style::default().add_modifier(Modifier::BOLD)),
                        Cell::from(format!("{:.2}", amount))
                            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                        Cell::from(""),
                        Cell::from(""),
                    ],
                };

                let style = if projection.is_highlighted(i) {
                    Style::default().bg(Color::LightGreen).fg(Color::Black)
                } else {
                    Style::default()
                };

                Row::new(cells).style(style).height(1)
            })
            .collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(22),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Transactions "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let line = match (&app.input_mode, &app.message) {
        (InputMode::Normal, Some(message)) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
        (InputMode::Normal, None) => Line::from(""),
        (mode, _) => Line::from(vec![
            Span::styled(format!("{}: ", mode.prompt()), Style::default().fg(Color::Cyan)),
            Span::raw(app.input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
    };

    let input = Paragraph::new(vec![line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(input, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(filter) = app.controller.filter() {
        status_spans.push(Span::styled(
            format!(" Filter: {} ", filter),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw("|"));
    }

    for (key, label) in [
        ("a", " Add"),
        ("d", " Delete"),
        ("f", " Amount filter"),
        ("g", " Category filter"),
        ("c", " Clear"),
    ] {
        status_spans.push(Span::raw(" "));
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
        status_spans.push(Span::raw(" |"));
    }
    status_spans.push(Span::raw(" "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_tracker::{CategorySet, FixedClock, TransactionStore};
    use chrono::{TimeZone, Utc};

    fn app() -> App {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
        let controller =
            Controller::new(TransactionStore::new(), CategorySet::with_defaults(), Box::new(clock));
        App::new(controller, "%d-%m-%Y %H:%M".to_string())
    }

    fn type_in(app: &mut App, text: &str) {
        app.input = text.to_string();
        app.submit_input();
    }

    #[test]
    fn test_add_flow() {
        let mut app = app();
        app.start_input(InputMode::AddAmount);
        type_in(&mut app, "42.5");
        assert_eq!(app.input_mode, InputMode::AddCategory);
        type_in(&mut app, "food");

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.controller.store().len(), 1);
        assert!(app.message.is_none());
    }

    #[test]
    fn test_add_flow_rejects_garbage_amount() {
        let mut app = app();
        app.start_input(InputMode::AddAmount);
        type_in(&mut app, "fifty");
        type_in(&mut app, "food");

        assert_eq!(app.controller.store().len(), 0);
        assert_eq!(app.message.as_deref(), Some("Invalid amount or category entered"));
    }

    #[test]
    fn test_delete_without_selection() {
        let mut app = app();
        app.delete_selected();
        assert_eq!(app.message.as_deref(), Some("There's no such transaction in the table!"));
    }

    #[test]
    fn test_delete_selected_clamps() {
        let mut app = app();
        app.controller.add_transaction(10.0, "food");
        app.controller.add_transaction(20.0, "travel");
        app.state.select(Some(1));

        app.delete_selected();
        assert_eq!(app.controller.store().len(), 1);
        assert_eq!(app.state.selected(), Some(0));

        app.delete_selected();
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_navigation_skips_total_row() {
        let mut app = app();
        app.controller.add_transaction(10.0, "food");
        app.controller.add_transaction(20.0, "travel");

        app.next();
        app.next();
        assert_eq!(app.state.selected(), Some(1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn test_category_filter_flow() {
        let mut app = app();
        app.controller.add_transaction(10.0, "food");
        app.controller.add_transaction(20.0, "travel");

        app.start_input(InputMode::CategoryFilter);
        type_in(&mut app, "travel");

        assert_eq!(app.message.as_deref(), Some("1 matching row(s)"));
        assert!(app.controller.projection().is_highlighted(1));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("food", 20), "food");
        assert_eq!(truncate("entertainment", 8), "enter...");
    }
}
