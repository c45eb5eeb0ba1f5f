use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use payment_dues::{
    format_due_date, total_due, Category, DueError, Palette, PaymentDue, PaymentFields,
    PaymentRepository, ThemeProvider,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Amount,
    DueDate,
    Category,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Amount,
            FormField::Amount => FormField::DueDate,
            FormField::DueDate => FormField::Category,
            FormField::Category => FormField::Title,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Title => FormField::Category,
            FormField::Amount => FormField::Title,
            FormField::DueDate => FormField::Amount,
            FormField::Category => FormField::DueDate,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FormField::Title => "Title",
            FormField::Amount => "Amount",
            FormField::DueDate => "Due date",
            FormField::Category => "Category",
        }
    }
}

/// Add/edit form; `editing` holds the id when editing an existing due
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub editing: Option<String>,
    pub title: String,
    pub amount: String,
    pub due_date: String,
    pub category: String,
    pub focus: Option<FormField>,
    pub error: Option<String>,
}

impl FormState {
    pub fn blank() -> Self {
        Self {
            focus: Some(FormField::Title),
            ..Self::default()
        }
    }

    pub fn for_edit(due: &PaymentDue) -> Self {
        Self {
            editing: Some(due.id.clone()),
            title: due.title.clone(),
            amount: due.amount.to_string(),
            due_date: due.due_date.clone(),
            category: due.category.to_string(),
            focus: Some(FormField::Title),
            error: None,
        }
    }

    fn focused(&self) -> FormField {
        self.focus.unwrap_or(FormField::Title)
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Amount => &mut self.amount,
            FormField::DueDate => &mut self.due_date,
            FormField::Category => &mut self.category,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Amount => &self.amount,
            FormField::DueDate => &self.due_date,
            FormField::Category => &self.category,
        }
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        self.value_mut(field).push(c);
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        self.value_mut(field).pop();
    }

    pub fn next_field(&mut self) {
        self.focus = Some(self.focused().next());
    }

    pub fn previous_field(&mut self) {
        self.focus = Some(self.focused().previous());
    }

    /// Step through the preset categories from the category field
    pub fn cycle_category(&mut self, forward: bool) {
        let presets = &Category::PRESETS;
        let current = presets
            .iter()
            .position(|preset| preset.as_str() == self.category);

        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % presets.len(),
            (Some(i), false) => (i + presets.len() - 1) % presets.len(),
            (None, true) => 0,
            (None, false) => presets.len() - 1,
        };

        self.category = presets[next].to_string();
    }

    pub fn to_fields(&self) -> std::result::Result<PaymentFields, String> {
        if self.amount.trim().is_empty() {
            return Err("Amount is required".to_string());
        }
        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| "Amount must be a valid number".to_string())?;

        let fields = PaymentFields::new(
            self.title.trim(),
            amount,
            self.due_date.trim(),
            self.category.trim(),
        );
        fields.validate()?;
        Ok(fields)
    }
}

#[derive(Debug, Clone)]
pub enum Mode {
    Browse,
    Form(FormState),
    ConfirmDelete(String),
}

pub struct App {
    pub repo: PaymentRepository,
    pub theme: ThemeProvider,
    pub dues: Vec<PaymentDue>,
    pub state: TableState,
    pub mode: Mode,
    pub show_detail: bool,
    pub status: Option<String>,
}

impl App {
    pub fn new(repo: PaymentRepository, theme: ThemeProvider) -> Self {
        let mut app = Self {
            repo,
            theme,
            dues: Vec::new(),
            state: TableState::default(),
            mode: Mode::Browse,
            show_detail: false,
            status: None,
        };
        app.reload();
        app
    }

    /// Re-read the list from storage, keeping the selection in range
    pub fn reload(&mut self) {
        self.dues = self.repo.list();

        let selected = match self.state.selected() {
            _ if self.dues.is_empty() => None,
            Some(i) => Some(i.min(self.dues.len() - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    pub fn total(&self) -> f64 {
        total_due(&self.dues)
    }

    pub fn selected_due(&self) -> Option<&PaymentDue> {
        self.state.selected().and_then(|i| self.dues.get(i))
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn toggle_theme(&mut self) {
        let mode = self.theme.toggle();
        self.status = Some(format!("Theme: {}", mode));
    }

    pub fn next(&mut self) {
        if self.dues.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.dues.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.dues.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.dues.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn start_add(&mut self) {
        self.mode = Mode::Form(FormState::blank());
    }

    pub fn start_edit(&mut self) {
        if let Some(due) = self.selected_due() {
            self.mode = Mode::Form(FormState::for_edit(due));
        }
    }

    pub fn start_delete(&mut self) {
        if let Some(due) = self.selected_due() {
            self.mode = Mode::ConfirmDelete(due.id.clone());
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Mode::ConfirmDelete(id) = &self.mode {
            let id = id.clone();
            match self.repo.remove(&id) {
                Ok(()) => self.status = Some("Payment due deleted".to_string()),
                Err(e) => self.status = Some(format!("Failed to delete payment due: {}", e)),
            }
        }
        self.mode = Mode::Browse;
        self.reload();
    }

    /// Save the open form; on failure the form stays open with its error
    pub fn submit_form(&mut self) {
        let Mode::Form(form) = &mut self.mode else {
            return;
        };

        let fields = match form.to_fields() {
            Ok(fields) => fields,
            Err(message) => {
                form.error = Some(message);
                return;
            }
        };

        let result = match &form.editing {
            Some(id) => self.repo.update(id, fields).map(|due| ("updated", due)),
            None => self.repo.create(fields).map(|due| ("added", due)),
        };

        match result {
            Ok((verb, due)) => {
                self.status = Some(format!("'{}' {}", due.title, verb));
                self.mode = Mode::Browse;
                self.reload();
                if let Some(i) = self.dues.iter().position(|d| d.id == due.id) {
                    self.state.select(Some(i));
                }
            }
            Err(DueError::NotFound(_)) => {
                self.status = Some("Payment due no longer exists".to_string());
                self.mode = Mode::Browse;
                self.reload();
            }
            Err(e) => {
                form.error = Some(format!("Failed to save payment due: {}", e));
            }
        }
    }

    /// Returns false when the app should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match &mut self.mode {
            Mode::Browse => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return false,
                KeyCode::Enter => self.toggle_detail(),
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Home => {
                    if !self.dues.is_empty() {
                        self.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if !self.dues.is_empty() {
                        self.state.select(Some(self.dues.len() - 1));
                    }
                }
                KeyCode::Char('a') => self.start_add(),
                KeyCode::Char('e') => self.start_edit(),
                KeyCode::Char('d') | KeyCode::Delete => self.start_delete(),
                KeyCode::Char('t') => self.toggle_theme(),
                KeyCode::Char('r') => self.reload(),
                _ => {}
            },
            Mode::ConfirmDelete(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Browse,
                _ => {}
            },
            Mode::Form(form) => match key.code {
                KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Enter => self.submit_form(),
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.previous_field(),
                KeyCode::Left if form.focused() == FormField::Category => {
                    form.cycle_category(false)
                }
                KeyCode::Right if form.focused() == FormField::Category => {
                    form.cycle_category(true)
                }
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.push_char(c),
                _ => {}
            },
        }
        true
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.theme.flush();

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

/// `#rrggbb` -> terminal color
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color::Reset;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

struct Colors {
    background: Color,
    text: Color,
    card: Color,
    border: Color,
    primary: Color,
    secondary: Color,
}

impl From<Palette> for Colors {
    fn from(palette: Palette) -> Self {
        Self {
            background: hex_color(palette.background),
            text: hex_color(palette.text),
            card: hex_color(palette.card),
            border: hex_color(palette.border),
            primary: hex_color(palette.primary),
            secondary: hex_color(palette.secondary),
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let colors = Colors::from(app.theme.colors());

    f.render_widget(
        Block::default().style(Style::default().bg(colors.background).fg(colors.text)),
        f.size(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with total
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app, &colors);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Due list
                Constraint::Percentage(40), // Detail panel
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app, &colors);
        render_detail_panel(f, content_chunks[1], app, &colors);
    } else {
        render_table(f, chunks[1], app, &colors);
    }

    render_status_bar(f, chunks[2], app, &colors);

    match &app.mode {
        Mode::Browse => {}
        Mode::Form(form) => render_form(f, form, &colors),
        Mode::ConfirmDelete(id) => render_confirm_delete(f, app, id, &colors),
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, colors: &Colors) {
    let header = Line::from(vec![
        Span::styled(
            " Total Due ",
            Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:.2}", app.total()),
            Style::default()
                .fg(colors.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {} payment dues", app.dues.len()),
            Style::default().fg(colors.text),
        ),
    ]);

    let paragraph = Paragraph::new(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.card))
            .title(" Payment Dues "),
    );

    f.render_widget(paragraph, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App, colors: &Colors) {
    let header_cells = ["Title", "Amount", "Due", "Category"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(colors.primary)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(colors.secondary))
        .height(1);

    let today = Local::now().date_naive();
    let rows = app.dues.iter().map(|due| {
        let date_style = if due.is_overdue(today) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(colors.text)
        };

        let cells = vec![
            Cell::from(truncate(&due.title, 30)),
            Cell::from(format!("{:.2}", due.amount)),
            Cell::from(format_due_date(&due.due_date)).style(date_style),
            Cell::from(truncate(due.category.as_str(), 20)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(22),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.card).fg(colors.text))
            .title(" Upcoming "),
    )
    .highlight_style(
        Style::default()
            .bg(colors.secondary)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App, colors: &Colors) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.primary))
        .style(Style::default().bg(colors.card).fg(colors.text))
        .title(" Payment Details ");

    let Some(due) = app.selected_due() else {
        f.render_widget(Paragraph::new("No payment due selected").block(block), area);
        return;
    };

    let label = Style::default()
        .fg(colors.primary)
        .add_modifier(Modifier::BOLD);

    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Title: ", label), Span::raw(&due.title)]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Amount: ", label),
            Span::raw(format!("{:.2}", due.amount)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Due Date: ", label),
            Span::raw(format_due_date(&due.due_date)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Category: ", label),
            Span::raw(due.category.as_str()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Added: ", label),
            Span::raw(
                due.created_at
                    .with_timezone(&Local)
                    .format("%d/%m/%Y %H:%M")
                    .to_string(),
            ),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(Span::styled(
            "  e edit · d delete · Enter close",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, colors: &Colors) {
    let key = Style::default()
        .fg(colors.primary)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("{}  │  ", status),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }

    for (k, action) in [
        ("a", " add  "),
        ("e", " edit  "),
        ("d", " delete  "),
        ("Enter", " details  "),
        ("t", " theme  "),
        ("↑/↓", " move  "),
        ("q", " quit"),
    ] {
        spans.push(Span::styled(k, key));
        spans.push(Span::raw(action));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.card).fg(colors.text)),
    );

    f.render_widget(paragraph, area);
}

fn render_form(f: &mut Frame, form: &FormState, colors: &Colors) {
    let area = centered_rect(60, 14, f.size());
    f.render_widget(Clear, area);

    let title = if form.editing.is_some() {
        " Edit Payment Due "
    } else {
        " Add New Due "
    };

    let mut lines = vec![Line::from("")];
    for field in [
        FormField::Title,
        FormField::Amount,
        FormField::DueDate,
        FormField::Category,
    ] {
        let focused = form.focus == Some(field);
        let marker = if focused { "▶ " } else { "  " };
        let value_style = if focused {
            Style::default()
                .fg(colors.text)
                .bg(colors.secondary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text)
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("{}{:<10}", marker, field.label()),
                Style::default().fg(colors.primary),
            ),
            Span::styled(format!("{}▏", form.value(field)), value_style),
        ]));
        lines.push(Line::from(""));
    }

    match &form.error {
        Some(error) => lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(Span::styled(
            "  Due date: 2025-Jan-5 or 2025-01-05 · ←/→ pick category",
            Style::default().add_modifier(Modifier::ITALIC),
        ))),
    }
    lines.push(Line::from(Span::styled(
        "  Enter save · Tab next field · Esc cancel",
        Style::default().add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.primary))
            .style(Style::default().bg(colors.card).fg(colors.text))
            .title(title),
    );

    f.render_widget(paragraph, area);
}

fn render_confirm_delete(f: &mut Frame, app: &App, id: &str, colors: &Colors) {
    let area = centered_rect(50, 7, f.size());
    f.render_widget(Clear, area);

    let title = app
        .dues
        .iter()
        .find(|due| due.id == id)
        .map(|due| due.title.as_str())
        .unwrap_or("this payment");

    let lines = vec![
        Line::from(""),
        Line::from(format!("  Delete '{}'?", truncate(title, 30))),
        Line::from("  This cannot be undone."),
        Line::from(""),
        Line::from(Span::styled(
            "  y delete · n cancel",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(colors.card).fg(colors.text))
            .title(" Confirm Delete "),
    );

    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use payment_dues::MemoryStore;
    use std::sync::Arc;

    fn test_app() -> App {
        let repo = PaymentRepository::new(Arc::new(MemoryStore::new()));
        let theme = ThemeProvider::load(repo.clone());
        App::new(repo, theme)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_through_form() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Rent");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1200");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2025-Jan-5");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Browse));
        assert_eq!(app.dues.len(), 1);
        assert_eq!(app.dues[0].category, Category::Housing);
        assert_eq!(app.total(), 1200.0);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Rent");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "lots");
        press(&mut app, KeyCode::Enter);

        match &app.mode {
            Mode::Form(form) => {
                assert_eq!(form.error.as_deref(), Some("Amount must be a valid number"))
            }
            other => panic!("expected form to stay open, got {:?}", other),
        }
        assert!(app.repo.list().is_empty());
    }

    #[test]
    fn test_edit_and_delete() {
        let mut app = test_app();
        app.repo
            .create(PaymentFields::new("Phone", 40.0, "2025-01-10", "Utilities"))
            .unwrap();
        app.reload();

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "55");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.dues[0].amount, 55.0);

        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.dues.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.dues.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_quit_and_theme_keys() {
        let mut app = test_app();

        press(&mut app, KeyCode::Char('t'));
        assert!(app.theme.is_dark());

        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_cycle_category_wraps() {
        let mut form = FormState::blank();
        form.cycle_category(false);
        assert_eq!(form.category, "Other");
        form.cycle_category(true);
        assert_eq!(form.category, "Housing");
    }

    #[test]
    fn test_centered_rect_on_wide_terminal() {
        let area = Rect::new(0, 0, 2000, 50);
        let popup = centered_rect(60, 14, area);

        assert_eq!(popup.width, 1200);
        assert_eq!(popup.height, 14);
        assert_eq!(popup.x, 400);
        assert_eq!(popup.y, 18);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#6366f1"), Color::Rgb(0x63, 0x66, 0xf1));
        assert_eq!(hex_color("oops"), Color::Reset);
    }
}
