use crate::catalogue::{fetch_page, Catalogue, PageRequest};
use crate::client::CatalogueSource;
use crate::error::FetchResult;
use crate::filter::{recompute, SortCriterion};
use crate::model::{Entry, EntryDetail};
use crate::overlay::{load_detail, FetchRequest, OverlayController, OverlayEvent, OverlayState, Ticket};
use crate::render::{format_id, CatalogueView, OverlayView, LOAD_FAILED, NO_RESULTS, OVERLAY_FAILED};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::warn;

/// Results of background fetches, delivered back to the UI loop
#[derive(Debug)]
pub enum AppMessage {
    PageLoaded {
        request: PageRequest,
        result: FetchResult<Vec<Entry>>,
    },
    OverlayLoaded {
        ticket: Ticket,
        result: FetchResult<EntryDetail>,
    },
}

/// What the loop has to do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    LoadMore,
    LoadOverlay(FetchRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Search,
}

pub struct App {
    pub catalogue: Catalogue,
    pub shown: Vec<Entry>,
    pub query: String,
    pub sort: SortCriterion,
    pub state: TableState,
    pub overlay: OverlayController,
    pub input_mode: InputMode,
    pub pages_in_flight: usize,
    pub load_failed: bool,
    image_base: String,
}

impl App {
    pub fn new(page_size: usize, image_base: impl Into<String>) -> Self {
        Self {
            catalogue: Catalogue::new(page_size),
            shown: Vec::new(),
            query: String::new(),
            sort: SortCriterion::default(),
            state: TableState::default(),
            overlay: OverlayController::new(),
            input_mode: InputMode::Browse,
            pages_in_flight: 0,
            load_failed: false,
            image_base: image_base.into(),
        }
    }

    pub fn view(&self) -> CatalogueView {
        CatalogueView::build(&self.shown, &self.image_base)
    }

    pub fn overlay_view(&self) -> Option<OverlayView> {
        match self.overlay.state() {
            OverlayState::Open { detail } => Some(OverlayView::build(detail, &self.image_base)),
            _ => None,
        }
    }

    pub fn selected_id(&self) -> Option<u32> {
        self.state.selected().and_then(|i| self.shown.get(i)).map(|e| e.id)
    }

    /// Re-derive the displayed subset, keeping the selected entry if it survived
    pub fn recompute(&mut self) {
        let selected = self.selected_id();
        self.shown = recompute(self.catalogue.entries(), &self.query, self.sort);
        self.load_failed = false;

        let index = selected
            .and_then(|id| self.shown.iter().position(|e| e.id == id))
            .or(if self.shown.is_empty() { None } else { Some(0) });
        self.state.select(index);
    }

    pub fn begin_page_load(&mut self) -> PageRequest {
        self.pages_in_flight += 1;
        self.catalogue.next_request()
    }

    /// Returns a follow-up overlay load, if applying the message started one
    pub fn apply_message(&mut self, message: AppMessage) -> Option<FetchRequest> {
        match message {
            AppMessage::PageLoaded { request, result } => {
                self.pages_in_flight = self.pages_in_flight.saturating_sub(1);
                match result {
                    Ok(page) => {
                        self.catalogue.commit_page(request, page);
                        self.recompute();
                    }
                    Err(e) => {
                        warn!(offset = request.offset, error = %e, "page load failed");
                        self.load_failed = true;
                    }
                }
                None
            }
            AppMessage::OverlayLoaded { ticket, result } => {
                let event = match result {
                    Ok(detail) => OverlayEvent::Loaded {
                        ticket,
                        detail: Box::new(detail),
                    },
                    Err(e) => OverlayEvent::Failed {
                        ticket,
                        message: e.to_string(),
                    },
                };
                self.overlay.handle(event, self.catalogue.len())
            }
        }
    }

    fn overlay_event(&mut self, event: OverlayEvent) -> Action {
        match self.overlay.handle(event, self.catalogue.len()) {
            Some(request) => Action::LoadOverlay(request),
            None => Action::None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Browse,
                KeyCode::Backspace => {
                    self.query.pop();
                    self.recompute();
                }
                KeyCode::Char(c) => {
                    self.query.push(c);
                    self.recompute();
                }
                _ => {}
            }
            return Action::None;
        }

        // Open overlay or error notice takes the keyboard
        if matches!(self.overlay.state(), OverlayState::Open { .. } | OverlayState::Error { .. }) {
            return match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Esc | KeyCode::Char('x') | KeyCode::Enter => self.overlay_event(OverlayEvent::Close),
                KeyCode::Right | KeyCode::Char('n') => self.overlay_event(OverlayEvent::Next),
                KeyCode::Left | KeyCode::Char('p') => self.overlay_event(OverlayEvent::Previous),
                KeyCode::Char('l') => Action::LoadMore,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc if matches!(self.overlay.state(), OverlayState::Loading { .. }) => {
                self.overlay_event(OverlayEvent::Close)
            }
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                Action::None
            }
            KeyCode::Char('s') => {
                self.sort = self.sort.cycle();
                self.recompute();
                Action::None
            }
            KeyCode::Char('l') => Action::LoadMore,
            KeyCode::Enter => match self.selected_id() {
                Some(id) => self.overlay_event(OverlayEvent::Open(id)),
                None => Action::None,
            },
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                Action::None
            }
            KeyCode::PageDown => {
                self.page_down();
                Action::None
            }
            KeyCode::PageUp => {
                self.page_up();
                Action::None
            }
            KeyCode::Home => {
                if !self.shown.is_empty() {
                    self.state.select(Some(0));
                }
                Action::None
            }
            KeyCode::End => {
                if !self.shown.is_empty() {
                    self.state.select(Some(self.shown.len() - 1));
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn next(&mut self) {
        let len = self.shown.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.shown.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.shown.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.shown.is_empty() {
            return;
        }
        let i = self.state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        self.state.select(Some(i));
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

pub fn run_ui(app: &mut App, source: Arc<dyn CatalogueSource>, runtime: Handle) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, source, runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    source: Arc<dyn CatalogueSource>,
    runtime: Handle,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // First page loads on start-up
    let request = app.begin_page_load();
    spawn_page_load(&runtime, &source, &tx, request);

    loop {
        while let Ok(message) = rx.try_recv() {
            if let Some(request) = app.apply_message(message) {
                spawn_overlay_load(&runtime, &source, &tx, request);
            }
        }

        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key) {
                Action::Quit => return Ok(()),
                Action::LoadMore => {
                    let request = app.begin_page_load();
                    spawn_page_load(&runtime, &source, &tx, request);
                }
                Action::LoadOverlay(request) => spawn_overlay_load(&runtime, &source, &tx, request),
                Action::None => {}
            }
        }
    }
}

fn spawn_page_load(
    runtime: &Handle,
    source: &Arc<dyn CatalogueSource>,
    tx: &UnboundedSender<AppMessage>,
    request: PageRequest,
) {
    let source = Arc::clone(source);
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = fetch_page(source.as_ref(), request).await;
        // Receiver is gone once the UI has quit
        let _ = tx.send(AppMessage::PageLoaded { request, result });
    });
}

fn spawn_overlay_load(
    runtime: &Handle,
    source: &Arc<dyn CatalogueSource>,
    tx: &UnboundedSender<AppMessage>,
    request: FetchRequest,
) {
    let source = Arc::clone(source);
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = load_detail(source.as_ref(), request.id).await;
        let _ = tx.send(AppMessage::OverlayLoaded {
            ticket: request.ticket,
            result,
        });
    });
}

// ============================================================================
// DRAWING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with search + sort
            Constraint::Min(0),    // Catalogue
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_catalogue(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    match app.overlay.state() {
        OverlayState::Closed => {}
        OverlayState::Loading { id, .. } => render_notice(
            f,
            format!("Loading {}...", format_id(*id)),
            Color::Cyan,
        ),
        OverlayState::Error { message, .. } => {
            render_notice(f, format!("{}\n\n{}", OVERLAY_FAILED, message), Color::Red)
        }
        OverlayState::Open { .. } => {
            if let Some(view) = app.overlay_view() {
                render_overlay(f, &view);
            }
        }
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let search_style = if app.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled("Search: ", Style::default().fg(Color::Cyan)),
        Span::styled(app.query.clone(), search_style),
    ];
    if app.input_mode == InputMode::Search {
        spans.push(Span::styled("█", search_style));
    }
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Sort: {}", app.sort.label()),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Showing {}/{}", app.shown.len(), app.catalogue.len()),
        Style::default().fg(Color::White),
    ));
    if app.pages_in_flight > 0 {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled("Loading...", Style::default().fg(Color::Yellow)));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Catalogue "),
    );

    f.render_widget(header, area);
}

fn render_catalogue(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    if app.load_failed {
        let failed = Paragraph::new(LOAD_FAILED)
            .style(Style::default().fg(Color::Red))
            .block(block);
        f.render_widget(failed, area);
        return;
    }

    let cards = match app.view() {
        CatalogueView::Cards(cards) => cards,
        CatalogueView::NoResults => {
            let empty = Paragraph::new(NO_RESULTS)
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC))
                .block(block);
            f.render_widget(empty, area);
            return;
        }
    };

    let header_cells = ["ID", "Name", "Type", "Image"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = cards.into_iter().map(|card| {
        Row::new(vec![
            Cell::from(card.id_label),
            Cell::from(card.display_name).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(card.types_label).style(Style::default().fg(Color::Cyan)),
            Cell::from(card.image_url).style(Style::default().fg(Color::DarkGray)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(18),
            Constraint::Length(26),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(block.title(" Entries "))
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let spans = if app.input_mode == InputMode::Search {
        vec![
            Span::raw(" Typing filters as you go | "),
            key("Enter/Esc"),
            Span::raw(" Done"),
        ]
    } else if !app.overlay.state().is_closed() {
        vec![
            Span::raw(" "),
            key("←/p"),
            Span::raw(" Previous | "),
            key("→/n"),
            Span::raw(" Next | "),
            key("Esc/x"),
            Span::raw(" Close | "),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]
    } else {
        vec![
            Span::raw(" "),
            key("Enter"),
            Span::raw(" Details | "),
            key("/"),
            Span::raw(" Search | "),
            key("s"),
            Span::raw(" Sort | "),
            key("l"),
            Span::raw(" Load more | "),
            key("↑/↓"),
            Span::raw(" Nav | "),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]
    };

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_notice(f: &mut Frame, text: String, color: Color) {
    let area = centered_rect(50, 25, f.size());
    let notice = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    f.render_widget(Clear, area);
    f.render_widget(notice, area);
}

fn render_overlay(f: &mut Frame, view: &OverlayView) {
    let area = centered_rect(70, 80, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", view.display_name));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(0)])
        .split(inner);

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let content: Vec<Line> = vec![
        Line::from(Span::styled(view.display_name.clone(), label)),
        Line::from(view.id_label.clone()),
        Line::from(Span::styled(view.image_url.clone(), Style::default().fg(Color::DarkGray))),
        Line::from(view.types.clone()),
        Line::from(view.abilities.clone()),
        Line::from(view.categories.clone()),
        Line::from(view.weaknesses.clone()),
        Line::from(view.height.clone()),
        Line::from(view.weight.clone()),
    ];
    f.render_widget(Paragraph::new(content).wrap(Wrap { trim: false }), parts[0]);

    let header = Row::new(vec![Cell::from("Stats"), Cell::from("Value")])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows = view
        .stats
        .iter()
        .map(|(name, value)| Row::new(vec![Cell::from(name.clone()), Cell::from(value.to_string())]));
    let stats = Table::new(rows, [Constraint::Length(18), Constraint::Length(8)]).header(header);

    f.render_widget(stats, parts[1]);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
