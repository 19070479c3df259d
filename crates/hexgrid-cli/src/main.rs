use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hexgrid_config::Config;
use hexgrid_engine::{CursorMove, GridOptions, HexGrid, Nibble, Pattern, ScrollDirection};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    fs::OpenOptions,
    io::stdout,
    path::{Path, PathBuf},
    process,
};

/// Width of the "00000000  " offset column
const OFFSET_WIDTH: u16 = 10;
/// Each hex cell is two digits and a space
const CELL_WIDTH: u16 = 3;

enum Mode {
    Normal,
    Search(String),
}

struct App {
    hex: HexGrid,
    uppercase: bool,
    mode: Mode,
    last_search: Option<Pattern>,
    message: Option<String>,
    /// Inner area of the grid block from the last draw, for mouse hit testing
    grid_area: Rect,
}

impl App {
    fn new(path: &Path, config: &Config) -> Result<Self> {
        let options = GridOptions {
            window_pages: config.window_pages,
            scroll_step: config.scroll_step,
            ..GridOptions::default()
        };
        let mut hex = HexGrid::open(path, options)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        hex.refresh()?;

        Ok(Self {
            hex,
            uppercase: config.uppercase_hex,
            mode: Mode::Normal,
            last_search: None,
            message: None,
            grid_area: Rect::default(),
        })
    }

    fn report<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        if let Err(e) = result {
            log::warn!("{e}");
            self.message = Some(e.to_string());
        }
    }

    fn move_cursor(&mut self, movement: CursorMove) {
        let result = self.hex.move_cursor(movement);
        self.report(result);
    }

    fn scroll(&mut self, direction: ScrollDirection) {
        let result = self.hex.scroll(direction, self.hex.scroll_step());
        self.report(result);
    }

    fn type_hex(&mut self, ch: char) {
        let result = self.hex.input_hex(ch).map(|_| ());
        self.report(result);
    }

    fn escape(&mut self) {
        if self.hex.cursor().is_waiting_low() {
            self.hex.cancel_edit();
        } else {
            self.hex.clear_selection();
        }
    }

    /// Text search is case-insensitive; a leading `0x` searches for hex bytes.
    fn start_search(&mut self, query: &str) {
        let pattern = match query.strip_prefix("0x") {
            Some(hex) => Pattern::from_hex(hex),
            None => Some(Pattern::new(query.as_bytes(), false)),
        };
        match pattern {
            Some(pattern) if !pattern.is_empty() => {
                self.last_search = Some(pattern);
                self.find_next();
            }
            _ => self.message = Some(format!("Invalid search: {query}")),
        }
    }

    fn find_next(&mut self) {
        let Some(pattern) = self.last_search.as_ref() else {
            return;
        };
        let from = self.hex.cursor().offset + 1;
        match self.hex.find(pattern, from) {
            Ok(Some(offset)) => {
                let result = self.hex.move_cursor_to(offset);
                self.report(result);
                self.message = Some(format!("Found at {offset:#x}"));
            }
            Ok(None) => self.message = Some("Not found".to_string()),
            Err(e) => self.report(Err(e)),
        }
    }

    /// Grid cell under a terminal position, if any.
    fn cell_at(&self, column: u16, row: u16) -> Option<(u64, usize)> {
        let area = self.grid_area;
        if row < area.y || row >= area.y + area.height {
            return None;
        }
        let x = column.checked_sub(area.x + OFFSET_WIDTH)?;
        let col = usize::from(x / CELL_WIDTH);
        if col >= self.hex.bytes_per_row() {
            return None;
        }
        let grid_row = self.hex.visible_rows().start() + u64::from(row - area.y);
        Some((grid_row, col))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((row, col)) = self.cell_at(mouse.column, mouse.row) {
                    let block_mode = mouse.modifiers.contains(KeyModifiers::ALT);
                    self.hex.begin_selection(row, col, block_mode);
                    let result = self.hex.set_cursor(row, col);
                    self.report(result);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((row, col)) = self.cell_at(mouse.column, mouse.row) {
                    self.hex.extend_selection(row, col);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.hex.end_selection(),
            MouseEventKind::ScrollUp => self.scroll(ScrollDirection::Up),
            MouseEventKind::ScrollDown => self.scroll(ScrollDirection::Down),
            _ => {}
        }
    }

    /// Returns false when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Mode::Search(query) = &mut self.mode {
            match key.code {
                KeyCode::Enter => {
                    let query = std::mem::take(query);
                    self.mode = Mode::Normal;
                    self.start_search(&query);
                }
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Backspace => {
                    query.pop();
                }
                KeyCode::Char(c) => query.push(c),
                _ => {}
            }
            return true;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        self.message = None;
        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Char('/') => self.mode = Mode::Search(String::new()),
            KeyCode::Char('n') => self.find_next(),
            KeyCode::Char(c) => self.type_hex(c),
            KeyCode::Esc => self.escape(),
            KeyCode::Left => self.move_cursor(CursorMove::Left),
            KeyCode::Right => self.move_cursor(CursorMove::Right),
            KeyCode::Up if ctrl => self.scroll(ScrollDirection::Up),
            KeyCode::Down if ctrl => self.scroll(ScrollDirection::Down),
            KeyCode::Up => self.move_cursor(CursorMove::Up),
            KeyCode::Down => self.move_cursor(CursorMove::Down),
            KeyCode::PageUp => self.move_cursor(CursorMove::PageUp),
            KeyCode::PageDown => self.move_cursor(CursorMove::PageDown),
            KeyCode::Home if ctrl => self.move_cursor(CursorMove::FileStart),
            KeyCode::End if ctrl => self.move_cursor(CursorMove::FileEnd),
            KeyCode::Home => self.move_cursor(CursorMove::RowStart),
            KeyCode::End => self.move_cursor(CursorMove::RowEnd),
            _ => {}
        }
        true
    }
}

fn init_logging(log_file: Option<&Path>) {
    // Logging to the terminal would draw over the grid
    let Some(log_file) = log_file else {
        return;
    };
    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init(),
        Err(e) => eprintln!("Warning: cannot open log file {}: {e}", log_file.display()),
    }
}

fn main() -> Result<()> {
    // Determine the file from CLI args or the last file in the config
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let mut config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    init_logging(config.log_file.as_deref());
    log::info!("hexgrid starting, config path: {}", config_path.display());

    let file_path = match (args.len(), config.last_file.clone()) {
        (2, _) => PathBuf::from(&args[1]),
        (1, Some(last_file)) => last_file,
        (1, None) => {
            eprintln!("Error: No file given and no last file in config");
            eprintln!("Usage: {} <file>", args[0]);
            eprintln!("Or set last_file in {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [file]", args[0]);
            process::exit(1);
        }
    };

    let mut app = match App::new(&file_path, &config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    if config.last_file.as_deref() != Some(file_path.as_path()) {
        config.last_file = Some(file_path);
        if let Err(e) = config.save() {
            log::warn!("Failed to remember last file: {e}");
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    app.hex.close();

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) => {
                if !app.handle_key(key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
}

fn hex_digits(byte: u8, uppercase: bool) -> String {
    if uppercase {
        format!("{byte:02X}")
    } else {
        format!("{byte:02x}")
    }
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        char::from(byte)
    } else {
        '.'
    }
}

fn render_row(app: &App, row: u64) -> Line<'static> {
    let hex = &app.hex;
    let row_offset = hex.row_offset(row);
    let cursor = hex.cursor();

    let mut spans = vec![Span::styled(
        format!("{row_offset:08x}  "),
        Style::default().fg(Color::Blue),
    )];
    let mut ascii = String::with_capacity(hex.bytes_per_row());

    for col in 0..hex.bytes_per_row() {
        let offset = row_offset + col as u64;
        let Some(byte) = hex.read_byte(offset) else {
            spans.push(Span::raw("   "));
            ascii.push(' ');
            continue;
        };

        let mut style = Style::default();
        if hex.is_selected(row, col) {
            style = style.bg(Color::Blue).fg(Color::White);
        }
        if offset == cursor.offset {
            style = style.bg(Color::Yellow).fg(Color::Black);
            if cursor.nibble == Nibble::Low {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
        }
        spans.push(Span::styled(hex_digits(byte, app.uppercase), style));
        spans.push(Span::raw(" "));
        ascii.push(printable(byte));
    }

    spans.push(Span::raw(format!(" |{ascii}|")));
    Line::from(spans)
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.hex.file().path().display().to_string());
    app.grid_area = block.inner(chunks[0]);
    let result = app
        .hex
        .set_visible_row_count(u64::from(app.grid_area.height));
    app.report(result);

    let lines: Vec<Line> = app
        .hex
        .visible_rows()
        .map(|row| render_row(app, row))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    // Status line
    let status = app.hex.status();
    let window = status
        .window
        .map(|w| format!("{:#x}..{:#x}", w.start, w.end()))
        .unwrap_or_else(|| "-".to_string());
    let status_text = format!(
        "Size: {} bytes | Offset: {:#x} | Cursor: {:#x} ({}, {}) | Window: {window}",
        status.file_size,
        status.top_offset,
        status.cursor.offset,
        status.cursor_pos.row,
        status.cursor_pos.col,
    );
    f.render_widget(
        Paragraph::new(status_text).style(Style::default().fg(Color::Black).bg(Color::Gray)),
        chunks[1],
    );

    // Prompt, message or help
    let bottom = match (&app.mode, &app.message) {
        (Mode::Search(query), _) => Line::from(format!("/{query}")),
        (Mode::Normal, Some(message)) => Line::from(message.clone()),
        (Mode::Normal, None) => Line::from(vec![
            Span::raw("q: Quit | "),
            Span::raw("0-9 a-f: Edit | "),
            Span::raw("Arrows/PgUp/PgDn: Move | "),
            Span::raw("Ctrl-↑/↓: Scroll | "),
            Span::raw("/: Find | n: Next | Drag: Select (Alt: block)"),
        ]),
    };
    f.render_widget(Paragraph::new(bottom), chunks[2]);
}
