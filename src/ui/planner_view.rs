use crate::data::active_month::{month_name, MONTH_COUNT};
use crate::data::day_key::{days_in_month, DayKey};
use crate::data::HexColor;
use crate::planner::{PlannerController, SaveState, UndoOutcome};
use anyhow::Result;
use chrono::Datelike;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::{Duration as StdDuration, Instant};

const WEEKDAYS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];
const HEADER_BG: Color = Color::Rgb(76, 175, 80);
const NOTE_BG: Color = Color::White;

#[derive(PartialEq, Debug)]
enum Mode {
    Normal,
    Edit,
}

pub struct App<'a> {
    planner: &'a mut PlannerController,
    selected: DayKey,
    mode: Mode,
    input_buffer: String,
    /// Last user-facing message (text, color). Cleared on the next key in normal mode.
    status: Option<(String, Color)>,
}

impl<'a> App<'a> {
    pub fn new(planner: &'a mut PlannerController, warnings: Vec<String>) -> Self {
        let selected = DayKey::first_of_month(planner.active_month());
        let status = (!warnings.is_empty()).then(|| (warnings.join("; "), Color::Yellow));
        App {
            planner,
            selected,
            mode: Mode::Normal,
            input_buffer: String::new(),
            status,
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(code, KeyCode::Char('z')) {
            self.undo();
            return false;
        }
        if ctrl && matches!(code, KeyCode::Char('s')) {
            self.save_now();
            return false;
        }

        match self.mode {
            Mode::Edit => {
                match code {
                    KeyCode::Esc => self.mode = Mode::Normal,
                    KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => {
                        self.input_buffer.push('\n');
                        self.apply_edit();
                    }
                    KeyCode::Enter => self.mode = Mode::Normal,
                    KeyCode::Backspace => {
                        if self.input_buffer.pop().is_some() {
                            self.apply_edit();
                        }
                    }
                    KeyCode::Char(c)
                        if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                    {
                        self.input_buffer.push(c);
                        self.apply_edit();
                    }
                    _ => {}
                }
                false
            }
            Mode::Normal => {
                self.status = None;
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => return true,
                    KeyCode::Left => self.selected = shift_within_month(self.selected, -1),
                    KeyCode::Right => self.selected = shift_within_month(self.selected, 1),
                    KeyCode::Up => self.selected = shift_within_month(self.selected, -7),
                    KeyCode::Down => self.selected = shift_within_month(self.selected, 7),
                    KeyCode::Tab | KeyCode::Char('n') => self.change_month(1),
                    KeyCode::BackTab | KeyCode::Char('p') => self.change_month(-1),
                    KeyCode::Enter | KeyCode::Char('e') => self.start_edit(),
                    _ => {}
                }
                false
            }
        }
    }

    /// Runs a due autosave.
    pub fn tick(&mut self, now: Instant) {
        if let Some(SaveState::Failed(msg)) = self.planner.tick(now) {
            self.status = Some((format!("Not saved: {msg}"), Color::Red));
        }
    }

    fn start_edit(&mut self) {
        let data = self.planner.display_data(self.selected);
        if let Some(name) = data.holiday_name {
            self.status = Some((format!("{} is a holiday ({name})", self.selected), Color::Yellow));
            return;
        }
        self.input_buffer = data.text;
        self.mode = Mode::Edit;
    }

    fn apply_edit(&mut self) {
        match self.planner.on_edit(self.selected, &self.input_buffer) {
            Ok(SaveState::Failed(msg)) => {
                self.status = Some((format!("Kept in memory, not saved: {msg}"), Color::Red));
            }
            Ok(_) => {}
            Err(e) => {
                self.status = Some((e.to_string(), Color::Red));
                self.mode = Mode::Normal;
            }
        }
    }

    fn undo(&mut self) {
        match self.planner.on_undo_requested() {
            UndoOutcome::NothingToUndo => {
                self.status = Some(("Nothing to undo".to_string(), Color::DarkGray));
            }
            UndoOutcome::Restored { key, text, save } => {
                if key == self.selected {
                    self.input_buffer = text;
                } else {
                    self.mode = Mode::Normal;
                }
                self.status = Some(match save {
                    SaveState::Failed(msg) => (format!("Undone, not saved: {msg}"), Color::Red),
                    _ => (format!("Undid last change on {key}"), Color::Cyan),
                });
            }
        }
    }

    fn save_now(&mut self) {
        self.status = Some(match self.planner.flush() {
            Ok(()) => ("Saved".to_string(), Color::Green),
            Err(e) => (format!("Save failed: {e}"), Color::Red),
        });
    }

    fn change_month(&mut self, delta: i64) {
        let next = self.planner.active_month() as i64 + delta;
        if !(0..MONTH_COUNT as i64).contains(&next) {
            return;
        }
        if let Err(e) = self.planner.on_month_changed(next) {
            self.status = Some((e.to_string(), Color::Red));
            return;
        }
        let month = next as u32 + 1;
        let day = self.selected.day().min(days_in_month(month));
        if let Ok(key) = DayKey::new(month, day) {
            self.selected = key;
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // month tabs
                Constraint::Min(22),   // calendar grid
                Constraint::Length(8), // selected day
                Constraint::Length(1), // status / help
            ])
            .split(f.area());

        self.render_tabs(f, chunks[0]);
        self.render_grid(f, chunks[1]);
        self.render_detail(f, chunks[2]);
        self.render_status(f, chunks[3]);
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<Line> = (0..MONTH_COUNT).map(|i| Line::from(month_name(i))).collect();
        let tabs = Tabs::new(titles)
            .select(self.planner.active_month())
            .block(Block::default().borders(Borders::ALL).title(" Agenda Mensal - 2025 "))
            .highlight_style(
                Style::default()
                    .fg(HEADER_BG)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        f.render_widget(tabs, area);
    }

    fn render_grid(&self, f: &mut Frame, area: Rect) {
        let settings = self.planner.settings();
        let text_color = to_color(&settings.text_color);
        let holiday_color = to_color(&settings.holiday_color);

        let header = Row::new(WEEKDAYS.iter().map(|d| {
            Cell::from(*d).style(
                Style::default()
                    .fg(Color::White)
                    .bg(HEADER_BG)
                    .add_modifier(Modifier::BOLD),
            )
        }));

        let rows: Vec<Row> = month_grid(self.selected.month())
            .into_iter()
            .map(|week| {
                let cells: Vec<Cell> = week
                    .iter()
                    .map(|slot| match slot {
                        Some(key) => self.day_cell(*key, text_color, holiday_color),
                        None => Cell::from(""),
                    })
                    .collect();
                Row::new(cells).height(3)
            })
            .collect();

        let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
            .header(header)
            .column_spacing(1)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(table, area);
    }

    fn day_cell(&self, key: DayKey, text_color: Color, holiday_color: Color) -> Cell<'static> {
        let data = self.planner.display_data(key);
        let mut number_style = Style::default().fg(HEADER_BG).add_modifier(Modifier::BOLD);
        if key == self.selected {
            number_style = number_style.add_modifier(Modifier::REVERSED);
        }
        let mut lines = vec![Line::from(Span::styled(format!("{:2}", key.day()), number_style))];
        match data.holiday_name {
            Some(name) => {
                lines.push(Line::from(name));
                Cell::from(Text::from(lines))
                    .style(Style::default().fg(Color::Black).bg(holiday_color))
            }
            None => {
                if let Some(first) = data.text.lines().find(|l| !l.trim().is_empty()) {
                    lines.push(Line::from(Span::styled(
                        first.to_string(),
                        Style::default().fg(text_color).bg(NOTE_BG),
                    )));
                }
                Cell::from(Text::from(lines))
            }
        }
    }

    fn render_detail(&self, f: &mut Frame, area: Rect) {
        let settings = self.planner.settings();
        let data = self.planner.display_data(self.selected);
        let date = self.selected.date();
        let title = format!(
            " {} {} de {} ",
            WEEKDAYS[date.weekday().num_days_from_monday() as usize],
            self.selected.day(),
            month_name(self.selected.month_index())
        );

        let (body, style) = match (&data.holiday_name, &self.mode) {
            (Some(name), _) => (
                name.clone(),
                Style::default().fg(Color::Black).bg(to_color(&settings.holiday_color)),
            ),
            (None, Mode::Edit) => (
                format!("{}▏", self.input_buffer),
                Style::default().fg(to_color(&settings.text_color)).bg(NOTE_BG),
            ),
            (None, Mode::Normal) => (
                data.text.clone(),
                Style::default().fg(to_color(&settings.text_color)).bg(NOTE_BG),
            ),
        };
        let border_style = if self.mode == Mode::Edit {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let detail = Paragraph::new(body)
            .style(style)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            );
        f.render_widget(detail, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some((msg, color)) => Line::from(Span::styled(msg.clone(), Style::default().fg(*color))),
            None => {
                let font = &self.planner.settings().font;
                let dirty = if self.planner.is_dirty() { " • unsaved" } else { "" };
                let help = match self.mode {
                    Mode::Normal => "←↑↓→ day  Tab/n p month  Enter edit  ^Z undo  ^S save  q quit",
                    Mode::Edit => "type to edit  Alt+Enter newline  Enter/Esc done  ^Z undo",
                };
                Line::from(vec![
                    Span::styled(help, Style::default().fg(Color::DarkGray)),
                    Span::raw(format!("   {} {}{dirty}", font.family, font.size)),
                ])
            }
        };
        f.render_widget(Paragraph::new(line), area);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
        app.tick(Instant::now());
    }
    Ok(())
}

// ── Calendar helpers ──────────────────────────────────────────────────────────

/// Weeks of `month` (1-based), Monday first; `None` pads cells outside the month.
pub(crate) fn month_grid(month: u32) -> Vec<[Option<DayKey>; 7]> {
    let mut weeks = Vec::new();
    let mut week = [None; 7];
    for key in DayKey::month_days(month) {
        let col = key.date().weekday().num_days_from_monday() as usize;
        week[col] = Some(key);
        if col == 6 {
            weeks.push(week);
            week = [None; 7];
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

/// Moves `delta` days, clamped to the month of `key`.
pub(crate) fn shift_within_month(key: DayKey, delta: i32) -> DayKey {
    let last = days_in_month(key.month()) as i32;
    let day = (key.day() as i32 + delta).clamp(1, last) as u32;
    DayKey::new(key.month(), day).unwrap_or(key)
}

pub(crate) fn to_color(color: &HexColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HolidayTable, PersistenceGateway};
    use crate::planner::AutosavePolicy;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    fn key(m: u32, d: u32) -> DayKey {
        DayKey::new(m, d).unwrap()
    }

    fn make_planner(tmp: &TempDir) -> PlannerController {
        PlannerController::open(
            PersistenceGateway::new(tmp.path()),
            &HolidayTable::brazil_2025(),
            AutosavePolicy::Immediate,
        )
        .0
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::empty());
        }
    }

    // ── helper tests ──────────────────────────────────────────────────────────

    #[test]
    fn test_month_grid_january_2025_starts_wednesday() {
        let grid = month_grid(1);
        assert_eq!(grid[0][0], None);
        assert_eq!(grid[0][1], None);
        assert_eq!(grid[0][2], Some(key(1, 1)));
        assert_eq!(grid[0][6], Some(key(1, 5)));
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn test_month_grid_covers_every_day_once() {
        for month in 1..=12 {
            let count = month_grid(month)
                .iter()
                .flat_map(|w| w.iter())
                .filter(|s| s.is_some())
                .count();
            assert_eq!(count as u32, days_in_month(month));
        }
    }

    #[test]
    fn test_shift_within_month_clamps() {
        assert_eq!(shift_within_month(key(2, 1), -1), key(2, 1));
        assert_eq!(shift_within_month(key(2, 27), 7), key(2, 28));
        assert_eq!(shift_within_month(key(2, 10), 7), key(2, 17));
    }

    #[test]
    fn test_to_color() {
        let c: HexColor = "#FFEB99".parse().unwrap();
        assert_eq!(to_color(&c), Color::Rgb(255, 235, 153));
    }

    // ── handle_key tests ──────────────────────────────────────────────────────

    #[test]
    fn test_arrow_keys_move_selected_day() {
        let tmp = TempDir::new().unwrap();
        let mut planner = make_planner(&tmp);
        let mut app = App::new(&mut planner, Vec::new());
        assert_eq!(app.selected, key(1, 1));

        app.handle_key(KeyCode::Right, KeyModifiers::empty());
        assert_eq!(app.selected, key(1, 2));
        app.handle_key(KeyCode::Down, KeyModifiers::empty());
        assert_eq!(app.selected, key(1, 9));
        app.handle_key(KeyCode::Up, KeyModifiers::empty());
        app.handle_key(KeyCode::Left, KeyModifiers::empty());
        assert_eq!(app.selected, key(1, 1));
    }

    #[test]
    fn test_tab_changes_active_month_and_clamps_day() {
        let tmp = TempDir::new().unwrap();
        let mut planner = make_planner(&tmp);
        let mut app = App::new(&mut planner, Vec::new());
        for _ in 0..30 {
            app.handle_key(KeyCode::Right, KeyModifiers::empty());
        }
        assert_eq!(app.selected, key(1, 31));
        app.handle_key(KeyCode::Tab, KeyModifiers::empty());
        assert_eq!(app.selected, key(2, 28));
        assert_eq!(app.planner.active_month(), 1);
        app.handle_key(KeyCode::BackTab, KeyModifiers::empty());
        app.handle_key(KeyCode::BackTab, KeyModifiers::empty());
        assert_eq!(app.planner.active_month(), 0);
    }

    #[test]
    fn test_typing_edits_and_undo_restores() {
        let tmp = TempDir::new().unwrap();
        let mut planner = make_planner(&tmp);
        let mut app = App::new(&mut planner, Vec::new());
        app.handle_key(KeyCode::Right, KeyModifiers::empty()); // 1_2
        app.handle_key(KeyCode::Enter, KeyModifiers::empty());
        assert_eq!(app.mode, Mode::Edit);
        type_text(&mut app, "ABC");
        assert_eq!(app.planner.notes().get(key(1, 2)), "ABC");

        app.handle_key(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(app.planner.notes().get(key(1, 2)), "AB");
        assert_eq!(app.input_buffer, "AB");

        app.handle_key(KeyCode::Enter, KeyModifiers::empty());
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_control_and_alt_chords_do_not_insert_text() {
        let tmp = TempDir::new().unwrap();
        let mut planner = make_planner(&tmp);
        let mut app = App::new(&mut planner, Vec::new());
        app.handle_key(KeyCode::Right, KeyModifiers::empty()); // 1_2
        app.handle_key(KeyCode::Enter, KeyModifiers::empty());
        type_text(&mut app, "ok");

        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.handle_key(KeyCode::Char('a'), KeyModifiers::CONTROL);
        app.handle_key(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(app.planner.notes().get(key(1, 2)), "ok");
        assert_eq!(app.input_buffer, "ok");
        assert_eq!(app.mode, Mode::Edit);

        app.handle_key(KeyCode::Char('K'), KeyModifiers::SHIFT);
        assert_eq!(app.planner.notes().get(key(1, 2)), "okK");
    }

    #[test]
    fn test_edit_on_holiday_is_refused() {
        let tmp = TempDir::new().unwrap();
        let mut planner = make_planner(&tmp);
        let mut app = App::new(&mut planner, Vec::new());
        app.handle_key(KeyCode::Enter, KeyModifiers::empty()); // 1_1, Ano Novo
        assert_eq!(app.mode, Mode::Normal);
        let (msg, _) = app.status.clone().unwrap();
        assert!(msg.contains("Ano Novo"));
    }

    #[test]
    fn test_undo_with_no_edits_reports_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut planner = make_planner(&tmp);
        let mut app = App::new(&mut planner, Vec::new());
        app.handle_key(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(app.status.clone().unwrap().0, "Nothing to undo");
    }

    #[test]
    fn test_q_quits_only_in_normal_mode() {
        let tmp = TempDir::new().unwrap();
        let mut planner = make_planner(&tmp);
        let mut app = App::new(&mut planner, Vec::new());
        app.handle_key(KeyCode::Right, KeyModifiers::empty());
        app.handle_key(KeyCode::Char('e'), KeyModifiers::empty());
        assert!(!app.handle_key(KeyCode::Char('q'), KeyModifiers::empty()));
        assert_eq!(app.planner.notes().get(key(1, 2)), "q");
        app.handle_key(KeyCode::Esc, KeyModifiers::empty());
        assert!(app.handle_key(KeyCode::Char('q'), KeyModifiers::empty()));
    }

    #[test]
    fn test_starts_on_saved_active_month() {
        let tmp = TempDir::new().unwrap();
        {
            let mut planner = make_planner(&tmp);
            planner.on_month_changed(5).unwrap();
            planner.on_shutdown().unwrap();
        }
        let mut planner = make_planner(&tmp);
        let app = App::new(&mut planner, Vec::new());
        assert_eq!(app.selected, key(6, 1));
    }
}
