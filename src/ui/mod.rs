use std::{
    io,
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::{
    config::{self, Args},
    core::{Phase, PlaybackController},
    render::{self, FanCanvas},
    sampler,
    types::{SimError, SimulationParameters},
};

const HELP_TEXT: &str = "\
Input the number of blades, the true rotation frequency (revolutions per \
second) and the camera framerate (frames per second), then press Enter to \
start. Press m to mark the first blade and s to stop.

Frequencies and framerates under 10 are easiest to follow. The stroboscopic \
effect is strongest when the two differ by less than one: the fan then \
creeps forward, stands still or turns backwards.

Press any key to continue.";

pub fn run(args: &Args) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, args);
    shutdown_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, args: &Args) -> Result<()> {
    let mut state = UiState::new(args, StdRng::from_entropy());
    state.canvas.fit(layout(terminal.size()?)[1]);
    if args.autostart {
        state.start(Instant::now());
    }

    let mut last_draw: Option<Instant> = None;
    loop {
        let size = terminal.size()?;
        state.canvas.fit(layout(size)[1]);
        state.controller.poll(Instant::now(), &mut state.canvas);

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if state.handle_key(key.code, Instant::now()) {
                        info!("quit");
                        return Ok(());
                    }
                    state.needs_redraw = true;
                }
                CrosstermEvent::Resize(..) => state.needs_redraw = true,
                _ => {}
            }
        }

        let dirty = state.canvas.take_dirty() | std::mem::take(&mut state.needs_redraw);
        if dirty || last_draw.map_or(true, |at| at.elapsed() >= config::IDLE_REDRAW) {
            terminal.draw(|frame| draw(frame, &state))?;
            last_draw = Some(Instant::now());
        }

        std::thread::sleep(config::POLL_INTERVAL);
    }
}

fn shutdown_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Blades,
    Frequency,
    Framerate,
}

impl Field {
    const ALL: [Field; 3] = [Field::Blades, Field::Frequency, Field::Framerate];

    fn label(self) -> &'static str {
        match self {
            Field::Blades => "Number of Blades",
            Field::Frequency => "Frequency (RPS)",
            Field::Framerate => "Camera Framerate (FPS)",
        }
    }
}

/// The three text fields feeding [`SimulationParameters::parse`].
#[derive(Debug)]
pub struct InputForm {
    values: [String; 3],
    focus: usize,
}

impl InputForm {
    pub fn new(blades: u32, frequency: f64, framerate: f64) -> Self {
        Self {
            values: [blades.to_string(), frequency.to_string(), framerate.to_string()],
            focus: 0,
        }
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field as usize]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    pub fn push(&mut self, ch: char) {
        let value = &mut self.values[self.focus];
        if (ch.is_ascii_digit() || ch == '.' || ch == '-') && value.len() < config::INPUT_MAX_LEN {
            value.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
    }

    pub fn fill(&mut self, params: SimulationParameters) {
        self.values = [
            params.blade_count().to_string(),
            params.rotation_hz().to_string(),
            params.framerate_hz().to_string(),
        ];
    }

    pub fn parameters(&self) -> Result<SimulationParameters, SimError> {
        SimulationParameters::parse(&self.values[0], &self.values[1], &self.values[2])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Popup {
    Help,
    Error(String),
}

pub struct UiState {
    controller: PlaybackController,
    canvas: FanCanvas,
    form: InputForm,
    popup: Option<Popup>,
    rng: StdRng,
    needs_redraw: bool,
}

impl UiState {
    pub fn new(args: &Args, rng: StdRng) -> Self {
        Self {
            controller: PlaybackController::new(),
            canvas: FanCanvas::new(),
            form: InputForm::new(args.blades, args.frequency, args.framerate),
            popup: if args.no_help { None } else { Some(Popup::Help) },
            rng,
            needs_redraw: true,
        }
    }

    /// Applies one key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode, now: Instant) -> bool {
        if self.popup.take().is_some() {
            return false;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Enter => self.start(now),
            KeyCode::Char('s') => self.controller.stop(&mut self.canvas),
            KeyCode::Char('m') => self.controller.toggle_marker(&mut self.canvas),
            KeyCode::Char('r') => {
                let params = SimulationParameters::near_resonance(&mut self.rng);
                self.form.fill(params);
            }
            KeyCode::Char('?') => self.popup = Some(Popup::Help),
            KeyCode::Tab => self.form.focus_next(),
            KeyCode::BackTab => self.form.focus_prev(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(ch) => self.form.push(ch),
            _ => {}
        }
        false
    }

    fn start(&mut self, now: Instant) {
        let started = self
            .form
            .parameters()
            .and_then(|params| self.controller.start(params, now, &mut self.canvas));
        if let Err(err) = started {
            warn!("rejected parameters: {err}");
            self.popup = Some(Popup::Error(err.to_string()));
        }
    }
}

fn layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(area)
}

fn draw(frame: &mut Frame, state: &UiState) {
    let chunks = layout(frame.size());

    let header = Paragraph::new(header_text(&state.controller))
        .block(Block::default().borders(Borders::ALL).title("fan-strobe"));
    frame.render_widget(header, chunks[0]);

    render::draw(frame, chunks[1], &state.canvas, "Fan");

    let footer = Paragraph::new(footer_lines(&state.form, state.controller.marker()))
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    frame.render_widget(footer, chunks[2]);

    if let Some(popup) = &state.popup {
        draw_popup(frame, popup);
    }
}

fn header_text(controller: &PlaybackController) -> String {
    let phase = match controller.phase() {
        Phase::Idle => "idle",
        Phase::Running if controller.is_exhausted() => "running (sequence exhausted)",
        Phase::Running => "running",
        Phase::Stopped => "stopped",
    };
    match controller.parameters() {
        Some(params) => format!(
            "blades: {} | true: {} rps | camera: {} fps ({} ms) | apparent: {:+.3} rps | frame: {}/{} | {}",
            params.blade_count(),
            params.rotation_hz(),
            params.framerate_hz(),
            controller.interval().as_millis(),
            sampler::apparent_frequency_hz(params.rotation_hz(), params.framerate_hz()),
            controller.state().current_index,
            controller.angles().len(),
            phase
        ),
        None => format!("no run yet | {phase}"),
    }
}

fn footer_lines(form: &InputForm, marked: bool) -> Vec<Line<'static>> {
    let mut spans = Vec::with_capacity(Field::ALL.len() * 2 + 1);
    for field in Field::ALL {
        let style = if form.focused() == field {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        spans.push(Span::raw(format!("{}: ", field.label())));
        spans.push(Span::styled(format!("{:<6}", form.value(field)), style));
        spans.push(Span::raw(" "));
    }
    let (label, color) = if marked {
        ("Blades Marked", Color::Red)
    } else {
        ("Blades Unmarked", Color::White)
    };
    spans.push(Span::styled(format!("[m] {label}"), Style::default().fg(color)));
    vec![
        Line::from(spans),
        Line::from("Enter: start | s: stop | m: mark blade | r: random | Tab: field | ?: help | q: quit"),
    ]
}

fn draw_popup(frame: &mut Frame, popup: &Popup) {
    let (title, text, color) = match popup {
        Popup::Help => ("Welcome to Fan Simulator", HELP_TEXT.to_string(), Color::Blue),
        Popup::Error(message) => ("Error", format!("{message}\n\nPress any key."), Color::Red),
    };
    let area = centered_rect(60, 50, frame.size());
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
