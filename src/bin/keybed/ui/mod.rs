//! Terminal UI event loop: translates crossterm events into the input
//! reconciler's abstract events, ticks voice bookkeeping, and draws the
//! keyboard, scope, and spectrum views.

mod keyboard;
mod scope;
mod spectrum;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use keybed::input::{InputEvent, Reconciler};
use keybed::registry::{layout_for, KeyLane, NOTES};
use keybed::synth::SynthHandle;

use keyboard::{key_at, render_keyboard};
use scope::render_scope;
use spectrum::{render_spectrum, Spectrum};

/// Samples kept for the scope and spectrum views (also the FFT size).
const VIS_BUFFER_SIZE: usize = 1024;

/// Without release events, a held key is considered let go once its
/// auto-repeat stream has been quiet this long. Longer than any common
/// initial-repeat delay, and the voice's own 620 ms lifetime bounds the
/// audible tail anyway.
const KEY_HOLD_TIMEOUT: Duration = Duration::from_millis(650);

pub struct UiApp {
    reconciler: Reconciler,
    synth: SynthHandle,
    tap_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    analyzer: Spectrum,
    lanes: Vec<KeyLane>,
    sample_rate: f32,
    /// Whether the terminal delivers key release events.
    key_release_supported: bool,
    /// Fallback hold tracking: last time each key's down/repeat was seen.
    held_keys: HashMap<char, Instant>,
    /// Key index currently held by the mouse, if any.
    pointer_on: Option<usize>,
    /// Inner keyboard area from the last draw, for mouse hit-testing.
    keyboard_area: Rect,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        synth: SynthHandle,
        tap_rx: Consumer<f32>,
        sample_rate: f32,
        key_release_supported: bool,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(),
            synth,
            tap_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            analyzer: Spectrum::new(VIS_BUFFER_SIZE, sample_rate),
            lanes: layout_for(&NOTES),
            sample_rate,
            key_release_supported,
            held_keys: HashMap::new(),
            pointer_on: None,
            keyboard_area: Rect::default(),
            should_quit: false,
        }
    }

    /// Run until quit. One iteration per ~16ms: tick bookkeeping, drain the
    /// audio tap, draw, then handle at most one input event.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let now = Instant::now();
            self.synth.prune_expired(now);
            if !self.key_release_supported {
                self.expire_held_keys(now);
            }

            self.poll_audio();
            self.analyzer.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, event: InputEvent) {
        self.reconciler.handle(event, &mut self.synth);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        let KeyCode::Char(ch) = key.code else {
            return;
        };

        match key.kind {
            // The reconciler treats Repeat as a duplicate down and ignores
            // it; here it also refreshes the fallback hold timestamp.
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if !self.key_release_supported {
                    self.held_keys.insert(ch.to_ascii_lowercase(), Instant::now());
                }
                self.dispatch(InputEvent::KeyDown(ch));
            }
            KeyEventKind::Release => self.dispatch(InputEvent::KeyUp(ch)),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) =
                    key_at(&self.lanes, self.keyboard_area, mouse.column, mouse.row)
                {
                    self.pointer_on = Some(index);
                    self.dispatch(InputEvent::PointerDown(index));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(held) = self.pointer_on {
                    let over = key_at(&self.lanes, self.keyboard_area, mouse.column, mouse.row);
                    if over != Some(held) {
                        self.pointer_on = None;
                        self.dispatch(InputEvent::PointerLeave(held));
                    }
                }
            }
            // Button-up anywhere releases everything: the press target is
            // not guaranteed to see its own up event.
            MouseEventKind::Up(_) => {
                self.pointer_on = None;
                self.dispatch(InputEvent::ReleaseAll);
            }
            _ => {}
        }
    }

    /// Synthesize key-up for keys whose auto-repeat stream went quiet.
    fn expire_held_keys(&mut self, now: Instant) {
        let expired: Vec<char> = self
            .held_keys
            .iter()
            .filter(|(_, &seen)| now.duration_since(seen) > KEY_HOLD_TIMEOUT)
            .map(|(&ch, _)| ch)
            .collect();

        for ch in expired {
            self.held_keys.remove(&ch);
            self.dispatch(InputEvent::KeyUp(ch));
        }
    }

    /// Drain the tap, keeping the most recent `VIS_BUFFER_SIZE` samples.
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.tap_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if received && self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Min(9),     // Keyboard
                Constraint::Length(8),  // Scope
                Constraint::Length(8),  // Spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(frame.area());

        self.render_status(frame, chunks[0]);
        self.keyboard_area = render_keyboard(frame, chunks[1], &self.lanes, &self.reconciler);
        render_scope(frame, chunks[2], &self.audio_buffer);
        render_spectrum(frame, chunks[3], &self.analyzer);

        let help = Paragraph::new(
            " [Esc] Quit   Keys: Q W E R T Y U + 2 3 5 6 7   Mouse: click or drag the keys",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let now = Instant::now();
        let block = Block::default().title(" keybed ").borders(Borders::ALL);

        let held: Vec<&str> = self
            .reconciler
            .pressed_indices()
            .map(|i| NOTES[i].label)
            .collect();
        let held = if held.is_empty() {
            "-".to_string()
        } else {
            held.join(" ")
        };

        let input_mode = if self.key_release_supported {
            "key release"
        } else {
            "auto-repeat fallback"
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" Voices: {}  ", self.synth.live_count(now)),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("Held: {held}  "),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("{:.1}kHz  ", self.sample_rate / 1000.0),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("Input: {input_mode}"),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
