//! App - widget state and the event loop

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use practice_companion::{
    audio::CpalBackend,
    config::CompanionConfig,
    practice::{
        pitch::guess_choices, JsonNoteStore, MemoryNoteStore, Metronome, NoteEntry, NoteStore,
        PitchTrainer, Stopwatch, SymbolsDeck, WarmupPicker,
    },
};

use super::ui;

/// Upper bound on how long the loop sleeps waiting for input (~60fps)
const FRAME: Duration = Duration::from_millis(16);
/// Notes shown in the log panel
const RECENT_NOTES: usize = 5;

/// Keys for the twelve answer buttons, C4..B4
pub const GUESS_KEYS: [char; 12] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '-', '='];

pub struct App {
    pub metronome: Metronome<CpalBackend>,
    pub stopwatch: Stopwatch,
    pub warmup: WarmupPicker,
    pub pitch: PitchTrainer<CpalBackend>,
    pub symbols: SymbolsDeck,
    notes: Box<dyn NoteStore>,
    pub recent_notes: Vec<NoteEntry>,
    /// Text being typed while in note input mode
    pub note_input: Option<String>,
    /// Last error or confirmation, shown in the status bar
    pub status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &CompanionConfig) -> Self {
        let backend = CpalBackend::new(config.audio.queue_capacity);

        let (notes, status): (Box<dyn NoteStore>, _) =
            match JsonNoteStore::open(&config.storage.notes_path) {
                Ok(store) => (Box::new(store), None),
                Err(e) => {
                    warn!(%e, "note store unavailable, notes will not be saved");
                    (
                        Box::new(MemoryNoteStore::new()),
                        Some(format!("{e} (notes will not be saved)")),
                    )
                }
            };
        let recent_notes = notes.recent(RECENT_NOTES);

        Self {
            metronome: Metronome::new(
                backend,
                config.metronome.scheduler_config(),
                config.metronome.tempo,
            ),
            stopwatch: Stopwatch::new(),
            warmup: WarmupPicker::new(),
            pitch: PitchTrainer::new(backend, config.pitch.round_delays()),
            symbols: SymbolsDeck::new(),
            notes,
            recent_notes,
            note_input: None,
            status,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        info!("practice session started");

        while !self.should_quit {
            let now = Instant::now();
            self.advance(now);

            terminal.draw(|frame| ui::render(frame, self))?;

            // Wake up in time for the next metronome pump
            let timeout = self
                .metronome
                .scheduler()
                .time_until_pump(Instant::now())
                .map_or(FRAME, |t| t.min(FRAME));

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, Instant::now());
                    }
                }
            }
        }

        self.metronome.stop();
        info!("practice session ended");
        Ok(())
    }

    /// Let time pass for every widget.
    fn advance(&mut self, now: Instant) {
        self.metronome.tick(now);
        self.stopwatch.poll(now);
        if let Err(e) = self.pitch.poll(now) {
            self.report(e);
        }
    }

    fn report(&mut self, err: impl std::fmt::Display) {
        warn!(%err, "action failed");
        self.status = Some(err.to_string());
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode, now: Instant) {
        if self.note_input.is_some() {
            self.handle_note_key(key);
            return;
        }

        let result = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                Ok(())
            }

            KeyCode::Char(' ') => self.metronome.toggle(),
            KeyCode::Up => self.metronome.nudge_tempo(1),
            KeyCode::Down => self.metronome.nudge_tempo(-1),
            KeyCode::PageUp => self.metronome.nudge_tempo(10),
            KeyCode::PageDown => self.metronome.nudge_tempo(-10),

            KeyCode::Char('t') => {
                self.stopwatch.toggle(now);
                Ok(())
            }
            KeyCode::Char('r') => {
                self.stopwatch.reset();
                Ok(())
            }

            KeyCode::Char('w') => {
                self.warmup.shuffle();
                Ok(())
            }

            KeyCode::Char('p') => self.pitch.start().map(|_| ()),
            KeyCode::Char('o') => self.pitch.replay(),
            KeyCode::Char(c) if GUESS_KEYS.contains(&c) => {
                if let Some(idx) = GUESS_KEYS.iter().position(|&k| k == c) {
                    self.pitch.guess(guess_choices()[idx], now);
                }
                Ok(())
            }

            KeyCode::Char('v') => {
                self.symbols.reveal();
                Ok(())
            }
            KeyCode::Char('n') => {
                self.symbols.next();
                Ok(())
            }

            KeyCode::Char('i') => {
                self.note_input = Some(String::new());
                Ok(())
            }

            _ => Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(e) => self.report(e),
        }
    }

    fn handle_note_key(&mut self, key: KeyCode) {
        let Some(input) = self.note_input.as_mut() else {
            return;
        };

        match key {
            KeyCode::Esc => self.note_input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                let text = input.trim().to_owned();
                self.note_input = None;
                if text.is_empty() {
                    return;
                }
                match self.notes.add(&text) {
                    Ok(entry) => {
                        self.status = Some(format!("Saved note #{}", entry.id));
                        self.recent_notes = self.notes.recent(RECENT_NOTES);
                    }
                    Err(e) => self.report(e),
                }
            }
            _ => {}
        }
    }
}
