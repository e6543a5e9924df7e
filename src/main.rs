pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::Rng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

use typedrill::{
    catalog::{Catalog, Language, Snippet},
    config::{FilePrefStore, PrefStore, Prefs},
    controller::{SessionController, SpecialKey},
    feedback::{FeedbackSignal, Intensity},
    report::{self, RunRecord},
    runtime::{CrosstermEventSource, LoopStep, Runner, TrainerEvent},
    TICK_RATE_MS,
};

/// typing trainer for real code snippets
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing trainer built around real code snippets, with recall and blind drills, a pace bot to race against, and per-run accuracy tracking."
)]
pub struct Cli {
    /// limit the deck to one language
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// limit the deck to one category (case-insensitive)
    #[clap(short = 'c', long)]
    category: Option<String>,

    /// start on a specific snippet id (e.g. RS-2)
    #[clap(short = 's', long)]
    snippet: Option<String>,

    /// start on a random snippet from the deck
    #[clap(long)]
    random: bool,

    /// show the guide dimmed instead of highlighted
    #[clap(long)]
    ghost: bool,

    /// hide the guide once you start typing
    #[clap(long)]
    recall: bool,

    /// hide the guide for the whole run
    #[clap(long)]
    blind: bool,

    /// any mistake restarts the run from scratch
    #[clap(long)]
    hardcore: bool,

    /// flag runs that finish at 100% accuracy
    #[clap(long)]
    precision: bool,

    /// start with the pace bot typing
    #[clap(long)]
    bot: bool,

    /// milliseconds between bot keystrokes
    #[clap(long, value_parser = clap::value_parser!(u64).range(10..=1000))]
    bot_speed: Option<u64>,

    /// list the snippets in the selected deck and exit
    #[clap(long)]
    list: bool,
}

impl Cli {
    /// Fold command-line switches over the persisted preferences.
    /// Flags only ever turn things on; absent flags leave the saved value.
    fn apply_to(&self, prefs: &mut Prefs) {
        if self.ghost {
            prefs.ghost = true;
        }
        if self.recall {
            prefs.recall = true;
        }
        if self.blind {
            prefs.blind = true;
        }
        if self.hardcore {
            prefs.hardcore = true;
        }
        if self.precision {
            prefs.precision = true;
        }
        if self.bot {
            prefs.autotype = true;
        }
        if let Some(speed) = self.bot_speed {
            prefs.bot_speed_ms = speed;
        }
        if let Some(lang) = self.language {
            prefs.language = Some(lang.to_string());
        }
        if let Some(cat) = &self.category {
            prefs.category = Some(cat.clone());
        }
    }
}

#[derive(Debug)]
enum ExitType {
    Restart,
    Next,
    Prev,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub controller: SessionController,
    pub deck: Vec<Snippet>,
    pub deck_index: usize,
    pub prefs: Prefs,
    /// Ticks left on the wrong-key flash; drawn red while nonzero.
    pub flash_ticks: u8,
    reported: bool,
}

impl App {
    pub fn new(deck: Vec<Snippet>, deck_index: usize, prefs: Prefs) -> Self {
        let index = deck_index.min(deck.len().saturating_sub(1));
        let controller = Self::build_controller(&deck[index], &prefs);
        Self {
            controller,
            deck,
            deck_index: index,
            prefs,
            flash_ticks: 0,
            reported: false,
        }
    }

    fn build_controller(snippet: &Snippet, prefs: &Prefs) -> SessionController {
        let mut controller =
            SessionController::new(snippet.clone(), prefs.modes(), prefs.bot_speed_ms);
        if prefs.autotype {
            controller.set_autotype(true, Instant::now());
        }
        controller
    }

    /// Throw away the live session and start over on the snippet at
    /// `deck_index`. Used for restart and for deck navigation.
    pub fn load_current(&mut self) {
        self.prefs.set_modes(&self.controller.modes);
        self.controller = Self::build_controller(&self.deck[self.deck_index], &self.prefs);
        self.flash_ticks = 0;
        self.reported = false;
    }

    pub fn next_snippet(&mut self) {
        self.deck_index = (self.deck_index + 1) % self.deck.len();
        self.load_current();
    }

    pub fn prev_snippet(&mut self) {
        self.deck_index = (self.deck_index + self.deck.len() - 1) % self.deck.len();
        self.load_current();
    }

    /// Drain whatever the controller has queued since the last dispatch.
    pub fn absorb_pending(&mut self) {
        let signals = self.controller.drain_signals();
        self.absorb(signals);
    }

    /// Turn feedback into bin-side effects: the flash counter and the
    /// practice log entry.
    pub fn absorb(&mut self, signals: Vec<FeedbackSignal>) {
        for signal in signals {
            match signal {
                FeedbackSignal::WrongKeystroke { intensity } => {
                    self.flash_ticks = match intensity {
                        Intensity::Normal => 2,
                        Intensity::Strong => 4,
                    };
                }
                FeedbackSignal::HardcoreReset => {
                    self.flash_ticks = 6;
                }
                FeedbackSignal::Completion { .. } => {
                    if !self.reported {
                        self.reported = true;
                        let view = self.controller.snapshot();
                        let _ = report::append_run(&RunRecord {
                            snippet_id: self.controller.snippet().id.clone(),
                            wpm: view.wpm,
                            accuracy: view.accuracy,
                            elapsed: view.elapsed,
                        });
                    }
                }
                FeedbackSignal::VisibilityChange { .. } | FeedbackSignal::FocusExit => {}
            }
        }
    }

    pub fn decay_flash(&mut self) {
        self.flash_ticks = self.flash_ticks.saturating_sub(1);
    }
}

fn pick_start_index(deck: &[Snippet], cli: &Cli, saved_index: usize) -> Result<usize, String> {
    if let Some(id) = &cli.snippet {
        return deck
            .iter()
            .position(|s| s.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| format!("no snippet '{}' in the selected deck", id));
    }
    if cli.random {
        return Ok(rand::thread_rng().gen_range(0..deck.len()));
    }
    Ok(saved_index.min(deck.len() - 1))
}

fn print_deck(deck: &[Snippet]) {
    for s in deck {
        println!(
            "{:<6} {:<12} {:<14} {:<14} {}",
            s.id, s.language, s.category, s.level, s.title
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let catalog = Catalog::load()?;

    let store = FilePrefStore::new();
    let mut prefs = store.load();
    cli.apply_to(&mut prefs);

    let language = prefs
        .language
        .as_deref()
        .and_then(|l| l.parse::<Language>().ok());
    let deck = catalog.deck(language, prefs.category.as_deref());

    if deck.is_empty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, "no snippets match the given filters")
            .exit();
    }

    if cli.list {
        print_deck(&deck);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let start_index = match pick_start_index(&deck, &cli, prefs.deck_index) {
        Ok(i) => i,
        Err(msg) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, msg).exit();
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(deck, start_index, prefs);
    let result = start_tui(&mut terminal, &mut app, &store);

    // Persist where the user left off, whatever happened in the loop.
    persist_prefs(&mut app, &store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn persist_prefs(app: &mut App, store: &dyn PrefStore) {
    app.prefs.set_modes(&app.controller.modes);
    app.prefs.deck_index = app.deck_index;
    let _ = store.save(&app.prefs);
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &dyn PrefStore,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        let mut exit_type = ExitType::Quit;
        terminal.draw(|f| draw(app, f))?;

        loop {
            match runner.pump(&mut app.controller) {
                LoopStep::Ticked { signals, redraw } => {
                    app.absorb(signals);
                    app.decay_flash();
                    if redraw || app.flash_ticks > 0 {
                        terminal.draw(|f| draw(app, f))?;
                    }
                }
                LoopStep::Input(TrainerEvent::Resize) => {
                    terminal.draw(|f| draw(app, f))?;
                }
                LoopStep::Input(TrainerEvent::Key(key)) => {
                    let modes_before = app.controller.modes;
                    match key.code {
                        KeyCode::Esc => {
                            if app.controller.focus {
                                app.controller.submit_special_key(SpecialKey::Escape);
                            } else {
                                break;
                            }
                        }
                        KeyCode::Left => {
                            exit_type = ExitType::Prev;
                            break;
                        }
                        KeyCode::Right => {
                            exit_type = ExitType::Next;
                            break;
                        }
                        KeyCode::Backspace => {
                            if !app.controller.bot_running() {
                                app.controller.submit_special_key(SpecialKey::Backspace);
                            }
                        }
                        KeyCode::Tab => {
                            if !app.controller.bot_running() {
                                app.controller.submit_special_key(SpecialKey::Tab);
                            }
                        }
                        KeyCode::F(1) => {
                            let mut modes = app.controller.modes;
                            modes.ghost = !modes.ghost;
                            app.controller.set_modes(modes);
                        }
                        KeyCode::F(2) => {
                            let mut modes = app.controller.modes;
                            modes.recall = !modes.recall;
                            app.controller.set_modes(modes);
                        }
                        KeyCode::F(3) => {
                            let mut modes = app.controller.modes;
                            modes.blind = !modes.blind;
                            app.controller.set_modes(modes);
                        }
                        KeyCode::F(4) => {
                            let mut modes = app.controller.modes;
                            modes.hardcore = !modes.hardcore;
                            app.controller.set_modes(modes);
                        }
                        KeyCode::F(5) => {
                            let mut modes = app.controller.modes;
                            modes.precision = !modes.precision;
                            app.controller.set_modes(modes);
                        }
                        KeyCode::F(6) => {
                            app.controller.focus = !app.controller.focus;
                        }
                        KeyCode::Char(c) => {
                            if key.modifiers.contains(KeyModifiers::CONTROL) {
                                match c {
                                    'c' => break,
                                    'r' => {
                                        exit_type = ExitType::Restart;
                                        break;
                                    }
                                    'b' => {
                                        let on = !app.controller.modes.autotype;
                                        app.controller.set_autotype(on, Instant::now());
                                    }
                                    _ => {}
                                }
                            } else if app.controller.finished() {
                                match c {
                                    'r' => {
                                        exit_type = ExitType::Restart;
                                        break;
                                    }
                                    'n' => {
                                        exit_type = ExitType::Next;
                                        break;
                                    }
                                    _ => {}
                                }
                            } else if !app.controller.bot_running() {
                                app.controller.submit_char(c);
                            }
                        }
                        _ => {}
                    }
                    if app.controller.modes != modes_before {
                        persist_prefs(app, store);
                    }
                    app.absorb_pending();
                    terminal.draw(|f| draw(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::Restart => {
                app.controller.reset();
                app.load_current();
            }
            ExitType::Next => {
                app.next_snippet();
            }
            ExitType::Prev => {
                app.prev_snippet();
            }
            ExitType::Quit => {
                break;
            }
        }
    }

    Ok(())
}

fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
