pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use empatia::{
    catalog::RoundCatalog,
    config::{Config, ConfigStore, FileConfigStore},
    engine::{EngineConfig, SessionEngine},
    presentation::{Element, ImageSlot, Navigation, Presentation},
    projector::{Projector, ProjectorStyle},
    reporter::ResultReporter,
    runtime::{CrosstermEventSource, FixedTicker, KioskEvent, Runner},
    scoring::{skill_keyword_points, SkillVector},
    session_log,
    tracker::WordTracker,
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, Mutex,
    },
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

fn rgb(c: [u8; 3]) -> (u8, u8, u8) {
    (c[0], c[1], c[2])
}

/// kiosk decision game with a shared ranked word cloud
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Scripted workplace-scenario decision game for an unattended kiosk: \
                  participants pick descriptive words per round, feed a shared ranked \
                  word cloud, and hand their skill result off to a card-linked server."
)]
pub struct Cli {
    /// path to a custom round catalog json
    #[clap(short = 'r', long)]
    rounds: Option<PathBuf>,

    /// number of word cloud slots
    #[clap(long)]
    slots: Option<usize>,

    /// fade duration in seconds
    #[clap(long)]
    fade_secs: Option<f64>,

    /// identity server host
    #[clap(long)]
    server_host: Option<String>,

    /// identity server port
    #[clap(long)]
    server_port: Option<u16>,
}

impl Cli {
    fn apply_to(&self, cfg: &mut Config) {
        if let Some(slots) = self.slots {
            cfg.slot_count = slots;
        }
        if let Some(fade) = self.fade_secs {
            cfg.fade_secs = fade;
        }
        if let Some(ref host) = self.server_host {
            cfg.server_host = host.clone();
        }
        if let Some(port) = self.server_port {
            cfg.server_port = port;
        }
    }
}

/// Presentation state mirrored for rendering. The engine mutates it through
/// the Presentation trait; the renderer only reads.
#[derive(Debug, Clone, Default)]
pub struct ScreenModel {
    pub caption: String,
    pub confirm_label: String,
    pub primary_image: Option<String>,
    pub secondary_image: Option<String>,
    pub primary_alpha: f32,
    pub secondary_alpha: f32,
    pub summary_alpha: f32,
    pub choice_visible: Vec<bool>,
}

/// Terminal-backed presentation. Fades resolve to their end alpha at once;
/// the engine owns the timing, a text terminal cannot blend.
pub struct TuiPresentation {
    model: Arc<Mutex<ScreenModel>>,
}

impl TuiPresentation {
    pub fn new(model: Arc<Mutex<ScreenModel>>) -> Self {
        Self { model }
    }
}

impl Presentation for TuiPresentation {
    fn show_image(&mut self, slot: ImageSlot, asset: &str) {
        let mut model = self.model.lock().unwrap();
        match slot {
            ImageSlot::Primary => model.primary_image = Some(asset.to_string()),
            ImageSlot::Secondary => model.secondary_image = Some(asset.to_string()),
        }
    }

    fn set_caption(&mut self, text: &str) {
        self.model.lock().unwrap().caption = text.to_string();
    }

    fn fade(&mut self, element: Element, _from: f32, to: f32, _duration_secs: f64) {
        let mut model = self.model.lock().unwrap();
        match element {
            Element::PrimaryImage => model.primary_alpha = to,
            Element::SecondaryImage => model.secondary_alpha = to,
            Element::SummaryPanel => model.summary_alpha = to,
            Element::SlotText(_) => {}
        }
    }

    fn set_choice_visible(&mut self, index: usize, visible: bool) {
        let mut model = self.model.lock().unwrap();
        if model.choice_visible.len() <= index {
            model.choice_visible.resize(index + 1, false);
        }
        model.choice_visible[index] = visible;
    }

    fn set_confirm_label(&mut self, text: &str) {
        self.model.lock().unwrap().confirm_label = text.to_string();
    }

    fn clear_all(&mut self) {
        let mut model = self.model.lock().unwrap();
        let confirm_label = model.confirm_label.clone();
        *model = ScreenModel {
            confirm_label,
            ..ScreenModel::default()
        };
    }
}

/// Forwards screen activation requests to the main loop.
pub struct ChannelNavigation {
    tx: Sender<String>,
}

impl Navigation for ChannelNavigation {
    fn activate_screen(&mut self, name: &str) {
        let _ = self.tx.send(name.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Game,
    Results,
}

pub struct App {
    pub engine: SessionEngine,
    pub tracker: Arc<WordTracker>,
    pub reporter: Arc<ResultReporter>,
    pub config: Config,
    pub screen: Arc<Mutex<ScreenModel>>,
    pub state: AppState,
    pub card_entry: String,
    pub final_skills: Option<SkillVector>,
    pub top_words: Vec<(String, i32)>,
}

impl App {
    pub fn new(cli: &Cli, mut config: Config) -> Result<(Self, Receiver<String>), Box<dyn Error>> {
        cli.apply_to(&mut config);

        let catalog = match &cli.rounds {
            Some(path) => RoundCatalog::from_path(path)?,
            None => RoundCatalog::builtin(),
        };

        let tracker = Arc::new(WordTracker::new());
        let reporter = Arc::new(ResultReporter::new(&config.server_host, config.server_port));
        let screen = Arc::new(Mutex::new(ScreenModel::default()));
        let (nav_tx, nav_rx) = mpsc::channel();

        let projector = Projector::new(
            config.slot_count,
            ProjectorStyle {
                min_font_size: config.min_font_size,
                max_font_size: config.max_font_size,
                color_low: rgb(config.color_low),
                color_high: rgb(config.color_high),
            },
        );

        let engine = SessionEngine::new(
            catalog,
            tracker.clone(),
            projector,
            Box::new(TuiPresentation::new(screen.clone())),
            Box::new(ChannelNavigation { tx: nav_tx }),
            reporter.clone(),
            EngineConfig::from(&config),
        );

        Ok((
            Self {
                engine,
                tracker,
                reporter,
                config,
                screen,
                state: AppState::Game,
                card_entry: String::new(),
                final_skills: None,
                top_words: Vec::new(),
            },
            nav_rx,
        ))
    }

    pub fn restart(&mut self) {
        self.state = AppState::Game;
        self.card_entry.clear();
        self.final_skills = None;
        self.top_words.clear();
        self.engine.begin_session();
    }

    /// Entered when the engine requests the results screen: reinforce the
    /// skill keywords in the shared cloud, snapshot the top words, and log
    /// the session.
    pub fn enter_results(&mut self) {
        if let Some(skills) = self.engine.final_skills() {
            for (word, delta) in skill_keyword_points(skills) {
                self.tracker.add_points(word, delta);
            }
            self.final_skills = Some(skills);
            self.top_words = self.tracker.ranked(5);

            if let Err(e) = session_log::append(
                self.engine.round_count(),
                self.engine.cumulative_score(),
                skills,
            ) {
                warn!("could not append session log: {}", e);
            }
        }
        self.state = AppState::Results;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = FileConfigStore::new().load();
    let (mut app, nav_rx) = App::new(&cli, config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.engine.begin_session();
    let result = run_kiosk(&mut terminal, &mut app, nav_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_kiosk<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    nav_rx: Receiver<String>,
) -> Result<(), Box<dyn Error>> {
    let (source, _card_feed) = CrosstermEventSource::new();
    let runner = Runner::new(source, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    loop {
        terminal.draw(|f| ui::render(app, f))?;

        match runner.step() {
            KioskEvent::Tick => {
                app.engine.on_tick(TICK_RATE_MS as f64 / 1000.0);
            }
            KioskEvent::Resize => {}
            KioskEvent::Card(id) => {
                app.reporter.on_card_read(&id);
            }
            KioskEvent::Key(key) => {
                if handle_key(app, key) {
                    break;
                }
            }
        }

        while let Ok(name) = nav_rx.try_recv() {
            if name == app.config.results_screen {
                app.enter_results();
            } else {
                warn!("unknown screen requested: {}", name);
            }
        }
    }

    Ok(())
}

/// Returns true when the kiosk should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Esc {
        return true;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    // attendant restart, works on any screen
    if key.code == KeyCode::Left {
        app.restart();
        return false;
    }

    match app.state {
        AppState::Game => match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = (c as usize) - ('1' as usize);
                app.engine.toggle_selection(index);
            }
            KeyCode::Enter => {
                app.engine.confirm();
            }
            _ => {}
        },
        AppState::Results => match key.code {
            // typed characters simulate the card reader feed
            KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
                app.card_entry.push(c);
            }
            KeyCode::Backspace => {
                app.card_entry.pop();
            }
            KeyCode::Enter => {
                if !app.card_entry.is_empty() {
                    let id = app.card_entry.clone();
                    app.reporter.on_card_read(&id);
                    app.card_entry.clear();
                }
            }
            _ => {}
        },
    }

    false
}
