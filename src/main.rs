use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use typo::{
    clock::MonotonicTime,
    corpus::{Corpus, PassageProvider},
    runtime::{AppEvent, Command, CrosstermEventSource, Runner},
    session::SessionState,
    sink::LogSpeaker,
    typing_policy::TypingPolicy,
    ui::View,
    Config, SessionOrchestrator, Tier, TICK_RATE_MS,
};

/// timed typing assessment: type the passage before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a passage from the chosen difficulty tier against a countdown. Words per minute count only words typed without a mistake."
)]
pub struct Cli {
    /// difficulty tier to pick the passage from
    #[clap(short = 'd', long, value_enum, default_value_t = Tier::Medium)]
    difficulty: Tier,

    /// number of seconds on the clock
    #[clap(short = 's', long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    secs: u64,

    /// strict mode: a wrong key holds the cursor until the right one is typed
    #[clap(long)]
    strict: bool,

    /// seed for passage selection, for a repeatable sequence of passages
    #[clap(long)]
    seed: Option<u64>,

    /// print the final report as json after exiting
    #[clap(long)]
    json: bool,
}

impl Cli {
    fn to_config(&self) -> Config {
        Config {
            tier: self.difficulty,
            duration_secs: self.secs,
            policy: if self.strict {
                TypingPolicy::Strict
            } else {
                TypingPolicy::Advance
            },
        }
    }
}

pub struct App {
    pub engine: SessionOrchestrator<View>,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let corpus = Corpus::builtin()?;
        let provider = match cli.seed {
            Some(seed) => PassageProvider::seeded(corpus, seed),
            None => PassageProvider::from_entropy(corpus),
        };

        let mut engine = SessionOrchestrator::from_config(
            provider,
            MonotonicTime::new(),
            View::new(),
            cli.to_config(),
        )?
        .with_speaker(LogSpeaker);
        engine.sink_mut().set_caption(cli.difficulty.to_string());

        Ok(Self { engine })
    }

    /// First keystroke starts the clock. Word gaps are only visual, so spaces
    /// are not forwarded.
    pub fn type_char(&mut self, c: char) -> Result<(), Box<dyn Error>> {
        if c == ' ' {
            return Ok(());
        }
        if self.engine.state() == SessionState::Idle {
            self.engine.start()?;
        }
        self.engine.submit_keystroke(c);
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), Box<dyn Error>> {
        self.engine.restart()?;
        Ok(())
    }

    pub fn next_tier(&mut self) -> Result<(), Box<dyn Error>> {
        let tier = self.engine.session().tier.next();
        let secs = self.engine.session().duration_secs;
        self.engine.reset(tier, secs)?;
        self.engine.sink_mut().set_caption(tier.to_string());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(&cli)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    outcome?;

    if cli.json {
        if let Some(result) = app.engine.result() {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                if app.engine.state() == SessionState::Running {
                    app.engine.tick();
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                match Command::from_key(key) {
                    Command::Quit => break,
                    Command::Restart => app.restart()?,
                    Command::NextTier => app.next_tier()?,
                    Command::Type(c) => app.type_char(c)?,
                    Command::None => {}
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app.engine.sink(), f.area());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_cli(extra: &[&str]) -> Cli {
        let mut args = vec!["typo", "--seed", "3"];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["typo"]);

        assert_eq!(cli.difficulty, Tier::Medium);
        assert_eq!(cli.secs, 30);
        assert!(!cli.strict);
        assert_eq!(cli.seed, None);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_difficulty_and_secs() {
        let cli = Cli::parse_from(["typo", "-d", "hard", "-s", "60"]);
        assert_eq!(cli.difficulty, Tier::Hard);
        assert_eq!(cli.secs, 60);

        let cli = Cli::parse_from(["typo", "--difficulty", "easy", "--secs", "15"]);
        assert_eq!(cli.difficulty, Tier::Easy);
        assert_eq!(cli.secs, 15);
    }

    #[test]
    fn test_cli_rejects_zero_secs_and_unknown_tier() {
        assert!(Cli::try_parse_from(["typo", "-s", "0"]).is_err());
        assert!(Cli::try_parse_from(["typo", "-d", "expert"]).is_err());
    }

    #[test]
    fn test_cli_to_config() {
        let cfg = create_test_cli(&["-d", "easy", "--strict"]).to_config();
        assert_eq!(cfg.tier, Tier::Easy);
        assert_eq!(cfg.duration_secs, 30);
        assert_eq!(cfg.policy, TypingPolicy::Strict);
    }

    #[test]
    fn test_app_first_key_starts_session() {
        let mut app = App::new(&create_test_cli(&[])).unwrap();
        assert_eq!(app.engine.state(), SessionState::Idle);

        app.type_char(' ').unwrap();
        assert_eq!(app.engine.state(), SessionState::Idle);

        app.type_char('z').unwrap();
        assert_eq!(app.engine.state(), SessionState::Running);
        assert_eq!(app.engine.validator().tally().total_keystrokes, 1);
    }

    #[test]
    fn test_app_next_tier_cycles() {
        let mut app = App::new(&create_test_cli(&["-d", "hard"])).unwrap();
        app.type_char('x').unwrap();

        app.next_tier().unwrap();
        assert_eq!(app.engine.session().tier, Tier::Easy);
        assert_eq!(app.engine.state(), SessionState::Idle);
        assert_eq!(app.engine.metrics().total_keystrokes, 0);
    }

    #[test]
    fn test_app_restart_keeps_settings() {
        let mut app = App::new(&create_test_cli(&["-s", "45"])).unwrap();
        app.type_char('x').unwrap();
        app.restart().unwrap();

        assert_eq!(app.engine.session().duration_secs, 45);
        assert_eq!(app.engine.session().tier, Tier::Medium);
        assert!(app.engine.passage().is_some());
    }
}
