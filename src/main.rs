use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use treefm::config::Config;
use treefm::filesystem::{LedgerAttributes, TreeBuilder};
use treefm::ui::{render, App};
use treefm::validation::NameValidator;
use treefm::ExplorerSession;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    treefm::logging::init(&config)?;

    let store = match config.attribute_ledger {
        Some(ref path) => LedgerAttributes::load(path.clone())?,
        None => LedgerAttributes::in_memory(),
    };
    let validator = NameValidator::new(config.file_name_pattern.as_deref())?;
    let session = ExplorerSession::new(&config.root_or_cwd()?, TreeBuilder::new(config.sort), store, validator)?;
    let mut app = App::new(session, config.show_hidden);

    enable_raw_mode()?;
    execute!(std::io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    let outcome = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(std::io::stdout(), LeaveAlternateScreen)?;
    outcome
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App<LedgerAttributes>) -> Result<(), Box<dyn std::error::Error>> {
    while !app.should_quit {
        terminal.draw(|f| render::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    log::info!("exiting");
    Ok(())
}
