use anyhow::Context;
use maze_chase::{
    app::App,
    config::{self, Config},
    constants::LOOP_TIME,
    content::DirectoryContent,
    formatter::CustomFormatter,
    game::Host,
    hiscore::FileHiScoreStore,
    systems::AutoPilot,
};
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(CustomFormatter)
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).context("Could not set global tracing subscriber")
}

fn host(config: &Config) -> Host {
    let content = DirectoryContent::new(&config.content_dir);
    let pilot = AutoPilot::new(config.seed.unwrap_or_default());
    Host::headless(content)
        .with_input(pilot)
        .with_hiscores(FileHiScoreStore::new(&config.pref_dir))
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = config::load_config().context("Could not load configuration")?;
    if config.max_ticks.is_none() {
        warn!("No MAZE_MAX_TICKS set, running until interrupted");
    }

    let host = host(&config);
    let mut app = App::new(config, host).context("Could not start simulation")?;

    info!(loop_time = ?LOOP_TIME, "Starting game loop");
    while app.run().context("Simulation failed")? {}

    let board = app.game.scoreboard();
    info!(ticks = app.ticks(), score = board.score, level = board.level, "Simulation finished");
    Ok(())
}
