mod app;
mod cli;
mod event;
mod logging;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use realty_timeline::config::init_app_config;
use realty_timeline::dataset::load_dataset;

fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config().wrap_err("invalid configuration")?;
    logging::init(config.debug);

    let dataset = load_dataset(&config.events_path, &config.prices_path)
        .wrap_err("failed to load event dataset")?;

    let mut app = App::new(&config, dataset);
    if let Some(query) = &args.search {
        app.set_search(query);
    }

    // Piped output gets the plain timeline
    if args.headless || args.json || !is_terminal() {
        return event::run_headless(&app, args.json);
    }

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app);
    terminal::cleanup(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
