mod config;

use std::path::Path;

use anyhow::Context;
use feed_search_engine::{default_registry, Dispatcher, JsonFileFeedSource, LogResultSink};
use search_logging::search_info;

fn main() -> anyhow::Result<()> {
    let config = config::load_config(Path::new(config::CONFIG_FILENAME))?;
    search_logging::initialize(config.log_destination, config.log_level());

    let registry =
        default_registry(config.fetch_settings()).context("failed to register matchers")?;
    search_info!("Registered matchers: {:?}", registry);

    let dispatcher = Dispatcher::new(registry, JsonFileFeedSource::new(&config.feeds_path));
    dispatcher
        .run(&config.search_term, &mut LogResultSink)
        .context("search session failed")?;
    Ok(())
}
