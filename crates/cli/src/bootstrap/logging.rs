use simpledns_domain::Config;

pub fn init_logging(config: &Config) {
    // Validated by load_config; INFO only covers a config that skipped it.
    let level = config
        .logging
        .level
        .trim()
        .parse()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_max_level(level)
        .with_ansi(true)
        .init();
}
