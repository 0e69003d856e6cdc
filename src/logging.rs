use tracing_subscriber::EnvFilter;

//installs the fmt subscriber; RUST_LOG overrides the given level
//returns false if a global subscriber was already set
pub fn init_tracing(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
