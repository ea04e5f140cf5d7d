use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

// TYPED_MONGO_LOG controls log level: "trace", "debug", "info", "warn",
// "error" or a full tracing filter spec like "typed_mongo_gen=debug".
fn init_tracing() {
    let filter = match std::env::var("TYPED_MONGO_LOG") {
        Ok(level) if is_plain_level(&level) => format!("typed_mongo_gen={level}"),
        Ok(spec) => spec,
        Err(_) => "typed_mongo_gen=warn".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

fn main() {
    init_tracing();
    std::process::exit(typed_mongo_gen::run_cli(std::env::args().collect()));
}
