use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(err) = boxlabel::run() {
        let kind = err.kind();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            debug!(cause = %cause, "caused by");
            source = cause.source();
        }

        eprintln!(
            "{}",
            serde_json::json!({ "error": kind.as_str(), "message": err.to_string() })
        );
        std::process::exit(if kind.is_caller_error() { 2 } else { 1 });
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
