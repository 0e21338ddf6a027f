use signal_combiner::config::ServerConfig;
use signal_combiner::logging::init_logging;
use signal_combiner::server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let (config, source) = ServerConfig::load().map_err(|e| {
        eprintln!("signal-server: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    init_logging(&config.log);
    source.report();

    tracing::info!(
        version = signal_combiner::VERSION,
        max_samples = config.max_samples,
        "starting signal server"
    );
    server::run(&config).await
}
