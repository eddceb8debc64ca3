use print_server::{Config, Server, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment (.env overrides) then configuration
    dotenv::dotenv().ok();
    let config = Config::from_env();

    init_logger(&config.log_level, config.log_dir.as_deref());

    print_banner();
    tracing::info!("posr print server starting...");

    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
