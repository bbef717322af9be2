use anyhow::Context;
use tokio::net::TcpListener;

use packlist_lib::config::load_config;
use packlist_lib::{build_state, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    let _guard = rolling_logger::init_logger(&config.log_dir, "packlist")
        .map_err(|e| anyhow::anyhow!("failed to init rolling logger: {}", e))?;

    let bind_addr = config.bind_addr.clone();
    let state = build_state(config).await.context("failed to initialize database")?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    let _ = rolling_logger::info(&format!("Listening on {}", listener.local_addr()?));

    if let Err(e) = serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("Shutting down");
    })
    .await
    {
        let _ = rolling_logger::error(&format!("Server error: {}", e));
        return Err(e.into());
    }
    Ok(())
}
