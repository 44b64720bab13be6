use code_context::{config::Config, server::ContextServer};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr to avoid interfering with the MCP protocol on stdout
    code_context::tracing::init();

    let config = Config::from_env().await?;
    tracing::info!("Starting code-context MCP server");

    let server = ContextServer::new(config);

    if let Some(path) = server.state().config().corpus.clone() {
        // A bad startup corpus should not take the server down; load_corpus can retry.
        if let Err(e) = server.state().load_corpus(&path).await {
            tracing::warn!("Failed to load startup corpus {}: {:#}", path.display(), e);
        }
    }

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
