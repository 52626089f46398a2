use pos_server::{Config, Server, ServerError, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env 优先于默认值
    dotenv::dotenv().ok();

    // 2. 加载配置并初始化日志
    let config = Config::from_env();
    setup_environment(&config);

    if let Err(msg) = config.validate() {
        tracing::error!("Invalid configuration: {}", msg);
        return Err(ServerError::Config(msg).into());
    }

    tracing::info!(
        port = config.http_port,
        database = %config.database_path,
        timezone = %config.business_timezone,
        "POS server starting..."
    );

    // 3. 初始化服务器状态
    let state = ServerState::initialize(&config).await.map_err(ServerError::from)?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
