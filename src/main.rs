use room_planner::api;
use room_planner::config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();
    let api_config = app_config.api.clone();
    let settings = app_config.planner.settings();

    println!("🚀 Room planner starting...");
    if settings.seed_sample {
        println!("📐 Seeding the sample bedroom");
    }
    api::start_api_server(api_config, settings).await;
}
