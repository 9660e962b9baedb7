use spamguard::{bot, config::Settings, db::WarningStore, services::classifier::HttpClassifier};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Spamguard");

    // Load settings
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let classifier = match HttpClassifier::new(
        settings.classifier_url.clone(),
        settings.classifier_token.clone(),
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create spam classifier: {}", e);
            std::process::exit(1);
        }
    };

    // A missing or unreadable file starts an empty store
    let store = WarningStore::open(settings.warnings_file.clone(), settings.default_max_warnings).await;

    info!("Warning store ready at {}", store.path().display());

    // Start the bot
    if let Err(e) = bot::framework::run(settings, store, Box::new(classifier)).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}
