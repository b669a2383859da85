//! Generate a script and search terms for one subject, tracking progress.
//!
//! Run with: cargo run -p orchestrator --example generate -- "Why cats purr" en-US
//!
//! Configuration via .env file or environment variables:
//!   LLM_PROVIDER        - openai, gateway or pollinations (default: openai)
//!   LLM_MODEL           - Model name (default: first permitted model)
//!   OPENAI_API_KEY      - Required for the openai provider
//!   POLLINATIONS_BASE_URL / GATEWAY_BASE_URL - Endpoint overrides
//!   TASK_STORE_BACKEND  - memory or redis (default: memory)
//!   REDIS_URL           - Redis connection URL for the redis backend
//!   LOG_DIR             - Directory for rolling log files (default: logs)

use std::env;

use orchestrator::GenerationOrchestrator;
use task_state::{open_store, StoreConfig, TaskUpdate};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Console plus daily rolling JSON log file
    let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    let file_appender = tracing_appender::rolling::daily(log_dir, "generate.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("orchestrator=debug".parse()?)
                .add_directive("task_state=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().json().with_writer(file_writer))
        .init();

    let mut args = env::args().skip(1);
    let subject = args.next().unwrap_or_else(|| "Why cats purr".to_string());
    let language = args.next().unwrap_or_default();
    let task_id = format!("demo-{}", std::process::id());

    let store_config = StoreConfig::from_env()?;
    let store = open_store(&store_config)?;
    let swept = store.sweep_expired(store_config.retention).await?;
    info!(swept, "Swept expired tasks");

    let orchestrator = match GenerationOrchestrator::from_env() {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            store
                .update_task(&task_id, TaskUpdate::failed(e.to_string()))
                .await?;
            return Err(e.into());
        }
    };

    store
        .update_task(&task_id, TaskUpdate::default().progress(5))
        .await?;

    let script = match orchestrator
        .generate_script(&subject, &language, 2)
        .await?
        .into_result()
    {
        Ok(script) => script,
        Err(e) => {
            store
                .update_task(&task_id, TaskUpdate::failed(e.to_string()))
                .await?;
            return Err(e.into());
        }
    };
    store
        .update_task(
            &task_id,
            TaskUpdate::default().progress(50).field("script", script.as_str()),
        )
        .await?;

    let terms = orchestrator
        .generate_terms(&subject, &script, 5)
        .await?
        .into_value();
    store
        .update_task(&task_id, TaskUpdate::completed().field("terms", terms))
        .await?;

    let record = store.get_task(&task_id).await?;
    println!("{:#?}", record);
    Ok(())
}
