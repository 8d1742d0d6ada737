use anyhow::Context;
use bird_api::infra::{telemetry, Config};
use bird_api::storage;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads env vars (or .env):\n\
           DATABASE_URL (optional, Postgres; unset = in-memory store)\n\
           DATABASE_MAX_CONNECTIONS, BIND_ADDR, ERROR_FORMAT (optional)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().skip(1).any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = Config::from_env().context("loading configuration")?;
    telemetry::init();

    println!("> Preflight:");
    println!(
        "  DATABASE_URL={}",
        if config.database_url.is_some() { "<set>" } else { "<unset: in-memory store>" }
    );
    println!("  DATABASE_MAX_CONNECTIONS={}", config.max_connections);
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  ERROR_FORMAT={}", config.error_shape);

    // Connecting a Postgres store also applies pending migrations.
    let store = storage::from_config(&config)
        .await
        .context("connecting bird store")?;
    store
        .ping()
        .await
        .with_context(|| format!("{} store did not answer ping", store.backend()))?;
    println!("  Store backend '{}' is reachable.", store.backend());

    let birds = store.list_all().await.context("listing birds")?;
    println!("  Birds currently stored: {}", birds.len());

    println!("> Preflight OK.");
    Ok(())
}
