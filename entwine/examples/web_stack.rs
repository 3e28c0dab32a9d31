//! A small web stack wired as a system
//!
//! This example demonstrates:
//! - Authoring components with `#[derive(Inject)]` and `Lifecycle`
//! - Renaming a dependency for one consumer
//! - Loading the dependency topology from JSON
//! - Start and stop order following the graph
//!
//! ## Scenario
//! A config component feeds a database pool and a cache. An HTTP server
//! uses both, and knows the cache as `sessions`. A metrics reporter only
//! needs the config, so it starts alongside the storage layer.
//!
//! ## Run with
//! ```bash
//! RUST_LOG=entwine=debug cargo run --example web_stack
//! ```

use entwine::prelude::*;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const TOPOLOGY: &str = r#"{
    "database": ["config"],
    "cache": ["config"],
    "metrics": ["config"],
    "server": { "database": "database", "cache": "sessions", "config": "config" }
}"#;

#[derive(Clone, Debug, Default, Inject)]
struct Config {
    database_url: String,
    listen_port: u16,
    loaded: bool,
}

#[async_trait]
impl Lifecycle for Config {
    async fn start(mut self) -> ComponentResult<Self> {
        self.database_url = "postgres://localhost/app".to_string();
        self.listen_port = 8080;
        self.loaded = true;
        println!("config: loaded");
        Ok(self)
    }
}

#[derive(Clone, Debug, Default, Inject)]
struct Database {
    #[inject]
    config: Option<Arc<Config>>,
    pool_size: usize,
}

#[async_trait]
impl Lifecycle for Database {
    async fn start(mut self) -> ComponentResult<Self> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| ComponentError::failed("config not injected"))?;
        tokio::time::sleep(Duration::from_millis(30)).await;
        println!("database: connected to {}", config.database_url);
        self.pool_size = 8;
        Ok(self)
    }

    async fn stop(mut self) -> ComponentResult<Self> {
        println!("database: closing {} connections", self.pool_size);
        self.pool_size = 0;
        Ok(self)
    }
}

#[derive(Clone, Debug, Default, Inject)]
struct Cache {
    #[inject]
    config: Option<Arc<Config>>,
    warm: bool,
}

#[async_trait]
impl Lifecycle for Cache {
    async fn start(mut self) -> ComponentResult<Self> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        println!("cache: warmed");
        self.warm = true;
        Ok(self)
    }

    async fn stop(mut self) -> ComponentResult<Self> {
        println!("cache: flushed");
        self.warm = false;
        Ok(self)
    }
}

#[derive(Clone, Debug, Default, Inject)]
struct Metrics {
    #[inject]
    config: Option<Arc<Config>>,
}

#[async_trait]
impl Lifecycle for Metrics {
    async fn start(self) -> ComponentResult<Self> {
        let loaded = self.config.as_ref().is_some_and(|c| c.loaded);
        println!("metrics: reporting (config loaded={loaded})");
        Ok(self)
    }

    async fn stop(self) -> ComponentResult<Self> {
        println!("metrics: stopped");
        Ok(self)
    }
}

#[derive(Clone, Debug, Default, Inject)]
struct Server {
    #[inject]
    config: Option<Arc<Config>>,
    #[inject]
    database: Option<Arc<Database>>,
    #[inject]
    sessions: Option<Arc<Cache>>,
    listening: bool,
}

#[async_trait]
impl Lifecycle for Server {
    async fn start(mut self) -> ComponentResult<Self> {
        let (Some(config), Some(database), Some(sessions)) =
            (&self.config, &self.database, &self.sessions)
        else {
            return Err(ComponentError::failed("server dependencies missing"));
        };
        println!(
            "server: listening on :{} (pool={}, sessions warm={})",
            config.listen_port, database.pool_size, sessions.warm
        );
        self.listening = true;
        Ok(self)
    }

    async fn stop(mut self) -> ComponentResult<Self> {
        println!("server: draining connections");
        self.listening = false;
        Ok(self)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let topology: BTreeMap<ComponentName, Declaration> = serde_json::from_str(TOPOLOGY)?;

    let system = entwine::system(
        [
            ("config", Config::default().into_ref()),
            ("database", Database::default().into_ref()),
            ("cache", Cache::default().into_ref()),
            ("metrics", Metrics::default().into_ref()),
            ("server", Server::default().into_ref()),
        ],
        topology,
    )?;

    println!("\n=== Dependency graph ===\n{}", system.to_dot());
    println!("start order: {:?}", system.start_order());
    println!("stop order:  {:?}\n", system.stop_order());

    println!("=== Starting ===");
    let running = system.start().await?;
    let listening = running.get::<Server>("server").is_some_and(|s| s.listening);
    println!("server listening: {listening}\n");

    println!("=== Stopping ===");
    let stopped = running.stop().await?;
    let cleared = stopped
        .get::<Server>("server")
        .is_some_and(|s| s.database.is_none() && s.sessions.is_none());
    println!("server dependencies cleared: {cleared}");

    Ok(())
}
