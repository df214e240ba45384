mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use medrec_api::ApiServer;
use medrec_storage::{FsObjectStore, HttpObjectStore, ObjectStore, SqliteRecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Serve {
            host,
            port,
            database,
            blob_endpoint,
            blob_bucket,
            blob_token,
            public_base_url,
            image_dir,
        } => {
            let records = Arc::new(SqliteRecordStore::open(&database).await?);
            info!("opened record store at {}", database.display());

            let mut local_image_dir = None;
            let (blobs, public_base): (Arc<dyn ObjectStore>, String) = match blob_endpoint {
                Some(endpoint) => {
                    let base = public_base_url.unwrap_or_else(|| {
                        format!("{}/{}/", endpoint.trim_end_matches('/'), blob_bucket)
                    });
                    let store = HttpObjectStore::new(&endpoint, &blob_bucket, blob_token)?;
                    (Arc::new(store), base)
                }
                None => {
                    let store = FsObjectStore::new(image_dir)?;
                    info!(
                        "no blob endpoint configured, storing images under {}",
                        store.root().display()
                    );
                    local_image_dir = Some(store.root().to_path_buf());
                    let base = public_base_url.unwrap_or_else(|| "/images/".to_string());
                    (Arc::new(store), base)
                }
            };

            let mut server = ApiServer::new(records.clone(), blobs, public_base);
            if let Some(dir) = local_image_dir {
                server = server.with_image_dir(dir);
            }

            let result = Arc::new(server).serve(&host, port).await;
            records.close().await;
            result
        }
    }
}
