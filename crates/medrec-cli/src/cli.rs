use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "medrec")]
#[command(about = "Patient records API server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, env = "MEDREC_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "MEDREC_PORT", default_value_t = 5000)]
        port: u16,

        /// Path to the SQLite database file
        #[arg(long, env = "MEDREC_DATABASE", default_value = "medrec.db")]
        database: PathBuf,

        /// Object store endpoint, e.g. https://s3.example.com
        /// (when unset, images go to a local directory instead)
        #[arg(long, env = "MEDREC_BLOB_ENDPOINT")]
        blob_endpoint: Option<String>,

        /// Bucket for uploaded images
        #[arg(long, env = "MEDREC_BLOB_BUCKET", default_value = "medrec-images")]
        blob_bucket: String,

        /// Bearer token for object store writes
        #[arg(long, env = "MEDREC_BLOB_TOKEN", hide_env_values = true)]
        blob_token: Option<String>,

        /// Public base URL prepended to image identifiers
        /// (defaults to <endpoint>/<bucket>/ or /images/ for local storage)
        #[arg(long, env = "MEDREC_PUBLIC_BASE_URL")]
        public_base_url: Option<String>,

        /// Directory for locally stored images
        #[arg(long, env = "MEDREC_IMAGE_DIR", default_value = "images")]
        image_dir: PathBuf,
    },
}
