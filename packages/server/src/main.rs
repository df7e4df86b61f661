#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime heatmap server binary.

use clap::Parser as _;
use crime_heatmap_server::ServerError;
use crime_heatmap_server::config::{ServerArgs, ServerConfig};

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    let config = ServerConfig::from_args(ServerArgs::parse());
    crime_heatmap_server::run_server(config).await
}
