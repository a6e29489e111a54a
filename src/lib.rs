pub mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod roster;
pub mod server;
pub mod telemetry;

use crate::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
