mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use crime_risk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
