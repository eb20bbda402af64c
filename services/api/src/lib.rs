mod analyze;
mod cli;
mod infra;
mod routes;
mod server;

use rent_leverage::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
