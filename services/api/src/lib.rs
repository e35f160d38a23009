mod cli;
mod infra;
mod report;
mod routes;
mod server;

use pbb_review::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
