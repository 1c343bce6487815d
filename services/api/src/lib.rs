mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use imwera_enquiry::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
