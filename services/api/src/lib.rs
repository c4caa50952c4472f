mod cli;
mod commands;
mod infra;
mod routes;
mod server;
#[cfg(test)]
mod test_support;

use fair_lending::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
