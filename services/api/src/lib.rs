mod cli;
mod infra;
mod report;
mod routes;
mod server;

use bizpulse::error::AppError;

pub use infra::InMemorySnapshotStore;
pub use report::render_report;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
