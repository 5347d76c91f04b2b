//! Schema CLI for the products database.
//!
//! `DATABASE_URL=postgres://... cargo run -p migration -- up` (also `down`, `status`, `fresh`).

use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
