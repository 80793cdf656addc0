//! Migration CLI for the shop schema.
//!
//! `cargo run -p migration -- up` creates the `products` table and seed rows,
//! `-- down` reverts them. Reads `DATABASE_URL`, also from `.env`.

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
