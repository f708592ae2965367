// Small ops utility: create (or rotate the password of) the admin account.
//
// Usage:
//   cargo run --bin create_admin -- [db_path]
//
// Reads ADMIN_USERNAME / ADMIN_PASSWORD from the environment,
// falling back to admin / changeme.

use exam_roster::db::{default_db_path, init_roster_schema, open_sqlite_connection};
use exam_roster::domain::Account;
use exam_roster::repository::{AccountRepository, AccountRepositoryImpl};
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    exam_roster::logging::init();

    let db_path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            let default = default_db_path();
            if let Some(parent) = default.parent() {
                std::fs::create_dir_all(parent)?;
            }
            default.to_string_lossy().into_owned()
        }
    };

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "changeme".to_string());

    let conn = open_sqlite_connection(&db_path)?;
    init_roster_schema(&conn)?;

    let repo = AccountRepositoryImpl::new(Arc::new(Mutex::new(conn)));
    repo.upsert_admin(&Account::admin_account(&username, &password))
        .await?;

    println!("admin account ready: username={} db={}", username, db_path);
    Ok(())
}
