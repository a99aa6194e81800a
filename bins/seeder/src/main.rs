//! Database seeder for Pesa development and testing.
//!
//! Seeds a handful of demo accounts, each with the standard signup bonus,
//! so the transfer flow can be exercised locally right away.
//!
//! Usage: cargo run --bin seeder

use sea_orm::DatabaseConnection;

use pesa_core::auth::hash_password;
use pesa_db::UserRepository;

/// Demo accounts created by the seeder. All share the same password.
const DEMO_ACCOUNTS: &[(&str, &str)] = &[
    ("alice@pesa.dev", "Alice Demo"),
    ("bob@pesa.dev", "Bob Demo"),
    ("carol@pesa.dev", "Carol Demo"),
];

const DEMO_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = pesa_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo accounts...");
    seed_demo_accounts(&db).await;

    println!("Seeding complete!");
}

/// Creates each demo account with its signup bonus, skipping ones that exist.
async fn seed_demo_accounts(db: &DatabaseConnection) {
    let repo = UserRepository::new(db.clone());
    let password_hash = hash_password(DEMO_PASSWORD).expect("Failed to hash demo password");

    for (email, full_name) in DEMO_ACCOUNTS {
        match repo.email_exists(email).await {
            Ok(true) => {
                println!("  {email} already exists, skipping...");
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                eprintln!("Failed to check for {email}: {e}");
                continue;
            }
        }

        match repo.create_with_bonus(email, &password_hash, full_name).await {
            Ok((user, bonus)) => {
                println!(
                    "  Created {} (id {}) with bonus {}",
                    user.email, user.id, bonus.reference
                );
            }
            Err(e) => eprintln!("Failed to create {email}: {e}"),
        }
    }
}
