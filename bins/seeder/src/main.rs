//! Database seeder for Academe development and testing.
//!
//! Seeds an admin account, lecturers, and review programs for local
//! development and testing purposes.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use academe_core::auth::hash_password;
use academe_db::entities::{
    lecturers, programs,
    sea_orm_active_enums::UserRole,
    users,
};

/// Seed admin account ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Seed lecturer ID (consistent for all seeds)
const LECTURER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Seed program ID (consistent for all seeds)
const PROGRAM_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = academe_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin account...");
    seed_admin_user(&db).await;

    println!("Seeding lecturer...");
    seed_lecturer(&db).await;

    println!("Seeding review program...");
    seed_program(&db).await;

    println!("Seeding complete!");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

fn lecturer_id() -> Uuid {
    Uuid::parse_str(LECTURER_ID).unwrap()
}

fn program_id() -> Uuid {
    Uuid::parse_str(PROGRAM_ID).unwrap()
}

/// Seeds an admin account for development.
async fn seed_admin_user(db: &DatabaseConnection) {
    // Check if admin already exists
    if users::Entity::find_by_id(admin_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin account already exists, skipping...");
        return;
    }

    let password_hash = hash_password("academe_dev_password").expect("Failed to hash password");

    let user = users::ActiveModel {
        id: Set(admin_user_id()),
        email: Set("admin@academe.dev".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Dev Admin".to_string()),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert admin account: {e}");
    } else {
        println!("  Created admin account: admin@academe.dev");
    }
}

/// Seeds a lecturer for development.
async fn seed_lecturer(db: &DatabaseConnection) {
    if lecturers::Entity::find_by_id(lecturer_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Lecturer already exists, skipping...");
        return;
    }

    let lecturer = lecturers::ActiveModel {
        id: Set(lecturer_id()),
        full_name: Set("Maria Santos".to_string()),
        specialization: Set(Some("Fundamentals of Nursing".to_string())),
        email: Set(Some("m.santos@academe.dev".to_string())),
        phone: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = lecturer.insert(db).await {
        eprintln!("Failed to insert lecturer: {e}");
    } else {
        println!("  Created lecturer: Maria Santos");
    }
}

/// Seeds a review program for development.
async fn seed_program(db: &DatabaseConnection) {
    if programs::Entity::find_by_id(program_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Program already exists, skipping...");
        return;
    }

    let program = programs::ActiveModel {
        id: Set(program_id()),
        name: Set("Nursing Licensure Review".to_string()),
        description: Set(Some("Six-month comprehensive review program".to_string())),
        fee: Set(Decimal::new(15_000, 0)),
        schedule: Set(Some("MWF 8:00-12:00".to_string())),
        lecturer_id: Set(Some(lecturer_id())),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = program.insert(db).await {
        eprintln!("Failed to insert program: {e}");
    } else {
        println!("  Created program: Nursing Licensure Review");
    }
}
