//! Seed data written when a collection has never been stored
//!
//! Seeds use fixed ids so a reseeded store always looks the same.

use uuid::Uuid;

use crate::domain::{Account, Department, Employee, Request, Role};

/// Email of the seeded administrator
pub const SEED_ADMIN_EMAIL: &str = "admin@example.com";

/// Password of the seeded administrator
pub const SEED_ADMIN_PASSWORD: &str = "Password123!";

/// One verified administrator
pub fn generate_seed_accounts() -> Vec<Account> {
    vec![Account {
        id: Uuid::from_u128(0x11111111_1111_1111_1111_111111111111),
        first_name: "Admin".to_string(),
        last_name: "User".to_string(),
        email: SEED_ADMIN_EMAIL.to_string(),
        password: SEED_ADMIN_PASSWORD.to_string(),
        role: Role::Admin,
        verified: true,
    }]
}

/// Engineering and HR
pub fn generate_seed_departments() -> Vec<Department> {
    vec![
        Department {
            id: Uuid::from_u128(0x22222222_2222_2222_2222_222222222221),
            name: "Engineering".to_string(),
            description: "Software team".to_string(),
        },
        Department {
            id: Uuid::from_u128(0x22222222_2222_2222_2222_222222222222),
            name: "HR".to_string(),
            description: "Human Resources".to_string(),
        },
    ]
}

pub fn generate_seed_employees() -> Vec<Employee> {
    Vec::new()
}

pub fn generate_seed_requests() -> Vec<Request> {
    Vec::new()
}
