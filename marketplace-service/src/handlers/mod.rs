pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod kyc;
pub mod orders;
pub mod products;
