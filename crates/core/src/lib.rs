//! Core business logic for Pesa.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Balance aggregation and transfer validation
//! - `currency` - Currency codes, conversion, and display formatting
//! - `auth` - Password hashing

pub mod auth;
pub mod currency;
pub mod ledger;
