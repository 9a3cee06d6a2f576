//! fintrack - personal finance tracking from the terminal
//!
//! This library provides the core functionality for fintrack: recording
//! income and expenses, organising them into categories, tracking spending
//! against budget goals, materializing recurring transactions and
//! summarising everything over preset or custom date ranges.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, goals, recurring items)
//! - `storage`: Key/value storage adapters and the repositories built on them
//! - `services`: Business logic layer
//! - `reports`: Aggregates over transactions (totals, spending, trends)
//! - `export`: JSON, YAML and CSV export
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fintrack::models::{Money, TransactionType};
//! use fintrack::services::{CreateTransactionInput, SummaryService, TransactionService};
//! use fintrack::storage::Storage;
//!
//! let storage = Storage::in_memory();
//! TransactionService::new(&storage)
//!     .add(CreateTransactionInput::new(
//!         TransactionType::Income,
//!         Money::from_cents(250_000),
//!         "Salary",
//!         NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     ))
//!     .unwrap();
//!
//! let totals = SummaryService::new(&storage).totals().unwrap();
//! assert_eq!(totals.balance, Money::from_cents(250_000));
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
