//! First-boot user account page: collects a full name, username, password
//! and login shell, then hands them to an account backend.

pub mod account;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod i18n;
pub mod page;
pub mod ui;
