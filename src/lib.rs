pub mod booking;
pub mod compare;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod services;
pub mod sources;
pub mod storage;

pub use error::{Result, ScoutError};
