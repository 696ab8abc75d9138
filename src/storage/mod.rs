//! Storage module - durable chain persistence

pub mod db;

pub use db::*;
