//! LearnHub backend: lesson catalog, date-seeded daily tip and challenge, and coding hints.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod hint_client;
pub mod logic;
pub mod openai;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod selector;
pub mod state;
pub mod telemetry;
pub mod util;
