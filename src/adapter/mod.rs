pub mod config;
pub mod console;
pub mod outbound;
pub mod repository;
