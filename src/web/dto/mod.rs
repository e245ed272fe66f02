pub mod account;
pub mod admin;
pub mod feedback;
pub mod lessons;
pub mod modules;
pub mod practice;
pub mod progress;
pub mod questions;
pub mod roadmap;
pub mod search;
