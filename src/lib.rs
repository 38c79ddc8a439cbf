//! ATM simulator: a single-session console banking front end over an
//! in-memory account directory.

pub mod account;
pub mod cli;
pub mod config;
pub mod directory;
pub mod security;
