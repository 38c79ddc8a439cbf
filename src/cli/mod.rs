// Console front end
// Prompting, menu rendering and the per-choice request handlers
// that sit between the terminal and the account directory.

pub mod account;
pub mod menu;
pub mod session;
pub mod utils;
