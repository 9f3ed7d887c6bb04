pub mod config;
pub mod errors;
pub mod evaluation;
pub mod export;
pub mod format;
pub mod layout;
pub mod models;
pub mod service_client;
pub mod ui;

#[cfg(test)]
mod test_support;
