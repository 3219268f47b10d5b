mod create_client;
pub mod data_types;
#[cfg(test)]
pub mod fake_upstream;

pub use create_client::create_client;
