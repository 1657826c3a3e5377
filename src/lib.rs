pub mod config;
pub mod consumer;
pub mod error;
pub mod rag;
pub mod relay;
pub mod sse;
pub mod state;

#[cfg(test)]
mod test_support;
