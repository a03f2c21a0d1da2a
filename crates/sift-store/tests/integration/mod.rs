//! Integration tests for the memory index.

mod activation;
mod queries;
