//! Message store implementations.

pub mod inmemory;

pub use inmemory::InMemoryMessageRepository;
