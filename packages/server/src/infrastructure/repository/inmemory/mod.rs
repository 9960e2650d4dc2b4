//! In-memory implementations of the domain repositories.

mod message;

pub use message::InMemoryMessageRepository;
