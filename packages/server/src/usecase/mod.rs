//! UseCase layer: application operations on messages and subscriptions.
//!
//! Mutating use cases commit to the store first and then broadcast the
//! resulting event. Broadcast outcome never changes the use case result.

mod connect_subscriber;
mod create_message;
mod delete_message;
mod disconnect_subscriber;
mod edit_message;
pub mod error;
mod get_message;
mod list_messages;
mod notify;

pub use connect_subscriber::ConnectSubscriberUseCase;
pub use create_message::CreateMessageUseCase;
pub use delete_message::DeleteMessageUseCase;
pub use disconnect_subscriber::DisconnectSubscriberUseCase;
pub use edit_message::EditMessageUseCase;
pub use error::{
    ConnectError, CreateMessageError, DeleteMessageError, EditMessageError, GetMessageError,
    ListMessagesError,
};
pub use get_message::GetMessageUseCase;
pub use list_messages::ListMessagesUseCase;
pub use notify::MutationSequencer;
