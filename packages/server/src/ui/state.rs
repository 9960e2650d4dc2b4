//! Server state shared by all handlers.

use std::sync::Arc;

use dengon_shared::time::Clock;
use tokio::sync::watch;

use crate::{
    domain::{MessagePusher, MessageRepository},
    usecase::{
        ConnectSubscriberUseCase, CreateMessageUseCase, DeleteMessageUseCase,
        DisconnectSubscriberUseCase, EditMessageUseCase, GetMessageUseCase, ListMessagesUseCase,
        MutationSequencer,
    },
};

use super::config::ConnectionSettings;

/// All use cases the handlers call into
#[derive(Clone)]
pub struct UseCases {
    pub create_message: Arc<CreateMessageUseCase>,
    pub edit_message: Arc<EditMessageUseCase>,
    pub delete_message: Arc<DeleteMessageUseCase>,
    pub list_messages: Arc<ListMessagesUseCase>,
    pub get_message: Arc<GetMessageUseCase>,
    pub connect_subscriber: Arc<ConnectSubscriberUseCase>,
    pub disconnect_subscriber: Arc<DisconnectSubscriberUseCase>,
}

impl UseCases {
    /// Wire every use case against one store and one broadcaster
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        // 作成・編集・削除は一つの順序で確定・配信する
        let sequencer = Arc::new(MutationSequencer::new());
        Self {
            create_message: Arc::new(CreateMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
                sequencer.clone(),
            )),
            edit_message: Arc::new(EditMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            delete_message: Arc::new(DeleteMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer,
            )),
            list_messages: Arc::new(ListMessagesUseCase::new(repository.clone())),
            get_message: Arc::new(GetMessageUseCase::new(repository)),
            connect_subscriber: Arc::new(ConnectSubscriberUseCase::new(message_pusher.clone())),
            disconnect_subscriber: Arc::new(DisconnectSubscriberUseCase::new(message_pusher)),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub usecases: UseCases,
    /// WebSocket 接続ごとの設定
    pub connection_settings: ConnectionSettings,
    /// サーバー停止の通知（true になったら全接続を閉じる）
    pub shutdown: watch::Receiver<bool>,
}
