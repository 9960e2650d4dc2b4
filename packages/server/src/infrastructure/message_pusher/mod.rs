//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `registry`: 接続中のリアルタイム接続の集合（排他制御付き）
//! - `websocket`: Registry のスナップショットに対してブロードキャストする実装

pub mod registry;
pub mod websocket;

pub use registry::ConnectionRegistry;
pub use websocket::WebSocketMessagePusher;
