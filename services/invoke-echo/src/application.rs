// アプリケーション層モジュール
pub mod invoke_handler;

// 再エクスポート
pub use invoke_handler::InvokeHandler;
