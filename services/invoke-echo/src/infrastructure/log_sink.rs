/// ログ出力先（シンク）
///
/// ハンドラーがシリアライズ結果を書き出す先を抽象化する。
/// 書き込みは投げっぱなしで、失敗してもレスポンスには影響させない。
use std::io::Write;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// シンク書き込み操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SinkError {
    /// 出力ストリームへの書き込み失敗
    #[error("Write error: {0}")]
    Io(String),

    /// シンクが利用不可
    #[error("Sink is unavailable")]
    Unavailable,
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(err.to_string())
    }
}

/// ログ出力用トレイト
///
/// このトレイトはログの書き込み先を抽象化し、
/// 異なる実装を可能にします（標準出力、tracing、テスト用モック）。
#[async_trait]
pub trait LogSink: Send + Sync {
    /// 1行分のメッセージを書き込む
    ///
    /// # 戻り値
    /// * 成功時は`Ok(())`
    /// * 書き込み失敗時は`Err(SinkError)`
    async fn write(&self, line: &str) -> Result<(), SinkError>;
}

/// 標準出力へ1行ずつ書き込むシンク
///
/// CloudWatch Logsにはそのままの1行として記録される。
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutLogSink;

impl StdoutLogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogSink for StdoutLogSink {
    async fn write(&self, line: &str) -> Result<(), SinkError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// tracingのinfoイベントとして書き込むシンク
///
/// JSONログの`payload`フィールドに本文を載せる。失敗しない。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl TracingLogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogSink for TracingLogSink {
    async fn write(&self, line: &str) -> Result<(), SinkError> {
        info!(payload = line, "呼び出しパラメータ");
        Ok(())
    }
}
