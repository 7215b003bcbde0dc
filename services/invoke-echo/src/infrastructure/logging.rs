/// ログ基盤モジュール
///
/// Lambda環境向けの構造化ログ設定を提供する。
/// tracingクレートを使用し、1イベント1行のJSONで出力する。
use std::sync::Once;

use tracing_subscriber::fmt::format::{Format, Json, JsonFields};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// 環境変数`RUST_LOG`が無い場合のログレベル
const DEFAULT_LOG_LEVEL: &str = "info";

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// 標準出力へJSONログを出力し、`RUST_LOG`（デフォルト: info）でフィルタリングする。
/// 複数回呼び出しても最初の呼び出しのみ初期化を実行する。
/// 既に別のサブスクライバーが設定済みの場合は何もしない。
///
/// # 使用例
/// ```ignore
/// use invoke_echo::infrastructure::init_logging;
///
/// init_logging();
/// tracing::info!(request_id = "abc", "呼び出しを受信");
/// ```
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(env_filter(DEFAULT_LOG_LEVEL))
            .with(json_layer(std::io::stdout))
            .try_init();
    });
}

/// `RUST_LOG`を優先し、未設定・不正な場合は`default_level`を使うフィルター
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// CloudWatch向けのJSONログレイヤー
///
/// イベントのフィールドはトップレベルに展開し（`flatten_event`）、
/// `target`・`filename`・`line_number`を付与する。現在のスパン（`span`）は含めない。
fn json_layer<S, W>(make_writer: W) -> tracing_subscriber::fmt::Layer<S, JsonFields, Format<Json>, W>
where
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true)
        .with_current_span(false)
        .with_writer(make_writer)
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter("debug"))
            .with(fmt_layer)
            .try_init();
    });
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tracing::subscriber::DefaultGuard;

    // ==================== テストヘルパー ====================

    /// 書き込まれたログをメモリに保持するライター
    #[derive(Debug, Clone, Default)]
    pub struct CapturedLogs {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    impl CapturedLogs {
        /// 出力されたJSONログを1行ずつパースして返す
        pub fn entries(&self) -> Vec<Value> {
            let buf = self.buf.lock().unwrap();
            String::from_utf8_lossy(&buf)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            self.buf.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// 本番と同じJSONレイヤーをメモリに出力するサブスクライバーを現在のスレッドに設定
    ///
    /// ガードが生きている間だけ有効。`#[tokio::test]`（current_thread）内でも使える。
    pub fn capture_json_logs(level: &str) -> (CapturedLogs, DefaultGuard) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(json_layer(logs.clone()));
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    // ==================== 初期化テスト ====================

    #[test]
    fn test_init_test_logging_idempotent() {
        init_test_logging();
        init_test_logging();
    }

    /// テスト用サブスクライバー設定後でもinit_loggingはパニックしない
    #[test]
    fn test_init_logging_after_test_logging() {
        init_test_logging();
        init_logging();
        init_logging();
    }

    // ==================== JSON出力テスト ====================

    #[test]
    fn test_json_layer_flattens_event_fields() {
        let (logs, _guard) = capture_json_logs("info");

        tracing::info!(request_id = "req-456", data_len = 8, "呼び出しを受信");

        let entries = logs.entries();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry["level"], "INFO");
        assert_eq!(entry["message"], "呼び出しを受信");
        assert_eq!(entry["request_id"], "req-456");
        assert_eq!(entry["data_len"], 8);
        assert!(entry.get("fields").is_none());
    }

    #[test]
    fn test_json_layer_includes_source_location() {
        let (logs, _guard) = capture_json_logs("info");

        tracing::warn!(error = %"sink closed", "ログ出力に失敗");

        let entry = &logs.entries()[0];
        assert_eq!(entry["level"], "WARN");
        assert_eq!(entry["error"], "sink closed");
        assert_eq!(entry["target"], module_path!());
        assert!(entry["filename"].as_str().unwrap().ends_with("logging.rs"));
        assert!(entry["line_number"].is_number());
    }

    /// 現在のスパンはログに含めない
    #[test]
    fn test_json_layer_omits_current_span() {
        let (logs, _guard) = capture_json_logs("info");

        let span = tracing::info_span!("invocation", request_id = "req-789");
        let _entered = span.enter();
        tracing::info!("処理中");

        let entry = &logs.entries()[0];
        assert!(entry.get("span").is_none());
        assert_eq!(entry["message"], "処理中");
    }

    #[test]
    fn test_filter_drops_events_below_level() {
        let (logs, _guard) = capture_json_logs("info");

        tracing::debug!("出力されない");
        tracing::trace!("出力されない");
        tracing::error!("出力される");

        let entries = logs.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["level"], "ERROR");
    }
}
