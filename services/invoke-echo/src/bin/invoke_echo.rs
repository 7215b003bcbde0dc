/// 呼び出しパラメータエコーLambda関数
///
/// 受信した`Action`/`Schema`/`Table`/`Data`をJSONにシリアライズして標準出力に記録し、
/// ステータス200のAPI Gatewayプロキシレスポンスとして返却する。
/// Lambda関数としても、ローカルスクリプトとしても実行可能。
///
/// # 環境変数
/// - AWS_LAMBDA_FUNCTION_NAME: 設定されていればLambda関数として起動
/// - RUST_LOG: ログレベル（デフォルト: info）
///
/// # ローカル実行
/// ```bash
/// # 引数でイベントを指定
/// cargo run --bin invoke_echo -- --event '{"Action":"INSERT","Schema":"public","Table":"users","Data":"{\"id\":1}"}'
///
/// # ファイルから読み込み
/// cargo run --bin invoke_echo -- --file event.json
///
/// # 標準入力から読み込み、tracingに出力
/// echo '{"Action":"delete"}' | cargo run --bin invoke_echo -- --sink tracing
/// ```
use std::io::{Read, Write};
use std::path::PathBuf;

use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;
use clap::{Parser, ValueEnum};
use invoke_echo::application::InvokeHandler;
use invoke_echo::domain::InvokeParams;
use invoke_echo::infrastructure::{init_logging, LogSink, StdoutLogSink, TracingLogSink};
use lambda_runtime::{service_fn, Context, Error, LambdaEvent};
use tracing::info;

/// コマンドライン引数（ローカル実行用）
#[derive(Parser, Debug)]
#[command(name = "invoke_echo")]
#[command(about = "呼び出しイベントを1件処理してレスポンスJSONを出力")]
struct CliArgs {
    /// イベントJSON文字列
    #[arg(long, short = 'e', conflicts_with = "file")]
    event: Option<String>,

    /// イベントJSONファイルのパス
    /// --eventも--fileも無い場合は標準入力から読み込む
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// シリアライズ結果の出力先
    #[arg(long, value_enum, default_value_t = SinkKind::Stdout)]
    sink: SinkKind,
}

/// ローカル実行時のシンク種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    /// 標準出力
    Stdout,
    /// tracingのinfoログ
    Tracing,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda環境かどうかを判定
    if std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
        info!("Lambda関数として起動");
        let invoke_handler = InvokeHandler::new(StdoutLogSink::new());
        let invoke_handler = &invoke_handler;
        lambda_runtime::run(service_fn(move |event| handler(invoke_handler, event))).await?;
    } else {
        info!("ローカルスクリプトとして起動");
        run_local(CliArgs::parse()).await?;
    }

    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// コンテキストはリクエストIDのログ出力にのみ使用する。
async fn handler<S: LogSink>(
    invoke_handler: &InvokeHandler<S>,
    event: LambdaEvent<InvokeParams>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (params, context) = event.into_parts();

    info!(
        request_id = %context.request_id,
        action = %params.action,
        schema = %params.schema,
        table = %params.table,
        data_len = params.data.len(),
        "呼び出しを受信"
    );

    Ok(invoke_handler.handle(&params).await)
}

/// ローカル実行: イベントを1件処理してレスポンスを標準出力に書き出す
async fn run_local(args: CliArgs) -> Result<(), Error> {
    let input = read_event_input(&args)?;
    let params = parse_event(&input)?;

    let response = match args.sink {
        SinkKind::Stdout => invoke_once(StdoutLogSink::new(), params).await?,
        SinkKind::Tracing => invoke_once(TracingLogSink::new(), params).await?,
    };

    write_response(&mut std::io::stdout().lock(), &response)
}

/// レスポンスJSONを1行で書き出す（書き込み失敗はエラーとして返す）
fn write_response<W: Write>(out: &mut W, response: &ApiGatewayProxyResponse) -> Result<(), Error> {
    writeln!(out, "{}", serde_json::to_string(response)?)?;
    out.flush()?;
    Ok(())
}

/// 指定シンクでハンドラーを作成し、空のコンテキストで1回呼び出す
async fn invoke_once<S: LogSink>(
    sink: S,
    params: InvokeParams,
) -> Result<ApiGatewayProxyResponse, Error> {
    let invoke_handler = InvokeHandler::new(sink);
    handler(&invoke_handler, LambdaEvent::new(params, Context::default())).await
}

/// イベント入力を読み込む（--event、--file、標準入力の順に優先）
fn read_event_input(args: &CliArgs) -> Result<String, Error> {
    if let Some(event) = &args.event {
        return Ok(event.clone());
    }

    if let Some(path) = &args.file {
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// イベントJSONをパース（空入力は`{}`として扱う）
fn parse_event(input: &str) -> Result<InvokeParams, Error> {
    if input.trim().is_empty() {
        return Ok(InvokeParams::default());
    }
    Ok(serde_json::from_str(input)?)
}
