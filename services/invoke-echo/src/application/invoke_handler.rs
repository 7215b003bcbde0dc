/// 呼び出しハンドラー
///
/// 受信したパラメータをシリアライズしてシンクへ書き出し、
/// そのままステータス200のレスポンスとして返却する。
use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;
use tracing::{debug, warn};

use crate::domain::{ok_response, InvokeParams};
use crate::infrastructure::LogSink;

/// 呼び出しパラメータをエコーするハンドラー
///
/// 状態を持たず、各呼び出しは独立している。
/// シリアライズ失敗・シンク書き込み失敗はいずれも握りつぶし、
/// 呼び出し元にエラーを返すことはない。
pub struct InvokeHandler<S>
where
    S: LogSink,
{
    /// ログ出力先
    sink: S,
}

impl<S> InvokeHandler<S>
where
    S: LogSink,
{
    /// 新しいInvokeHandlerを作成
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// 呼び出しを処理
    ///
    /// # 処理フロー
    /// 1. パラメータを正規化JSONにシリアライズ（失敗時は空文字）
    /// 2. シリアライズ結果をシンクへ書き込み（失敗は警告ログのみ）
    /// 3. ステータス200、bodyにシリアライズ結果を持つレスポンスを返却
    pub async fn handle(&self, params: &InvokeParams) -> ApiGatewayProxyResponse {
        let body = match params.to_canonical_json() {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "パラメータのシリアライズに失敗、空のbodyで応答");
                String::new()
            }
        };

        if let Err(err) = self.sink.write(&body).await {
            warn!(error = %err, "ログシンクへの書き込みに失敗");
        }

        debug!(body_len = body.len(), "レスポンスを返却");

        ok_response(body)
    }
}
