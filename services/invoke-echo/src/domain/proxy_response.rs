// API Gatewayプロキシレスポンス
//
// ハンドラーが返却するレスポンスの組み立てを担うドメインコンポーネント。

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;

/// 常に返却するステータスコード
pub const STATUS_OK: i64 = 200;

/// ステータス200のプロキシレスポンスを作成
///
/// bodyは空文字でも省略せず、常に`body`キーを持つレスポンスにする。
/// ヘッダーは空、`isBase64Encoded`はfalse。
pub fn ok_response(body: String) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: STATUS_OK,
        body: Some(Body::Text(body)),
        ..Default::default()
    }
}

/// レスポンスのbodyを文字列として取り出す
///
/// bodyが無い場合は空文字を返す。
pub fn response_body(response: &ApiGatewayProxyResponse) -> String {
    match &response.body {
        Some(Body::Text(text)) => text.clone(),
        Some(Body::Binary(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_ok_response_status_and_body() {
        let response = ok_response("hello".to_string());

        assert_eq!(response.status_code, 200);
        assert_eq!(response_body(&response), "hello");
        assert!(response.headers.is_empty());
        assert!(!response.is_base64_encoded);
    }

    #[test]
    fn test_ok_response_keeps_empty_body() {
        let response = ok_response(String::new());

        assert_eq!(response.body, Some(Body::Text(String::new())));
        assert_eq!(response_body(&response), "");
    }

    /// ランタイムがシリアライズするJSONにstatusCodeとbodyが含まれる
    #[test]
    fn test_ok_response_wire_format() {
        let response = ok_response(r#"{"Action":"INSERT"}"#.to_string());

        let json: Value = serde_json::to_value(&response).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], r#"{"Action":"INSERT"}"#);
    }

    #[test]
    fn test_response_body_none() {
        let response = ApiGatewayProxyResponse::default();

        assert_eq!(response_body(&response), "");
    }
}
