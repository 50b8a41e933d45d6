// crates/cropline-core/src/protocol.rs
//
// Serde types for the remote processing contract. The server side is opaque:
// these mirror its JSON bodies and nothing else.

use serde::Deserialize;

/// Fallback used when `GET /config` is unreachable or malformed.
pub const DEFAULT_CROP_HEIGHT_FALLBACK: u32 = 720;

/// Startup configuration served by `GET /config`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(rename = "DEFAULT_CROP_HEIGHT")]
    pub default_crop_height: u32,
}

/// Success body of `POST /process`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessOk {
    pub message:     String,
    pub output_path: String,
}

/// Failure body of `POST /process`. The server reports either `detail`
/// (FastAPI HTTPException) or `error`; both fields are optional.
#[derive(Debug, Default, Deserialize)]
struct ProcessFailure {
    detail: Option<String>,
    error:  Option<String>,
}

const GENERIC_FAILURE: &str = "processing failed (no error message from server)";

/// Extract the human-readable message from a non-success response body,
/// preferring `detail` over `error`, with a generic fallback when the body
/// is not JSON or carries neither field.
pub fn failure_message(body: &str) -> String {
    serde_json::from_str::<ProcessFailure>(body)
        .ok()
        .and_then(|f| f.detail.or(f.error))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_parses() {
        let ok: ProcessOk =
            serde_json::from_str(r#"{"message":"ok","output_path":"/out/x.mp4"}"#).unwrap();
        assert_eq!(ok.message, "ok");
        assert_eq!(ok.output_path, "/out/x.mp4");
    }

    #[test]
    fn failure_prefers_detail_over_error() {
        let msg = failure_message(r#"{"detail":"bad codec","error":"ignored"}"#);
        assert_eq!(msg, "bad codec");
    }

    #[test]
    fn failure_falls_back_to_error_field() {
        assert_eq!(failure_message(r#"{"error":"bad codec"}"#), "bad codec");
    }

    #[test]
    fn unparseable_body_gets_generic_message() {
        assert_eq!(failure_message("<html>502</html>"), GENERIC_FAILURE);
        assert_eq!(failure_message(r#"{"status":"error"}"#), GENERIC_FAILURE);
    }

    #[test]
    fn config_parses_upper_case_key() {
        let cfg: RemoteConfig =
            serde_json::from_str(r#"{"DEFAULT_CROP_HEIGHT":540}"#).unwrap();
        assert_eq!(cfg.default_crop_height, 540);
    }
}
