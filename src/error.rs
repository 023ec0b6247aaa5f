
use colored::Colorize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpaceError {
    #[error("API error: status {status}")]
    Api {
        status: u16,
        body: String,
        request_body: Option<String>,
        request_headers: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SpaceError>;

/// Prints failure details to stderr. HTTP failures echo status, response
/// body and the outgoing request; everything else prints its message.
pub fn report(err: &SpaceError) {
    report_to(&mut std::io::stderr(), err);
}

fn report_to(out: &mut dyn std::io::Write, err: &SpaceError) {
    match err {
        SpaceError::Api {
            status,
            body,
            request_body,
            request_headers,
        } => {
            writeln!(out, "{}", format!("Error status: {status}").red()).ok();
            writeln!(out, "{}", format!("Error data: {}", pretty(body)).red()).ok();
            let request_body = request_body.as_deref().map(pretty);
            writeln!(
                out,
                "{}",
                format!(
                    "Request data: {}",
                    request_body.as_deref().unwrap_or("null")
                )
                .red()
            )
            .ok();
            writeln!(out, "{}", format!("Request headers: {request_headers}").red()).ok();
        }
        other => {
            writeln!(out, "{}", format!("Error message: {other}").red()).ok();
        }
    }
}

fn pretty(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_reformats_json_bodies() {
        let out = pretty(r#"{"code":"GAIA_SP01","message":"not found"}"#);
        assert!(out.contains("\n"));
        assert!(out.contains("GAIA_SP01"));
    }

    #[test]
    fn pretty_passes_non_json_through() {
        assert_eq!(pretty("plain text"), "plain text");
    }

    #[test]
    fn api_errors_report_status_body_and_request_echo() {
        let err = SpaceError::Api {
            status: 404,
            body: r#"{"code":"GAIA_SP04","message":"スペースが見つかりません。"}"#.to_string(),
            request_body: Some(r#"{"id":"12"}"#.to_string()),
            request_headers: r#"{"Content-Type": "application/json"}"#.to_string(),
        };

        let mut out = Vec::new();
        report_to(&mut out, &err);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error status: 404"));
        assert!(text.contains("GAIA_SP04"));
        assert!(text.contains("スペースが見つかりません。"));
        assert!(text.contains(r#""id": "12""#));
        assert!(text.contains("Content-Type"));
    }

    #[test]
    fn non_api_errors_report_the_message() {
        let err = SpaceError::Io(std::io::Error::other("broken pipe"));
        let mut out = Vec::new();
        report_to(&mut out, &err);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error message:"));
        assert!(text.contains("broken pipe"));
    }
}
