// GET handlers: request form, report, version

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::render::{HtmlRenderer, ReportRenderer, html};
use crate::report::{ReportOptions, parse_target_names, report_targets};
use crate::version::{NAME, VERSION};

/// Form fields of the report request.
#[derive(Debug, Deserialize)]
pub(super) struct ReportParams {
    vmname: Option<String>,
    vminterval: Option<String>,
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

/// Parses `vminterval`; blank falls back to the configured default.
fn lookback_from_param(raw: Option<&str>, default: u32) -> Result<u32, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!(
                "vminterval must be a positive number of minutes, got {:?}",
                s
            )),
        },
    }
}

/// GET /: report request form.
pub(super) async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "<p>Virtual machine report</p>\n\
         <form action=\"/report\" method=\"get\">\n\
         <table>\n\
         <tr><td width=\"40%\"><b>VM name(s), comma separated</b></td><td width=\"60%\"><input name=\"vmname\"></td></tr>\n\
         <tr><td width=\"40%\"><b>Interval (minutes)</b></td><td width=\"60%\"><input name=\"vminterval\" value=\"{}\"></td></tr>\n\
         </table>\n\
         <input type=\"submit\" value=\"Report\">\n\
         </form>\n",
        state.config.report.default_lookback_minutes
    );
    Html(html::page("Virtual machine report", &body))
}

/// GET /report: HTML report for every requested VM.
pub(super) async fn report_handler(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Response {
    let names = params
        .vmname
        .as_deref()
        .map(parse_target_names)
        .unwrap_or_default();
    if names.is_empty() {
        return bad_request("vmname is required".to_string());
    }
    let lookback = match lookback_from_param(
        params.vminterval.as_deref(),
        state.config.report.default_lookback_minutes,
    ) {
        Ok(n) => n,
        Err(message) => return bad_request(message),
    };

    let options = ReportOptions::from_config(&state.config);
    let renderer = HtmlRenderer;
    let content_type = [(header::CONTENT_TYPE, renderer.content_type())];
    match report_targets(&state.session, &names, lookback, &options).await {
        Ok(outcomes) => (content_type, renderer.render_batch(&outcomes)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "report request failed");
            let body = renderer.render_failure("", &e);
            (
                StatusCode::BAD_GATEWAY,
                content_type,
                html::page("Virtual machine report", &body),
            )
                .into_response()
        }
    }
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_defaults_when_blank() {
        assert_eq!(lookback_from_param(None, 15), Ok(15));
        assert_eq!(lookback_from_param(Some("  "), 15), Ok(15));
        assert_eq!(lookback_from_param(Some("5"), 15), Ok(5));
    }

    #[test]
    fn lookback_rejects_zero_and_garbage() {
        assert!(lookback_from_param(Some("0"), 15).is_err());
        assert!(lookback_from_param(Some("-3"), 15).is_err());
        assert!(lookback_from_param(Some("ten"), 15).is_err());
    }
}
