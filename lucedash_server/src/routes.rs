//! HTTP handlers. Every request rebuilds its session from the URL query, so a page
//! reload always restores the same selection and theme.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use lucedash::figure::Figure;
use lucedash::projector::DerivedView;
use lucedash::theme::rewrite_query;
use lucedash::Session;
use serde::Serialize;
use tracing::{error, warn};

use crate::page;
use crate::state::AppState;

pub async fn index(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let session = Session::from_query(state.dataset.clone(), query.as_deref());
    match page::render(&session) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("page render failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Apply the theme, rewrite only the `theme` parameter of the current query and send
/// the browser back to the page so everything repaints under the new style tokens.
pub async fn switch_theme(
    State(state): State<AppState>,
    Path(theme): Path<String>,
    RawQuery(query): RawQuery,
) -> Redirect {
    let mut session = Session::from_query(state.dataset.clone(), query.as_deref());
    if let Err(e) = session.set_theme(&theme) {
        warn!("ignoring {e}");
    }
    let next = rewrite_query(query.as_deref(), session.state().theme);
    Redirect::to(&format!("/?{next}"))
}

#[derive(Serialize)]
pub struct ViewResponse {
    pub query: String,
    pub view: DerivedView,
    pub figure: Figure,
}

pub async fn api_view(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<ViewResponse> {
    let session = Session::from_query(state.dataset.clone(), query.as_deref());
    let view = session.view();
    let figure = Figure::from_view(&view, &session.state().theme.context());
    Json(ViewResponse {
        query: session.to_query(),
        view,
        figure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use lucedash::dataset::parse_timestamp_str;
    use lucedash::types::{CpuRecord, DiskRecord};
    use lucedash::Dataset;
    use std::sync::Arc;

    fn state(dataset: Dataset) -> State<AppState> {
        State(AppState {
            dataset: Arc::new(dataset),
        })
    }

    fn sample() -> Dataset {
        let ts = parse_timestamp_str("2024-05-01 10:00:00").unwrap();
        let disk = vec![DiskRecord {
            timestamp: ts,
            available_space_gb: 100.0,
            used_space_gb: 400.0,
            device_key: "sda".into(),
        }];
        let cpu = vec![CpuRecord {
            timestamp: ts,
            used_percent: 12.5,
        }];
        Dataset::new(disk, cpu, Vec::new())
    }

    fn location(resp: &Response) -> &str {
        resp.headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn theme_switch_redirects_with_other_params_untouched() {
        let resp = switch_theme(
            state(sample()),
            Path("dark".into()),
            RawQuery(Some("utm=a%20b&table=cpu&theme=light&flag".into())),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/?utm=a%20b&table=cpu&theme=dark&flag");
    }

    #[tokio::test]
    async fn unknown_theme_keeps_current_one() {
        let resp = switch_theme(
            state(sample()),
            Path("sepia".into()),
            RawQuery(Some("theme=dark&x=1".into())),
        )
        .await
        .into_response();
        assert_eq!(location(&resp), "/?theme=dark&x=1");

        let resp = switch_theme(state(sample()), Path("sepia".into()), RawQuery(None))
            .await
            .into_response();
        assert_eq!(location(&resp), "/?theme=light");
    }

    #[tokio::test]
    async fn api_view_shows_one_group_and_scroll_zoom() {
        let Json(body) = api_view(state(sample()), RawQuery(Some("table=cpu".into()))).await;
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["figure"]["config"]["scrollZoom"], true);
        assert_eq!(
            json["view"]["visible"],
            serde_json::json!({ "disk": false, "cpu": true, "memory": false })
        );
        assert_eq!(json["view"]["controls"]["table"], "cpu");
        assert!(body.query.contains("table=cpu"), "{}", body.query);
    }

    #[tokio::test]
    async fn index_renders_an_empty_dataset() {
        let resp = index(state(Dataset::default()), RawQuery(None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8_lossy(&bytes);
        assert!(html.contains("Available Space Gb Over Time"), "{html}");
        assert!(html.contains("id=\"disk-controls\""));
    }
}
