use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};

use ftradar_core::digest::render_markdown;
use ftradar_core::markdown_preview::render_preview_html;
use ftradar_core::pricing::PricingTiers;
use ftradar_core::subsidy::estimate_subsidies;
use ftradar_core::{RadarError, Result};

use crate::WebState;
use crate::csv::{estimates_csv, items_csv};
use crate::dto::{LoginForm, RadarFilter, project_params_from_pairs};
use crate::error::radar_error_response;
use crate::pages;
use crate::session::{
    SessionContext, cleared_cookie_header, session_cookie, session_cookie_header,
    verify_access_code,
};

type QueryPairs = Query<Vec<(String, String)>>;

pub async fn index() -> Redirect {
    Redirect::to("/radar")
}

pub async fn stylesheet() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        pages::RADAR_CSS,
    )
        .into_response()
}

pub async fn login_page(State(state): State<WebState>, session: SessionContext) -> Response {
    if session.is_authorized() {
        return Redirect::to("/radar").into_response();
    }
    Html(pages::login_page(None, state.config.access.access_code.is_some())).into_response()
}

pub async fn login(State(state): State<WebState>, Form(form): Form<LoginForm>) -> Response {
    let configured = state.config.access.access_code.as_deref();
    if !verify_access_code(configured, form.code.trim()) {
        tracing::info!("dashboard login rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Html(pages::login_page(
                Some("Wrong access code."),
                configured.is_some(),
            )),
        )
            .into_response();
    }
    let session_id = state.sessions.open().await;
    tracing::info!("dashboard login accepted");
    (
        [(header::SET_COOKIE, session_cookie_header(&session_id))],
        Redirect::to("/radar"),
    )
        .into_response()
}

pub async fn logout(State(state): State<WebState>, headers: axum::http::HeaderMap) -> Response {
    if let Some(session_id) = session_cookie(&headers) {
        state.sessions.close(&session_id).await;
    }
    (
        [(header::SET_COOKIE, cleared_cookie_header())],
        Redirect::to("/login"),
    )
        .into_response()
}

pub async fn radar(
    State(state): State<WebState>,
    session: SessionContext,
    Query(pairs): QueryPairs,
) -> Response {
    if !session.is_authorized() {
        return Redirect::to("/login").into_response();
    }
    let filter = match RadarFilter::from_pairs(&pairs, state.config.default_days) {
        Ok(filter) => filter,
        Err(err) => return radar_error_response(err, "radar.filter"),
    };
    let items = match query_items(&state, &filter) {
        Ok(items) => items,
        Err(err) => return radar_error_response(err, "radar.query"),
    };
    let preview = if items.is_empty() {
        String::new()
    } else {
        render_preview_html(&render_markdown(&items, filter.days))
    };
    Html(pages::radar_page(
        &filter,
        &items,
        &preview,
        show_logout(&session),
    ))
    .into_response()
}

pub async fn radar_csv(
    State(state): State<WebState>,
    session: SessionContext,
    Query(pairs): QueryPairs,
) -> Response {
    if !session.is_authorized() {
        return Redirect::to("/login").into_response();
    }
    let items = match RadarFilter::from_pairs(&pairs, state.config.default_days)
        .and_then(|filter| query_items(&state, &filter))
    {
        Ok(items) => items,
        Err(err) => return radar_error_response(err, "radar.export"),
    };
    csv_response(items_csv(&items), "radar_export.csv")
}

pub async fn pricing(State(state): State<WebState>, session: SessionContext) -> Response {
    if !session.is_authorized() {
        return Redirect::to("/login").into_response();
    }
    let tiers = match PricingTiers::load(&state.config.tiers_path) {
        Ok(tiers) => tiers,
        Err(RadarError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %state.config.tiers_path.display(), "pricing tiers file missing");
            PricingTiers::default()
        }
        Err(err) => return radar_error_response(err, "pricing.load"),
    };
    Html(pages::pricing_page(&tiers, show_logout(&session))).into_response()
}

pub async fn subsidies(
    State(state): State<WebState>,
    session: SessionContext,
    Query(pairs): QueryPairs,
) -> Response {
    if !session.is_authorized() {
        return Redirect::to("/login").into_response();
    }
    let params = match project_params_from_pairs(&pairs) {
        Ok(params) => params,
        Err(err) => return radar_error_response(err, "subsidies.params"),
    };
    match estimate_subsidies(&state.catalog, &params) {
        Ok(estimates) => Html(pages::subsidies_page(
            &state.catalog,
            &params,
            &estimates,
            show_logout(&session),
        ))
        .into_response(),
        Err(err) => radar_error_response(err, "subsidies.estimate"),
    }
}

pub async fn subsidies_csv(
    State(state): State<WebState>,
    session: SessionContext,
    Query(pairs): QueryPairs,
) -> Response {
    if !session.is_authorized() {
        return Redirect::to("/login").into_response();
    }
    match project_params_from_pairs(&pairs)
        .and_then(|params| estimate_subsidies(&state.catalog, &params))
    {
        Ok(estimates) => csv_response(estimates_csv(&estimates), "subsidy_estimates.csv"),
        Err(err) => radar_error_response(err, "subsidies.export"),
    }
}

fn query_items(
    state: &WebState,
    filter: &RadarFilter,
) -> Result<Vec<ftradar_core::models::RegulatoryItem>> {
    state.store.query(&filter.query()?)
}

const fn show_logout(session: &SessionContext) -> bool {
    matches!(session, SessionContext::Authenticated { .. })
}

fn csv_response(body: String, filename: &str) -> Response {
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
