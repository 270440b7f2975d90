use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{self, HeaderName},
    },
    middleware::Next,
    response::Response,
};

/// Pages render server-side only: no scripts, styles from `/assets`, forms
/// posting back to this origin, outbound source links only.
const DASHBOARD_CSP: &str = "default-src 'self'; img-src 'self' https:; style-src 'self'; script-src 'none'; form-action 'self'; object-src 'none'; base-uri 'none'; frame-ancestors 'none'";

const ASSET_PREFIX: &str = "/assets/";
const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let is_asset = request.uri().path().starts_with(ASSET_PREFIX);
    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut(), is_asset);
    response
}

/// Item data, estimates and session cookies are never cached; the stylesheet
/// may be, as long as the response does not set a cookie.
fn apply_security_headers(headers: &mut HeaderMap, is_asset: bool) {
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("no-referrer"),
    );
    let cacheable = is_asset && !headers.contains_key(header::SET_COOKIE);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(if cacheable {
            ASSET_CACHE_CONTROL
        } else {
            "no-store"
        }),
    );
    headers.insert(
        HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static(DASHBOARD_CSP),
    );
}
