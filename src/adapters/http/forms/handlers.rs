//! HTTP handlers for form, submission, and dashboard endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{FormInput, FormService};
use crate::domain::foundation::DomainError;

use super::dto::{BulkDeleteRequest, DeletedResponse, PageQuery};

/// Page shown after a successful submission when the form has no
/// redirect URL configured.
const THANK_YOU_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>Thank you</title></head>\n<body>\n<h1>Thank you!</h1>\n<p>Your submission has been received.</p>\n</body>\n</html>\n";

#[derive(Clone)]
pub struct FormHandlers {
    pub forms: FormService,
}

/// POST /api/forms
pub async fn create_form(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<FormInput>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = handlers.forms.create_form(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/forms
pub async fn list_forms(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let forms = handlers.forms.list_forms(user.id).await?;
    Ok(Json(forms))
}

/// GET /api/forms/:form_id
pub async fn get_form(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Path(form_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = handlers.forms.form_detail(user.id, form_id).await?;
    Ok(Json(detail))
}

/// PUT /api/forms/:form_id
pub async fn update_form(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Path(form_id): Path<Uuid>,
    Json(input): Json<FormInput>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = handlers.forms.update_form(user.id, form_id, input).await?;
    Ok(Json(detail))
}

/// DELETE /api/forms/:form_id
pub async fn delete_form(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Path(form_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    handlers.forms.delete_form(user.id, form_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /f/:endpoint_id - public submission intake.
///
/// Accepts `application/json` and form-encoded bodies; everything else is
/// treated as form-encoded, which is what plain HTML forms send.
pub async fn submit(
    State(handlers): State<FormHandlers>,
    Path(endpoint_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let data = parse_submission_body(&headers, &body)?;
    let ip_address = client_ip(&headers);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let outcome = handlers
        .forms
        .intake(&endpoint_id, data, ip_address, user_agent)
        .await?;

    Ok(match outcome.redirect_url {
        Some(url) => Redirect::to(&url).into_response(),
        None => Html(THANK_YOU_PAGE).into_response(),
    })
}

fn parse_submission_body(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Map<String, Value>, DomainError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        serde_json::from_slice::<Map<String, Value>>(body)
            .map_err(|e| DomainError::validation("body", format!("Invalid JSON body: {}", e)))
    } else {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| DomainError::validation("body", format!("Invalid form body: {}", e)))?;
        Ok(pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect())
    }
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

/// GET /api/forms/:form_id/submissions
pub async fn list_submissions(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Path(form_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = handlers
        .forms
        .list_submissions(user.id, form_id, query.into())
        .await?;
    Ok(Json(page))
}

/// GET /api/forms/:form_id/submissions/export
pub async fn export_submissions(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Path(form_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (title, csv) = handlers.forms.export_csv(user.id, form_id).await?;
    let filename: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}

/// GET /api/forms/:form_id/submissions/:submission_id
pub async fn get_submission(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Path((form_id, submission_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = handlers
        .forms
        .submission_detail(user.id, form_id, submission_id)
        .await?;
    Ok(Json(submission))
}

/// DELETE /api/forms/:form_id/submissions/:submission_id
pub async fn delete_submission(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Path((form_id, submission_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    handlers
        .forms
        .delete_submission(user.id, form_id, submission_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/forms/:form_id/submissions/delete
pub async fn delete_submissions(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
    Path(form_id): Path<Uuid>,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = handlers
        .forms
        .delete_submissions(user.id, form_id, &req.ids)
        .await?;
    Ok(Json(DeletedResponse { deleted }))
}

/// GET /api/stats
pub async fn dashboard(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let stats = handlers.forms.dashboard(user.id).await?;
    Ok(Json(stats))
}

/// GET /api/stats/usage
pub async fn usage(
    State(handlers): State<FormHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let report = handlers.forms.usage(user.id).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_parses_to_map() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());

        let data = parse_submission_body(&headers, br#"{"name":"Ada","age":36}"#).unwrap();
        assert_eq!(data.get("name"), Some(&Value::String("Ada".into())));
        assert_eq!(data.get("age"), Some(&Value::from(36)));
    }

    #[test]
    fn urlencoded_body_parses_to_string_map() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );

        let data = parse_submission_body(&headers, b"name=Ada+Lovelace&email=ada%40example.com")
            .unwrap();
        assert_eq!(
            data.get("name"),
            Some(&Value::String("Ada Lovelace".into()))
        );
        assert_eq!(
            data.get("email"),
            Some(&Value::String("ada@example.com".into()))
        );
    }

    #[test]
    fn missing_content_type_falls_back_to_form_encoding() {
        let headers = HeaderMap::new();
        let data = parse_submission_body(&headers, b"message=hi").unwrap();
        assert_eq!(data.get("message"), Some(&Value::String("hi".into())));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(parse_submission_body(&headers, b"{not json").is_err());
    }

    #[test]
    fn client_ip_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.7, 10.0.0.1".parse().unwrap(),
        );
        assert_eq!(client_ip(&headers), Some("203.0.113.7".to_string()));
    }
}
