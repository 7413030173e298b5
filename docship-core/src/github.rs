//! # GitHub REST client
//!
//! Implements [`HostingApi`] against `POST /user/repos` and `GET /user`.
//! Requests carry the bearer token, the v3 JSON media type and a user agent;
//! no retries and no timeout overrides are applied.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::contract::{CreateOutcome, HostingApi, NewRepository, Repository, User};
use crate::error::ApiError;
use crate::token::Credential;

const MEDIA_TYPE: &str = "application/vnd.github.v3+json";

pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(api_base: &str, credential: &Credential) -> Result<Self, ApiError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
            .map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));

        let http = reqwest::Client::builder()
            .user_agent(concat!("docship/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        tracing::info!(api_base, "Initialised GitHub client");
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn create_repository(&self, req: &NewRepository) -> Result<CreateOutcome, ApiError> {
        let url = self.endpoint("/user/repos");
        tracing::info!(url = %url, repo = %req.name, private = req.private, "Creating repository");

        let resp = self.http.post(&url).json(req).send().await.map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Repository creation request failed");
            e
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        tracing::debug!(status, "Repository creation response received");

        match classify_create_response(status, &body) {
            CreateOutcome::Unknown { .. } if status == 201 => Err(ApiError::Decode(format!(
                "201 response without a repository: {body}"
            ))),
            outcome => Ok(outcome),
        }
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let url = self.endpoint("/user");
        let resp = self.http.get(&url).send().await.map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Identity lookup failed");
            e
        })?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Identity lookup returned an error");
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        let user: User =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        tracing::info!(login = %user.login, "Resolved authenticated user");
        Ok(user)
    }
}

#[derive(Deserialize)]
struct ValidationFailure {
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Deserialize)]
struct FieldError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl FieldError {
    fn is_name_collision(&self) -> bool {
        if self.code.as_deref() == Some("already_exists") {
            return true;
        }
        self.field.as_deref() == Some("name")
            && self
                .message
                .as_deref()
                .is_some_and(|m| m.contains("already exists"))
    }
}

/// Maps a creation response onto a [`CreateOutcome`].
///
/// A 422 counts as a collision when GitHub's structured `errors` list says so.
/// Only when the body is not JSON at all does a plain "already exists"
/// substring decide; a JSON 422 without a collision entry is `Unknown`.
/// A 201 whose body does not describe a repository is also `Unknown`.
pub fn classify_create_response(status: u16, body: &str) -> CreateOutcome {
    match status {
        201 => match serde_json::from_str::<Repository>(body) {
            Ok(repo) => CreateOutcome::Created(repo),
            Err(e) => {
                tracing::warn!(error = %e, "Could not decode created repository");
                CreateOutcome::Unknown {
                    status,
                    body: body.to_string(),
                }
            }
        },
        422 => match serde_json::from_str::<ValidationFailure>(body) {
            Ok(failure) if failure.errors.iter().any(FieldError::is_name_collision) => {
                CreateOutcome::AlreadyExists
            }
            Ok(_) => CreateOutcome::Unknown {
                status,
                body: body.to_string(),
            },
            Err(_) if body.contains("already exists") => CreateOutcome::AlreadyExists,
            Err(_) => CreateOutcome::Unknown {
                status,
                body: body.to_string(),
            },
        },
        _ => CreateOutcome::Rejected {
            status,
            body: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_repository_is_decoded() {
        let body = r#"{
            "id": 1,
            "name": "omar-terminal",
            "html_url": "https://github.com/octocat/omar-terminal",
            "clone_url": "https://github.com/octocat/omar-terminal.git",
            "owner": { "login": "octocat", "id": 7 }
        }"#;
        match classify_create_response(201, body) {
            CreateOutcome::Created(repo) => {
                assert_eq!(repo.name, "omar-terminal");
                assert_eq!(repo.html_url, "https://github.com/octocat/omar-terminal");
                assert_eq!(repo.owner.map(|o| o.login).as_deref(), Some("octocat"));
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn structured_name_collision_is_already_exists() {
        let body = r#"{
            "message": "Repository creation failed.",
            "errors": [{
                "resource": "Repository",
                "code": "custom",
                "field": "name",
                "message": "name already exists on this account"
            }]
        }"#;
        assert_eq!(classify_create_response(422, body), CreateOutcome::AlreadyExists);
    }

    #[test]
    fn already_exists_code_is_enough() {
        let body = r#"{"message":"Validation Failed","errors":[{"code":"already_exists"}]}"#;
        assert_eq!(classify_create_response(422, body), CreateOutcome::AlreadyExists);
    }

    #[test]
    fn plain_text_body_falls_back_to_substring() {
        assert_eq!(
            classify_create_response(422, "name already exists on this account"),
            CreateOutcome::AlreadyExists
        );
    }

    #[test]
    fn other_validation_failures_are_unknown() {
        let body = r#"{"message":"Validation Failed","errors":[{"field":"description","code":"invalid"}]}"#;
        assert_eq!(
            classify_create_response(422, body),
            CreateOutcome::Unknown {
                status: 422,
                body: body.to_string()
            }
        );

        // the phrase outside the errors list does not count once the body is JSON
        let body = r#"{"message":"something already exists somewhere","errors":[]}"#;
        assert!(matches!(
            classify_create_response(422, body),
            CreateOutcome::Unknown { .. }
        ));
    }

    #[test]
    fn other_statuses_are_rejected() {
        assert_eq!(
            classify_create_response(401, r#"{"message":"Bad credentials"}"#),
            CreateOutcome::Rejected {
                status: 401,
                body: r#"{"message":"Bad credentials"}"#.to_string()
            }
        );
    }

    #[test]
    fn token_with_control_characters_is_invalid() {
        let err = GitHubClient::new("https://api.example.com", &Credential::new("ghp_\nbroken"))
            .err()
            .expect("header value must be rejected");
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GitHubClient::new("https://api.example.com/", &Credential::new("t0k3n"))
            .expect("client");
        assert_eq!(client.endpoint("/user"), "https://api.example.com/user");
    }
}
