//! Bearer token authentication middleware

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use super::TokenVerifier;
use crate::error::AppError;

/// Extract the token from the Authorization header
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authentication middleware
///
/// Verifies the bearer token and injects the `CurrentUser` into request extensions.
pub async fn auth_middleware(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request).ok_or(AppError::Unauthorized)?;
    let user = verifier.verify(token).ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode, middleware::from_fn_with_state, routing::get, Extension, Router,
    };
    use tower::ServiceExt;

    use crate::domain::entities::CurrentUser;

    async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
        user.user_id
    }

    fn app(verifier: Arc<TokenVerifier>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(verifier, auth_middleware))
    }

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let verifier = Arc::new(TokenVerifier::new("secret"));

        let response = app(verifier).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized() {
        let verifier = Arc::new(TokenVerifier::new("secret"));

        let response = app(verifier)
            .oneshot(request(Some("Bearer abc.def")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let verifier = Arc::new(TokenVerifier::new("secret"));
        let token = verifier.sign(
            &CurrentUser {
                user_id: "user-1".to_string(),
                is_admin: false,
            },
            None,
        );

        let response = app(verifier)
            .oneshot(request(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"user-1");
    }
}
