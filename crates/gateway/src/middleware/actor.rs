//! Actor identity middleware.
//!
//! Identity is supplied by an upstream component through request headers;
//! the gateway trusts them as-is.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Actor, ActorRole};

/// Header carrying the actor's id
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the actor's role (`client` or `counselor`)
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Actor resolved from the identity headers.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

/// Middleware that rejects requests without a usable identity.
pub async fn actor_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let actor = extract_actor(&request)?;

    request.extensions_mut().insert(CurrentActor(actor));

    Ok(next.run(request).await)
}

fn extract_actor(request: &Request<Body>) -> AppResult<Actor> {
    let id = header(request, ACTOR_ID_HEADER)?;
    let id = Uuid::parse_str(id).map_err(|_| AppError::Unauthorized)?;

    let role = header(request, ACTOR_ROLE_HEADER)?
        .parse::<ActorRole>()
        .map_err(|_| AppError::Unauthorized)?;

    Ok(Actor { id, role })
}

fn header<'a>(request: &'a Request<Body>, name: &str) -> AppResult<&'a str> {
    request
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: Option<&str>, role: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(id) = id {
            builder = builder.header(ACTOR_ID_HEADER, id);
        }
        if let Some(role) = role {
            builder = builder.header(ACTOR_ROLE_HEADER, role);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_actor() {
        let id = Uuid::new_v4();
        let actor = extract_actor(&request(Some(&id.to_string()), Some("counselor"))).unwrap();

        assert_eq!(actor, Actor::counselor(id));
    }

    #[test]
    fn test_missing_or_bad_headers_are_unauthorized() {
        let id = Uuid::new_v4().to_string();

        for req in [
            request(None, Some("client")),
            request(Some(&id), None),
            request(Some("not-a-uuid"), Some("client")),
            request(Some(&id), Some("admin")),
        ] {
            assert!(matches!(extract_actor(&req), Err(AppError::Unauthorized)));
        }
    }
}
