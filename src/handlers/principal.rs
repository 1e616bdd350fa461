use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::order::{Principal, Role};
use crate::errors::AppError;

/// Extracts the already-verified principal from the `X-User-Id` /
/// `X-User-Role` headers set by the upstream auth gateway. This service
/// never validates credentials itself.
impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_from_headers(req))
    }
}

fn principal_from_headers(req: &HttpRequest) -> Result<Principal, AppError> {
    let id = req
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(AppError::Unauthenticated)?;
    let role = req
        .headers()
        .get("x-user-role")
        .and_then(|v| v.to_str().ok())
        .and_then(Role::parse)
        .ok_or(AppError::Unauthenticated)?;
    Ok(Principal { id, role })
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn valid_headers_yield_a_principal() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header(("x-user-id", id.to_string()))
            .insert_header(("x-user-role", "admin"))
            .to_http_request();

        let principal = principal_from_headers(&req).expect("principal expected");
        assert_eq!(principal.id, id);
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn missing_id_header_is_unauthenticated() {
        let req = TestRequest::default()
            .insert_header(("x-user-role", "customer"))
            .to_http_request();
        assert!(matches!(
            principal_from_headers(&req),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn malformed_id_or_unknown_role_is_unauthenticated() {
        let req = TestRequest::default()
            .insert_header(("x-user-id", "not-a-uuid"))
            .insert_header(("x-user-role", "customer"))
            .to_http_request();
        assert!(principal_from_headers(&req).is_err());

        let req = TestRequest::default()
            .insert_header(("x-user-id", Uuid::new_v4().to_string()))
            .insert_header(("x-user-role", "wizard"))
            .to_http_request();
        assert!(principal_from_headers(&req).is_err());
    }
}
