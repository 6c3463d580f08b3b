use crate::auth::{extract_token_from_header, AdminTokens, Claims};
use crate::models::ServiceError;

pub fn authenticate_request(
    req: &actix_web::HttpRequest,
    tokens: &AdminTokens,
) -> Result<Claims, ServiceError> {
    let token = extract_token_from_header(req).ok_or_else(|| {
        ServiceError::AuthenticationError("Missing Authorization header".to_string())
    })?;

    tokens.verify(&token)
}
