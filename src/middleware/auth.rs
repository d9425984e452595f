use crate::auth::{verify_jwt, JwtManager};
use crate::models::ServiceError;

pub fn authenticate_request(req: &actix_web::HttpRequest, jwt_manager: &JwtManager) -> Result<(), ServiceError> {
    match verify_jwt(req, jwt_manager) {
        Ok(_claims) => Ok(()),
        Err(_) => Err(ServiceError::AuthenticationError("Not authenticated".to_string())),
    }
}
