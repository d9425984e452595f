use actix_web::{web, HttpResponse, Result};
use utoipa;

use crate::models::{ContactForm, ServiceError};
use crate::services::ContactService;

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactForm,
    responses(
        (status = 200, description = "Request accepted; per-sink delivery flags in the body", body = ContactResponse)
    ),
    security()
)]
pub async fn submit_contact(
    contact_service: web::Data<ContactService>,
    form: web::Json<ContactForm>,
) -> Result<HttpResponse, ServiceError> {
    let result = contact_service.submit(&form).await;
    Ok(HttpResponse::Ok().json(result))
}
