use crate::result::result;
use actix_web::{get, web, Responder};
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(status);
}

#[utoipa::path(
    get,
    path = "/status",
    responses((status = 200, description = "服务存活"))
)]
#[get("/status")]
pub async fn status() -> Result<impl Responder, AppError> {
    Ok(web::Json(result()))
}
