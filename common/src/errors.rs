use actix_web::{HttpResponse, ResponseError};
use log::error;
use mongodb::error::Error as MongoError;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use thiserror::Error;

/// HTTP 错误响应结构
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<HashMap<String, String>>,
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    // ==== 常规业务错误 ====
    #[error("Resource not found")]
    NotFound,

    #[error("Resource is disabled")]
    Inactive,

    #[error("Form validation failed")]
    FormInvalid(HashMap<String, String>),

    #[error("Bad request: {0}")]
    Validation(String),

    #[error("Unauthorized access")]
    Unauthorized(String),

    #[error("Missing actor identity")]
    Unauthenticated,

    #[error("biz error: {0}")]
    BizError(String),

    #[error("Conflict: resource already exists")]
    Conflict,

    // ==== 系统错误 ====
    #[error("MongoDB error: {0}")]
    Mongo(#[from] MongoError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Internal server error")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut fields: Option<HashMap<String, String>> = None;
        let (status, msg) = match self {
            AppError::NotFound => (actix_web::http::StatusCode::NOT_FOUND, self.to_string()),
            AppError::Inactive => (actix_web::http::StatusCode::BAD_REQUEST, self.to_string()),
            AppError::FormInvalid(map) => {
                fields = Some(map.clone());
                (actix_web::http::StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Validation(_) => (actix_web::http::StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Unauthorized(msg) => (actix_web::http::StatusCode::FORBIDDEN, msg.to_string()),
            AppError::Unauthenticated => (actix_web::http::StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Conflict => (actix_web::http::StatusCode::CONFLICT, self.to_string()),
            AppError::Mongo(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string())
            }
            AppError::Json(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string())
            }
            AppError::Io(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string())
            }
            AppError::Internal(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string())
            }
            AppError::BizError(e) => {
                error!("{:?}", e);
                (actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        HttpResponse::build(status).json(ErrorResponse { code: status.as_u16(), message: msg, fields })
    }
}
