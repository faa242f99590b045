use actix_web::web;

pub mod application_handler;
pub mod application_type_handler;
pub mod common_handler;
pub mod role_handler;
pub mod swagger;

pub fn configure(cfg: &mut web::ServiceConfig) {
    common_handler::configure(cfg);
    application_handler::configure(cfg);
    application_type_handler::configure(cfg);
    role_handler::configure(cfg);
    swagger::configure(cfg);
}
