pub mod app_cache;
pub mod form_schema;
pub mod visibility;
