pub mod application_entity;
pub mod application_type_entity;
pub mod mail_entity;
pub mod role_entity;
pub mod user_role_entity;
