pub mod application_service;
pub mod application_type_service;
pub mod kafka_service;
pub mod mail_service;
pub mod role_service;
pub mod user_role_service;

use common::config::KafkaConfig;
use mongodb::Database;

pub fn init_service(db: Database, kafka_config: KafkaConfig) {
    application_type_service::ApplicationTypeService::init(db.clone());
    application_service::ApplicationService::init(db.clone());
    role_service::RoleService::init(db.clone());
    user_role_service::UserRoleService::init(db.clone());
    mail_service::MailService::init(db.clone());
    kafka_service::KafkaService::init(&kafka_config);
}
