use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use app_main::handlers;
use biz_service::manager::app_cache;
use common::config::AppConfig;
use log::warn;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    AppConfig::init(&"main-config.toml".to_string());
    // 读取配置文件
    let app_cfg = AppConfig::get();
    let sys_cfg = app_cfg.get_sys();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&sys_cfg.log_level)).init();

    let db_cfg = app_cfg.get_database();
    let db = common::db::init_db(&db_cfg.url, &db_cfg.db_name).await.expect("Failed to connect MongoDB");
    biz_service::init_service(db, app_cfg.get_kafka());

    // 申请变更消费任务：失败只记日志，不影响服务启动
    let kafka_cfg = app_cfg.get_kafka();
    tokio::spawn(async move {
        if let Err(e) = app_cache::start_consumer(kafka_cfg).await {
            log::error!("❌ 申请变更消费任务退出: {:?}", e);
        }
    });

    let address_and_port = format!("{}:{}", &app_cfg.get_server().host, &app_cfg.get_server().port);
    warn!("Starting server on {}", address_and_port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            // 配置 控制器
            .configure(|cfg| {
                handlers::configure(cfg);
            })
    })
    .bind(address_and_port)?
    .run()
    .await
}
