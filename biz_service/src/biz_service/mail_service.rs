use async_trait::async_trait;
use mongodb::Database;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::entitys::application_entity::Application;
use crate::entitys::mail_entity::{MailEntity, MailTemplate};
use common::config::AppConfig;
use common::repository_util::{BaseRepository, Repository};
use common::util::common_utils::build_id;
use common::util::date_util::{now, time_to_str};

#[async_trait]
pub trait MailServiceTrait: Send + Sync {
    async fn send_mail(&self, mail: &MailEntity) -> anyhow::Result<()>;
}

#[derive(Debug)]
pub struct MailService {
    pub dao: BaseRepository<MailEntity>,
}

impl MailService {
    pub fn new(db: Database) -> Self {
        let collection = db.collection("mail");
        Self { dao: BaseRepository::new(db, collection.clone()) }
    }

    pub fn init(db: Database) {
        let instance = Self::new(db);
        INSTANCE.set(Arc::new(instance)).expect("INSTANCE already initialized");
    }

    /// 获取单例
    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("INSTANCE is not initialized").clone()
    }

    /// 写入申请相关通知邮件（发件箱模式，投递由独立 worker 完成）
    pub async fn send_application_mail(&self, template: MailTemplate, receiver: &str, app: &Application) -> anyhow::Result<()> {
        let sys = AppConfig::get().get_sys();
        let time = now();
        let mail = MailEntity {
            id: build_id(),
            template,
            sender: sys.mail_sender.clone(),
            receiver: receiver.to_string(),
            subject: render_subject(template, &sys.site_name),
            content: render_content(template, app),
            status: 0,
            send_count: 0,
            create_time: time,
            update_time: time,
        };
        self.send_mail(&mail).await
    }
}

static INSTANCE: OnceCell<Arc<MailService>> = OnceCell::new();

#[async_trait]
impl MailServiceTrait for MailService {
    async fn send_mail(&self, mail: &MailEntity) -> anyhow::Result<()> {
        self.dao.insert(mail).await?;
        Ok(())
    }
}

fn render_subject(template: MailTemplate, site_name: &str) -> String {
    match template {
        MailTemplate::ApplicationReceived => format!("[{}] 申请已受理", site_name),
        MailTemplate::ApplicationApproved => format!("[{}] 申请已通过", site_name),
        MailTemplate::ApplicationRejected => format!("[{}] 申请未通过", site_name),
    }
}

fn render_content(template: MailTemplate, app: &Application) -> String {
    let notes = app.notes.clone().unwrap_or_default();
    match template {
        MailTemplate::ApplicationReceived => {
            format!("你的申请已提交，等待审核。提交时间：{}", time_to_str(app.create_time))
        }
        MailTemplate::ApplicationApproved => {
            format!("你的申请已通过审核。备注：{}", notes)
        }
        MailTemplate::ApplicationRejected => {
            format!("很遗憾，你的申请未通过审核。备注：{}", notes)
        }
    }
}
