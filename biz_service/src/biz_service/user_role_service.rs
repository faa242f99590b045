use mongodb::bson::doc;
use mongodb::Database;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::biz_service::role_service::RoleService;
use crate::entitys::user_role_entity::UserRole;
use crate::manager::visibility::Viewer;
use common::errors::AppError;
use common::repository_util::{BaseRepository, Repository};
use common::util::common_utils::build_id;
use common::util::date_util::now;
use common::UserId;

#[derive(Debug)]
pub struct UserRoleService {
    pub dao: BaseRepository<UserRole>,
}

impl UserRoleService {
    pub fn new(db: Database) -> Self {
        let collection = db.collection("user_role");
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

    /// 指派角色；重复指派恢复启用即可
    pub async fn assign(&self, user_id: &UserId, role_id: &str) -> Result<UserRole, AppError> {
        let role = RoleService::get().dao.find_by_id(role_id).await?.ok_or(AppError::NotFound)?;
        if !role.enable {
            return Err(AppError::Inactive);
        }
        let filter = doc! {"user_id": user_id.to_string(), "role_id": role_id};
        if let Some(mut existing) = self.dao.find_one(filter.clone()).await? {
            if !existing.enable {
                self.dao.update(filter, doc! {"$set": {"enable": true}}).await?;
                existing.enable = true;
            }
            return Ok(existing);
        }
        let assignment = UserRole {
            id: build_id(),
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
            enable: true,
            create_time: now(),
        };
        self.dao.insert(&assignment).await?;
        Ok(assignment)
    }

    /// 撤销指派：置为停用，不删除记录
    pub async fn revoke(&self, user_id: &UserId, role_id: &str) -> Result<(), AppError> {
        let filter = doc! {"user_id": user_id.to_string(), "role_id": role_id};
        let modified = self.dao.update(filter, doc! {"$set": {"enable": false}}).await?;
        if modified == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// 角色被删除后清理全部关联指派
    pub async fn remove_by_role(&self, role_id: &str) -> Result<(), AppError> {
        self.dao.delete(doc! {"role_id": role_id}).await?;
        Ok(())
    }

    pub async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<UserRole>, AppError> {
        let list = self.dao.query(doc! {"user_id": user_id.to_string()}).await?;
        Ok(list)
    }

    /// 解析用户生效指派对应的角色名（指派与角色都需启用）
    pub async fn active_role_names(&self, user_id: &UserId) -> Result<Vec<String>, AppError> {
        let assignments = self.dao.query(doc! {"user_id": user_id.to_string(), "enable": true}).await?;
        let role_service = RoleService::get();
        let mut names = vec![];
        for assignment in assignments {
            if let Some(role) = role_service.dao.find_by_id(&assignment.role_id).await? {
                if role.enable && !names.contains(&role.name) {
                    names.push(role.name);
                }
            }
        }
        Ok(names)
    }

    /// 组装可见性过滤所需的访问者快照
    pub async fn build_viewer(&self, user_id: &UserId, role_name: Option<String>, permissions: Vec<String>) -> Result<Viewer, AppError> {
        let role_names = self.active_role_names(user_id).await?;
        Ok(Viewer { user_id: user_id.to_string(), role_name, permissions, role_names })
    }
}

static INSTANCE: OnceCell<Arc<UserRoleService>> = OnceCell::new();
