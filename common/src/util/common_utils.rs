use mongodb::bson::oid::ObjectId;
use uuid::Uuid;

/// 生成记录主键（hex 字符串）
pub fn build_id() -> String {
    ObjectId::new().to_hex()
}

/// 生成表单字段 key 等非主键标识
pub fn build_uuid() -> String {
    let uuid = Uuid::new_v4().simple();
    format!("{}", uuid)
}
