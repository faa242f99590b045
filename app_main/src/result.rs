use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ApiResponse<T> {
    code: i32,
    message: String,
    data: Option<T>,
}

pub fn result() -> Value {
    serde_json::json!({"success":true})
}

pub fn result_data<T: Serialize + Debug>(data: T) -> Value {
    return serde_json::json!({"success":true,"data":data});
}

pub fn result_list<T: Serialize + Debug>(list: Vec<T>) -> Value {
    let value = serde_json::json!({"success":true,"data":list});
    return value;
}

pub fn result_error_msg(msg: &str) -> Value {
    serde_json::json!({"success":false,"msg":msg})
}
