use std::collections::HashMap;

use serde_json::Value;

use crate::biz_const::{RESERVED_FIELD_KEY, RESERVED_FIELD_LABEL};
use crate::entitys::application_type_entity::{FieldKind, FormField};
use common::util::validate::{valid_email, valid_number};

/// 保留身份字段的规范定义
pub fn reserved_field() -> FormField {
    FormField {
        key: RESERVED_FIELD_KEY.to_string(),
        label: RESERVED_FIELD_LABEL.to_string(),
        kind: FieldKind::Text,
        required: true,
        placeholder: None,
        options: vec![],
        system: true,
    }
}

/// 保证字段表首位有且仅有一个保留身份字段；重复调用结果不变
pub fn ensure_reserved_field(fields: Vec<FormField>) -> Vec<FormField> {
    let mut list: Vec<FormField> = fields.into_iter().filter(|f| f.key != RESERVED_FIELD_KEY).collect();
    list.insert(0, reserved_field());
    list
}

/// 提交值规整为去空白后的文本；null/false/空数组视为未填写
fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Bool(b)) => {
            if *b {
                "true".to_string()
            } else {
                String::new()
            }
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => {
            if items.is_empty() {
                String::new()
            } else {
                items.iter().map(|v| value_text(Some(v))).collect::<Vec<_>>().join(",")
            }
        }
        Some(other) => other.to_string(),
    }
}

/// 按字段定义校验提交数据，返回 字段key -> 错误信息；空表即通过。
/// 保留身份字段由系统填充，不参与校验；select/radio 只做必填检查。
pub fn validate(fields: &[FormField], data: &HashMap<String, Value>) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    for field in fields {
        if field.system || field.key == RESERVED_FIELD_KEY {
            continue;
        }
        let text = value_text(data.get(&field.key));
        if field.required && text.is_empty() {
            errors.insert(field.key.clone(), format!("{} is required", field.label));
            continue;
        }
        if text.is_empty() {
            continue;
        }
        match field.kind {
            FieldKind::Email => {
                if !valid_email(&text) {
                    errors.insert(field.key.clone(), "Please enter a valid email address".to_string());
                }
            }
            FieldKind::Number => {
                if !valid_number(&text) {
                    errors.insert(field.key.clone(), "Please enter a valid number".to_string());
                }
            }
            _ => {}
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(key: &str, kind: FieldKind, required: bool) -> FormField {
        FormField { key: key.to_string(), label: key.to_string(), kind, required, ..Default::default() }
    }

    #[test]
    fn test_required_rejects_blank() {
        let fields = vec![field("name", FieldKind::Text, true)];
        for blank in [json!(""), json!("   "), json!(null), json!(false)] {
            let data = HashMap::from([("name".to_string(), blank)]);
            let errors = validate(&fields, &data);
            assert_eq!(errors.get("name"), Some(&"name is required".to_string()));
        }
        let data = HashMap::from([("name".to_string(), json!("x"))]);
        assert!(validate(&fields, &data).is_empty());
    }

    #[test]
    fn test_missing_optional_field_passes() {
        let fields = vec![field("bio", FieldKind::Textarea, false)];
        assert!(validate(&fields, &HashMap::new()).is_empty());
    }

    #[test]
    fn test_email_shape() {
        let fields = vec![field("email", FieldKind::Email, true)];
        let ok = HashMap::from([("email".to_string(), json!("a@b.co"))]);
        assert!(validate(&fields, &ok).is_empty());
        let bad = HashMap::from([("email".to_string(), json!("not-an-email"))]);
        assert_eq!(validate(&fields, &bad).get("email"), Some(&"Please enter a valid email address".to_string()));
    }

    #[test]
    fn test_number_parse() {
        let fields = vec![field("age", FieldKind::Number, false)];
        let ok = HashMap::from([("age".to_string(), json!("18"))]);
        assert!(validate(&fields, &ok).is_empty());
        let bad = HashMap::from([("age".to_string(), json!("abc"))]);
        assert_eq!(validate(&fields, &bad).get("age"), Some(&"Please enter a valid number".to_string()));
    }

    #[test]
    fn test_reserved_field_skipped() {
        // 保留字段必填但不参与用户校验
        let fields = ensure_reserved_field(vec![field("name", FieldKind::Text, false)]);
        assert!(validate(&fields, &HashMap::new()).is_empty());
    }

    #[test]
    fn test_ensure_reserved_field_idempotent() {
        let mut input = vec![field("name", FieldKind::Text, true), reserved_field(), reserved_field()];
        input.push(field(RESERVED_FIELD_KEY, FieldKind::Text, false));

        let once = ensure_reserved_field(input.clone());
        let twice = ensure_reserved_field(once.clone());

        let count = |list: &[FormField]| list.iter().filter(|f| f.key == RESERVED_FIELD_KEY).count();
        assert_eq!(count(&once), 1);
        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].key, RESERVED_FIELD_KEY);
        assert!(once[0].system);
        assert_eq!(twice[0].key, RESERVED_FIELD_KEY);
    }
}
