use lazy_static::lazy_static;
use regex::Regex;

/// ✅ 邮箱格式校验：local@domain.tld 的简单形态
pub fn valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// ✅ 数值校验：可解析为数字即可
pub fn valid_number(value: &str) -> bool {
    value.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("a@b.co"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a b@c.de"));
    }

    #[test]
    fn test_valid_number() {
        assert!(valid_number("42"));
        assert!(valid_number("-3.5"));
        assert!(!valid_number("12abc"));
    }
}
