//! Field-level validators shared by request DTOs

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Full-width katakana, including the prolonged sound mark and full-width spaces
static KATAKANA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[゠-ヿ　]+$").expect("valid katakana regex"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9-]{10,13}$").expect("valid phone regex"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn is_katakana(value: &str) -> bool {
    KATAKANA.is_match(value)
}

pub fn is_phone_number(value: &str) -> bool {
    PHONE.is_match(value)
}

/// Empty input counts as "not provided"
pub fn validate_katakana(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || is_katakana(value.trim()) {
        Ok(())
    } else {
        Err(error("katakana", "全角カタカナで入力してください"))
    }
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || is_phone_number(value.trim()) {
        Ok(())
    } else {
        Err(error(
            "phone",
            "電話番号は数字とハイフンで10〜13文字で入力してください",
        ))
    }
}

pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        Err(error("range", "0〜100の範囲で入力してください"))
    }
}

pub fn validate_hours(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::from(10_000) {
        Ok(())
    } else {
        Err(error("range", "受講時間は0〜10000の範囲で入力してください"))
    }
}
