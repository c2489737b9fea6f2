//! Validation modules

pub mod fields;
pub mod work_record;

pub use fields::{
    is_katakana, is_phone_number, validate_hours, validate_katakana, validate_percentage,
    validate_phone,
};
pub use work_record::{parse_date, parse_record, summarize, validate_row};
