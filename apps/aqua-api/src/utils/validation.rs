//! 输入验证辅助函数
//!
//! - normalize_required / normalize_optional：去除首尾空格并检查非空
//! - 水族箱字段：名称 3..=100 字符、容积 > 0、尺寸 > 10 cm
//! - 物种数值字段：体长、最小缸体积、最小水量提供时必须 > 0
//! - 目录枚举：水体类型、生物类别、攻击性
//!
//! 失败统一返回 bad_request_error 响应。

use crate::utils::response::bad_request_error;
use axum::response::Response;
use domain::{Aggressiveness, InhabitantKind, WaterType};

const TANK_NAME_MIN_CHARS: usize = 3;
const TANK_NAME_MAX_CHARS: usize = 100;
const MIN_DIMENSION_CM: i32 = 10;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 验证可选字段，如果提供则去除空格并检查非空
pub fn normalize_optional(value: Option<String>, field: &str) -> Result<Option<String>, Response> {
    match value {
        Some(value) => normalize_required(value, field).map(Some),
        None => Ok(None),
    }
}

pub fn validate_tank_name(value: String) -> Result<String, Response> {
    let name = normalize_required(value, "name")?;
    let length = name.chars().count();
    if !(TANK_NAME_MIN_CHARS..=TANK_NAME_MAX_CHARS).contains(&length) {
        return Err(bad_request_error(format!(
            "name must be {TANK_NAME_MIN_CHARS}-{TANK_NAME_MAX_CHARS} characters"
        )));
    }
    Ok(name)
}

pub fn validate_volume(value: f64) -> Result<f64, Response> {
    if !value.is_finite() || value <= 0.0 {
        return Err(bad_request_error("volumeL must be greater than 0"));
    }
    Ok(value)
}

/// 可选数值提供时必须为大于 0 的有限数
pub fn validate_positive(value: Option<f64>, field: &str) -> Result<Option<f64>, Response> {
    match value {
        Some(value) if !value.is_finite() || value <= 0.0 => Err(bad_request_error(format!(
            "{field} must be greater than 0"
        ))),
        other => Ok(other),
    }
}

/// 尺寸可省略；提供时必须大于 10 cm
pub fn validate_dimension(value: Option<i32>, field: &str) -> Result<Option<i32>, Response> {
    match value {
        Some(value) if value <= MIN_DIMENSION_CM => Err(bad_request_error(format!(
            "{field} must be greater than {MIN_DIMENSION_CM}"
        ))),
        other => Ok(other),
    }
}

pub fn parse_water_type(value: &str) -> Result<WaterType, Response> {
    WaterType::parse(value).ok_or_else(|| bad_request_error("waterType must be freshwater|saltwater"))
}

pub fn parse_kind(value: &str) -> Result<InhabitantKind, Response> {
    InhabitantKind::parse(value)
        .ok_or_else(|| bad_request_error("kind must be fish|plant|shrimp|snail"))
}

pub fn parse_aggressiveness(value: Option<&str>) -> Result<Option<Aggressiveness>, Response> {
    match value {
        None => Ok(None),
        Some(value) => Aggressiveness::parse(value).map(Some).ok_or_else(|| {
            bad_request_error("aggressiveness must be peaceful|semi_aggressive|aggressive")
        }),
    }
}

/// 两端都给出时要求 min <= max
pub fn ensure_ordered(min: Option<f64>, max: Option<f64>, field: &str) -> Result<(), Response> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(bad_request_error(format!("{field} min must be <= max")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn tank_name_length_is_bounded() {
        assert_eq!(validate_tank_name("  Reef  ".to_string()).expect("name"), "Reef");
        let response = validate_tank_name("ab".to_string()).expect_err("too short");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(validate_tank_name("x".repeat(101)).is_err());
        assert!(validate_tank_name("x".repeat(100)).is_ok());
    }

    #[test]
    fn dimensions_must_exceed_ten_centimetres() {
        assert_eq!(validate_dimension(None, "lengthCm").expect("none"), None);
        assert_eq!(validate_dimension(Some(11), "lengthCm").expect("ok"), Some(11));
        assert!(validate_dimension(Some(10), "lengthCm").is_err());
    }

    #[test]
    fn volume_must_be_positive() {
        assert!(validate_volume(0.0).is_err());
        assert!(validate_volume(f64::NAN).is_err());
        assert_eq!(validate_volume(60.0).expect("volume"), 60.0);
    }

    #[test]
    fn species_measures_must_be_positive_when_given() {
        assert_eq!(validate_positive(None, "sizeCm").expect("none"), None);
        assert_eq!(validate_positive(Some(4.5), "sizeCm").expect("ok"), Some(4.5));
        let response = validate_positive(Some(-30.0), "sizeCm").expect_err("negative");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(validate_positive(Some(0.0), "minWaterVolumeL").is_err());
        assert!(validate_positive(Some(f64::INFINITY), "minTankSizeL").is_err());
    }

    #[test]
    fn catalog_enums_parse() {
        assert_eq!(parse_kind("Fish").expect("kind"), InhabitantKind::Fish);
        assert!(parse_kind("coral").is_err());
        assert_eq!(
            parse_aggressiveness(Some("semi-aggressive")).expect("aggr"),
            Some(Aggressiveness::SemiAggressive)
        );
        assert!(parse_aggressiveness(None).expect("none").is_none());
    }
}
