//! 物种目录与水族箱的枚举类型。
//!
//! 存储层以文本保存，`as_str` / `parse` 负责双向转换。

/// 水体类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterType {
    Freshwater,
    Saltwater,
}

impl WaterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterType::Freshwater => "freshwater",
            WaterType::Saltwater => "saltwater",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "freshwater" => Some(WaterType::Freshwater),
            "saltwater" => Some(WaterType::Saltwater),
            _ => None,
        }
    }
}

/// 生物类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InhabitantKind {
    Fish,
    Plant,
    Shrimp,
    Snail,
}

impl InhabitantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InhabitantKind::Fish => "fish",
            InhabitantKind::Plant => "plant",
            InhabitantKind::Shrimp => "shrimp",
            InhabitantKind::Snail => "snail",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fish" => Some(InhabitantKind::Fish),
            "plant" => Some(InhabitantKind::Plant),
            "shrimp" => Some(InhabitantKind::Shrimp),
            "snail" => Some(InhabitantKind::Snail),
            _ => None,
        }
    }
}

/// 攻击性等级。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggressiveness {
    Peaceful,
    SemiAggressive,
    Aggressive,
}

impl Aggressiveness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggressiveness::Peaceful => "peaceful",
            Aggressiveness::SemiAggressive => "semi_aggressive",
            Aggressiveness::Aggressive => "aggressive",
        }
    }

    /// 同时接受 `semi_aggressive` 与 `semi-aggressive` 两种写法。
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "peaceful" => Some(Aggressiveness::Peaceful),
            "semi_aggressive" => Some(Aggressiveness::SemiAggressive),
            "aggressive" => Some(Aggressiveness::Aggressive),
            _ => None,
        }
    }
}
