// ==========================================
// CCS 质量合规系统 - 奖罚规则与规则方案
// ==========================================
// 职责: 定义合规率 → 奖罚系数的分段规则
// 红线: 规则按列表顺序匹配，首个命中即返回，不做合并/覆盖校验
// ==========================================

use crate::domain::types::{CompareOp, RuleType};
use serde::{Deserialize, Serialize};

/// 标准方案 ID（与标准合格区间 min_range/max_range 配对）
pub const FIXED_PROFILE_ID: &str = "ccs_fixed";

/// 自定义方案 ID（与自定义合格区间 custom_min_range/custom_max_range 配对）
pub const CUSTOM_PROFILE_ID: &str = "ccs_custom";

/// 拒收哨兵：系数 <= -100 视为整批拒收
pub const REJECTION_FACTOR_THRESHOLD: f64 = -100.0;

// ==========================================
// Rule - 单级规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// 下界
    pub min: f64,
    /// 下界运算符
    pub min_op: CompareOp,
    /// 上界
    pub max: f64,
    /// 上界运算符（lt / le）
    pub max_op: CompareOp,
    /// 显示标签
    pub label: String,
    /// 等级
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// 奖罚系数（百分比，可为负）
    pub factor: f64,
}

impl Rule {
    pub fn new(
        min: f64,
        min_op: CompareOp,
        max: f64,
        max_op: CompareOp,
        label: &str,
        rule_type: RuleType,
        factor: f64,
    ) -> Self {
        Self {
            min,
            min_op,
            max,
            max_op,
            label: label.to_string(),
            rule_type,
            factor,
        }
    }

    /// 新增规则的初始值：[0, 100)，无奖罚
    pub fn placeholder() -> Self {
        Self::new(0.0, CompareOp::Ge, 100.0, CompareOp::Lt, "新条件", RuleType::Success, 0.0)
    }

    /// 是否为拒收规则
    pub fn is_rejection(&self) -> bool {
        self.factor <= REJECTION_FACTOR_THRESHOLD
    }
}

// ==========================================
// Profile - 规则方案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub readonly: bool,
    pub rules: Vec<Rule>,
}

impl Profile {
    /// 在方案列表中按 ID 查找
    pub fn find<'a>(profiles: &'a [Profile], id: &str) -> Option<&'a Profile> {
        profiles.iter().find(|p| p.id == id)
    }
}

/// 默认规则方案（标准合同规则 + 自定义规则）
pub fn default_profiles() -> Vec<Profile> {
    use CompareOp::{Ge, Gt, Le, Lt};
    use RuleType::{Danger, Success, Warning};

    vec![
        Profile {
            id: FIXED_PROFILE_ID.to_string(),
            name: "合同规则（标准）".to_string(),
            readonly: false,
            rules: vec![
                Rule::new(0.0, Ge, 65.0, Lt, "拒收 (REJ)", Danger, -100.0),
                Rule::new(65.0, Gt, 70.0, Le, "罚 2% 吨位", Warning, -2.0),
                Rule::new(70.0, Gt, 73.0, Le, "罚 1% 吨位", Warning, -1.0),
                Rule::new(73.0, Gt, 75.0, Le, "罚 0.5% 吨位", Warning, -0.5),
                Rule::new(75.0, Gt, 80.0, Lt, "合格（无奖罚）", Success, 0.0),
                Rule::new(80.0, Ge, 83.0, Lt, "奖 0.5%", Success, 0.5),
                Rule::new(83.0, Ge, 85.0, Lt, "奖 1%", Success, 1.0),
                Rule::new(85.0, Ge, 90.0, Lt, "奖 1.5%", Success, 1.5),
                Rule::new(90.0, Ge, 1000.0, Lt, "奖 2%", Success, 2.0),
            ],
        },
        Profile {
            id: CUSTOM_PROFILE_ID.to_string(),
            name: "新规则（自定义）".to_string(),
            readonly: false,
            rules: vec![
                Rule::new(0.0, Ge, 65.0, Lt, "REJ", Danger, -100.0),
                Rule::new(65.0, Ge, 1000.0, Lt, "合格", Success, 0.0),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_have_fixed_and_custom() {
        let profiles = default_profiles();
        assert!(Profile::find(&profiles, FIXED_PROFILE_ID).is_some());
        assert!(Profile::find(&profiles, CUSTOM_PROFILE_ID).is_some());
        assert!(Profile::find(&profiles, "unknown").is_none());
    }

    #[test]
    fn test_rule_json_shape() {
        let rule = Rule::new(80.0, CompareOp::Ge, 83.0, CompareOp::Lt, "奖 0.5%", RuleType::Success, 0.5);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["minOp"], "ge");
        assert_eq!(json["maxOp"], "lt");
        assert_eq!(json["type"], "success");
    }

    #[test]
    fn test_rejection_sentinel() {
        let profiles = default_profiles();
        let fixed = Profile::find(&profiles, FIXED_PROFILE_ID).unwrap();
        assert!(fixed.rules[0].is_rejection());
        assert!(!fixed.rules[1].is_rejection());
    }
}
