// ==========================================
// CCS 质量合规系统 - 规则匹配引擎
// ==========================================
// 职责: 合规率 → 首个命中的规则
// 红线: 按列表顺序线性扫描，首个命中即返回；不取整、不做覆盖校验
// ==========================================

use crate::domain::report::RuleVerdict;
use crate::domain::rule::{Profile, Rule};

pub struct RuleMatcher;

impl RuleMatcher {
    pub fn new() -> Self {
        Self
    }

    /// 单条规则是否命中
    ///
    /// - 下界: gt 为 value > min，其余为 value >= min
    /// - 上界: lt 为 value < max，其余为 value <= max
    pub fn matches(&self, value: f64, rule: &Rule) -> bool {
        let lower_ok = if rule.min_op.is_exclusive_lower() {
            value > rule.min
        } else {
            value >= rule.min
        };
        let upper_ok = if rule.max_op.is_exclusive_upper() {
            value < rule.max
        } else {
            value <= rule.max
        };
        lower_ok && upper_ok
    }

    /// 返回首个命中的规则，未命中返回 None
    pub fn find_match<'a>(&self, value: f64, rules: &'a [Rule]) -> Option<&'a Rule> {
        rules.iter().find(|rule| self.matches(value, rule))
    }

    /// 在方案中匹配并给出判定
    ///
    /// 方案缺失或未命中任何规则均为 NoRule
    pub fn evaluate(&self, value: f64, profile: Option<&Profile>) -> RuleVerdict {
        match profile.and_then(|p| self.find_match(value, &p.rules)) {
            Some(rule) => RuleVerdict::Matched(rule.clone()),
            None => RuleVerdict::NoRule,
        }
    }
}

impl Default for RuleMatcher {
    fn default() -> Self {
        Self::new()
    }
}
