// ==========================================
// 引擎集成测试
// ==========================================
// 测试目标: 规范化 → 聚合 → 规则匹配 → 窗口统计 → 区间汇总 全链路
// ==========================================


use ccs_compliance::domain::{
    default_profiles, AppConfig, CompareOp, ImpactTotals, Profile, RawCell, ReportRange, Rule,
    RuleType, RuleVerdict, SamplingMode, CUSTOM_PROFILE_ID, FIXED_PROFILE_ID, NO_RULE_LABEL,
};
use ccs_compliance::engine::{Aggregator, Normalizer, PeriodStatsEngine, RangeAggregator, RuleMatcher};
use test_helpers::{day_with_counts, record};

fn fixed_profile() -> Profile {
    default_profiles()
        .into_iter()
        .find(|p| p.id == FIXED_PROFILE_ID)
        .unwrap()
}

// ==========================================
// 聚合
// ==========================================

#[test]
fn test_two_hour_slots_for_sparse_day() {
    let day = record("1403/11/01", 0.0, &[("06:00", 300.0), ("14:00", 310.0)]);
    let values = Aggregator::new().aggregate(&day, SamplingMode::TwoHour);

    assert_eq!(values.len(), 12);
    assert_eq!(values[0], 300.0);
    assert_eq!(values[4], 310.0);
    assert_eq!(values.iter().filter(|v| !v.is_nan()).count(), 2);
    assert_eq!(values.iter().filter(|v| v.is_nan()).count(), 10);
}

#[test]
fn test_shift_averages_for_sparse_day() {
    let day = record("1403/11/01", 0.0, &[("06:00", 300.0), ("14:00", 310.0)]);
    let values = Aggregator::new().aggregate(&day, SamplingMode::Shift);

    assert_eq!(values.len(), 3);
    assert_eq!(values[0], 300.0);
    assert_eq!(values[1], 310.0);
    assert!(values[2].is_nan());
}

// ==========================================
// 规则匹配
// ==========================================

#[test]
fn test_82_percent_earns_half_percent_bonus() {
    let verdict = RuleMatcher::new().evaluate(82.0, Some(&fixed_profile()));
    assert_eq!(verdict.factor(), 0.5);
    assert_eq!(verdict.rule().map(|r| (r.min, r.max)), Some((80.0, 83.0)));

    // 5 天 × 10 个样本，41 个合格 → 82%
    let records: Vec<_> = (1..=5)
        .map(|d| {
            let in_range = if d == 1 { 9 } else { 8 };
            day_with_counts(&format!("1403/11/{:02}", d), 200.0, in_range, 10 - in_range)
        })
        .collect();
    let stats = PeriodStatsEngine::new().calculate(
        &records,
        &AppConfig::default(),
        &default_profiles(),
        SamplingMode::TwoHour,
    );

    assert_eq!(stats.total_count, 50);
    assert_eq!(stats.fixed.counts.in_range, 41);
    assert_eq!(stats.fixed.factor(), 0.5);
    assert_eq!(stats.total_tonnage, 1000.0);
    assert_eq!(stats.fixed.impact, 5.0);
}

#[test]
fn test_40_percent_is_rejection_regardless_of_tonnage() {
    let verdict = RuleMatcher::new().evaluate(40.0, Some(&fixed_profile()));
    assert_eq!(verdict.factor(), -100.0);
    assert!(verdict.is_rejection());

    for tonnage in [0.0, 1.0, 25_000.0] {
        let records = vec![day_with_counts("1403/11/03", tonnage, 2, 3)];
        let stats = PeriodStatsEngine::new().calculate(
            &records,
            &AppConfig::default(),
            &default_profiles(),
            SamplingMode::TwoHour,
        );
        assert_eq!(stats.fixed.pct, 40.0);
        assert!(stats.fixed.is_rejection());
        assert_eq!(stats.fixed.impact, -tonnage);
    }
}

#[test]
fn test_first_listed_tier_wins_on_overlap() {
    let profile = Profile {
        id: FIXED_PROFILE_ID.to_string(),
        name: "overlap".to_string(),
        readonly: false,
        rules: vec![
            Rule::new(70.0, CompareOp::Ge, 90.0, CompareOp::Lt, "first", RuleType::Warning, -1.0),
            Rule::new(80.0, CompareOp::Ge, 100.0, CompareOp::Le, "second", RuleType::Success, 2.0),
        ],
    };
    let matcher = RuleMatcher::new();

    for pct in [80.0, 85.0, 89.9] {
        assert_eq!(matcher.evaluate(pct, Some(&profile)).label(), "first");
    }
    assert_eq!(matcher.evaluate(95.0, Some(&profile)).label(), "second");
}

#[test]
fn test_coverage_gap_is_not_zero_factor() {
    let profiles = default_profiles();
    let matcher = RuleMatcher::new();

    // 标准方案在 65 处有缺口（上一档 < 65，下一档 > 65）
    let gap = matcher.evaluate(65.0, Profile::find(&profiles, FIXED_PROFILE_ID));
    assert_eq!(gap, RuleVerdict::NoRule);
    assert_eq!(gap.label(), NO_RULE_LABEL);

    // 自定义方案 65 命中 factor = 0 的档位
    let zero = matcher.evaluate(65.0, Profile::find(&profiles, CUSTOM_PROFILE_ID));
    assert!(matches!(zero, RuleVerdict::Matched(_)));
    assert_eq!(zero.factor(), 0.0);
    assert_ne!(gap, zero);
}

// ==========================================
// 规范化
// ==========================================

#[test]
fn test_date_normalization_examples() {
    let normalizer = Normalizer::new();
    assert_eq!(
        normalizer.normalize_date(&RawCell::Number(45000.0)).as_deref(),
        Some("2023/03/15")
    );
    assert_eq!(
        normalizer.normalize_date(&RawCell::from("3/5/1403")).as_deref(),
        Some("1403/03/05")
    );
}

// ==========================================
// 汇总性质
// ==========================================

fn month_of_records() -> Vec<ccs_compliance::DailyRecord> {
    vec![
        day_with_counts("1403/11/01", 1200.0, 9, 1),
        day_with_counts("1403/11/06", 800.5, 7, 3),
        day_with_counts("1403/11/09", 950.0, 12, 0),
        day_with_counts("1403/11/20", 1100.0, 5, 5),
        day_with_counts("1403/11/22", 640.0, 11, 1),
        day_with_counts("1403/11/30", 1010.0, 10, 2),
        day_with_counts("1403/12/02", 700.0, 3, 9),
        day_with_counts("1403/12/28", 1500.0, 12, 0),
    ]
}

#[test]
fn test_month_total_equals_sum_of_windows() {
    let records = month_of_records();
    let config = AppConfig::default();
    let profiles = default_profiles();
    let aggregator = RangeAggregator::new();

    for mode in [SamplingMode::TwoHour, SamplingMode::Shift, SamplingMode::Daily] {
        let report = aggregator.month_report(&records, 1403, 11, &config, &profiles, mode);
        let mut window_sum = ImpactTotals::default();
        for week in report.weeks.iter().filter(|w| w.stats.has_data()) {
            window_sum += week.stats.impact_totals();
        }
        assert_eq!(report.totals, window_sum);
        assert_eq!(
            aggregator.month_impacts(&records, 1403, 11, &config, &profiles, mode),
            window_sum
        );
    }
}

#[test]
fn test_period_summary_equals_sum_of_months() {
    let records = month_of_records();
    let config = AppConfig::default();
    let profiles = default_profiles();
    let aggregator = RangeAggregator::new();

    let report = aggregator.build_period_report(
        &records,
        ReportRange::new(1403, 11, 1403, 12),
        &config,
        &profiles,
        SamplingMode::TwoHour,
    );
    assert_eq!(report.months.len(), 2);

    let mut month_sum = ImpactTotals::default();
    for month in &report.months {
        month_sum += month.totals;
    }
    assert_eq!(report.summary, month_sum);

    let total =
        aggregator.calculate_total_impact(&records, &config, &profiles, SamplingMode::TwoHour);
    assert_eq!(total, report.summary);
}

#[test]
fn test_period_report_wraps_year_end() {
    let report = RangeAggregator::new().build_period_report(
        &month_of_records(),
        ReportRange::new(1403, 11, 1404, 2),
        &AppConfig::default(),
        &default_profiles(),
        SamplingMode::Daily,
    );
    let months: Vec<(i32, u32)> = report.months.iter().map(|m| (m.year, m.month)).collect();
    assert_eq!(months, vec![(1403, 11), (1403, 12), (1404, 1), (1404, 2)]);
    assert!(report.months[2].weeks.iter().all(|w| !w.stats.has_data()));
}

#[test]
fn test_window_stats_are_deterministic() {
    let records = month_of_records();
    let engine = PeriodStatsEngine::new();
    let config = AppConfig {
        custom_min_range: 280.0,
        custom_max_range: 300.0,
        ..AppConfig::default()
    };

    let first = engine.calculate(&records, &config, &default_profiles(), SamplingMode::Shift);
    let second = engine.calculate(&records, &config, &default_profiles(), SamplingMode::Shift);
    assert_eq!(first, second);
    assert_eq!(first.fixed.pct.to_bits(), second.fixed.pct.to_bits());
}

#[test]
fn test_empty_input_totals_are_zero() {
    let totals = RangeAggregator::new().calculate_total_impact(
        &[],
        &AppConfig::default(),
        &default_profiles(),
        SamplingMode::TwoHour,
    );
    assert_eq!(
        totals,
        ImpactTotals {
            fixed: 0.0,
            custom: 0.0,
            tonnage: 0.0
        }
    );
}
