// ==========================================
// 周中聚会节目派工系统 - Eligibility Core 纯函数库
// ==========================================
// 职责: 在职判定、性别限制判定、资格判定、回看窗口计算
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::member::Member;
use crate::domain::program::ProgramPart;
use crate::domain::qualification::QualificationRule;
use crate::domain::types::{Gender, PartType};
use chrono::{Duration, NaiveDate};

// ==========================================
// EligibilityCore - 纯函数工具类
// ==========================================
pub struct EligibilityCore;

impl EligibilityCore {
    /// 判定成员能否承担某节目
    ///
    /// # 规则（依次判定,全部通过才合格）
    /// 1. 成员必须在职
    /// 2. 节目限男性时,成员须为男性
    /// 3. 成员须具备该节目类型资格（规则表 / 显式标记）
    ///
    /// # 返回
    /// - (bool, Vec<String>): 是否合格 + 判定原因
    pub fn evaluate(member: &Member, part: &ProgramPart, part_type: PartType) -> (bool, Vec<String>) {
        let mut reasons = Vec::new();

        // 规则 1: 在职
        if !member.active {
            reasons.push("INACTIVE: active=false".to_string());
            return (false, reasons);
        }

        // 规则 2: 性别限制
        if part.is_male_only() && member.gender != Gender::Male {
            reasons.push(format!("GENDER_RESTRICTED: part={} male_only", part.sequence));
            return (false, reasons);
        }

        // 规则 3: 资格
        if !member.is_qualified_for(part_type) {
            let rule = QualificationRule::for_part(part_type);
            reasons.push(format!(
                "NOT_QUALIFIED: part_type={} role={} gender={} baptized={} rule_male_only={}",
                part_type,
                member.role,
                member.gender,
                member.is_baptized(),
                rule.male_only()
            ));
            return (false, reasons);
        }

        reasons.push(format!("ELIGIBLE: part_type={}", part_type));
        (true, reasons)
    }

    /// 频次统计窗口起点
    ///
    /// # 规则
    /// - window_start = week_start - history_window_weeks * 7 天
    /// - 超出日期范围时取 NaiveDate::MIN（窗口覆盖全部历史）
    pub fn history_window_start(week_start: NaiveDate, history_window_weeks: u32) -> NaiveDate {
        week_start
            .checked_sub_signed(Duration::weeks(i64::from(history_window_weeks)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// 节目是否事实上只允许男性（显式限制或规则表）
    pub fn is_effectively_male_only(part: &ProgramPart, part_type: PartType) -> bool {
        part.is_male_only() || QualificationRule::for_part(part_type).male_only()
    }
}
