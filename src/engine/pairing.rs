// ==========================================
// 周中聚会节目派工系统 - 搭档配对引擎
// ==========================================
// 职责: 为需要搭档的节目挑选助手
// 红线: 无亲属关系的异性不得搭档
// ==========================================
// 规则（优先级从高到低）:
// 1. 同家庭分组者优先,不限性别组合
// 2. 无家庭匹配时,只允许同性搭档
// 3. 仍无人选 → 不配搭档,记录 HelperUnavailable 冲突
// 4. 同级候选: 与主讲人最久未搭档者优先,再按 id 升序
// 附加: minors_same_gender_only 开启时,含未成年人的异性组合一律拒绝
// ==========================================

use crate::config::GenerationOptions;
use crate::domain::assignment::Conflict;
use crate::domain::member::{Member, MemberId};
use crate::domain::program::ProgramPart;
use crate::domain::types::ConflictKind;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// 配对结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingOutcome {
    pub helper_id: Option<MemberId>,
    pub conflict: Option<Conflict>,
}

impl PairingOutcome {
    fn paired(helper: &Member) -> Self {
        Self {
            helper_id: Some(helper.id),
            conflict: None,
        }
    }

    fn unavailable(conflict: Conflict) -> Self {
        Self {
            helper_id: None,
            conflict: Some(conflict),
        }
    }
}

// ==========================================
// PairingEngine - 搭档配对引擎
// ==========================================
pub struct PairingEngine {
    // 无状态引擎,不需要注入依赖
}

impl PairingEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 为主讲人挑选助手
    ///
    /// # 参数
    /// - primary: 主讲人
    /// - part: 节目（须 requires_helper=true）
    /// - candidates: 可用助手池（已排除主讲人与本周已占用成员）
    /// - options: 生成选项（未成年人规则）
    pub fn pair_helper(
        &self,
        primary: &Member,
        part: &ProgramPart,
        candidates: &[&Member],
        options: &GenerationOptions,
    ) -> PairingOutcome {
        let pool: Vec<&Member> = candidates
            .iter()
            .copied()
            .filter(|c| c.id != primary.id)
            .collect();

        let mut minor_rejected = 0usize;
        let allowed: Vec<&Member> = pool
            .iter()
            .copied()
            .filter(|c| {
                let ok = Self::minor_rule_allows(primary, c, options);
                if !ok {
                    minor_rejected += 1;
                }
                ok
            })
            .collect();

        // 规则 1: 家庭优先
        let family: Vec<&Member> = allowed
            .iter()
            .copied()
            .filter(|c| primary.related_to(c))
            .collect();
        if let Some(helper) = self.pick(primary, &family) {
            debug!(part = part.sequence, primary = %primary.id, helper = %helper.id, "家庭搭档");
            return PairingOutcome::paired(helper);
        }

        // 规则 2: 同性搭档
        let same_gender: Vec<&Member> = allowed
            .iter()
            .copied()
            .filter(|c| c.gender == primary.gender)
            .collect();
        if let Some(helper) = self.pick(primary, &same_gender) {
            debug!(part = part.sequence, primary = %primary.id, helper = %helper.id, "同性搭档");
            return PairingOutcome::paired(helper);
        }

        // 规则 3: 不强行配对
        let description = if pool.is_empty() {
            format!(
                "No eligible helper available for part {} ({}); assigned to member {} without a helper",
                part.sequence, part.title, primary.id
            )
        } else if minor_rejected > 0 && allowed.is_empty() {
            format!(
                "Mixed-gender pairing involving a minor avoided for part {} ({}); assigned to member {} without a helper",
                part.sequence, part.title, primary.id
            )
        } else {
            format!(
                "Forced non-family mixed-gender pairing avoided for part {} ({}); assigned to member {} without a helper",
                part.sequence, part.title, primary.id
            )
        };
        warn!(part = part.sequence, primary = %primary.id, pool = pool.len(), "{}", description);

        PairingOutcome::unavailable(Conflict::new(
            part.sequence,
            ConflictKind::HelperUnavailable,
            description,
        ))
    }

    /// 组合是否合规: 同性或同一家庭,且满足未成年人规则
    pub fn pair_allowed(a: &Member, b: &Member, options: &GenerationOptions) -> bool {
        (a.gender == b.gender || a.related_to(b)) && Self::minor_rule_allows(a, b, options)
    }

    /// 未成年人规则: 开启时含未成年人的异性组合不允许（即使同一家庭）
    pub fn minor_rule_allows(a: &Member, b: &Member, options: &GenerationOptions) -> bool {
        if !options.minors_same_gender_only || a.gender == b.gender {
            return true;
        }
        let threshold = options.minor_age_threshold;
        !(a.is_minor(threshold) || b.is_minor(threshold))
    }

    fn pick<'a>(&self, primary: &Member, candidates: &[&'a Member]) -> Option<&'a Member> {
        candidates
            .iter()
            .copied()
            .min_by(|a, b| self.compare(primary, a, b))
    }

    /// 同级候选比较: 与主讲人最久未搭档者优先（从未搭档视为最早）,再按 id 升序
    fn compare(&self, primary: &Member, a: &Member, b: &Member) -> Ordering {
        let last_a = Self::last_paired(primary, a);
        let last_b = Self::last_paired(primary, b);
        last_a.cmp(&last_b).then_with(|| a.id.cmp(&b.id))
    }

    fn last_paired(primary: &Member, other: &Member) -> Option<chrono::NaiveDate> {
        primary
            .last_paired_with(other.id)
            .max(other.last_paired_with(primary.id))
    }
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::new()
    }
}
