// ==========================================
// 周中聚会节目派工系统 - 建议生成引擎
// ==========================================
// 职责: 由冲突与统计推导可读建议
// 红线: 输出顺序由规则优先级决定,与冲突插入顺序无关
// ==========================================
// 规则（按优先级）:
// R1 男性节目无合格人选      → 招募/培训合格弟兄
// R2 其他节目无合格人选      → 扩大资格
// R3 搭档冲突占多数          → 登记家庭关系
// R4 性别分布失衡            → 复核资格分配
// R5 重复派工 / 自我搭档      → 复核本周派工
// R6 同类冲突影响多个节目且未被上述规则覆盖 → 通用提示
// ==========================================

use crate::config::GenerationOptions;
use crate::domain::assignment::Conflict;
use crate::domain::program::ProgramPart;
use crate::domain::report::Statistics;
use crate::domain::types::{ConflictKind, PartType};
use crate::engine::eligibility_core::EligibilityCore;
use std::collections::{BTreeMap, BTreeSet};

pub struct RecommendationEngine {
    // 无状态引擎,不需要注入依赖
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {}
    }

    pub fn recommend(
        &self,
        statistics: &Statistics,
        conflicts: &[Conflict],
        parts: &[ProgramPart],
        options: &GenerationOptions,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();
        let mut covered: BTreeSet<ConflictKind> = BTreeSet::new();

        let part_types: BTreeMap<u32, (&ProgramPart, Option<PartType>)> = parts
            .iter()
            .map(|p| (p.sequence, (p, p.part_type().ok())))
            .collect();

        // R1 / R2: 无合格人选,按是否男性节目拆分
        let mut male_types: BTreeSet<PartType> = BTreeSet::new();
        let mut open_types: BTreeSet<PartType> = BTreeSet::new();
        for conflict in conflicts.iter().filter(|c| c.kind == ConflictKind::NoEligibleCandidate) {
            let Some((part, Some(part_type))) = part_types.get(&conflict.part_number) else {
                continue;
            };
            if EligibilityCore::is_effectively_male_only(part, *part_type) {
                male_types.insert(*part_type);
            } else {
                open_types.insert(*part_type);
            }
        }
        if !male_types.is_empty() {
            recommendations.push(format!(
                "Recruit or train more qualified male members for: {}",
                join_types(&male_types)
            ));
            covered.insert(ConflictKind::NoEligibleCandidate);
        }
        if !open_types.is_empty() {
            recommendations.push(format!(
                "Qualify more members to take part in: {}",
                join_types(&open_types)
            ));
            covered.insert(ConflictKind::NoEligibleCandidate);
        }

        // R3: 搭档冲突占多数
        let helper_conflicts = conflicts
            .iter()
            .filter(|c| {
                matches!(
                    c.kind,
                    ConflictKind::HelperUnavailable | ConflictKind::MissingHelper
                )
            })
            .count();
        if helper_conflicts > 0 && helper_conflicts * 2 > conflicts.len() {
            recommendations.push(format!(
                "Register family relationships for more members so that {} helper pairing(s) can be filled safely",
                helper_conflicts
            ));
            covered.insert(ConflictKind::HelperUnavailable);
            covered.insert(ConflictKind::MissingHelper);
        }

        // R4: 性别失衡
        let total = statistics.by_gender.total();
        if total > 0 {
            let dominant = statistics.by_gender.male.max(statistics.by_gender.female);
            let ratio = dominant as f64 / total as f64;
            if ratio > options.gender_skew_threshold {
                let label = if statistics.by_gender.male >= statistics.by_gender.female {
                    "male"
                } else {
                    "female"
                };
                recommendations.push(format!(
                    "Gender distribution is heavily skewed ({:.0}% {}); review qualification assignments",
                    ratio * 100.0,
                    label
                ));
            }
        }

        // R5: 周级复核问题
        let integrity: BTreeSet<u32> = conflicts
            .iter()
            .filter(|c| matches!(c.kind, ConflictKind::DuplicateMember | ConflictKind::SelfPairing))
            .map(|c| c.part_number)
            .collect();
        if !integrity.is_empty() {
            recommendations.push(format!(
                "Review parts {} for members assigned more than once this week",
                integrity
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            covered.insert(ConflictKind::DuplicateMember);
            covered.insert(ConflictKind::SelfPairing);
        }

        // R6: 同类冲突影响多个节目
        let mut parts_by_kind: BTreeMap<ConflictKind, BTreeSet<u32>> = BTreeMap::new();
        for conflict in conflicts {
            parts_by_kind
                .entry(conflict.kind)
                .or_default()
                .insert(conflict.part_number);
        }
        for (kind, affected) in parts_by_kind {
            if affected.len() > 1 && !covered.contains(&kind) {
                recommendations.push(format!(
                    "{} parts have unresolved {} conflicts; resolve them before confirming",
                    affected.len(),
                    kind
                ));
            }
        }

        recommendations
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn join_types(types: &BTreeSet<PartType>) -> String {
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
