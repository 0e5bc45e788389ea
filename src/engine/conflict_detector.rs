// ==========================================
// 周中聚会节目派工系统 - 冲突复核引擎
// ==========================================
// 职责: 在分配期冲突基础上做周级复核,产出最终冲突列表
// 红线: 只读派工结果,不修改任何派工
// ==========================================
// 复核项:
// - 未派工节目必须有 NoEligibleCandidate 冲突
// - 需要搭档却无搭档的派工必须有冲突（MissingHelper）
// - 主讲人与搭档为同一人（SelfPairing）
// - 未允许重复时,同一成员出现在多个节目（DuplicateMember）
// - 参与者不在名录或不具备节目资格（IneligibleMember）
// - 搭档组合违反性别/家庭/未成年人规则（UnsafePairing）
// 排序: 节目序号 → 严重度 → 冲突类型
// ==========================================

use crate::config::GenerationOptions;
use crate::domain::assignment::{Assignment, Conflict};
use crate::domain::member::{Member, MemberId};
use crate::domain::program::ProgramPart;
use crate::domain::types::ConflictKind;
use crate::engine::eligibility_core::EligibilityCore;
use crate::engine::pairing::PairingEngine;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub struct ConflictDetector {
    // 无状态引擎,不需要注入依赖
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成最终冲突列表
    ///
    /// # 参数
    /// - parts: 本周节目
    /// - assignments: 分配结果
    /// - conflicts: 分配期已产生的冲突
    /// - members: 成员快照（资格与搭档复核）
    /// - options: 生成选项（allow_repeat_in_week / 未成年人规则）
    pub fn detect(
        &self,
        parts: &[ProgramPart],
        assignments: &[Assignment],
        conflicts: &[Conflict],
        members: &[Member],
        options: &GenerationOptions,
    ) -> Vec<Conflict> {
        let mut finalized: Vec<Conflict> = conflicts.to_vec();

        let assigned: BTreeMap<u32, &Assignment> =
            assignments.iter().map(|a| (a.part_number, a)).collect();
        let has_conflict = |part_number: u32, kinds: &[ConflictKind]| {
            conflicts
                .iter()
                .any(|c| c.part_number == part_number && kinds.contains(&c.kind))
        };

        for part in parts {
            match assigned.get(&part.sequence) {
                // 复核 1: 未派工节目
                None => {
                    if !has_conflict(part.sequence, &[ConflictKind::NoEligibleCandidate]) {
                        finalized.push(self.raise(
                            part.sequence,
                            ConflictKind::NoEligibleCandidate,
                            format!("Part {} ({}) was left unassigned", part.sequence, part.title),
                        ));
                    }
                }
                // 复核 2: 缺搭档
                Some(assignment) => {
                    if part.requires_helper
                        && assignment.helper_id.is_none()
                        && !has_conflict(
                            part.sequence,
                            &[ConflictKind::HelperUnavailable, ConflictKind::MissingHelper],
                        )
                    {
                        finalized.push(self.raise(
                            part.sequence,
                            ConflictKind::MissingHelper,
                            format!(
                                "Part {} ({}) requires a helper but member {} has none",
                                part.sequence, part.title, assignment.member_id
                            ),
                        ));
                    }
                }
            }
        }

        // 复核 3: 自我搭档
        for assignment in assignments {
            if assignment.helper_id == Some(assignment.member_id) {
                finalized.push(self.raise(
                    assignment.part_number,
                    ConflictKind::SelfPairing,
                    format!(
                        "Member {} is both primary and helper on part {}",
                        assignment.member_id, assignment.part_number
                    ),
                ));
            }
        }

        // 复核 4: 一周多次出现
        if !options.allow_repeat_in_week {
            finalized.extend(self.detect_duplicates(assignments));
        }

        // 复核 5: 资格与搭档组合
        finalized.extend(self.detect_rule_violations(parts, assignments, members, options));

        Self::finalize(finalized)
    }

    /// 逐条派工重新核对参与者资格与搭档组合
    fn detect_rule_violations(
        &self,
        parts: &[ProgramPart],
        assignments: &[Assignment],
        members: &[Member],
        options: &GenerationOptions,
    ) -> Vec<Conflict> {
        let directory: BTreeMap<MemberId, &Member> = members.iter().map(|m| (m.id, m)).collect();
        let by_sequence: BTreeMap<u32, &ProgramPart> = parts.iter().map(|p| (p.sequence, p)).collect();
        let mut found = Vec::new();

        for assignment in assignments {
            let Some(part) = by_sequence.get(&assignment.part_number) else {
                continue;
            };
            let Ok(part_type) = part.part_type() else {
                continue;
            };

            let mut resolved = Vec::with_capacity(2);
            for member_id in assignment.participants() {
                match directory.get(&member_id) {
                    None => found.push(self.raise(
                        part.sequence,
                        ConflictKind::IneligibleMember,
                        format!("Member {} on part {} is not in the directory", member_id, part.sequence),
                    )),
                    Some(member) => {
                        let (eligible, reasons) = EligibilityCore::evaluate(member, part, part_type);
                        if !eligible {
                            found.push(self.raise(
                                part.sequence,
                                ConflictKind::IneligibleMember,
                                format!(
                                    "Member {} cannot take part {} ({}): {}",
                                    member_id,
                                    part.sequence,
                                    part.title,
                                    reasons.join("; ")
                                ),
                            ));
                        }
                        resolved.push(*member);
                    }
                }
            }

            if let [primary, helper] = resolved[..] {
                if primary.id != helper.id && !PairingEngine::pair_allowed(primary, helper, options) {
                    found.push(self.raise(
                        part.sequence,
                        ConflictKind::UnsafePairing,
                        format!(
                            "Members {} and {} on part {} may not be paired",
                            primary.id, helper.id, part.sequence
                        ),
                    ));
                }
            }
        }

        found
    }

    /// 同一成员第二次及之后出现的节目各记一条 DuplicateMember
    fn detect_duplicates(&self, assignments: &[Assignment]) -> Vec<Conflict> {
        let mut ordered: Vec<&Assignment> = assignments.iter().collect();
        ordered.sort_by_key(|a| a.part_number);

        let mut first_seen: BTreeMap<MemberId, u32> = BTreeMap::new();
        let mut found = Vec::new();

        for assignment in ordered {
            // 同一节目内重复由 SelfPairing 负责
            let participants: BTreeSet<MemberId> = assignment.participants().collect();
            for member_id in participants {
                match first_seen.get(&member_id) {
                    Some(first_part) => found.push(self.raise(
                        assignment.part_number,
                        ConflictKind::DuplicateMember,
                        format!(
                            "Member {} is assigned to part {} and again to part {}",
                            member_id, first_part, assignment.part_number
                        ),
                    )),
                    None => {
                        first_seen.insert(member_id, assignment.part_number);
                    }
                }
            }
        }

        found
    }

    fn raise(&self, part_number: u32, kind: ConflictKind, description: String) -> Conflict {
        warn!(part = part_number, kind = %kind, "{}", description);
        Conflict::new(part_number, kind, description)
    }

    /// 去重 + 排序（节目序号 → 严重度 → 类型）,同键保持原有顺序
    fn finalize(mut conflicts: Vec<Conflict>) -> Vec<Conflict> {
        conflicts.sort_by(|a, b| {
            a.part_number
                .cmp(&b.part_number)
                .then_with(|| a.severity().cmp(&b.severity()))
                .then_with(|| a.kind.cmp(&b.kind))
        });
        conflicts.dedup();
        conflicts
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}
