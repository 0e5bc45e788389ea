// ==========================================
// 周中聚会节目派工系统 - 派工分配引擎
// ==========================================
// 职责: 按节目顺序为整周节目分配主讲人与助手
// 输入: 成员快照 + 节目列表 + 生成选项 + 已占用成员集合
// 输出: AllocationOutcome (派工 + 分配期冲突 + 更新后的占用集合)
// 红线: 节目必须按序号串行处理,先到先占,不得并行
// 红线: 单个节目无人可派只记冲突,不中止
// ==========================================

use crate::config::GenerationOptions;
use crate::domain::assignment::{Assignment, Conflict};
use crate::domain::member::{Member, MemberId};
use crate::domain::program::ProgramPart;
use crate::domain::types::{ConflictKind, PartType};
use crate::engine::eligibility::EligibilityFilter;
use crate::engine::error::{SchedulerError, SchedulerResult};
use crate::engine::pairing::{PairingEngine, PairingOutcome};
use crate::engine::priority::RankingContext;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

// ==========================================
// AllocationOutcome - 分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub assignments: Vec<Assignment>,
    pub conflicts: Vec<Conflict>,
    /// 本周已占用成员（含调用方传入的初始集合）
    pub used_members: BTreeSet<MemberId>,
}

// ==========================================
// AssignmentAllocator - 派工分配引擎
// ==========================================
pub struct AssignmentAllocator {
    filter: EligibilityFilter,
    pairing: PairingEngine,
}

impl AssignmentAllocator {
    pub fn new() -> Self {
        Self {
            filter: EligibilityFilter::new(),
            pairing: PairingEngine::new(),
        }
    }

    /// 校验节目与成员输入
    ///
    /// # 返回
    /// - 按序号升序排列的 (节目, 节目类型)
    ///
    /// # 错误
    /// - InvalidProgramData: 节目为空 / 类型标签未知 / 序号重复
    /// - NoActiveMembers: 成员快照中没有在职成员
    pub fn validate_input<'p>(
        &self,
        members: &[Member],
        parts: &'p [ProgramPart],
    ) -> SchedulerResult<Vec<(&'p ProgramPart, PartType)>> {
        if parts.is_empty() {
            return Err(SchedulerError::InvalidProgramData(
                "节目列表为空".to_string(),
            ));
        }

        let mut typed = Vec::with_capacity(parts.len());
        for part in parts {
            let part_type = part.part_type().map_err(|e| {
                SchedulerError::InvalidProgramData(format!("节目 {}: {}", part.sequence, e))
            })?;
            typed.push((part, part_type));
        }

        // 稳定排序: 程序顺序即占用顺序
        typed.sort_by_key(|(part, _)| part.sequence);

        let mut seen = BTreeSet::new();
        for (part, _) in &typed {
            if !seen.insert(part.sequence) {
                return Err(SchedulerError::InvalidProgramData(format!(
                    "节目序号重复: {}",
                    part.sequence
                )));
            }
        }

        if !members.iter().any(|m| m.active) {
            return Err(SchedulerError::NoActiveMembers);
        }

        Ok(typed)
    }

    /// 分配整周节目
    ///
    /// # 参数
    /// - members: 成员快照（只读）
    /// - parts: 节目列表（任意顺序,内部按序号排序）
    /// - week_start: 周起始日
    /// - options: 生成选项
    /// - used_members: 调用方已占用的成员
    #[instrument(skip(self, members, parts, options, used_members), fields(week = %week_start, parts = parts.len()))]
    pub fn allocate(
        &self,
        members: &[Member],
        parts: &[ProgramPart],
        week_start: NaiveDate,
        options: &GenerationOptions,
        used_members: BTreeSet<MemberId>,
    ) -> SchedulerResult<AllocationOutcome> {
        let typed_parts = self.validate_input(members, parts)?;

        let mut used = used_members;
        used.extend(options.excluded_member_ids.iter().copied());

        let mut assignments = Vec::with_capacity(typed_parts.len());
        let mut conflicts = Vec::new();

        for (part, part_type) in typed_parts {
            let ctx = RankingContext::new(part_type, week_start, options);

            // 步骤 1: 合格候选人（排除本周预留成员）
            let candidates: Vec<&Member> = self
                .filter
                .eligible(members, part, &ctx)
                .into_iter()
                .filter(|m| !options.excluded_member_ids.contains(&m.id))
                .collect();

            // 步骤 2: 无人合格
            if candidates.is_empty() {
                let conflict = Conflict::new(
                    part.sequence,
                    ConflictKind::NoEligibleCandidate,
                    format!(
                        "No eligible candidate for part {} ({}, {})",
                        part.sequence, part.title, part_type
                    ),
                );
                warn!(part = part.sequence, part_type = %part_type, "{}", conflict.description);
                conflicts.push(conflict);
                continue;
            }

            // 步骤 3: 选主讲人
            let Some(primary) = self.pick_primary(&candidates, &used, options) else {
                let conflict = Conflict::new(
                    part.sequence,
                    ConflictKind::NoEligibleCandidate,
                    format!(
                        "All {} eligible candidates for part {} ({}) are already assigned this week",
                        candidates.len(),
                        part.sequence,
                        part.title
                    ),
                );
                warn!(part = part.sequence, part_type = %part_type, "{}", conflict.description);
                conflicts.push(conflict);
                continue;
            };
            used.insert(primary.id);

            // 步骤 4: 配搭档
            let mut helper_id = None;
            if part.requires_helper {
                let outcome = self.pair(primary, part, &candidates, &used, options);
                if let Some(id) = outcome.helper_id {
                    used.insert(id);
                }
                helper_id = outcome.helper_id;
                conflicts.extend(outcome.conflict);
            }

            debug!(
                part = part.sequence,
                part_type = %part_type,
                member = %primary.id,
                helper = ?helper_id,
                "节目已派工"
            );

            // 步骤 5: 输出派工
            assignments.push(Assignment {
                part_number: part.sequence,
                member_id: primary.id,
                helper_id,
                scene: if part_type.is_demonstration() {
                    part.scene.clone()
                } else {
                    None
                },
                duration_minutes: part.duration_minutes,
            });
        }

        info!(
            assignments = assignments.len(),
            conflicts = conflicts.len(),
            used = used.len(),
            "整周分配完成"
        );

        Ok(AllocationOutcome {
            assignments,
            conflicts,
            used_members: used,
        })
    }

    /// 选排名最前的未占用候选人; 允许重复时退回排名第一者
    fn pick_primary<'a>(
        &self,
        candidates: &[&'a Member],
        used: &BTreeSet<MemberId>,
        options: &GenerationOptions,
    ) -> Option<&'a Member> {
        candidates
            .iter()
            .copied()
            .find(|m| !used.contains(&m.id))
            .or_else(|| {
                if options.allow_repeat_in_week {
                    candidates.first().copied()
                } else {
                    None
                }
            })
    }

    /// 助手池 = 同节目合格者 - 主讲人 - 已占用成员
    ///
    /// 允许重复时,未占用池配对失败再放开已占用成员
    fn pair(
        &self,
        primary: &Member,
        part: &ProgramPart,
        candidates: &[&Member],
        used: &BTreeSet<MemberId>,
        options: &GenerationOptions,
    ) -> PairingOutcome {
        let unused: Vec<&Member> = candidates
            .iter()
            .copied()
            .filter(|m| m.id != primary.id && !used.contains(&m.id))
            .collect();

        let outcome = self.pairing.pair_helper(primary, part, &unused, options);
        if outcome.helper_id.is_some() || !options.allow_repeat_in_week {
            return outcome;
        }

        let relaxed: Vec<&Member> = candidates
            .iter()
            .copied()
            .filter(|m| m.id != primary.id)
            .collect();
        if relaxed.len() == unused.len() {
            return outcome;
        }
        self.pairing.pair_helper(primary, part, &relaxed, options)
    }
}

impl Default for AssignmentAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Gender, GenderRestriction, Role};

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn member(id: u64, gender: Gender, role: Role) -> Member {
        Member {
            id: MemberId(id),
            name: format!("M{}", id),
            gender,
            role,
            baptized: role.is_baptized_publisher_or_higher(),
            active: true,
            family_group_id: None,
            age: None,
            qualifications: None,
            history: Vec::new(),
        }
    }

    fn part(seq: u32, tag: &str, male_only: bool, requires_helper: bool) -> ProgramPart {
        ProgramPart {
            sequence: seq,
            title: format!("Part {}", seq),
            type_tag: tag.to_string(),
            duration_minutes: 4,
            requires_helper,
            gender_restriction: if male_only {
                GenderRestriction::MaleOnly
            } else {
                GenderRestriction::None
            },
            scene: Some("Casa em casa".to_string()),
        }
    }

    #[test]
    fn test_empty_parts_is_invalid() {
        let allocator = AssignmentAllocator::new();
        let members = vec![member(1, Gender::Male, Role::Elder)];
        let err = allocator
            .allocate(&members, &[], week(), &GenerationOptions::default(), BTreeSet::new())
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidProgramData(_)));
    }

    #[test]
    fn test_unknown_tag_is_invalid() {
        let allocator = AssignmentAllocator::new();
        let members = vec![member(1, Gender::Male, Role::Elder)];
        let parts = vec![part(1, "chairman", true, false), part(2, "cantico", false, false)];
        let err = allocator
            .allocate(&members, &parts, week(), &GenerationOptions::default(), BTreeSet::new())
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidProgramData(msg) if msg.contains("cantico")));
    }

    #[test]
    fn test_duplicate_sequence_is_invalid() {
        let allocator = AssignmentAllocator::new();
        let members = vec![member(1, Gender::Male, Role::Elder)];
        let parts = vec![part(1, "chairman", true, false), part(1, "bible_reading", true, false)];
        assert!(allocator
            .allocate(&members, &parts, week(), &GenerationOptions::default(), BTreeSet::new())
            .is_err());
    }

    #[test]
    fn test_no_active_members() {
        let allocator = AssignmentAllocator::new();
        let mut m = member(1, Gender::Male, Role::Elder);
        m.active = false;
        let err = allocator
            .allocate(&[m], &[part(1, "chairman", true, false)], week(), &GenerationOptions::default(), BTreeSet::new())
            .unwrap_err();
        assert!(matches!(err, SchedulerError::NoActiveMembers));
    }

    #[test]
    fn test_parts_processed_in_sequence_order() {
        let allocator = AssignmentAllocator::new();
        let members = vec![member(1, Gender::Male, Role::Elder), member(2, Gender::Male, Role::Elder)];
        // 输入乱序: 序号 1 先占用成员 1
        let parts = vec![part(2, "bible_reading", true, false), part(1, "chairman", true, false)];

        let outcome = allocator
            .allocate(&members, &parts, week(), &GenerationOptions::default(), BTreeSet::new())
            .unwrap();
        assert_eq!(outcome.assignments[0].part_number, 1);
        assert_eq!(outcome.assignments[0].member_id, MemberId(1));
        assert_eq!(outcome.assignments[1].member_id, MemberId(2));
        assert_eq!(outcome.used_members.len(), 2);
    }

    #[test]
    fn test_exhausted_pool_records_conflict_without_repeat() {
        let allocator = AssignmentAllocator::new();
        let members = vec![member(1, Gender::Male, Role::Elder)];
        let parts = vec![part(1, "chairman", true, false), part(2, "treasures_talk", true, false)];

        let outcome = allocator
            .allocate(&members, &parts, week(), &GenerationOptions::default(), BTreeSet::new())
            .unwrap();
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].part_number, 2);
        assert_eq!(outcome.conflicts[0].kind, ConflictKind::NoEligibleCandidate);

        let repeat = GenerationOptions::default().with_allow_repeat_in_week(true);
        let outcome = allocator
            .allocate(&members, &parts, week(), &repeat, BTreeSet::new())
            .unwrap();
        assert_eq!(outcome.assignments.len(), 2);
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn test_used_members_are_skipped() {
        let allocator = AssignmentAllocator::new();
        let members = vec![member(1, Gender::Male, Role::Elder), member(2, Gender::Male, Role::Elder)];
        let used: BTreeSet<MemberId> = [MemberId(1)].into_iter().collect();

        let outcome = allocator
            .allocate(&members, &[part(1, "chairman", true, false)], week(), &GenerationOptions::default(), used)
            .unwrap();
        assert_eq!(outcome.assignments[0].member_id, MemberId(2));
        assert!(outcome.used_members.contains(&MemberId(1)));
    }

    #[test]
    fn test_excluded_members_never_assigned_even_with_repeat() {
        let allocator = AssignmentAllocator::new();
        let members = vec![member(1, Gender::Male, Role::Elder)];
        let options = GenerationOptions::default()
            .with_allow_repeat_in_week(true)
            .with_excluded([MemberId(1)]);

        let outcome = allocator
            .allocate(&members, &[part(1, "chairman", true, false)], week(), &options, BTreeSet::new())
            .unwrap();
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.conflicts[0].kind, ConflictKind::NoEligibleCandidate);
    }

    #[test]
    fn test_scene_only_on_demonstrations() {
        let allocator = AssignmentAllocator::new();
        let members = vec![
            member(1, Gender::Male, Role::Elder),
            member(2, Gender::Female, Role::RegularPioneer),
            member(3, Gender::Female, Role::BaptizedPublisher),
        ];
        let parts = vec![part(1, "chairman", true, false), part(2, "starting_conversation", false, true)];

        let outcome = allocator
            .allocate(&members, &parts, week(), &GenerationOptions::default(), BTreeSet::new())
            .unwrap();
        assert_eq!(outcome.assignments[0].scene, None);
        assert_eq!(outcome.assignments[1].scene.as_deref(), Some("Casa em casa"));
        assert_eq!(outcome.assignments[1].member_id, MemberId(2));
        assert_eq!(outcome.assignments[1].helper_id, Some(MemberId(3)));
    }

    #[test]
    fn test_oversized_history_window_does_not_overflow() {
        let allocator = AssignmentAllocator::new();
        let members = vec![member(1, Gender::Male, Role::Elder), member(2, Gender::Male, Role::Elder)];
        let options = GenerationOptions {
            history_window_weeks: 20_000_000,
            ..GenerationOptions::default()
        };

        // allocate 不做选项校验,窗口起点需自行兜底
        let outcome = allocator
            .allocate(&members, &[part(1, "chairman", true, false)], week(), &options, BTreeSet::new())
            .unwrap();
        assert_eq!(outcome.assignments[0].member_id, MemberId(1));
    }
}
