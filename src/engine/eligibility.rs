// ==========================================
// 周中聚会节目派工系统 - 资格过滤引擎
// ==========================================
// 红线: 不合格成员不得进入节目候选池
// ==========================================
// 职责: 在职过滤 + 性别限制 + 资格判定 + 候选排序
// 输入: 成员快照 + 单个节目
// 输出: 排序后的候选人列表（可为空,由调用方记录冲突）
// ==========================================

use crate::domain::member::Member;
use crate::domain::program::ProgramPart;
use crate::domain::types::PartType;
use crate::engine::eligibility_core::EligibilityCore;
use crate::engine::priority::{CandidateRanker, RankingContext};
use tracing::trace;

// ==========================================
// EligibilityFilter - 资格过滤引擎
// ==========================================
// 红线: 只读成员快照,不修改任何状态
pub struct EligibilityFilter {
    ranker: CandidateRanker,
}

impl EligibilityFilter {
    pub fn new() -> Self {
        Self {
            ranker: CandidateRanker::new(),
        }
    }

    /// 评估单个成员
    ///
    /// # 返回
    /// - (bool, Vec<String>): 是否合格 + 判定原因
    pub fn evaluate_single(
        &self,
        member: &Member,
        part: &ProgramPart,
        part_type: PartType,
    ) -> (bool, Vec<String>) {
        EligibilityCore::evaluate(member, part, part_type)
    }

    /// 求节目的合格候选人（已排序）
    ///
    /// # 参数
    /// - members: 成员快照
    /// - part: 节目
    /// - ctx: 排序上下文（节目类型、周起始日、窗口、新人优先）
    ///
    /// # 返回
    /// - 按优先级从高到低排列的候选人; 为空时不报错
    pub fn eligible<'a>(
        &self,
        members: &'a [Member],
        part: &ProgramPart,
        ctx: &RankingContext,
    ) -> Vec<&'a Member> {
        let candidates: Vec<&'a Member> = members
            .iter()
            .filter(|member| {
                let (ok, reasons) = self.evaluate_single(member, part, ctx.part_type);
                if !ok {
                    trace!(member_id = %member.id, part = part.sequence, ?reasons, "成员不合格");
                }
                ok
            })
            .collect();

        self.ranker.sort(candidates, ctx)
    }
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationOptions;
    use crate::domain::member::MemberId;
    use crate::domain::types::{Gender, GenderRestriction, Role};
    use chrono::NaiveDate;

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

    fn ctx(part_type: PartType) -> RankingContext {
        RankingContext::new(
            part_type,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            &GenerationOptions::default(),
        )
    }

    fn part(tag: &str, restriction: GenderRestriction) -> ProgramPart {
        ProgramPart {
            sequence: 1,
            title: tag.to_string(),
            type_tag: tag.to_string(),
            duration_minutes: 5,
            requires_helper: false,
            gender_restriction: restriction,
            scene: None,
        }
    }

    #[test]
    fn test_chairman_only_appointed_men() {
        let members = vec![
            member(1, Gender::Male, Role::Elder),
            member(2, Gender::Female, Role::RegularPioneer),
            member(3, Gender::Male, Role::MinisterialServant),
            member(4, Gender::Male, Role::NewStudent),
        ];
        let filter = EligibilityFilter::new();
        let result = filter.eligible(
            &members,
            &part("chairman", GenderRestriction::MaleOnly),
            &ctx(PartType::Chairman),
        );
        let ids: Vec<u64> = result.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_empty_pool_is_not_error() {
        let members = vec![member(2, Gender::Female, Role::RegularPioneer)];
        let filter = EligibilityFilter::new();
        let result = filter.eligible(
            &members,
            &part("bible_reading", GenderRestriction::MaleOnly),
            &ctx(PartType::BibleReading),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_inactive_excluded() {
        let mut inactive = member(1, Gender::Female, Role::BaptizedPublisher);
        inactive.active = false;
        let members = vec![inactive, member(2, Gender::Female, Role::NewStudent)];

        let filter = EligibilityFilter::new();
        let result = filter.eligible(
            &members,
            &part("starting_conversation", GenderRestriction::None),
            &ctx(PartType::StartingConversation),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, MemberId(2));
    }
}
