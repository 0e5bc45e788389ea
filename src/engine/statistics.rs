// ==========================================
// 周中聚会节目派工系统 - 统计汇总引擎
// ==========================================
// 职责: 对派工结果计算分布指标
// 红线: 纯函数,只读,可与冲突复核并行
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::member::{Member, MemberId};
use crate::domain::report::Statistics;
use crate::domain::types::Gender;
use std::collections::HashMap;

pub struct StatisticsAggregator {
    // 无状态引擎,不需要注入依赖
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 汇总统计
    ///
    /// - by_gender: 主讲人与助手都计入
    /// - by_role: 只按主讲人计
    /// - pairs_formed / family_pairs: 双方都能在名录中找到的搭档组合
    /// - 名录中找不到的成员不计入性别/职分分布
    pub fn aggregate(&self, assignments: &[Assignment], members: &[Member]) -> Statistics {
        let directory: HashMap<MemberId, &Member> = members.iter().map(|m| (m.id, m)).collect();
        let mut stats = Statistics {
            total_assignments: assignments.len(),
            ..Statistics::default()
        };

        for assignment in assignments {
            for id in assignment.participants() {
                match directory.get(&id).map(|m| m.gender) {
                    Some(Gender::Male) => stats.by_gender.male += 1,
                    Some(Gender::Female) => stats.by_gender.female += 1,
                    None => {}
                }
            }

            if let Some(primary) = directory.get(&assignment.member_id) {
                *stats.by_role.entry(primary.role).or_insert(0) += 1;
            }

            let Some(helper_id) = assignment.helper_id else {
                continue;
            };
            stats.with_helper += 1;

            if let (Some(primary), Some(helper)) = (
                directory.get(&assignment.member_id),
                directory.get(&helper_id),
            ) {
                stats.pairs_formed += 1;
                if primary.related_to(helper) {
                    stats.family_pairs += 1;
                }
            }
        }

        stats
    }
}

impl Default for StatisticsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
