// ==========================================
// 周中聚会节目派工系统 - 确认闸门
// ==========================================
// 职责: 生成结果在确认前一律视为预览
// 红线: 存在任何冲突时,除非显式确认,否则拒绝保存
// ==========================================

use crate::domain::report::GenerationResult;
use crate::engine::error::{SchedulerError, SchedulerResult};
use tracing::{info, warn};

pub struct ConfirmationGate;

impl ConfirmationGate {
    /// 检查结果能否确认保存
    ///
    /// # 参数
    /// - result: 生成结果
    /// - confirm_despite_conflicts: 调用方显式确认忽略冲突
    pub fn check(result: &GenerationResult, confirm_despite_conflicts: bool) -> SchedulerResult<()> {
        let count = result.conflicts.len();
        if count == 0 {
            return Ok(());
        }

        if confirm_despite_conflicts {
            warn!(week = %result.week_start_date, conflicts = count, "带冲突确认保存");
            return Ok(());
        }

        info!(week = %result.week_start_date, conflicts = count, "存在未解决冲突,拒绝确认");
        Err(SchedulerError::UnresolvedConflicts { count })
    }
}
