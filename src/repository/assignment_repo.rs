// ==========================================
// 周中聚会节目派工系统 - 周派工数据仓储
// ==========================================
// 职责: AssignmentSink 的 SQLite 参考实现
// 红线: 整周写入在同一事务中完成,全部成功或全部回滚
// 红线: Repository 不含派工逻辑,只做校验与存取
// ==========================================

use crate::domain::assignment::{Assignment, Conflict};
use crate::domain::member::MemberId;
use crate::domain::report::{GenerationResult, Statistics};
use crate::domain::types::ConflictKind;
use crate::engine::collaborators::AssignmentSink;
use crate::engine::error::{SchedulerError, SchedulerResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

// ==========================================
// SqliteAssignmentRepository - 周派工仓储
// ==========================================
pub struct SqliteAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAssignmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存前校验
    ///
    /// # 规则
    /// - 至少有一条派工或一条冲突
    /// - 时长必须为正
    /// - 节目序号不重复
    pub fn validate(result: &GenerationResult) -> RepositoryResult<()> {
        if result.assignments.is_empty() && result.conflicts.is_empty() {
            return Err(RepositoryError::ValidationError(
                "结果既无派工也无冲突".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for assignment in &result.assignments {
            if assignment.duration_minutes == 0 {
                return Err(RepositoryError::ValidationError(format!(
                    "节目 {} 时长必须为正",
                    assignment.part_number
                )));
            }
            if !seen.insert(assignment.part_number) {
                return Err(RepositoryError::ValidationError(format!(
                    "节目序号重复: {}",
                    assignment.part_number
                )));
            }
        }

        Ok(())
    }

    /// 保存整周结果（覆盖同周旧数据）
    ///
    /// # 返回
    /// - `Ok(generation_id)`: 本次保存的批次 ID
    pub fn save(
        &self,
        result: &GenerationResult,
        confirm_despite_conflicts: bool,
    ) -> RepositoryResult<String> {
        if !result.conflicts.is_empty() && !confirm_despite_conflicts {
            return Err(RepositoryError::ConfirmationRequired {
                count: result.conflicts.len(),
            });
        }
        Self::validate(result)?;

        let generation_id = Uuid::new_v4().to_string();
        let week = result.week_start_date.format("%Y-%m-%d").to_string();
        let statistics_json = serde_json::to_string(&result.statistics)?;
        let recommendations_json = serde_json::to_string(&result.recommendations)?;

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        // 重新生成模式: 先删旧周（级联删除派工/冲突）
        tx.execute("DELETE FROM meeting_week WHERE week_start_date = ?1", params![week])?;

        tx.execute(
            r#"INSERT INTO meeting_week (
                week_start_date, generation_id, statistics_json, recommendations_json,
                confirmed_despite_conflicts, saved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                week,
                generation_id,
                statistics_json,
                recommendations_json,
                confirm_despite_conflicts && !result.conflicts.is_empty(),
                Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO week_assignment (
                    week_start_date, part_number, member_id, helper_id, scene, duration_minutes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            )?;
            for a in &result.assignments {
                stmt.execute(params![
                    week,
                    a.part_number,
                    a.member_id.0 as i64,
                    a.helper_id.map(|h| h.0 as i64),
                    a.scene,
                    a.duration_minutes,
                ])?;
            }

            let mut stmt = tx.prepare(
                r#"INSERT INTO week_conflict (
                    week_start_date, seq_no, part_number, kind, description
                ) VALUES (?1, ?2, ?3, ?4, ?5)"#,
            )?;
            for (seq_no, c) in result.conflicts.iter().enumerate() {
                stmt.execute(params![
                    week,
                    seq_no as i64,
                    c.part_number,
                    c.kind.as_str(),
                    c.description,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(
            week = %week,
            generation_id = %generation_id,
            assignments = result.assignments.len(),
            conflicts = result.conflicts.len(),
            "周派工已保存"
        );
        Ok(generation_id)
    }

    /// 读取已保存的一周结果
    pub fn find_week(&self, week_start: NaiveDate) -> RepositoryResult<Option<GenerationResult>> {
        let conn = self.get_conn()?;
        let week = week_start.format("%Y-%m-%d").to_string();

        let header = conn.query_row(
            "SELECT statistics_json, recommendations_json FROM meeting_week WHERE week_start_date = ?1",
            params![week],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        );
        let (statistics_json, recommendations_json) = match header {
            Ok(v) => v,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut stmt = conn.prepare(
            r#"SELECT part_number, member_id, helper_id, scene, duration_minutes
               FROM week_assignment
               WHERE week_start_date = ?1
               ORDER BY part_number"#,
        )?;
        let assignments = stmt
            .query_map(params![week], |row| {
                Ok(Assignment {
                    part_number: row.get(0)?,
                    member_id: MemberId(row.get::<_, i64>(1)? as u64),
                    helper_id: row.get::<_, Option<i64>>(2)?.map(|h| MemberId(h as u64)),
                    scene: row.get(3)?,
                    duration_minutes: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            r#"SELECT part_number, kind, description
               FROM week_conflict
               WHERE week_start_date = ?1
               ORDER BY seq_no"#,
        )?;
        let raw_conflicts = stmt
            .query_map(params![week], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut conflicts = Vec::with_capacity(raw_conflicts.len());
        for (part_number, kind, description) in raw_conflicts {
            let kind: ConflictKind = serde_json::from_value(serde_json::Value::String(kind))?;
            conflicts.push(Conflict::new(part_number, kind, description));
        }

        let statistics: Statistics = serde_json::from_str(&statistics_json)?;
        let recommendations: Vec<String> = serde_json::from_str(&recommendations_json)?;

        Ok(Some(GenerationResult {
            week_start_date: week_start,
            assignments,
            conflicts,
            statistics,
            recommendations,
        }))
    }
}

// ==========================================
// AssignmentSink Trait 实现
// ==========================================
#[async_trait]
impl AssignmentSink for SqliteAssignmentRepository {
    async fn save_week(
        &self,
        result: &GenerationResult,
        confirm_despite_conflicts: bool,
    ) -> SchedulerResult<()> {
        match self.save(result, confirm_despite_conflicts) {
            Ok(_) => Ok(()),
            Err(RepositoryError::ConfirmationRequired { count }) => {
                Err(SchedulerError::UnresolvedConflicts { count })
            }
            Err(e) => Err(SchedulerError::collaborator("assignment_repository", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory};

    fn repo() -> SqliteAssignmentRepository {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        SqliteAssignmentRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn result(assignments: Vec<Assignment>, conflicts: Vec<Conflict>) -> GenerationResult {
        GenerationResult {
            week_start_date: week(),
            assignments,
            conflicts,
            statistics: Statistics::default(),
            recommendations: vec!["keep going".to_string()],
        }
    }

    fn assignment(part: u32, member: u64, helper: Option<u64>) -> Assignment {
        Assignment {
            part_number: part,
            member_id: MemberId(member),
            helper_id: helper.map(MemberId),
            scene: None,
            duration_minutes: 4,
        }
    }

    #[test]
    fn test_save_and_reload() {
        let repo = repo();
        let r = result(vec![assignment(1, 1, None), assignment(2, 2, Some(3))], vec![]);

        repo.save(&r, false).unwrap();
        assert_eq!(repo.find_week(week()).unwrap(), Some(r));
    }

    #[test]
    fn test_conflicts_require_confirmation() {
        let repo = repo();
        let r = result(
            vec![assignment(1, 1, None)],
            vec![Conflict::new(2, ConflictKind::NoEligibleCandidate, "none")],
        );

        let err = repo.save(&r, false).unwrap_err();
        assert!(matches!(err, RepositoryError::ConfirmationRequired { count: 1 }));
        assert_eq!(repo.find_week(week()).unwrap(), None);

        repo.save(&r, true).unwrap();
        assert_eq!(repo.find_week(week()).unwrap(), Some(r));
    }

    #[test]
    fn test_regenerate_replaces_week() {
        let repo = repo();
        repo.save(&result(vec![assignment(1, 1, None), assignment(2, 2, None)], vec![]), false)
            .unwrap();

        let second = result(vec![assignment(1, 5, None)], vec![]);
        repo.save(&second, false).unwrap();

        let stored = repo.find_week(week()).unwrap().unwrap();
        assert_eq!(stored.assignments, second.assignments);
    }

    #[test]
    fn test_validation_rejects_bad_results() {
        let repo = repo();
        assert!(matches!(
            repo.save(&result(vec![], vec![]), false),
            Err(RepositoryError::ValidationError(_))
        ));

        let mut zero = assignment(1, 1, None);
        zero.duration_minutes = 0;
        assert!(repo.save(&result(vec![zero], vec![]), false).is_err());

        let dup = vec![assignment(1, 1, None), assignment(1, 2, None)];
        assert!(repo.save(&result(dup, vec![]), false).is_err());
    }

    #[tokio::test]
    async fn test_sink_maps_confirmation_error() {
        let repo = repo();
        let r = result(
            vec![assignment(1, 1, None)],
            vec![Conflict::new(1, ConflictKind::MissingHelper, "missing")],
        );
        let err = repo.save_week(&r, false).await.unwrap_err();
        assert!(matches!(err, SchedulerError::UnresolvedConflicts { count: 1 }));
        assert!(repo.save_week(&r, true).await.is_ok());
    }
}
