// ==========================================
// 周中聚会节目派工系统 - 派工与冲突
// ==========================================
// 红线: 序列化字段名 (partNumber/memberId/helperId/scene/durationMinutes)
//       是对外契约,不得改名
// ==========================================

use crate::domain::member::MemberId;
use crate::domain::types::{ConflictKind, ConflictSeverity};
use serde::{Deserialize, Serialize};

// ==========================================
// Assignment - 派工
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub part_number: u32,
    pub member_id: MemberId,
    pub helper_id: Option<MemberId>,
    pub scene: Option<String>,
    pub duration_minutes: u32,
}

impl Assignment {
    /// 本派工涉及的全部成员（主讲人在前）
    pub fn participants(&self) -> impl Iterator<Item = MemberId> + '_ {
        std::iter::once(self.member_id).chain(self.helper_id)
    }
}

// ==========================================
// Conflict - 冲突
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub part_number: u32,
    pub kind: ConflictKind,
    pub description: String,
}

impl Conflict {
    pub fn new(part_number: u32, kind: ConflictKind, description: impl Into<String>) -> Self {
        Self {
            part_number,
            kind,
            description: description.into(),
        }
    }

    pub fn severity(&self) -> ConflictSeverity {
        self.kind.severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assignment_wire_field_names() {
        let assignment = Assignment {
            part_number: 5,
            member_id: MemberId(12),
            helper_id: None,
            scene: Some("De casa em casa".to_string()),
            duration_minutes: 3,
        };
        let value = serde_json::to_value(&assignment).unwrap();
        assert_eq!(
            value,
            json!({
                "partNumber": 5,
                "memberId": 12,
                "helperId": null,
                "scene": "De casa em casa",
                "durationMinutes": 3
            })
        );
    }

    #[test]
    fn test_participants() {
        let assignment = Assignment {
            part_number: 5,
            member_id: MemberId(1),
            helper_id: Some(MemberId(2)),
            scene: None,
            duration_minutes: 3,
        };
        let ids: Vec<MemberId> = assignment.participants().collect();
        assert_eq!(ids, vec![MemberId(1), MemberId(2)]);
    }
}
