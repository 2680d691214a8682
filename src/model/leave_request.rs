use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Stored as the literal display strings, e.g. "Sick Leave".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LeaveType {
    #[serde(rename = "Sick Leave")]
    #[strum(serialize = "Sick Leave")]
    SickLeave,
    Vacation,
    Personal,
    Official,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = 1)]
    pub manager_id: i64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Vacation", value_type = String)]
    pub leave_type: String,
    #[schema(example = "family trip", nullable = true)]
    pub comment: Option<String>,
    #[schema(example = "Pending", value_type = String)]
    pub status: String,
    #[schema(example = "2026-01-01T00:00:00", value_type = String)]
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::{LeaveStatus, LeaveType};
    use std::str::FromStr;

    #[test]
    fn leave_type_literals() {
        assert_eq!(LeaveType::SickLeave.to_string(), "Sick Leave");
        assert_eq!(LeaveType::Vacation.to_string(), "Vacation");
        assert_eq!(LeaveType::Personal.to_string(), "Personal");
        assert_eq!(LeaveType::Official.to_string(), "Official");

        assert_eq!(LeaveType::from_str("Sick Leave").unwrap(), LeaveType::SickLeave);
        assert!(LeaveType::from_str("Casual").is_err());
    }

    #[test]
    fn leave_type_serde_uses_literals() {
        let v = serde_json::to_value(LeaveType::SickLeave).unwrap();
        assert_eq!(v, serde_json::json!("Sick Leave"));

        let t: LeaveType = serde_json::from_value(serde_json::json!("Official")).unwrap();
        assert_eq!(t, LeaveType::Official);
    }

    #[test]
    fn status_literals() {
        assert_eq!(LeaveStatus::Pending.to_string(), "Pending");
        assert_eq!(LeaveStatus::from_str("Rejected").unwrap(), LeaveStatus::Rejected);
        assert!(LeaveStatus::from_str("pending").is_err());
        assert!(LeaveStatus::from_str("Cancelled").is_err());
    }
}
