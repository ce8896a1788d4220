use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of principal roles known to the gateway.
///
/// `ARO` is the academic records office, `DRO` the disciplinary records
/// office. Role-specific behavior lives in the predicates below rather than
/// in per-role types; the pipeline itself only ever needs the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "guardian")]
    Guardian,
    #[serde(rename = "ARO")]
    Aro,
    #[serde(rename = "DRO")]
    Dro,
}

impl Role {
    /// The wire label for this role, as stored in session claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Guardian => "guardian",
            Role::Aro => "ARO",
            Role::Dro => "DRO",
        }
    }

    /// Whether this role may record grade mutations.
    pub fn may_record_grades(&self) -> bool {
        matches!(self, Role::Aro)
    }

    /// Whether this role may record disciplinary mutations.
    pub fn may_record_disciplinary(&self) -> bool {
        matches!(self, Role::Dro)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "guardian" => Ok(Role::Guardian),
            "ARO" => Ok(Role::Aro),
            "DRO" => Ok(Role::Dro),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("guardian".parse::<Role>().unwrap(), Role::Guardian);
        assert_eq!("ARO".parse::<Role>().unwrap(), Role::Aro);
        assert_eq!("DRO".parse::<Role>().unwrap(), Role::Dro);
    }

    #[test]
    fn rejects_unknown_and_case_mismatched_roles() {
        assert!("admin".parse::<Role>().is_err());
        assert!("Student".parse::<Role>().is_err());
        assert!("aro".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn display_round_trips_with_parse() {
        for role in [Role::Student, Role::Guardian, Role::Aro, Role::Dro] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn write_predicates_are_office_specific() {
        assert!(Role::Aro.may_record_grades());
        assert!(!Role::Dro.may_record_grades());
        assert!(Role::Dro.may_record_disciplinary());
        assert!(!Role::Student.may_record_disciplinary());
        assert!(!Role::Guardian.may_record_grades());
    }
}
