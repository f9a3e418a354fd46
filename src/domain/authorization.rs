// Authorization policy
// A coarse role gate over global authorities, followed by fine-grained
// predicates over (caller, resource). Pure functions, no I/O.

use crate::domain::course::Course;
use crate::domain::team::Team;
use crate::domain::user::{Authority, User};
use crate::domain::DomainError;

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow,
    Deny(String),
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow)
    }

    /// Converts a denial into `DomainError::Forbidden`
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            AuthorizationDecision::Allow => Ok(()),
            AuthorizationDecision::Deny(reason) => Err(DomainError::forbidden(reason)),
        }
    }

    fn from_bool(allowed: bool, reason: impl FnOnce() -> String) -> Self {
        if allowed {
            AuthorizationDecision::Allow
        } else {
            AuthorizationDecision::Deny(reason())
        }
    }
}

/// Coarse gate: the caller must hold at least one of `allowed`
pub fn role_gate(caller: &User, allowed: &[Authority]) -> AuthorizationDecision {
    AuthorizationDecision::from_bool(
        allowed.iter().any(|authority| caller.has_authority(*authority)),
        || {
            let names: Vec<_> = allowed.iter().map(Authority::as_str).collect();
            format!("Requires one of: {}", names.join(", "))
        },
    )
}

/// Admins, and members of the course's TA or instructor group
pub fn is_at_least_teaching_assistant_in_course(course: &Course, user: &User) -> bool {
    user.is_admin() || course.is_teaching_assistant(user) || course.is_instructor(user)
}

/// Same as the course check, evaluated on the exercise's course
pub fn is_at_least_teaching_assistant_for_exercise(course_of_exercise: &Course, user: &User) -> bool {
    is_at_least_teaching_assistant_in_course(course_of_exercise, user)
}

pub fn teaching_assistant_in_course(course: &Course, user: &User) -> AuthorizationDecision {
    AuthorizationDecision::from_bool(is_at_least_teaching_assistant_in_course(course, user), || {
        format!(
            "User {} is not at least a teaching assistant in course {}",
            user.login, course.id
        )
    })
}

pub fn teaching_assistant_for_exercise(course_of_exercise: &Course, user: &User) -> AuthorizationDecision {
    AuthorizationDecision::from_bool(
        is_at_least_teaching_assistant_for_exercise(course_of_exercise, user),
        || {
            format!(
                "User {} is not at least a teaching assistant for this exercise",
                user.login
            )
        },
    )
}

/// Staff of the exercise may view any team; students only their own
pub fn team_view(course_of_exercise: &Course, team: &Team, user: &User) -> AuthorizationDecision {
    AuthorizationDecision::from_bool(
        is_at_least_teaching_assistant_for_exercise(course_of_exercise, user) || team.has_student(user.id),
        || format!("User {} may not view team {}", user.login, team.short_name()),
    )
}
