use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::User;

/// A course and the user groups attached to it
///
/// Membership in one of these groups is what makes a user a student,
/// teaching assistant or instructor of the course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub short_name: String,
    pub student_group_name: String,
    pub teaching_assistant_group_name: String,
    pub instructor_group_name: String,
}

impl Course {
    pub fn is_student(&self, user: &User) -> bool {
        user.is_member_of(&self.student_group_name)
    }

    pub fn is_teaching_assistant(&self, user: &User) -> bool {
        user.is_member_of(&self.teaching_assistant_group_name)
    }

    pub fn is_instructor(&self, user: &User) -> bool {
        user.is_member_of(&self.instructor_group_name)
    }
}
