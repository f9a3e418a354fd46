use serde::Serialize;
use uuid::Uuid;

/// A gradable assignment unit within a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
}

impl Exercise {
    pub fn belongs_to(&self, course_id: Uuid) -> bool {
        self.course_id == course_id
    }
}
