//! In-memory implementation of every repository port
//!
//! Useful for tests and local development. Data is lost when the process
//! terminates. Behaves like the PostgreSQL repositories, including the
//! orderings they apply.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::domain::course::{Course, Exercise};
use crate::domain::grading::GradingCriterion;
use crate::domain::notification::SystemNotification;
use crate::domain::repositories::{
    CourseRepository, GradingCriterionRepository, SystemNotificationRepository, TeamRepository,
    UserRepository,
};
use crate::domain::team::{Team, TeamWithStudents};
use crate::domain::user::{LoginOrName, User};
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Default)]
struct Tables {
    courses: HashMap<Uuid, Course>,
    exercises: HashMap<Uuid, Exercise>,
    users: HashMap<Uuid, User>,
    teams: HashMap<Uuid, Team>,
    grading_criteria: HashMap<Uuid, GradingCriterion>,
    system_notifications: HashMap<Uuid, SystemNotification>,
}

impl Tables {
    fn students_of(&self, team: &Team) -> Vec<User> {
        let mut students: Vec<User> = team
            .student_ids()
            .iter()
            .filter_map(|id| self.users.get(id).cloned())
            .collect();
        students.sort_by(|a, b| a.login.cmp(&b.login));
        students
    }

    fn teams_of_exercise(&self, exercise_id: Uuid) -> Vec<Team> {
        let mut teams: Vec<Team> = self
            .teams
            .values()
            .filter(|team| team.belongs_to(exercise_id))
            .cloned()
            .collect();
        teams.sort_by_key(Team::created_at);
        teams
    }
}

/// Thread-safe store backing all repository traits
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| DomainError::storage("In-memory store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| DomainError::storage("In-memory store lock poisoned"))
    }

    // ===== Seeding =====

    pub fn insert_course(&self, course: Course) -> DomainResult<()> {
        self.write()?.courses.insert(course.id, course);
        Ok(())
    }

    pub fn insert_exercise(&self, exercise: Exercise) -> DomainResult<()> {
        self.write()?.exercises.insert(exercise.id, exercise);
        Ok(())
    }

    pub fn insert_user(&self, user: User) -> DomainResult<()> {
        self.write()?.users.insert(user.id, user);
        Ok(())
    }

    pub fn insert_grading_criterion(&self, criterion: GradingCriterion) -> DomainResult<()> {
        self.write()?.grading_criteria.insert(criterion.id, criterion);
        Ok(())
    }

    pub fn insert_system_notification(&self, notification: SystemNotification) -> DomainResult<()> {
        self.write()?
            .system_notifications
            .insert(notification.id, notification);
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn save(&self, team: &Team) -> DomainResult<()> {
        let mut tables = self.write()?;
        let taken = tables
            .teams
            .values()
            .any(|other| other.id() != team.id() && other.short_name() == team.short_name());
        if taken {
            return Err(DomainError::conflict(format!(
                "A team with the short name '{}' already exists",
                team.short_name()
            )));
        }
        tables.teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Team>> {
        Ok(self.read()?.teams.get(&id).cloned())
    }

    async fn find_by_id_with_students(&self, id: Uuid) -> DomainResult<Option<TeamWithStudents>> {
        let tables = self.read()?;
        Ok(tables.teams.get(&id).map(|team| TeamWithStudents {
            students: tables.students_of(team),
            team: team.clone(),
        }))
    }

    async fn find_all_by_exercise_id(&self, exercise_id: Uuid) -> DomainResult<Vec<Team>> {
        Ok(self.read()?.teams_of_exercise(exercise_id))
    }

    async fn find_all_by_exercise_id_with_students(
        &self,
        exercise_id: Uuid,
    ) -> DomainResult<Vec<TeamWithStudents>> {
        let tables = self.read()?;
        Ok(tables
            .teams_of_exercise(exercise_id)
            .into_iter()
            .map(|team| TeamWithStudents {
                students: tables.students_of(&team),
                team,
            })
            .collect())
    }

    async fn find_by_short_name(&self, short_name: &str) -> DomainResult<Option<Team>> {
        Ok(self
            .read()?
            .teams
            .values()
            .find(|team| team.short_name().as_str() == short_name)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.write()?.teams.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_all_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<User>> {
        let tables = self.read()?;
        let mut users: Vec<User> = ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect();
        users.sort_by(|a, b| a.login.cmp(&b.login));
        users.dedup_by_key(|user| user.id);
        Ok(users)
    }

    async fn search_by_login_or_name_in_group(
        &self,
        group: &str,
        query: &LoginOrName,
    ) -> DomainResult<Vec<User>> {
        let tables = self.read()?;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|user| user.is_member_of(group))
            .filter(|user| query.matches(&user.login) || query.matches(&user.name()))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.login.cmp(&b.login));
        Ok(users)
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn find_course_by_id(&self, id: Uuid) -> DomainResult<Option<Course>> {
        Ok(self.read()?.courses.get(&id).cloned())
    }

    async fn find_exercise_by_id(&self, id: Uuid) -> DomainResult<Option<Exercise>> {
        Ok(self.read()?.exercises.get(&id).cloned())
    }
}

#[async_trait]
impl GradingCriterionRepository for InMemoryStore {
    async fn find_all_by_exercise_id(&self, exercise_id: Uuid) -> DomainResult<Vec<GradingCriterion>> {
        let criteria = self
            .find_all_by_exercise_id_with_instructions(exercise_id)
            .await?;
        Ok(criteria
            .into_iter()
            .map(|mut criterion| {
                criterion.structured_grading_instructions.clear();
                criterion
            })
            .collect())
    }

    async fn find_all_by_exercise_id_with_instructions(
        &self,
        exercise_id: Uuid,
    ) -> DomainResult<Vec<GradingCriterion>> {
        let mut criteria: Vec<GradingCriterion> = self
            .read()?
            .grading_criteria
            .values()
            .filter(|criterion| criterion.exercise_id == exercise_id)
            .cloned()
            .collect();
        // NULLS LAST, like the SQL ordering
        criteria.sort_by(|a, b| {
            (a.title.is_none(), &a.title, a.id).cmp(&(b.title.is_none(), &b.title, b.id))
        });
        Ok(criteria)
    }
}

#[async_trait]
impl SystemNotificationRepository for InMemoryStore {
    async fn find_all_active(&self, now: DateTime<Utc>) -> DomainResult<Vec<SystemNotification>> {
        let mut active: Vec<SystemNotification> = self
            .read()?
            .system_notifications
            .values()
            .filter(|notification| notification.is_active_at(now))
            .cloned()
            .collect();
        active.sort_by_key(|notification| notification.notification_date);
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grading::StructuredGradingInstruction;
    use crate::domain::notification::NotificationType;
    use crate::domain::team::TeamDraft;
    use crate::domain::user::Authority;
    use chrono::Duration;
    use std::collections::BTreeSet;

    fn user(login: &str, first: &str, last: &str, groups: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            login: login.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            groups: groups.iter().map(|g| g.to_string()).collect(),
            authorities: BTreeSet::from([Authority::User]),
        }
    }

    fn team(exercise_id: Uuid, short_name: &str, students: Vec<Uuid>) -> Team {
        Team::new(
            exercise_id,
            TeamDraft {
                name: short_name.to_uppercase(),
                short_name: short_name.to_string(),
                image: None,
                student_ids: students,
            },
        )
        .unwrap()
        .0
    }

    #[tokio::test]
    async fn team_lookups_are_shallow_or_deep() {
        let store = InMemoryStore::new();
        let ada = user("ada", "Ada", "Lovelace", &["students"]);
        store.insert_user(ada.clone()).unwrap();
        let exercise_id = Uuid::new_v4();
        let t = team(exercise_id, "alpha", vec![ada.id]);
        TeamRepository::save(&store, &t).await.unwrap();

        let shallow = TeamRepository::find_by_id(&store, t.id()).await.unwrap().unwrap();
        assert!(shallow.has_student(ada.id));

        let deep = store.find_by_id_with_students(t.id()).await.unwrap().unwrap();
        assert_eq!(deep.students, vec![ada]);

        let all = store
            .find_all_by_exercise_id_with_students(exercise_id)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn absent_team_is_none_and_delete_reports_false() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();

        assert!(TeamRepository::find_by_id(&store, id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn short_name_lookup_ignores_exercise() {
        let store = InMemoryStore::new();
        let t = team(Uuid::new_v4(), "alpha", vec![]);
        TeamRepository::save(&store, &t).await.unwrap();

        assert_eq!(
            store.find_by_short_name("alpha").await.unwrap().map(|t| t.id()),
            Some(t.id())
        );
        assert!(store.find_by_short_name("beta").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_short_name_is_rejected_like_a_unique_index() {
        let store = InMemoryStore::new();
        TeamRepository::save(&store, &team(Uuid::new_v4(), "alpha", vec![]))
            .await
            .unwrap();

        let result = TeamRepository::save(&store, &team(Uuid::new_v4(), "alpha", vec![])).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn search_matches_login_or_full_name_within_group() {
        let store = InMemoryStore::new();
        store
            .insert_user(user("ada", "Ada", "Lovelace", &["students"]))
            .unwrap();
        store
            .insert_user(user("glove", "Grace", "Hopper", &["students"]))
            .unwrap();
        store
            .insert_user(user("lovelace2", "Other", "Person", &["tutors"]))
            .unwrap();

        let query = LoginOrName::new("love").unwrap();
        let hits = store
            .search_by_login_or_name_in_group("students", &query)
            .await
            .unwrap();

        let logins: Vec<_> = hits.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, ["ada", "glove"]);
    }

    #[tokio::test]
    async fn grading_criteria_shallow_drops_instructions() {
        let store = InMemoryStore::new();
        let exercise_id = Uuid::new_v4();
        let criterion_id = Uuid::new_v4();
        store
            .insert_grading_criterion(GradingCriterion {
                id: criterion_id,
                exercise_id,
                title: Some("Tests".to_string()),
                structured_grading_instructions: vec![StructuredGradingInstruction {
                    id: Uuid::new_v4(),
                    criterion_id,
                    credits: 1.0,
                    grading_scale: "ok".to_string(),
                    instruction_description: "Has tests".to_string(),
                    feedback: "Tests present".to_string(),
                    usage_count: 1,
                }],
            })
            .unwrap();

        let shallow = GradingCriterionRepository::find_all_by_exercise_id(&store, exercise_id)
            .await
            .unwrap();
        assert!(shallow[0].structured_grading_instructions.is_empty());

        let deep = store
            .find_all_by_exercise_id_with_instructions(exercise_id)
            .await
            .unwrap();
        assert_eq!(deep.len(), 1);
        assert_eq!(deep[0].structured_grading_instructions.len(), 1);

        let other = store
            .find_all_by_exercise_id_with_instructions(Uuid::new_v4())
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn active_notifications_are_windowed_and_ascending() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let make = |title: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>| SystemNotification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            text: None,
            notification_type: NotificationType::Info,
            notification_date: start,
            expire_date: end,
        };

        store
            .insert_system_notification(make("recent", now - Duration::hours(1), None))
            .unwrap();
        store
            .insert_system_notification(make(
                "older",
                now - Duration::days(3),
                Some(now + Duration::days(1)),
            ))
            .unwrap();
        store
            .insert_system_notification(make(
                "expired",
                now - Duration::days(3),
                Some(now - Duration::days(1)),
            ))
            .unwrap();
        store
            .insert_system_notification(make("upcoming", now + Duration::hours(1), None))
            .unwrap();

        let active = store.find_all_active(now).await.unwrap();
        let titles: Vec<_> = active.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["older", "recent"]);
    }
}
