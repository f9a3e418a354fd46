use super::events::TeamEvent;
use super::value_objects::ShortName;
use crate::domain::user::User;
use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Editable fields of a team, as submitted by a client
#[derive(Debug, Clone)]
pub struct TeamDraft {
    pub name: String,
    pub short_name: String,
    pub image: Option<String>,
    pub student_ids: Vec<Uuid>,
}

/// Team aggregate root
///
/// A group of students working on one exercise together.
///
/// # Invariants
/// - Name cannot be blank
/// - Short name is a valid [`ShortName`]
/// - The owning exercise is fixed at creation
/// - Members are references to users, never owned
///
/// # Example
/// ```
/// use courseteams_api::domain::team::{Team, TeamDraft};
/// use uuid::Uuid;
///
/// let (team, event) = Team::new(
///     Uuid::new_v4(),
///     TeamDraft {
///         name: "Team Alpha".to_string(),
///         short_name: "alpha".to_string(),
///         image: None,
///         student_ids: vec![Uuid::new_v4()],
///     },
/// ).expect("valid team");
///
/// assert_eq!(team.short_name().as_str(), "alpha");
/// assert_eq!(event.team_id(), team.id());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: Uuid,
    exercise_id: Uuid,
    name: String,
    short_name: ShortName,
    image: Option<String>,
    student_ids: BTreeSet<Uuid>,
    created_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new Team for an exercise
    ///
    /// # Returns
    /// * `Ok((Team, TeamEvent))` - New team with a generated id and its Created event
    /// * `Err(DomainError::Validation)` - If any invariant is violated
    pub fn new(exercise_id: Uuid, draft: TeamDraft) -> Result<(Self, TeamEvent), DomainError> {
        let (name, short_name) = validate(&draft)?;

        let team = Self {
            id: Uuid::new_v4(),
            exercise_id,
            name,
            short_name,
            image: draft.image,
            student_ids: draft.student_ids.into_iter().collect(),
            created_at: Utc::now(),
        };

        let event = TeamEvent::Created {
            team_id: team.id,
            exercise_id: team.exercise_id,
            short_name: team.short_name.to_string(),
        };

        Ok((team, event))
    }

    /// Replaces the editable fields of the team
    ///
    /// The id, exercise and creation time never change.
    pub fn apply(&mut self, draft: TeamDraft) -> Result<TeamEvent, DomainError> {
        let (name, short_name) = validate(&draft)?;

        self.name = name;
        self.short_name = short_name;
        self.image = draft.image;
        self.student_ids = draft.student_ids.into_iter().collect();

        Ok(TeamEvent::Updated {
            team_id: self.id,
            exercise_id: self.exercise_id,
        })
    }

    /// Event describing the removal of this team by `deleted_by`
    pub fn deleted_by(&self, deleted_by: Uuid) -> TeamEvent {
        TeamEvent::Deleted {
            team_id: self.id,
            exercise_id: self.exercise_id,
            deleted_by,
        }
    }

    pub fn has_student(&self, user_id: Uuid) -> bool {
        self.student_ids.contains(&user_id)
    }

    pub fn belongs_to(&self, exercise_id: Uuid) -> bool {
        self.exercise_id == exercise_id
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn exercise_id(&self) -> Uuid {
        self.exercise_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &ShortName {
        &self.short_name
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn student_ids(&self) -> &BTreeSet<Uuid> {
        &self.student_ids
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Bypasses validation since the data was validated before it was stored.
    /// Only to be used by repository implementations.
    pub fn from_persistence(
        id: Uuid,
        exercise_id: Uuid,
        name: String,
        short_name: ShortName,
        image: Option<String>,
        student_ids: BTreeSet<Uuid>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            exercise_id,
            name,
            short_name,
            image,
            student_ids,
            created_at,
        }
    }
}

fn validate(draft: &TeamDraft) -> Result<(String, ShortName), DomainError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Team name cannot be empty"));
    }
    let short_name = ShortName::new(draft.short_name.trim())?;
    Ok((name.to_string(), short_name))
}

/// A team together with the full records of its members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamWithStudents {
    pub team: Team,
    pub students: Vec<User>,
}
