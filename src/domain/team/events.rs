use uuid::Uuid;

/// Domain events emitted by team mutations
///
/// The API layer turns these into alert headers and log lines; nothing
/// is persisted from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamEvent {
    /// Fired when a team is created
    Created {
        team_id: Uuid,
        exercise_id: Uuid,
        short_name: String,
    },
    /// Fired when a team's name, image or members change
    Updated { team_id: Uuid, exercise_id: Uuid },
    /// Fired when a team is removed
    Deleted {
        team_id: Uuid,
        exercise_id: Uuid,
        /// User who performed the deletion
        deleted_by: Uuid,
    },
}

impl TeamEvent {
    /// Returns the team_id for this event
    pub fn team_id(&self) -> Uuid {
        match self {
            TeamEvent::Created { team_id, .. }
            | TeamEvent::Updated { team_id, .. }
            | TeamEvent::Deleted { team_id, .. } => *team_id,
        }
    }

    /// Past-tense action name used in alert keys
    pub fn action(&self) -> &'static str {
        match self {
            TeamEvent::Created { .. } => "created",
            TeamEvent::Updated { .. } => "updated",
            TeamEvent::Deleted { .. } => "deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_for_every_variant() {
        let team_id = Uuid::new_v4();
        let exercise_id = Uuid::new_v4();

        let events = [
            TeamEvent::Created {
                team_id,
                exercise_id,
                short_name: "alpha".to_string(),
            },
            TeamEvent::Updated {
                team_id,
                exercise_id,
            },
            TeamEvent::Deleted {
                team_id,
                exercise_id,
                deleted_by: Uuid::new_v4(),
            },
        ];

        for event in &events {
            assert_eq!(event.team_id(), team_id);
        }
        let actions: Vec<_> = events.iter().map(TeamEvent::action).collect();
        assert_eq!(actions, ["created", "updated", "deleted"]);
    }
}
