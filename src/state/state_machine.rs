use thiserror::Error;

/// High-level phases a quiz room can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// Players gather; no quiz has been started yet.
    Lobby,
    /// Start was requested; the countdown to the quiz payload is running.
    Starting,
    /// Questions are being dispatched and answers collected.
    InProgress,
    /// Every participant finished; final standings were broadcast.
    Finished,
}

/// Events that can be applied to a room's lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEvent {
    /// Admin requested a quiz start from the lobby (or a replay after a finish).
    StartQuiz,
    /// The countdown elapsed or every player acknowledged readiness.
    QuizDelivered,
    /// The last participant crossed the final question.
    AllFinished,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: RoomPhase,
    /// The event that cannot be applied from this phase.
    pub event: RoomEvent,
}

/// Per-room lifecycle state machine gating start, delivery, and completion.
///
/// The guard on [`RoomEvent::AllFinished`] is what makes the final standings
/// broadcast fire at most once per session.
#[derive(Debug, Clone)]
pub struct RoomStateMachine {
    phase: RoomPhase,
}

impl Default for RoomStateMachine {
    fn default() -> Self {
        Self {
            phase: RoomPhase::Lobby,
        }
    }
}

impl RoomStateMachine {
    /// Create a new state machine initialised in the lobby.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// Apply an event, moving to the next phase when the transition is valid.
    pub fn apply(&mut self, event: RoomEvent) -> Result<RoomPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (RoomPhase::Lobby, RoomEvent::StartQuiz) => RoomPhase::Starting,
            // A finished room can be replayed with a fresh start.
            (RoomPhase::Finished, RoomEvent::StartQuiz) => RoomPhase::Starting,
            (RoomPhase::Starting, RoomEvent::QuizDelivered) => RoomPhase::InProgress,
            (RoomPhase::InProgress, RoomEvent::AllFinished) => RoomPhase::Finished,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        self.phase = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_lobby() {
        let sm = RoomStateMachine::new();
        assert_eq!(sm.phase(), RoomPhase::Lobby);
    }

    #[test]
    fn full_happy_path_through_session() {
        let mut sm = RoomStateMachine::new();

        assert_eq!(sm.apply(RoomEvent::StartQuiz), Ok(RoomPhase::Starting));
        assert_eq!(sm.apply(RoomEvent::QuizDelivered), Ok(RoomPhase::InProgress));
        assert_eq!(sm.apply(RoomEvent::AllFinished), Ok(RoomPhase::Finished));
    }

    #[test]
    fn finished_room_can_be_replayed() {
        let mut sm = RoomStateMachine::new();
        sm.apply(RoomEvent::StartQuiz).unwrap();
        sm.apply(RoomEvent::QuizDelivered).unwrap();
        sm.apply(RoomEvent::AllFinished).unwrap();

        assert_eq!(sm.apply(RoomEvent::StartQuiz), Ok(RoomPhase::Starting));
    }

    #[test]
    fn all_finished_applies_only_once() {
        let mut sm = RoomStateMachine::new();
        sm.apply(RoomEvent::StartQuiz).unwrap();
        sm.apply(RoomEvent::QuizDelivered).unwrap();
        sm.apply(RoomEvent::AllFinished).unwrap();

        let err = sm.apply(RoomEvent::AllFinished).unwrap_err();
        assert_eq!(err.from, RoomPhase::Finished);
        assert_eq!(err.event, RoomEvent::AllFinished);
    }

    #[test]
    fn start_is_rejected_mid_session() {
        let mut sm = RoomStateMachine::new();
        sm.apply(RoomEvent::StartQuiz).unwrap();

        let err = sm.apply(RoomEvent::StartQuiz).unwrap_err();
        assert_eq!(err.from, RoomPhase::Starting);

        sm.apply(RoomEvent::QuizDelivered).unwrap();
        let err = sm.apply(RoomEvent::StartQuiz).unwrap_err();
        assert_eq!(err.from, RoomPhase::InProgress);
    }

    #[test]
    fn delivery_requires_a_running_countdown() {
        let mut sm = RoomStateMachine::new();
        let err = sm.apply(RoomEvent::QuizDelivered).unwrap_err();
        assert_eq!(err.from, RoomPhase::Lobby);
        assert_eq!(err.event, RoomEvent::QuizDelivered);
    }
}
