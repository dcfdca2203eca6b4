use std::{collections::HashSet, time::SystemTime};

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use tokio::{sync::watch, time::Instant};
use uuid::Uuid;

use crate::{
    dao::models::{QuestionEntity, QuizEntity, QuizSettingsEntity},
    state::state_machine::{InvalidTransition, RoomEvent, RoomPhase, RoomStateMachine},
};

/// Immutable copy of a quiz taken when a session starts.
#[derive(Debug, Clone)]
pub struct QuizSnapshot {
    /// Display title of the quiz.
    pub title: String,
    /// Session settings frozen at start time.
    pub settings: QuizSettings,
    /// Questions in authoring order; players index into this through their
    /// private shuffled sequences.
    pub questions: Vec<Question>,
}

/// Settings applied to every player of a session.
#[derive(Debug, Clone, Copy)]
pub struct QuizSettings {
    /// Seconds each player gets per question before the client auto-submits.
    pub time_per_question: u32,
    /// Points awarded for each correct answer.
    pub points_per_question: u32,
}

/// A single question with its answer key, read-only to the engine.
#[derive(Debug, Clone)]
pub struct Question {
    /// Question text shown to players.
    pub text: String,
    /// Candidate answers.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer. Never leaves the backend
    /// through any broadcast payload.
    pub correct_answer_index: usize,
}

/// Per-player progress tracked for the lifetime of a room.
///
/// Transport handles live in the connection routing table, not here.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    /// Stable player identifier supplied at join time.
    pub id: Uuid,
    /// Name shown in lobby and leaderboard lists.
    pub display_name: String,
    /// Accumulated score, reset to zero on every quiz start.
    pub score: u32,
    /// Lock set once the player has submitted (or been auto-submitted) for
    /// their current question.
    pub answered_current: bool,
    /// Index into `sequence`; increments by exactly one per processed answer.
    pub cursor: usize,
    /// Private permutation of `[0, question_count)` assigned at quiz start.
    /// Empty while in the lobby and for players who joined mid-session.
    pub sequence: Vec<usize>,
}

impl PlayerSession {
    /// Create a fresh session for a player joining a room.
    pub fn new(id: Uuid, display_name: String) -> Self {
        Self {
            id,
            display_name,
            score: 0,
            answered_current: false,
            cursor: 0,
            sequence: Vec::new(),
        }
    }

    /// Reset progress and assign a fresh independent permutation for a start.
    pub fn reset_for_start(&mut self, question_count: usize) {
        self.score = 0;
        self.answered_current = false;
        self.cursor = 0;
        self.sequence = shuffled_sequence(question_count);
    }

    /// Whether this player was dealt a sequence for the current session.
    pub fn is_participant(&self) -> bool {
        !self.sequence.is_empty()
    }

    /// Whether this participant's cursor has crossed their final question.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.sequence.len()
    }
}

/// One quiz session instance, identified by a short alphanumeric code.
///
/// A room is owned by a single `tokio::sync::Mutex`; every inbound event
/// locks it and runs to completion, so player state needs no further
/// synchronisation.
pub struct Room {
    /// Ordered collection of player sessions, unique by player id.
    pub players: IndexMap<Uuid, PlayerSession>,
    /// Quiz snapshot, `None` until the first start.
    pub quiz: Option<QuizSnapshot>,
    /// Players that acknowledged readiness during the current countdown.
    pub ready: HashSet<Uuid>,
    machine: RoomStateMachine,
    all_ready: watch::Sender<bool>,
    created_at: SystemTime,
    last_activity: Instant,
}

impl Room {
    /// Create an empty lobby room.
    pub fn new() -> Self {
        let (all_ready, _rx) = watch::channel(false);
        Self {
            players: IndexMap::new(),
            quiz: None,
            ready: HashSet::new(),
            machine: RoomStateMachine::new(),
            all_ready,
            created_at: SystemTime::now(),
            last_activity: Instant::now(),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RoomPhase {
        self.machine.phase()
    }

    /// Apply a lifecycle event to the room's state machine.
    pub fn apply(&mut self, event: RoomEvent) -> Result<RoomPhase, InvalidTransition> {
        self.machine.apply(event)
    }

    /// Record activity so the eviction sweeper leaves this room alone.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Instant of the last tracked activity.
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// When the room was created.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Clear ready acknowledgments ahead of a new countdown.
    pub fn reset_ready(&mut self) {
        self.ready.clear();
        self.all_ready.send_replace(false);
    }

    /// Record a ready acknowledgment and wake the countdown task once every
    /// current player has acknowledged.
    pub fn mark_ready(&mut self, player_id: Uuid) {
        if !self.players.contains_key(&player_id) {
            return;
        }
        self.ready.insert(player_id);
        self.refresh_all_ready();
    }

    /// Re-evaluate the all-ready flag, e.g. after the lone missing player left.
    pub fn refresh_all_ready(&mut self) {
        let all = self.players.keys().all(|id| self.ready.contains(id));
        if all {
            self.all_ready.send_replace(true);
        }
    }

    /// Watcher the countdown task uses to cut the deadline short.
    pub fn ready_watcher(&self) -> watch::Receiver<bool> {
        self.all_ready.subscribe()
    }

    /// Whether every participant of the running session has finished.
    ///
    /// Players without a sequence (mid-session joiners) are not counted, so a
    /// late join cannot wedge the completion barrier.
    pub fn participants_all_finished(&self) -> bool {
        let mut participants = self
            .players
            .values()
            .filter(|player| player.is_participant())
            .peekable();

        participants.peek().is_some() && participants.all(PlayerSession::is_finished)
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform random permutation of `[0, count)` (Fisher-Yates).
pub fn shuffled_sequence(count: usize) -> Vec<usize> {
    let mut sequence: Vec<usize> = (0..count).collect();
    if sequence.len() > 1 {
        let mut rng = rand::rng();
        sequence.shuffle(&mut rng);
    }
    sequence
}

impl From<QuizEntity> for QuizSnapshot {
    fn from(value: QuizEntity) -> Self {
        Self {
            title: value.title,
            settings: value.settings.into(),
            questions: value.questions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<QuizSettingsEntity> for QuizSettings {
    fn from(value: QuizSettingsEntity) -> Self {
        Self {
            time_per_question: value.time_per_question,
            points_per_question: value.points_per_question,
        }
    }
}

impl From<QuestionEntity> for Question {
    fn from(value: QuestionEntity) -> Self {
        Self {
            text: value.text,
            options: value.options,
            correct_answer_index: value.correct_answer_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffled_sequence_is_a_permutation() {
        for count in [1usize, 3, 10, 50] {
            let mut sequence = shuffled_sequence(count);
            assert_eq!(sequence.len(), count);
            sequence.sort_unstable();
            assert_eq!(sequence, (0..count).collect::<Vec<_>>());
        }
    }

    #[test]
    fn reset_for_start_clears_progress_and_deals_a_sequence() {
        let mut player = PlayerSession::new(Uuid::new_v4(), "Ada".into());
        player.score = 7;
        player.cursor = 3;
        player.answered_current = true;

        player.reset_for_start(5);

        assert_eq!(player.score, 0);
        assert_eq!(player.cursor, 0);
        assert!(!player.answered_current);
        assert_eq!(player.sequence.len(), 5);
        assert!(player.is_participant());
        assert!(!player.is_finished());
    }

    #[test]
    fn barrier_ignores_players_without_a_sequence() {
        let mut room = Room::new();
        let finisher = Uuid::new_v4();
        let latecomer = Uuid::new_v4();

        let mut player = PlayerSession::new(finisher, "P1".into());
        player.reset_for_start(2);
        player.cursor = 2;
        room.players.insert(finisher, player);
        room.players
            .insert(latecomer, PlayerSession::new(latecomer, "P2".into()));

        assert!(room.participants_all_finished());
    }

    #[test]
    fn barrier_requires_every_participant() {
        let mut room = Room::new();
        for (index, name) in ["P1", "P2"].iter().enumerate() {
            let id = Uuid::new_v4();
            let mut player = PlayerSession::new(id, (*name).into());
            player.reset_for_start(3);
            player.cursor = if index == 0 { 3 } else { 1 };
            room.players.insert(id, player);
        }

        assert!(!room.participants_all_finished());
    }

    #[test]
    fn barrier_is_false_for_an_unstarted_room() {
        let room = Room::new();
        assert!(!room.participants_all_finished());
    }

    #[test]
    fn mark_ready_flips_watch_only_when_everyone_acknowledged() {
        let mut room = Room::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        room.players
            .insert(first, PlayerSession::new(first, "P1".into()));
        room.players
            .insert(second, PlayerSession::new(second, "P2".into()));

        let watcher = room.ready_watcher();
        room.reset_ready();
        room.mark_ready(first);
        assert!(!*watcher.borrow());

        room.mark_ready(second);
        assert!(*watcher.borrow());
    }

    #[test]
    fn ready_from_unknown_player_is_ignored() {
        let mut room = Room::new();
        let member = Uuid::new_v4();
        room.players
            .insert(member, PlayerSession::new(member, "P1".into()));

        room.reset_ready();
        room.mark_ready(Uuid::new_v4());

        assert!(room.ready.is_empty());
    }
}
