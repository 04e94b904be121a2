//! Room session status.

use std::fmt;

/// The lifecycle status of a room's game session.
///
/// One-way machine: `Waiting -> InProgress`, triggered by a start-game
/// event. There is no transition back, and repeated starts leave the
/// room in progress, so starting is idempotent in effect. Status never
/// gates drawing or guess routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Waiting,
    InProgress,
}

impl RoomStatus {
    /// The persisted representation, as stored in the `game_sessions` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
