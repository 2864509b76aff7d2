use crate::model::player::PlayerId;
use std::collections::VecDeque;

/// Circular seating order. The front is the player who acts next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrder {
    seats: VecDeque<PlayerId>,
}

impl TurnOrder {
    pub fn new(player_count: usize) -> Self {
        Self {
            seats: (0..player_count).map(PlayerId).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn front(&self) -> Option<PlayerId> {
        self.seats.front().copied()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.seats.contains(&player)
    }

    /// Returns the front player and moves it to the back.
    pub fn next_and_rotate(&mut self) -> Option<PlayerId> {
        let player = self.seats.pop_front()?;
        self.seats.push_back(player);
        Some(player)
    }

    /// Rotates until `target` is at the front. Returns `false` and leaves the
    /// order untouched when `target` is not seated.
    pub fn rotate_to(&mut self, target: PlayerId) -> bool {
        if !self.contains(target) {
            return false;
        }
        while self.seats.front() != Some(&target) {
            self.seats.rotate_left(1);
        }
        true
    }

    /// Players in acting order, starting at the front.
    pub fn iter(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.seats.iter().copied()
    }
}
