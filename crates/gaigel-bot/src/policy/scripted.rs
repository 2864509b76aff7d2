use super::{first_legal, log_play_decision};
use gaigel_core::error::InvalidMove;
use gaigel_core::game::provider::{MoveProvider, MoveRequest};
use gaigel_core::model::hand::Slot;
use std::collections::VecDeque;
use tracing::warn;

/// Plays a fixed list of slots in order. A rejected or missing script entry
/// falls back to the lowest legal slot.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    script: VecDeque<Slot>,
    fallbacks: u32,
}

impl ScriptedPolicy {
    pub fn new(script: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallbacks: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Moves chosen by the fallback instead of the script.
    pub fn fallbacks(&self) -> u32 {
        self.fallbacks
    }
}

impl MoveProvider for ScriptedPolicy {
    fn choose_move(&mut self, request: &MoveRequest<'_>) -> Slot {
        if request.attempt == 0
            && let Some(slot) = self.script.pop_front()
        {
            log_play_decision(request, slot, "scripted");
            return slot;
        }
        self.fallbacks += 1;
        let slot = first_legal(request);
        log_play_decision(request, slot, "script_fallback");
        slot
    }

    fn on_rejected(&mut self, request: &MoveRequest<'_>, slot: Slot, reason: InvalidMove) {
        warn!(player = %request.player, slot = slot.number(), %reason, "scripted move rejected");
    }
}
