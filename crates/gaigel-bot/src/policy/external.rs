use super::{RandomPolicy, log_play_decision};
use gaigel_core::error::InvalidMove;
use gaigel_core::game::provider::{MoveProvider, MoveRequest};
use gaigel_core::model::hand::Slot;
use tracing::debug;

/// A seat driven from outside the engine, e.g. a learning agent. The caller
/// queues one slot per turn; when nothing is queued or the queued slot is
/// rejected, a legal random move is played instead.
#[derive(Debug, Clone)]
pub struct ExternalPolicy {
    pending: Option<Slot>,
    fallback: RandomPolicy,
    rejections: u32,
}

impl ExternalPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            pending: None,
            fallback: RandomPolicy::legal_only(seed),
            rejections: 0,
        }
    }

    pub fn queue(&mut self, slot: Slot) {
        self.pending = Some(slot);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Rejections since the last call, resetting the counter.
    pub fn take_rejections(&mut self) -> u32 {
        std::mem::take(&mut self.rejections)
    }
}

impl MoveProvider for ExternalPolicy {
    fn choose_move(&mut self, request: &MoveRequest<'_>) -> Slot {
        if let Some(slot) = self.pending.take() {
            log_play_decision(request, slot, "external");
            return slot;
        }
        self.fallback.choose_move(request)
    }

    fn on_rejected(&mut self, request: &MoveRequest<'_>, slot: Slot, reason: InvalidMove) {
        self.rejections += 1;
        debug!(player = %request.player, slot = slot.number(), %reason, "external move rejected, falling back");
    }
}
