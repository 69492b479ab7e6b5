use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::draw::RevealPlan;

/// Snapshot of a live reveal, served to polling clients. The winner id is
/// withheld until playback finishes so pollers cannot spoil the reveal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawProgress {
    pub raffle_id: i64,
    pub step: usize,
    pub total_steps: usize,
    pub highlighted_seat_id: Option<i64>,
    pub finished: bool,
    pub winner_seat_id: Option<i64>,
}

struct LiveDraw {
    generation: u64,
    progress: DrawProgress,
    finished_at: Option<Instant>,
}

#[derive(Debug, thiserror::Error)]
#[error("a draw is already in flight for raffle {0}")]
pub struct DrawInFlight(pub i64);

/// Plays reveal plans server-side as a chain of sleeps, one per raffle.
///
/// Каждый запуск получает свой номер поколения; отмена/сброс просто
/// убирает запись, и шаг с устаревшим поколением молча останавливается.
/// Таймеры не утекают при рестарте.
pub struct DrawAnimator {
    next_generation: AtomicU64,
    live: Mutex<HashMap<i64, LiveDraw>>,
}

impl DrawAnimator {
    pub fn new() -> Self {
        Self {
            next_generation: AtomicU64::new(1),
            live: Mutex::new(HashMap::new()),
        }
    }

    pub fn progress(&self, raffle_id: i64) -> Option<DrawProgress> {
        self.live
            .lock()
            .expect("animator lock poisoned")
            .get(&raffle_id)
            .map(|l| l.progress.clone())
    }

    /// Идет ли сейчас прокрутка по этому розыгрышу.
    pub fn is_live(&self, raffle_id: i64) -> bool {
        self.live
            .lock()
            .expect("animator lock poisoned")
            .get(&raffle_id)
            .is_some_and(|l| !l.progress.finished)
    }

    /// Starts playback. Only one draw per raffle may be in flight; the
    /// guard is enforced here, not left to caller convention.
    pub fn start(self: &Arc<Self>, raffle_id: i64, plan: RevealPlan) -> Result<(), DrawInFlight> {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        {
            let mut live = self.live.lock().expect("animator lock poisoned");
            if live.get(&raffle_id).is_some_and(|l| !l.progress.finished) {
                return Err(DrawInFlight(raffle_id));
            }
            live.insert(
                raffle_id,
                LiveDraw {
                    generation,
                    progress: DrawProgress {
                        raffle_id,
                        step: 0,
                        total_steps: plan.steps.len(),
                        highlighted_seat_id: None,
                        finished: false,
                        winner_seat_id: None,
                    },
                    finished_at: None,
                },
            );
        }

        let animator = Arc::clone(self);
        tokio::spawn(async move {
            animator.play(raffle_id, generation, plan).await;
        });
        Ok(())
    }

    /// Отмена прокрутки (reset). Задача увидит чужое поколение и выйдет.
    pub fn cancel(&self, raffle_id: i64) {
        let removed = self
            .live
            .lock()
            .expect("animator lock poisoned")
            .remove(&raffle_id)
            .is_some();
        if removed {
            debug!("cancelled live draw for raffle {}", raffle_id);
        }
    }

    /// Drops finished snapshots older than `retain`. Called from the
    /// background janitor task.
    pub fn reap_finished(&self, retain: Duration) -> usize {
        let now = Instant::now();
        let mut live = self.live.lock().expect("animator lock poisoned");
        let before = live.len();
        live.retain(|_, l| match l.finished_at {
            Some(at) => now.duration_since(at) < retain,
            None => true,
        });
        before - live.len()
    }

    async fn play(&self, raffle_id: i64, generation: u64, plan: RevealPlan) {
        let total = plan.steps.len();
        for reveal_step in &plan.steps {
            sleep(Duration::from_millis(reveal_step.delay_ms)).await;

            let mut live = self.live.lock().expect("animator lock poisoned");
            let Some(entry) = live.get_mut(&raffle_id) else {
                return; // cancelled
            };
            if entry.generation != generation {
                return; // superseded by a newer draw
            }

            entry.progress.step = reveal_step.step;
            let last = reveal_step.step + 1 == total;
            if last {
                // Final step: highlight off, winner revealed
                entry.progress.highlighted_seat_id = None;
                entry.progress.finished = true;
                entry.progress.winner_seat_id = Some(plan.winner_seat_id);
                entry.finished_at = Some(Instant::now());
            } else {
                entry.progress.highlighted_seat_id = Some(reveal_step.seat_id);
            }
        }
        debug!("reveal finished for raffle {}", raffle_id);
    }
}

impl Default for DrawAnimator {
    fn default() -> Self {
        Self::new()
    }
}
