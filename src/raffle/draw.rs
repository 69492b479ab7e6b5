use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use super::audio::{AudioCues, Tone};
use super::confetti::{self, Particle};
use super::pool::EligiblePool;

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("eligible pool is empty")]
    EmptyPool,
    #[error("seat {0} is not in the eligible pool")]
    NotEligible(i64),
}

/// Tuning knobs for the reveal sequence. The near-window of 15 is an
/// arbitrary value carried over from the original effect; treat as free.
#[derive(Debug, Clone)]
pub struct DrawTuning {
    pub steps: usize,
    pub honing_steps: usize,
    pub near_window: usize,
    pub step_delay_min_ms: u64,
    pub step_delay_max_ms: u64,
    pub confetti_particles: usize,
}

impl Default for DrawTuning {
    fn default() -> Self {
        Self {
            steps: 35,
            honing_steps: 8,
            near_window: 15,
            step_delay_min_ms: 50,
            step_delay_max_ms: 450,
            confetti_particles: 80,
        }
    }
}

/// Выбор победителя: равномерно по пулу, строго ДО построения анимации.
/// Возвращает индекс в пуле.
pub fn pick_winner(pool: &EligiblePool<'_>, rng: &mut impl Rng) -> Result<usize, DrawError> {
    if pool.is_empty() {
        return Err(DrawError::EmptyPool);
    }
    Ok(rng.random_range(0..pool.len()))
}

/// One highlight step of the reveal scroll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealStep {
    pub step: usize,
    pub seat_id: i64,
    pub delay_ms: u64,
    pub tone: Tone,
}

/// The whole reveal as data: the client (or the server-side animator) plays
/// it back; nothing in here re-randomizes the outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealPlan {
    pub winner_seat_id: i64,
    pub steps: Vec<RevealStep>,
    pub chime: Vec<Tone>,
    pub confetti: Vec<Particle>,
}

impl RevealPlan {
    /// Builds the scroll: early steps highlight uniformly random pool
    /// members, the final honing steps stay within `near_window` pool
    /// positions of the winner, and the very last step lands on the winner.
    pub fn build(
        pool: &EligiblePool<'_>,
        winner_index: usize,
        tuning: &DrawTuning,
        audio: &AudioCues,
        rng: &mut impl Rng,
    ) -> Result<Self, DrawError> {
        let winner = pool.get(winner_index).ok_or(DrawError::EmptyPool)?;
        let total = tuning.steps.max(1);
        let honing_from = total.saturating_sub(tuning.honing_steps);

        let mut steps = Vec::with_capacity(total);
        for i in 0..total {
            let pool_index = if i + 1 == total {
                winner_index
            } else if i >= honing_from {
                near_index(winner_index, pool.len(), tuning.near_window, rng)
            } else {
                rng.random_range(0..pool.len())
            };
            // pool_index всегда в границах пула
            let seat = pool.get(pool_index).ok_or(DrawError::EmptyPool)?;
            steps.push(RevealStep {
                step: i,
                seat_id: seat.id,
                delay_ms: step_delay(i, total, tuning),
                tone: audio.tick(i, total),
            });
        }

        Ok(Self {
            winner_seat_id: winner.id,
            steps,
            chime: audio.success_chime(),
            confetti: confetti::burst(rng, tuning.confetti_particles),
        })
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.delay_ms).sum()
    }
}

/// Linear ease-out: delay grows from min to max so the scroll decelerates.
fn step_delay(step: usize, total: usize, tuning: &DrawTuning) -> u64 {
    let span = tuning.step_delay_max_ms.saturating_sub(tuning.step_delay_min_ms);
    if total <= 1 {
        return tuning.step_delay_max_ms;
    }
    tuning.step_delay_min_ms + span * step as u64 / (total - 1) as u64
}

/// Равномерный выбор в окне вокруг победителя, с обрезкой по границам пула.
fn near_index(winner_index: usize, pool_len: usize, window: usize, rng: &mut impl Rng) -> usize {
    let lo = winner_index.saturating_sub(window);
    let hi = (winner_index + window).min(pool_len - 1);
    rng.random_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Seat;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    fn seats(eligibility: &[bool]) -> Vec<Seat> {
        eligibility
            .iter()
            .enumerate()
            .map(|(i, &eligible)| Seat {
                id: i as i64 + 1,
                section_id: 1,
                row_label: "A".to_string(),
                seat_number: i as i32 + 1,
                attendee_name: eligible.then(|| format!("Guest {i}")),
                is_excluded: false,
                is_eligible: eligible,
            })
            .collect()
    }

    #[test]
    fn winner_is_always_a_pool_member() {
        let seats = seats(&[true, false, true, true, false]);
        let pool = EligiblePool::from_seats(&seats);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let idx = pick_winner(&pool, &mut rng).unwrap();
            let seat = pool.get(idx).unwrap();
            assert!(seat.is_eligible);
            assert!(!seat.is_excluded);
        }
    }

    #[test]
    fn empty_pool_is_a_draw_error() {
        let seats = seats(&[false, false]);
        let pool = EligiblePool::from_seats(&seats);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(pick_winner(&pool, &mut rng), Err(DrawError::EmptyPool)));
    }

    #[test]
    fn three_seat_pool_is_roughly_uniform_over_300_draws() {
        let seats = seats(&[true, true, true]);
        let pool = EligiblePool::from_seats(&seats);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for _ in 0..300 {
            *counts.entry(pick_winner(&pool, &mut rng).unwrap()).or_default() += 1;
        }
        for idx in 0..3 {
            let n = counts.get(&idx).copied().unwrap_or(0);
            // ~100 expected; generous statistical tolerance for a fixed seed
            assert!((55..=145).contains(&n), "seat {idx} drawn {n} times");
        }
    }

    #[test]
    fn plan_has_configured_step_count_and_lands_on_winner() {
        let seats = seats(&[true; 40]);
        let pool = EligiblePool::from_seats(&seats);
        let tuning = DrawTuning::default();
        let mut rng = StdRng::seed_from_u64(5);
        let winner_index = pick_winner(&pool, &mut rng).unwrap();
        let plan = RevealPlan::build(&pool, winner_index, &tuning, &AudioCues::new(), &mut rng).unwrap();

        assert_eq!(plan.steps.len(), tuning.steps);
        let last = plan.steps.last().unwrap();
        assert_eq!(last.seat_id, plan.winner_seat_id);
        assert_eq!(plan.winner_seat_id, pool.get(winner_index).unwrap().id);
    }

    #[test]
    fn every_highlighted_seat_is_in_the_pool() {
        let seats = seats(&[true, false, true, true, true, false, true]);
        let pool = EligiblePool::from_seats(&seats);
        let mut rng = StdRng::seed_from_u64(9);
        let winner_index = pick_winner(&pool, &mut rng).unwrap();
        let plan =
            RevealPlan::build(&pool, winner_index, &DrawTuning::default(), &AudioCues::new(), &mut rng)
                .unwrap();
        for step in &plan.steps {
            assert!(pool.index_of(step.seat_id).is_some());
        }
    }

    #[test]
    fn honing_steps_stay_within_the_near_window() {
        let seats = seats(&[true; 100]);
        let pool = EligiblePool::from_seats(&seats);
        let tuning = DrawTuning::default();
        let mut rng = StdRng::seed_from_u64(13);
        let winner_index = 50;
        let plan = RevealPlan::build(&pool, winner_index, &tuning, &AudioCues::new(), &mut rng).unwrap();

        let honing_from = tuning.steps - tuning.honing_steps;
        for step in &plan.steps[honing_from..] {
            let idx = pool.index_of(step.seat_id).unwrap();
            let distance = idx.abs_diff(winner_index);
            assert!(distance <= tuning.near_window, "step {} strayed to distance {}", step.step, distance);
        }
    }

    #[test]
    fn delays_decelerate_monotonically() {
        let seats = seats(&[true; 10]);
        let pool = EligiblePool::from_seats(&seats);
        let mut rng = StdRng::seed_from_u64(2);
        let tuning = DrawTuning::default();
        let plan = RevealPlan::build(&pool, 0, &tuning, &AudioCues::new(), &mut rng).unwrap();

        for pair in plan.steps.windows(2) {
            assert!(pair[1].delay_ms >= pair[0].delay_ms);
        }
        assert_eq!(plan.steps[0].delay_ms, tuning.step_delay_min_ms);
        assert_eq!(plan.steps.last().unwrap().delay_ms, tuning.step_delay_max_ms);
    }

    #[test]
    fn plan_carries_chime_and_confetti() {
        let seats = seats(&[true, true]);
        let pool = EligiblePool::from_seats(&seats);
        let mut rng = StdRng::seed_from_u64(3);
        let tuning = DrawTuning::default();
        let plan = RevealPlan::build(&pool, 1, &tuning, &AudioCues::new(), &mut rng).unwrap();
        assert!(!plan.chime.is_empty());
        assert_eq!(plan.confetti.len(), tuning.confetti_particles);
        assert!(plan.total_duration_ms() > 0);
    }

    proptest! {
        #[test]
        fn pick_winner_never_leaves_the_pool(eligibility in proptest::collection::vec(any::<bool>(), 0..64), seed in any::<u64>()) {
            let seats = seats(&eligibility);
            let pool = EligiblePool::from_seats(&seats);
            let mut rng = StdRng::seed_from_u64(seed);
            match pick_winner(&pool, &mut rng) {
                Ok(idx) => {
                    let seat = pool.get(idx).expect("index in bounds");
                    prop_assert!(seat.is_eligible);
                }
                Err(DrawError::EmptyPool) => prop_assert!(pool.is_empty()),
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
        }
    }
}
