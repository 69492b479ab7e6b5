use rand::Rng;
use serde::Serialize;

/// One confetti particle as declarative state for the rendering layer.
/// Origin is normalized to [0,1] screen space; velocity is in units/sec.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: u8,
    pub ttl_ms: u32,
}

pub const PALETTE_SIZE: u8 = 6;

/// Генерирует разовый "залп" конфетти из центра верхней трети экрана.
/// Только данные: рендер сам решает, чем их рисовать.
pub fn burst(rng: &mut impl Rng, count: usize) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(0.2..1.2);
            Particle {
                x: 0.5,
                y: 0.33,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed - 0.5, // initial upward kick
                color: rng.random_range(0..PALETTE_SIZE),
                ttl_ms: rng.random_range(900..2200),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn burst_produces_requested_particle_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let particles = burst(&mut rng, 80);
        assert_eq!(particles.len(), 80);
    }

    #[test]
    fn particles_have_bounded_colors_and_positive_ttl() {
        let mut rng = StdRng::seed_from_u64(7);
        for p in burst(&mut rng, 200) {
            assert!(p.color < PALETTE_SIZE);
            assert!(p.ttl_ms >= 900);
        }
    }
}
