use serde::Serialize;

/// A single tone descriptor the client synthesizes (frequency sweep done
/// client-side). Pure data, no audio device is touched here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u32,
    pub gain: f32,
}

/// Injectable tone service. Constructed once from config and passed into
/// plan building, so nothing holds a process-wide audio singleton.
#[derive(Debug, Clone)]
pub struct AudioCues {
    tick_base_hz: f32,
    tick_span_hz: f32,
    chime_root_hz: f32,
}

impl AudioCues {
    pub fn new() -> Self {
        Self {
            tick_base_hz: 440.0,
            tick_span_hz: 220.0,
            chime_root_hz: 523.25, // C5
        }
    }

    /// Короткий "тик" шага: высота слегка растет к концу прокрутки.
    pub fn tick(&self, step: usize, total_steps: usize) -> Tone {
        let t = if total_steps > 1 {
            step as f32 / (total_steps - 1) as f32
        } else {
            1.0
        };
        Tone {
            frequency_hz: self.tick_base_hz + self.tick_span_hz * t,
            duration_ms: 60,
            gain: 0.25,
        }
    }

    /// Финальный аккорд: восходящее арпеджио (мажорное трезвучие + октава).
    pub fn success_chime(&self) -> Vec<Tone> {
        // Ratios of a major triad with the octave on top
        const RATIOS: [f32; 4] = [1.0, 1.25, 1.5, 2.0];
        RATIOS
            .iter()
            .map(|r| Tone {
                frequency_hz: self.chime_root_hz * r,
                duration_ms: 180,
                gain: 0.4,
            })
            .collect()
    }
}

impl Default for AudioCues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_pitch_rises_over_the_sequence() {
        let cues = AudioCues::new();
        let first = cues.tick(0, 35);
        let last = cues.tick(34, 35);
        assert!(last.frequency_hz > first.frequency_hz);
    }

    #[test]
    fn chime_is_an_ascending_arpeggio() {
        let chime = AudioCues::new().success_chime();
        assert_eq!(chime.len(), 4);
        for pair in chime.windows(2) {
            assert!(pair[1].frequency_hz > pair[0].frequency_hz);
        }
    }

    #[test]
    fn single_step_sequence_does_not_divide_by_zero() {
        let tone = AudioCues::new().tick(0, 1);
        assert!(tone.frequency_hz.is_finite());
    }
}
