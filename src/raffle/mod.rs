pub mod pool;
pub mod draw;
pub mod audio;
pub mod confetti;
pub mod animator;

pub use animator::{DrawAnimator, DrawProgress};
pub use audio::AudioCues;
pub use draw::{DrawError, DrawTuning, RevealPlan};
pub use pool::EligiblePool;
