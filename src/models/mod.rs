pub mod user;
pub mod raffle;
pub mod section;
pub mod seat;

pub use user::User;
pub use raffle::{Raffle, RaffleWinner};
pub use section::Section;
pub use seat::Seat;
