pub mod drawing;
pub mod notify;
