pub mod dispatch;
pub mod generate;
pub mod profiles;
pub mod validate;

pub use dispatch::dispatch;
