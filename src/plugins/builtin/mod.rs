//! Commands shipped with the bot

pub mod ball8;
pub mod coinflip;
pub mod help;

pub use ball8::Ball8;
pub use coinflip::CoinFlip;
pub use help::HelpCommand;
