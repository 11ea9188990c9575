mod eeg;
mod health;
mod websocket;

pub use eeg::*;
pub use health::*;
pub use websocket::*;
