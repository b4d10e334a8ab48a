pub mod gauge;
pub mod instruction;
pub mod measurements;
pub mod schedule;
pub mod stitch_pattern;

pub use gauge::*;
pub use instruction::*;
pub use measurements::*;
pub use schedule::*;
pub use stitch_pattern::*;
