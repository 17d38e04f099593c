mod status;
mod tally;

pub use status::{Assessment, ParseStatusError, Reading, Status, Thresholds};
pub use tally::StatusTally;
