// Charshift Output Layer
// Outgoing keyboard report assembly

mod report;

pub use report::{KeyboardReport, REPORT_KEY_SLOTS};
