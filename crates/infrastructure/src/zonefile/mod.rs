mod line;
mod parser;

pub use line::{classify, split_record, LineKind, RecordSpec};
pub use parser::{ParsedZone, ZoneFileParser};
