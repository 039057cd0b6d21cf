mod candidate;
pub mod detect;
pub mod record;
pub mod report;

pub use candidate::{find_repeat_runs, RepeatRun};
pub use detect::{detect, Detection, Params, SeqEnd, TelomereMatch};
pub use record::{stream_records_into_channel, SequenceRecord};
pub use report::SeqReport;
