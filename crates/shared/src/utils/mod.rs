mod format;
mod gracefull;
mod logs;
mod msisdn;
mod parse_datetime;
pub mod payload;
pub mod qris;

pub use self::format::format_rupiah;
pub use self::gracefull::shutdown_signal;
pub use self::logs::init_logger;
pub use self::msisdn::normalize_msisdn;
pub use self::parse_datetime::{
    format_wallclock, now_in_reference_tz, parse_schedule_input,
};
