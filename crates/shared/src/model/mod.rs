pub mod riwayat;
pub mod schedule;
pub mod user;
