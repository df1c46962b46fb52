pub mod riwayat;
pub mod schedule;
