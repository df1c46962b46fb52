pub mod riwayat;
pub mod saldo;
pub mod schedule;
