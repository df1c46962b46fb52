pub mod notifier;
pub mod provider;
pub mod riwayat;
pub mod saldo;
pub mod schedule;
