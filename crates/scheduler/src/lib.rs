pub mod di;
pub mod notifier;
pub mod provider;
pub mod worker;
