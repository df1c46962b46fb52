use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use shared::{
    abstract_trait::{
        notifier::DynNotificationDispatcher,
        provider::DynSettlementProvider,
        riwayat::repository::{
            command::DynRiwayatCommandRepository, query::DynRiwayatQueryRepository,
        },
        saldo::repository::{command::DynSaldoCommandRepository, query::DynSaldoQueryRepository},
        schedule::{
            repository::{
                command::DynScheduleCommandRepository, query::DynScheduleQueryRepository,
            },
            service::{command::DynScheduleCommandService, query::DynScheduleQueryService},
        },
    },
    config::{Config, ConnectionPool},
    repository::{
        riwayat::{command::RiwayatCommandRepository, query::RiwayatQueryRepository},
        saldo::{command::SaldoCommandRepository, query::SaldoQueryRepository},
        schedule::{command::ScheduleCommandRepository, query::ScheduleQueryRepository},
    },
    service::schedule::{command::ScheduleCommandService, query::ScheduleQueryService},
    session::{DraftSchedule, SessionStore},
};

use crate::notifier::TelegramNotifier;
use crate::provider::SettlementProviderClient;
use crate::worker::{SettlementWorker, WorkerDeps};

/// Wires repositories, services, adapters and the worker together.
#[derive(Clone)]
pub struct DependenciesInject {
    pub schedule_command: DynScheduleCommandService,
    pub schedule_query: DynScheduleQueryService,
    pub riwayat_query: DynRiwayatQueryRepository,
    pub sessions: Arc<SessionStore<DraftSchedule>>,
    pub worker: Arc<SettlementWorker>,
}

impl DependenciesInject {
    pub fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        let schedule_query_repo = Arc::new(ScheduleQueryRepository::new(pool.clone()))
            as DynScheduleQueryRepository;
        let schedule_command_repo = Arc::new(ScheduleCommandRepository::new(pool.clone()))
            as DynScheduleCommandRepository;
        let saldo_query_repo =
            Arc::new(SaldoQueryRepository::new(pool.clone())) as DynSaldoQueryRepository;
        let saldo_command_repo =
            Arc::new(SaldoCommandRepository::new(pool.clone())) as DynSaldoCommandRepository;
        let riwayat_command_repo =
            Arc::new(RiwayatCommandRepository::new(pool.clone())) as DynRiwayatCommandRepository;
        let riwayat_query = Arc::new(RiwayatQueryRepository::new(pool)) as DynRiwayatQueryRepository;

        let provider = Arc::new(
            SettlementProviderClient::new(config)
                .context("Failed to build settlement provider client")?,
        ) as DynSettlementProvider;
        let notifier = Arc::new(TelegramNotifier::new(config)) as DynNotificationDispatcher;

        let schedule_command = Arc::new(ScheduleCommandService::new(schedule_command_repo.clone()))
            as DynScheduleCommandService;
        let schedule_query = Arc::new(ScheduleQueryService::new(schedule_query_repo.clone()))
            as DynScheduleQueryService;

        let sessions = Arc::new(SessionStore::new(Duration::from_secs(
            config.session_ttl_secs,
        )));

        let worker = Arc::new(SettlementWorker::new(
            WorkerDeps {
                schedule_query: schedule_query_repo,
                schedule_command: schedule_command_repo,
                saldo_query: saldo_query_repo,
                saldo_command: saldo_command_repo,
                riwayat_command: riwayat_command_repo,
                provider,
                notifier,
            },
            Duration::from_secs(config.poll_interval_secs),
            config.grace_minutes,
        ));

        Ok(Self {
            schedule_command,
            schedule_query,
            riwayat_query,
            sessions,
            worker,
        })
    }
}
