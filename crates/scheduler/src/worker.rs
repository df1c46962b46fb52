use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use serde_json::Value;
use shared::abstract_trait::{
    notifier::DynNotificationDispatcher,
    provider::DynSettlementProvider,
    riwayat::repository::command::DynRiwayatCommandRepository,
    saldo::repository::{command::DynSaldoCommandRepository, query::DynSaldoQueryRepository},
    schedule::repository::{
        command::DynScheduleCommandRepository, query::DynScheduleQueryRepository,
    },
};
use shared::domain::notification::{FailureNotification, SuccessNotification};
use shared::domain::requests::riwayat::InsertRiwayatRequest;
use shared::model::schedule::{PaymentMethod, ScheduleStatus, ScheduledTransactionModel};
use shared::utils::now_in_reference_tz;
use shared::utils::payload::{
    ProviderFields, extract_payment_artifacts, extract_provider_fields, failure_reason,
    is_provider_success,
};
use shared::utils::qris::is_emv_payload;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Everything the settlement worker needs, behind the trait seams so tests
/// can substitute in-memory doubles.
#[derive(Clone)]
pub struct WorkerDeps {
    pub schedule_query: DynScheduleQueryRepository,
    pub schedule_command: DynScheduleCommandRepository,
    pub saldo_query: DynSaldoQueryRepository,
    pub saldo_command: DynSaldoCommandRepository,
    pub riwayat_command: DynRiwayatCommandRepository,
    pub provider: DynSettlementProvider,
    pub notifier: DynNotificationDispatcher,
}

/// Polls for due pending schedules and drives each one to a terminal status.
/// One instance runs at a time; the conditional status update in the
/// repository is the guard against reprocessing an already-terminal row.
pub struct SettlementWorker {
    deps: WorkerDeps,
    poll_interval: Duration,
    grace_minutes: i64,
}

/// Owner of the spawned worker task. Dropping the handle leaves the task
/// running; call [`WorkerHandle::shutdown`] for an awaited stop.
pub struct WorkerHandle {
    stop: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Signals the worker to stop and waits for it to finish. The row in
    /// flight, if any, completes first.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.join.await {
            error!("❌ Settlement worker task ended abnormally: {e}");
        }
    }
}

impl SettlementWorker {
    pub fn new(deps: WorkerDeps, poll_interval: Duration, grace_minutes: i64) -> Self {
        Self {
            deps,
            poll_interval,
            grace_minutes,
        }
    }

    /// Spawns the polling loop and returns its supervising handle.
    pub fn start(self: Arc<Self>) -> WorkerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let join = tokio::spawn(async move { self.run(stop_rx).await });
        WorkerHandle {
            stop: stop_tx,
            join,
        }
    }

    async fn run(self: Arc<Self>, mut stop: watch::Receiver<bool>) {
        info!(
            "🚀 Settlement worker started (poll every {:?}, grace {} min)",
            self.poll_interval, self.grace_minutes
        );
        loop {
            if *stop.borrow() {
                break;
            }
            self.run_once(&stop).await;
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = stop.changed() => {}
            }
            if *stop.borrow() {
                break;
            }
        }
        info!("Settlement worker stopped");
    }

    /// One polling pass: fetch due rows and process them in scheduled order.
    /// The stop signal is honored between rows; a row already being settled
    /// runs to completion.
    pub async fn run_once(&self, stop: &watch::Receiver<bool>) {
        let now = now_in_reference_tz();
        let due = match self.deps.schedule_query.list_pending_due(now).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("❌ Failed to list due scheduled transactions: {e:?}");
                return;
            }
        };
        if due.is_empty() {
            return;
        }
        info!("Processing {} due scheduled transaction(s)", due.len());

        for tx in &due {
            if *stop.borrow() {
                info!("Stop requested, leaving remaining rows for the next run");
                break;
            }
            if let Err(e) = self.process_row(tx, now).await {
                error!("❌ Scheduled tx {} processing failed: {e:?}", tx.id);
            }
        }
    }

    /// Drives a single row to `sukses` or `failed`. Never returns early
    /// between the status claim and its audit/notification side effects.
    pub async fn process_row(
        &self,
        tx: &ScheduledTransactionModel,
        now: NaiveDateTime,
    ) -> Result<()> {
        let threshold_seconds = self.grace_minutes * 60 + 59;
        let delta_seconds = (now - tx.waktu_pembelian).num_seconds();
        if delta_seconds > threshold_seconds {
            return self.expire(tx, delta_seconds, threshold_seconds).await;
        }
        self.settle(tx).await
    }

    /// The schedule was found too late to honor. The provider is never
    /// called; the held amount goes straight back to the user.
    async fn expire(
        &self,
        tx: &ScheduledTransactionModel,
        delta_seconds: i64,
        threshold_seconds: i64,
    ) -> Result<()> {
        if !self.claim(tx.id, ScheduleStatus::Failed).await? {
            return Ok(());
        }

        let saldo_sebelum = self.deps.saldo_query.get_balance(tx.userid).await.ok();
        let saldo_akhir = self.deps.saldo_command.credit(tx.userid, tx.harga_jual).await?;
        let trx_id = format!("refund_{}_{}", tx.id, Utc::now().timestamp());

        self.deps
            .riwayat_command
            .insert(&InsertRiwayatRequest {
                user_id: tx.userid.to_string(),
                msisdn: tx.msisdn.clone(),
                produk_id: tx.produk_id.clone(),
                produk_nama: tx.produk_nama.clone(),
                kategori: tx.kategori.clone(),
                harga_jual: tx.harga_jual,
                metode_pembayaran: tx.metode_pembayaran.clone(),
                amount_charged: 0,
                saldo_tersisa: saldo_akhir,
                trx_id: trx_id.clone(),
                status: ScheduleStatus::Failed.as_str().to_string(),
                keterangan: Some(format!(
                    "Refund karena waktu eksekusi terlewat untuk transaksi terjadwal id={}",
                    tx.id
                )),
            })
            .await?;

        self.deps
            .notifier
            .notify_failure(&FailureNotification {
                user_id: tx.userid,
                username: self.username(tx.userid).await,
                produk_nama: tx.produk_nama.clone(),
                harga: tx.harga_jual,
                msisdn: tx.msisdn.clone(),
                trx_id,
                metode_pembayaran: tx.metode_pembayaran.clone(),
                saldo_sebelum,
                saldo_akhir,
                refunded_amount: tx.harga_jual,
                reason: "Waktu eksekusi terlewat; saldo dikembalikan.".to_string(),
                provider_message: None,
            })
            .await;

        info!(
            "Scheduled tx {} expired (delta={delta_seconds}s threshold={threshold_seconds}s); refunded {} to user {}",
            tx.id, tx.harga_jual, tx.userid
        );
        Ok(())
    }

    async fn settle(&self, tx: &ScheduledTransactionModel) -> Result<()> {
        info!(
            "Calling settlement API for tx={} produk={} msisdn={} metode={}",
            tx.id, tx.produk_id, tx.msisdn, tx.metode_pembayaran
        );

        match self
            .deps
            .provider
            .settle(&tx.produk_id, &tx.msisdn, &tx.metode_pembayaran)
            .await
        {
            Ok(body) => {
                let fields = extract_provider_fields(&body);
                let trx_id = fields
                    .trx_id
                    .clone()
                    .unwrap_or_else(|| fallback_trx_id(tx.id));
                if is_provider_success(&body, &fields) {
                    self.finish_success(tx, &body, &fields, trx_id).await
                } else {
                    let reason = failure_reason(&body, &fields);
                    self.finish_failure(tx, trx_id, reason, fields.message.clone())
                        .await
                }
            }
            Err(e) => {
                warn!("⚠️ Settlement call failed for scheduled tx {}: {e}", tx.id);
                self.finish_failure(tx, fallback_trx_id(tx.id), e.to_string(), None)
                    .await
            }
        }
    }

    /// The amount was already debited at creation, so success only records
    /// the outcome. No ledger mutation happens here.
    async fn finish_success(
        &self,
        tx: &ScheduledTransactionModel,
        body: &Value,
        fields: &ProviderFields,
        trx_id: String,
    ) -> Result<()> {
        if !self.claim(tx.id, ScheduleStatus::Sukses).await? {
            return Ok(());
        }

        let saldo_akhir = self.deps.saldo_query.get_balance(tx.userid).await?;

        self.deps
            .riwayat_command
            .insert(&InsertRiwayatRequest {
                user_id: tx.userid.to_string(),
                msisdn: tx.msisdn.clone(),
                produk_id: tx.produk_id.clone(),
                produk_nama: tx.produk_nama.clone(),
                kategori: tx.kategori.clone(),
                harga_jual: tx.harga_jual,
                metode_pembayaran: tx.metode_pembayaran.clone(),
                amount_charged: tx.harga_jual,
                saldo_tersisa: saldo_akhir,
                trx_id: trx_id.clone(),
                status: ScheduleStatus::Sukses.as_str().to_string(),
                keterangan: fields.message.clone().or_else(|| fields.description.clone()),
            })
            .await?;

        let artifacts = extract_payment_artifacts(body);
        let is_qris = PaymentMethod::parse(&tx.metode_pembayaran) == Some(PaymentMethod::Qris);
        let qr_string = artifacts
            .qr_string
            .filter(|qr| is_qris && is_emv_payload(qr));

        self.deps
            .notifier
            .notify_success(&SuccessNotification {
                user_id: tx.userid,
                username: self.username(tx.userid).await,
                produk_nama: tx.produk_nama.clone(),
                harga: tx.harga_jual,
                msisdn: tx.msisdn.clone(),
                trx_id: trx_id.clone(),
                metode_pembayaran: tx.metode_pembayaran.clone(),
                saldo_akhir,
                payment_link: artifacts.payment_link,
                qr_string,
            })
            .await;

        info!(
            "✅ Scheduled tx {} settled -> sukses trx={} user={} produk={}",
            tx.id, trx_id, tx.userid, tx.produk_id
        );
        Ok(())
    }

    /// Declined by the provider, or the call itself failed. Either way the
    /// purchase did not happen, so the held amount is credited back.
    async fn finish_failure(
        &self,
        tx: &ScheduledTransactionModel,
        trx_id: String,
        reason: String,
        provider_message: Option<String>,
    ) -> Result<()> {
        if !self.claim(tx.id, ScheduleStatus::Failed).await? {
            return Ok(());
        }

        let saldo_sebelum = self.deps.saldo_query.get_balance(tx.userid).await.ok();
        let saldo_akhir = self.deps.saldo_command.credit(tx.userid, tx.harga_jual).await?;

        self.deps
            .riwayat_command
            .insert(&InsertRiwayatRequest {
                user_id: tx.userid.to_string(),
                msisdn: tx.msisdn.clone(),
                produk_id: tx.produk_id.clone(),
                produk_nama: tx.produk_nama.clone(),
                kategori: tx.kategori.clone(),
                harga_jual: tx.harga_jual,
                metode_pembayaran: tx.metode_pembayaran.clone(),
                amount_charged: 0,
                saldo_tersisa: saldo_akhir,
                trx_id: trx_id.clone(),
                status: ScheduleStatus::Failed.as_str().to_string(),
                keterangan: Some(format!(
                    "Refund karena API gagal saat mengeksekusi transaksi terjadwal id={}; pesan API: {reason}",
                    tx.id
                )),
            })
            .await?;

        self.deps
            .notifier
            .notify_failure(&FailureNotification {
                user_id: tx.userid,
                username: self.username(tx.userid).await,
                produk_nama: tx.produk_nama.clone(),
                harga: tx.harga_jual,
                msisdn: tx.msisdn.clone(),
                trx_id: trx_id.clone(),
                metode_pembayaran: tx.metode_pembayaran.clone(),
                saldo_sebelum,
                saldo_akhir,
                refunded_amount: tx.harga_jual,
                reason,
                provider_message,
            })
            .await;

        info!(
            "Scheduled tx {} marked failed and refunded {} to user {} trx={}",
            tx.id, tx.harga_jual, tx.userid, trx_id
        );
        Ok(())
    }

    /// Claims the pending row for the given terminal status. A false return
    /// means another pass already settled it and every side effect must be
    /// skipped, refund included.
    async fn claim(&self, id: i64, status: ScheduleStatus) -> Result<bool> {
        let claimed = self.deps.schedule_command.update_status(id, status).await?;
        if !claimed {
            warn!("⚠️ Scheduled tx {id} is no longer pending, skipping");
        }
        Ok(claimed)
    }

    async fn username(&self, userid: i64) -> Option<String> {
        match self.deps.saldo_query.find_by_user(userid).await {
            Ok(Some(user)) => user.username,
            _ => None,
        }
    }
}

fn fallback_trx_id(id: i64) -> String {
    format!("scheduled_external_{}_{}", id, Utc::now().timestamp())
}
