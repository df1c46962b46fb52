#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde_json::Value;
use shared::abstract_trait::{
    notifier::NotificationDispatcherTrait,
    provider::SettlementProviderTrait,
    riwayat::repository::command::RiwayatCommandRepositoryTrait,
    saldo::repository::{command::SaldoCommandRepositoryTrait, query::SaldoQueryRepositoryTrait},
    schedule::repository::{
        command::{CreatedSchedule, ScheduleCommandRepositoryTrait},
        query::ScheduleQueryRepositoryTrait,
    },
};
use shared::domain::notification::{FailureNotification, SuccessNotification};
use shared::domain::requests::riwayat::InsertRiwayatRequest;
use shared::domain::requests::schedule::{CreateScheduleRow, FindSchedulesByUser};
use shared::errors::{ProviderError, RepositoryError};
use shared::model::riwayat::RiwayatModel;
use shared::model::schedule::{ScheduleStatus, ScheduledTransactionModel};
use shared::model::user::UserModel;

/// In-memory stand-in for the three Postgres tables.
pub struct MemStore {
    pub users: Mutex<HashMap<i64, (Option<String>, i64)>>,
    pub schedules: Mutex<HashMap<i64, ScheduledTransactionModel>>,
    pub riwayat: Mutex<Vec<RiwayatModel>>,
    next_schedule_id: AtomicI64,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            schedules: Mutex::new(HashMap::new()),
            riwayat: Mutex::new(Vec::new()),
            next_schedule_id: AtomicI64::new(1),
        }
    }

    pub fn seed_user(&self, userid: i64, username: &str, saldo: i64) {
        self.users
            .lock()
            .unwrap()
            .insert(userid, (Some(username.to_string()), saldo));
    }

    pub fn seed_schedule(&self, row: ScheduledTransactionModel) {
        self.next_schedule_id.fetch_max(row.id + 1, Ordering::SeqCst);
        self.schedules.lock().unwrap().insert(row.id, row);
    }

    pub fn balance(&self, userid: i64) -> i64 {
        self.users.lock().unwrap().get(&userid).unwrap().1
    }

    pub fn schedule_status(&self, id: i64) -> String {
        self.schedules.lock().unwrap().get(&id).unwrap().status.clone()
    }

    pub fn audit_entries(&self) -> Vec<RiwayatModel> {
        self.riwayat.lock().unwrap().clone()
    }

    fn apply_balance(&self, userid: i64, compute: impl Fn(i64) -> i64) -> Result<i64, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let entry = users.get_mut(&userid).ok_or(RepositoryError::NotFound)?;
        entry.1 = compute(entry.1);
        Ok(entry.1)
    }
}

#[async_trait]
impl ScheduleQueryRepositoryTrait for MemStore {
    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<ScheduledTransactionModel>, RepositoryError> {
        Ok(self.schedules.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_user(
        &self,
        req: &FindSchedulesByUser,
    ) -> Result<Vec<ScheduledTransactionModel>, RepositoryError> {
        let mut rows: Vec<_> = self
            .schedules
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.userid == req.userid)
            .cloned()
            .collect();
        rows.sort_by_key(|r| std::cmp::Reverse(r.id));
        rows.truncate(req.limit as usize);
        Ok(rows)
    }

    async fn list_pending_due(
        &self,
        cutoff: NaiveDateTime,
    ) -> Result<Vec<ScheduledTransactionModel>, RepositoryError> {
        let mut rows: Vec<_> = self
            .schedules
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.status == "pending" && r.waktu_pembelian <= cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.waktu_pembelian);
        Ok(rows)
    }
}

#[async_trait]
impl ScheduleCommandRepositoryTrait for MemStore {
    async fn create_with_debit(
        &self,
        req: &CreateScheduleRow,
    ) -> Result<CreatedSchedule, RepositoryError> {
        let saldo_after = self.apply_balance(req.userid, |s| (s - req.harga_jual).max(0))?;

        let id = self.next_schedule_id.fetch_add(1, Ordering::SeqCst);
        let record = ScheduledTransactionModel {
            id,
            userid: req.userid,
            produk_id: req.produk_id.clone(),
            produk_nama: req.produk_nama.clone(),
            kategori: req.kategori.clone(),
            harga_jual: req.harga_jual,
            metode_pembayaran: req.metode_pembayaran.clone(),
            msisdn: req.msisdn.clone(),
            waktu_pembelian: req.waktu_pembelian,
            status: "pending".to_string(),
            created_at: None,
        };
        self.schedules.lock().unwrap().insert(id, record.clone());

        self.insert(&InsertRiwayatRequest {
            user_id: req.userid.to_string(),
            msisdn: req.msisdn.clone(),
            produk_id: req.produk_id.clone(),
            produk_nama: req.produk_nama.clone(),
            kategori: req.kategori.clone(),
            harga_jual: req.harga_jual,
            metode_pembayaran: req.metode_pembayaran.clone(),
            amount_charged: req.harga_jual,
            saldo_tersisa: saldo_after,
            trx_id: format!("local_{}_{}", id, Utc::now().timestamp()),
            status: "sukses".to_string(),
            keterangan: Some(format!(
                "Saldo dipotong saat menyimpan transaksi terjadwal id={id}"
            )),
        })
        .await?;

        Ok(CreatedSchedule {
            transaction: record,
            saldo_after,
        })
    }

    async fn update_status(
        &self,
        id: i64,
        status: ScheduleStatus,
    ) -> Result<bool, RepositoryError> {
        let mut schedules = self.schedules.lock().unwrap();
        match schedules.get_mut(&id) {
            Some(row) if row.status == "pending" => {
                row.status = status.as_str().to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl SaldoQueryRepositoryTrait for MemStore {
    async fn find_by_user(&self, userid: i64) -> Result<Option<UserModel>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(&userid).map(|(username, saldo)| UserModel {
            userid,
            username: username.clone(),
            saldo: *saldo,
            role: None,
            tanggal_daftar: None,
            status: None,
        }))
    }

    async fn get_balance(&self, userid: i64) -> Result<i64, RepositoryError> {
        self.users
            .lock()
            .unwrap()
            .get(&userid)
            .map(|(_, saldo)| *saldo)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl SaldoCommandRepositoryTrait for MemStore {
    async fn debit(&self, userid: i64, amount: i64) -> Result<i64, RepositoryError> {
        self.apply_balance(userid, |s| (s - amount).max(0))
    }

    async fn credit(&self, userid: i64, amount: i64) -> Result<i64, RepositoryError> {
        self.apply_balance(userid, |s| s + amount)
    }
}

#[async_trait]
impl RiwayatCommandRepositoryTrait for MemStore {
    async fn insert(&self, req: &InsertRiwayatRequest) -> Result<RiwayatModel, RepositoryError> {
        let mut riwayat = self.riwayat.lock().unwrap();
        let record = RiwayatModel {
            id: riwayat.len() as i64 + 1,
            user_id: req.user_id.clone(),
            msisdn: req.msisdn.clone(),
            produk_id: req.produk_id.clone(),
            produk_nama: req.produk_nama.clone(),
            kategori: req.kategori.clone(),
            harga_jual: req.harga_jual,
            metode_pembayaran: req.metode_pembayaran.clone(),
            amount_charged: req.amount_charged,
            saldo_tersisa: req.saldo_tersisa,
            trx_id: req.trx_id.clone(),
            status: req.status.clone(),
            waktu: None,
            keterangan: req.keterangan.clone(),
        };
        riwayat.push(record.clone());
        Ok(record)
    }
}

/// Provider double returning one scripted body, or a transport error when no
/// body is scripted. Counts calls so tests can assert the provider was never
/// reached.
pub struct ScriptedProvider {
    pub response: Mutex<Option<Value>>,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn returning(body: Value) -> Self {
        Self {
            response: Mutex::new(Some(body)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettlementProviderTrait for ScriptedProvider {
    async fn settle(
        &self,
        _produk_id: &str,
        _msisdn: &str,
        _metode_pembayaran: &str,
    ) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.response.lock().unwrap().clone() {
            Some(body) => Ok(body),
            None => Err(ProviderError::Transport("connection refused".to_string())),
        }
    }
}

/// Notifier double recording every delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<SuccessNotification>>,
    pub failures: Mutex<Vec<FailureNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successes.lock().unwrap().len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationDispatcherTrait for RecordingNotifier {
    async fn notify_success(&self, notification: &SuccessNotification) {
        self.successes.lock().unwrap().push(notification.clone());
    }

    async fn notify_failure(&self, notification: &FailureNotification) {
        self.failures.lock().unwrap().push(notification.clone());
    }
}

/// A pending schedule row with the usual test product.
pub fn pending_schedule(
    id: i64,
    userid: i64,
    harga_jual: i64,
    metode_pembayaran: &str,
    waktu_pembelian: NaiveDateTime,
) -> ScheduledTransactionModel {
    ScheduledTransactionModel {
        id,
        userid,
        produk_id: "XL5GB".to_string(),
        produk_nama: "XL Data 5GB".to_string(),
        kategori: "Data".to_string(),
        harga_jual,
        metode_pembayaran: metode_pembayaran.to_string(),
        msisdn: "6281234567890".to_string(),
        waktu_pembelian,
        status: "pending".to_string(),
        created_at: None,
    }
}
