mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use common::{MemStore, RecordingNotifier, ScriptedProvider, pending_schedule};
use scheduler::worker::{SettlementWorker, WorkerDeps};
use serde_json::json;
use shared::utils::now_in_reference_tz;
use tokio::sync::watch;

fn worker_with(
    store: &Arc<MemStore>,
    provider: &Arc<ScriptedProvider>,
    notifier: &Arc<RecordingNotifier>,
    grace_minutes: i64,
) -> SettlementWorker {
    SettlementWorker::new(
        WorkerDeps {
            schedule_query: store.clone(),
            schedule_command: store.clone(),
            saldo_query: store.clone(),
            saldo_command: store.clone(),
            riwayat_command: store.clone(),
            provider: provider.clone(),
            notifier: notifier.clone(),
        },
        Duration::from_millis(10),
        grace_minutes,
    )
}

#[tokio::test]
async fn provider_success_settles_without_second_ledger_mutation() {
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let now = now_in_reference_tz();
    let tx = pending_schedule(1, 7, 15000, "BALANCE", now);
    store.seed_schedule(tx.clone());

    let provider = Arc::new(ScriptedProvider::returning(json!({
        "success": true,
        "data": { "xl_status": "SUCCESS", "trx_id": "T1" }
    })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);

    worker.process_row(&tx, now).await.unwrap();

    assert_eq!(store.schedule_status(1), "sukses");
    assert_eq!(store.balance(7), 35000);
    assert_eq!(provider.call_count(), 1);
    assert_eq!(notifier.success_count(), 1);
    assert_eq!(notifier.failure_count(), 0);

    let audit = store.audit_entries();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].amount_charged, 15000);
    assert_eq!(audit[0].saldo_tersisa, 35000);
    assert_eq!(audit[0].trx_id, "T1");
    assert_eq!(audit[0].status, "sukses");
}

#[tokio::test]
async fn provider_failed_status_refunds_the_held_amount() {
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let now = now_in_reference_tz();
    let tx = pending_schedule(1, 7, 15000, "BALANCE", now);
    store.seed_schedule(tx.clone());

    let provider = Arc::new(ScriptedProvider::returning(json!({
        "success": true,
        "data": { "xl_status": "FAILED" }
    })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);

    worker.process_row(&tx, now).await.unwrap();

    assert_eq!(store.schedule_status(1), "failed");
    assert_eq!(store.balance(7), 50000);
    assert_eq!(notifier.success_count(), 0);
    assert_eq!(notifier.failure_count(), 1);

    let audit = store.audit_entries();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].amount_charged, 0);
    assert_eq!(audit[0].saldo_tersisa, 50000);
    assert_eq!(audit[0].status, "failed");

    let failure = &notifier.failures.lock().unwrap()[0];
    assert_eq!(failure.refunded_amount, 15000);
    assert_eq!(failure.saldo_akhir, 50000);
}

#[tokio::test]
async fn transport_error_takes_the_refund_path() {
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let now = now_in_reference_tz();
    let tx = pending_schedule(1, 7, 15000, "BALANCE", now);
    store.seed_schedule(tx.clone());

    let provider = Arc::new(ScriptedProvider::failing());
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);

    worker.process_row(&tx, now).await.unwrap();

    assert_eq!(store.schedule_status(1), "failed");
    assert_eq!(store.balance(7), 50000);
    assert_eq!(notifier.failure_count(), 1);
    assert!(store.audit_entries()[0].trx_id.starts_with("scheduled_external_1_"));
}

#[tokio::test]
async fn late_row_expires_without_calling_the_provider() {
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let now = now_in_reference_tz();
    let tx = pending_schedule(1, 7, 15000, "BALANCE", now - ChronoDuration::minutes(10));
    store.seed_schedule(tx.clone());

    let provider = Arc::new(ScriptedProvider::returning(json!({ "success": true })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);

    worker.process_row(&tx, now).await.unwrap();

    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.schedule_status(1), "failed");
    assert_eq!(store.balance(7), 50000);
    assert_eq!(notifier.failure_count(), 1);

    let audit = store.audit_entries();
    assert_eq!(audit[0].amount_charged, 0);
    assert!(audit[0].trx_id.starts_with("refund_1_"));
    assert!(
        audit[0]
            .keterangan
            .as_deref()
            .unwrap()
            .contains("waktu eksekusi terlewat")
    );
}

#[tokio::test]
async fn expiry_threshold_allows_the_last_grace_second() {
    let now = now_in_reference_tz();

    // 59 seconds past schedule with zero grace is still settleable.
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let tx = pending_schedule(1, 7, 15000, "BALANCE", now - ChronoDuration::seconds(59));
    store.seed_schedule(tx.clone());
    let provider = Arc::new(ScriptedProvider::returning(json!({
        "success": true,
        "data": { "xl_status": "SUCCESS" }
    })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);
    worker.process_row(&tx, now).await.unwrap();
    assert_eq!(provider.call_count(), 1);
    assert_eq!(store.schedule_status(1), "sukses");

    // One second later it expires.
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let tx = pending_schedule(1, 7, 15000, "BALANCE", now - ChronoDuration::seconds(60));
    store.seed_schedule(tx.clone());
    let provider = Arc::new(ScriptedProvider::returning(json!({ "success": true })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);
    worker.process_row(&tx, now).await.unwrap();
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.schedule_status(1), "failed");
}

#[tokio::test]
async fn grace_minutes_extend_the_expiry_threshold() {
    let now = now_in_reference_tz();
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let tx = pending_schedule(1, 7, 15000, "BALANCE", now - ChronoDuration::minutes(5));
    store.seed_schedule(tx.clone());

    let provider = Arc::new(ScriptedProvider::returning(json!({
        "success": true,
        "data": { "xl_status": "SUCCESS" }
    })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 5);

    worker.process_row(&tx, now).await.unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(store.schedule_status(1), "sukses");
}

#[tokio::test]
async fn terminal_row_is_never_credited_or_notified_twice() {
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let now = now_in_reference_tz();
    let tx = pending_schedule(1, 7, 15000, "BALANCE", now);
    store.seed_schedule(tx.clone());

    let provider = Arc::new(ScriptedProvider::returning(json!({
        "success": true,
        "data": { "xl_status": "FAILED" }
    })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);

    worker.process_row(&tx, now).await.unwrap();
    assert_eq!(store.balance(7), 50000);

    // The same stale row handed over again is a no-op end to end.
    worker.process_row(&tx, now).await.unwrap();

    assert_eq!(store.balance(7), 50000);
    assert_eq!(notifier.failure_count(), 1);
    assert_eq!(store.audit_entries().len(), 1);
}

#[tokio::test]
async fn qris_success_attaches_the_emv_payload() {
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let now = now_in_reference_tz();
    let tx = pending_schedule(1, 7, 15000, "QRIS", now);
    store.seed_schedule(tx.clone());

    let emv = format!(
        "000201010212{}6304ABCD",
        "26610014COM.GO-JEK.WWW01189360091430123456780210G1234567890303UMI"
    );
    let provider = Arc::new(ScriptedProvider::returning(json!({
        "success": true,
        "data": {
            "xl_status": "SUCCESS",
            "trx_id": "Q1",
            "payment_info": { "qr_code": emv, "payment_url": "https://pay.example/q1" }
        }
    })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);

    worker.process_row(&tx, now).await.unwrap();

    let success = notifier.successes.lock().unwrap()[0].clone();
    assert_eq!(success.qr_string.as_deref(), Some(emv.as_str()));
    assert_eq!(success.payment_link.as_deref(), Some("https://pay.example/q1"));
}

#[tokio::test]
async fn non_qris_success_drops_the_qr_payload() {
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let now = now_in_reference_tz();
    let tx = pending_schedule(1, 7, 15000, "DANA", now);
    store.seed_schedule(tx.clone());

    let provider = Arc::new(ScriptedProvider::returning(json!({
        "success": true,
        "data": { "xl_status": "SUCCESS", "qr_string": "000201010212foo6304ABCD" }
    })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);

    worker.process_row(&tx, now).await.unwrap();

    assert!(notifier.successes.lock().unwrap()[0].qr_string.is_none());
}

#[tokio::test]
async fn run_once_skips_rows_after_stop_is_signaled() {
    let store = Arc::new(MemStore::new());
    store.seed_user(7, "budi", 35000);
    let now = now_in_reference_tz();
    store.seed_schedule(pending_schedule(1, 7, 15000, "BALANCE", now));

    let provider = Arc::new(ScriptedProvider::returning(json!({ "success": true })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = worker_with(&store, &provider, &notifier, 0);

    let (stop_tx, stop_rx) = watch::channel(false);
    stop_tx.send(true).unwrap();
    worker.run_once(&stop_rx).await;

    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.schedule_status(1), "pending");
}

#[tokio::test]
async fn worker_handle_shutdown_stops_the_loop() {
    let store = Arc::new(MemStore::new());
    let provider = Arc::new(ScriptedProvider::returning(json!({ "success": true })));
    let notifier = Arc::new(RecordingNotifier::new());
    let worker = Arc::new(worker_with(&store, &provider, &notifier, 0));

    let handle = worker.start();
    tokio::time::sleep(Duration::from_millis(30)).await;
    handle.shutdown().await;
}
