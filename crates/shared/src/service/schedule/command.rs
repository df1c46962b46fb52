use crate::{
    abstract_trait::schedule::{
        repository::command::{CreatedSchedule, DynScheduleCommandRepository},
        service::command::ScheduleCommandServiceTrait,
    },
    domain::requests::schedule::{CreateScheduleRow, CreateScheduledTransactionRequest},
    errors::{ServiceError, format_validation_errors},
    model::schedule::PaymentMethod,
    utils::{normalize_msisdn, parse_schedule_input},
};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info, instrument};
use validator::Validate;

pub struct ScheduleCommandService {
    pub command: DynScheduleCommandRepository,
}

impl ScheduleCommandService {
    pub fn new(command: DynScheduleCommandRepository) -> Self {
        Self { command }
    }
}

#[async_trait]
impl ScheduleCommandServiceTrait for ScheduleCommandService {
    #[instrument(skip(self, req), level = "info")]
    async fn create(
        &self,
        req: &CreateScheduledTransactionRequest,
    ) -> Result<CreatedSchedule, ServiceError> {
        info!(
            "🚀 Creating scheduled tx for user {} product {} at {}",
            req.userid, req.produk_id, req.waktu_pembelian
        );

        // Everything below rejects before any balance is touched.
        if let Err(validation_errors) = req.validate() {
            let error_msg = format_validation_errors(&validation_errors);
            error!("Validation failed: {error_msg}");
            return Err(ServiceError::Validation(vec![error_msg]));
        }

        let metode = PaymentMethod::parse(&req.metode_pembayaran).ok_or_else(|| {
            ServiceError::Validation(vec![format!(
                "metode_pembayaran: unknown payment method {}",
                req.metode_pembayaran
            )])
        })?;

        let msisdn = normalize_msisdn(&req.msisdn).ok_or_else(|| {
            ServiceError::Validation(vec![format!("msisdn: invalid number {}", req.msisdn)])
        })?;

        let waktu_pembelian = parse_schedule_input(&req.waktu_pembelian).ok_or_else(|| {
            ServiceError::Validation(vec![format!(
                "waktu_pembelian: unparseable schedule time {}",
                req.waktu_pembelian
            )])
        })?;

        let row = CreateScheduleRow {
            userid: req.userid,
            produk_id: req.produk_id.clone(),
            produk_nama: req.produk_nama.clone(),
            kategori: req.kategori.clone(),
            harga_jual: req.harga_jual,
            metode_pembayaran: metode.as_str().to_string(),
            msisdn,
            waktu_pembelian,
        };

        let created = self.command.create_with_debit(&row).await.map_err(|e| {
            error!("❌ Failed to create scheduled tx with debit: {e:?}");
            ServiceError::Repo(e)
        })?;

        info!(
            "✅ Scheduled tx {} created for user {}, saldo now {}",
            created.transaction.id, created.transaction.userid, created.saldo_after
        );

        Ok(created)
    }
}
