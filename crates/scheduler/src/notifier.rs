use async_trait::async_trait;
use serde_json::json;
use shared::abstract_trait::notifier::NotificationDispatcherTrait;
use shared::config::Config;
use shared::domain::notification::{FailureNotification, SuccessNotification};
use shared::utils::{format_rupiah, format_wallclock, now_in_reference_tz};
use tracing::{debug, warn};

/// Telegram delivery of settlement outcomes to the user and the operator.
/// Every failure in here is logged and swallowed.
pub struct TelegramNotifier {
    http: reqwest::Client,
    token: Option<String>,
    admin_chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: config.notification_token.clone(),
            admin_chat_id: config.admin_chat_id.clone(),
        }
    }

    async fn send_message(&self, token: &str, chat_id: &str, text: &str) {
        let url = format!("https://api.telegram.org/bot{token}/sendMessage");
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });
        match self.http.post(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => warn!(
                "⚠️ Notification to chat {chat_id} rejected with HTTP {}",
                resp.status().as_u16()
            ),
            Err(e) => warn!("⚠️ Notification to chat {chat_id} failed: {e}"),
        }
    }

    async fn dispatch(&self, user_chat: String, user_msg: String, admin_msg: String) {
        let Some(token) = self.token.as_deref() else {
            debug!("No notification token configured, skipping notifications");
            return;
        };
        if let Some(admin) = self.admin_chat_id.as_deref() {
            self.send_message(token, admin, &admin_msg).await;
        }
        self.send_message(token, &user_chat, &user_msg).await;
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn is_http_url(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn build_success_messages(n: &SuccessNotification) -> (String, String) {
    let waktu = format_wallclock(now_in_reference_tz());
    let harga = format_rupiah(n.harga);
    let saldo = format_rupiah(n.saldo_akhir);
    let username = n.username.as_deref().unwrap_or("-");

    let mut admin_msg = format!(
        "🔔 <b>Notifikasi Transaksi Baru</b>\n\
         • Waktu (Jakarta): <code>{}</code>\n\
         • User: @{} (<code>{}</code>)\n\
         • Produk: <b>{}</b>\n\
         • Harga: <b>{}</b>\n\
         • Metode: <b>{}</b>\n\
         • Nomor: <code>{}</code>\n\
         • ID Transaksi: <code>{}</code>\n\
         • Saldo user: <b>{}</b>\n",
        escape_html(&waktu),
        escape_html(username),
        n.user_id,
        escape_html(&n.produk_nama),
        harga,
        escape_html(&n.metode_pembayaran),
        escape_html(&n.msisdn),
        escape_html(&n.trx_id),
        saldo,
    );

    let mut user_msg = format!(
        "✅ <b>Transaksi Selesai</b>\n\
         • Waktu (Jakarta): <code>{}</code>\n\
         • Produk: <b>{}</b>\n\
         • Harga: <b>{}</b>\n\
         • Metode: <b>{}</b>\n\
         • Nomor: <code>{}</code>\n\
         • ID Transaksi: <code>{}</code>\n\
         • Saldo Anda: <b>{}</b>\n\n\
         Terima kasih telah menggunakan layanan kami.",
        escape_html(&waktu),
        escape_html(&n.produk_nama),
        harga,
        escape_html(&n.metode_pembayaran),
        escape_html(&n.msisdn),
        escape_html(&n.trx_id),
        saldo,
    );

    if let Some(qr) = &n.qr_string {
        let block = format!("\n• Data QRIS: <code>{}</code>\n", escape_html(qr));
        admin_msg.push_str(&block);
        user_msg.push_str(&block);
    }
    if let Some(link) = &n.payment_link {
        if is_http_url(link) {
            let block = format!("\n• Link Pembayaran: {}\n", escape_html(link));
            admin_msg.push_str(&block);
            user_msg.push_str(&block);
        }
    }

    (admin_msg, user_msg)
}

pub fn build_failure_messages(n: &FailureNotification) -> (String, String) {
    let waktu = format_wallclock(now_in_reference_tz());
    let harga = format_rupiah(n.harga);
    let saldo = format_rupiah(n.saldo_akhir);
    let username = n.username.as_deref().unwrap_or("-");
    let prev_saldo = n
        .saldo_sebelum
        .map(format_rupiah)
        .unwrap_or_else(|| "-".to_string());
    let refunded = if n.refunded_amount > 0 {
        format_rupiah(n.refunded_amount)
    } else {
        "-".to_string()
    };

    let mut admin_msg = format!(
        "❗ <b>Notifikasi Transaksi Gagal</b>\n\
         • Waktu (Jakarta): <code>{}</code>\n\
         • User: @{} (<code>{}</code>)\n\
         • Produk: <b>{}</b>\n\
         • Harga: <b>{}</b>\n\
         • Metode: <b>{}</b>\n\
         • Nomor: <code>{}</code>\n\
         • ID Transaksi (lokal): <code>{}</code>\n\
         • Saldo sebelum: <b>{}</b>\n\
         • Jumlah refund: <b>{}</b>\n\
         • Saldo saat ini: <b>{}</b>\n\
         • Alasan: {}\n",
        escape_html(&waktu),
        escape_html(username),
        n.user_id,
        escape_html(&n.produk_nama),
        harga,
        escape_html(&n.metode_pembayaran),
        escape_html(&n.msisdn),
        escape_html(&n.trx_id),
        prev_saldo,
        refunded,
        saldo,
        escape_html(&n.reason),
    );
    if let Some(msg) = &n.provider_message {
        admin_msg.push_str(&format!("• Pesan API: <code>{}</code>\n", escape_html(msg)));
    }

    let mut user_msg = format!(
        "❗ <b>Transaksi Gagal</b>\n\
         • Waktu (Jakarta): <code>{}</code>\n\
         • Produk: <b>{}</b>\n\
         • Harga: <b>{}</b>\n\
         • Metode: <b>{}</b>\n",
        escape_html(&waktu),
        escape_html(&n.produk_nama),
        harga,
        escape_html(&n.metode_pembayaran),
    );
    if n.refunded_amount > 0 {
        user_msg.push_str(&format!(
            "• Saldo sebelum: <b>{prev_saldo}</b>\n• Refund: <b>{refunded}</b>\n• Saldo saat ini: <b>{saldo}</b>\n"
        ));
    } else {
        user_msg.push_str(&format!("• Saldo Anda: <b>{saldo}</b>\n"));
    }
    let reason = n.provider_message.as_deref().unwrap_or(&n.reason);
    user_msg.push_str(&format!("• Alasan: {}\n", escape_html(reason)));
    user_msg.push_str(&format!("• ID: <code>{}</code>\n", escape_html(&n.trx_id)));

    (admin_msg, user_msg)
}

#[async_trait]
impl NotificationDispatcherTrait for TelegramNotifier {
    async fn notify_success(&self, notification: &SuccessNotification) {
        let (admin_msg, user_msg) = build_success_messages(notification);
        self.dispatch(notification.user_id.to_string(), user_msg, admin_msg)
            .await;
    }

    async fn notify_failure(&self, notification: &FailureNotification) {
        let (admin_msg, user_msg) = build_failure_messages(notification);
        self.dispatch(notification.user_id.to_string(), user_msg, admin_msg)
            .await;
    }
}
