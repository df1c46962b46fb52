use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

/// Partially collected schedule input for one user, held between prompts by
/// whatever front end drives creation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DraftSchedule {
    pub produk_id: Option<String>,
    pub produk_nama: Option<String>,
    pub kategori: Option<String>,
    pub harga_jual: Option<i64>,
    pub metode_pembayaran: Option<String>,
    pub msisdn: Option<String>,
    pub waktu_pembelian: Option<String>,
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Per-user session state with an explicit TTL. Expired entries are treated
/// as absent on read and swept opportunistically on write.
pub struct SessionStore<V> {
    ttl: Duration,
    entries: Mutex<HashMap<i64, Entry<V>>>,
}

impl<V: Clone> SessionStore<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores `value` for `userid`, resetting its TTL.
    pub fn put(&self, userid: i64, value: V) {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            userid,
            Entry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn get(&self, userid: i64) -> Option<V> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(&userid)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone())
    }

    /// Removes and returns the session, expired or not.
    pub fn take(&self, userid: i64) -> Option<V> {
        self.entries
            .lock()
            .unwrap()
            .remove(&userid)
            .map(|e| e.value)
    }

    pub fn remove(&self, userid: i64) {
        if self.entries.lock().unwrap().remove(&userid).is_some() {
            debug!("🧹 Session for user {userid} cleared");
        }
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
