//! 进程内存储后端
//!
//! 与远程后端相同的读取次数 / TTL 语义，数据随进程退出丢失。
//! 过期记录在下一次写入时统一清理。

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use super::{SecretStore, StoreRequest, StoredSecret};
use crate::crypto::EncryptedPayload;
use crate::error::{HidrError, Result};
use crate::token::OpaqueId;

struct Record {
    payload: EncryptedPayload,
    remaining_reads: Option<u32>,
    expires_at: Option<Instant>,
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<OpaqueId, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前保存的记录数（含尚未清理的过期记录）
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<OpaqueId, Record>>> {
        self.records
            .lock()
            .map_err(|_| HidrError::backend("memory store lock poisoned"))
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn store(&self, request: StoreRequest) -> Result<OpaqueId> {
        if request.reads == Some(0) {
            return Err(HidrError::backend("read limit must be at least 1"));
        }

        let mut records = self.records()?;

        let now = Instant::now();
        records.retain(|_, r| r.expires_at.is_none_or(|at| now < at));

        let mut id = OpaqueId::generate()?;
        while records.contains_key(&id) {
            id = OpaqueId::generate()?;
        }

        let expires_at = request.ttl.and_then(|ttl| now.checked_add(ttl));

        records.insert(
            id,
            Record {
                payload: request.payload,
                remaining_reads: request.reads,
                expires_at,
            },
        );

        debug!(%id, "stored secret in memory");
        Ok(id)
    }

    async fn retrieve(&self, id: &OpaqueId) -> Result<StoredSecret> {
        let mut records = self.records()?;

        let record = records
            .get_mut(id)
            .ok_or_else(|| HidrError::backend(format!("secret {id} not found")))?;

        if record.expires_at.is_some_and(|at| Instant::now() >= at) {
            records.remove(id);
            return Err(HidrError::backend(format!("secret {id} has expired")));
        }

        let remaining_reads = record.remaining_reads.map(|n| n.saturating_sub(1));
        record.remaining_reads = remaining_reads;
        let payload = record.payload.clone();

        if remaining_reads == Some(0) {
            records.remove(id);
        }

        Ok(StoredSecret {
            payload,
            remaining_reads,
        })
    }
}
