//! The admission state machine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use keygate_auth::license::ClientTokenDeriver;
use keygate_core::error::AppError;
use keygate_core::result::AppResult;
use keygate_core::types::KeyId;
use keygate_database::store::{KeyStore, SessionRegistry};
use keygate_entity::audit::CreateApiLogEntry;
use keygate_entity::key::{KeyStatus, KeyType, KeyUpdate, LicenseKey};
use keygate_entity::session::UpsertSession;

use super::error::AdmissionError;
use super::lock::KeyLockRegistry;
use super::request::{ClientInfo, ConnectRequest, DisconnectRequest, present};
use super::resolver::resolve_credential;
use super::{ADMISSION_METHOD, CONNECT_ENDPOINT, DISCONNECT_ENDPOINT};
use crate::audit::AuditLogger;
use crate::reclaim::SessionReclaimer;

/// A successful connect.
#[derive(Debug, Clone)]
pub struct ConnectGrant {
    /// Legacy client token.
    pub token: String,
    /// When the decision was made.
    pub issued_at: DateTime<Utc>,
    /// The key after `last_used` and `current_users` were written.
    pub key: LicenseKey,
    /// Whether the pair already held a slot.
    pub refreshed: bool,
}

/// Read-only status of a key, as reported by `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValidation {
    /// The credential matched no key secret.
    Unknown,
    /// The credential matched a key.
    Known {
        /// Active and not past expiry.
        valid: bool,
        /// Tier.
        key_type: KeyType,
        /// Stored status, never rewritten by this check.
        status: KeyStatus,
        /// Expiry.
        expires_at: Option<DateTime<Utc>>,
    },
}

/// Outcome of the locked section of connect, with the keys a reclaim pass
/// touched so they can be recounted once the lock is released.
struct LockedAdmission {
    reclaimed: Vec<KeyId>,
    result: Result<(LicenseKey, bool), AdmissionError>,
}

/// Decides connect and disconnect requests.
#[derive(Debug, Clone)]
pub struct AdmissionEngine {
    keys: Arc<dyn KeyStore>,
    sessions: Arc<dyn SessionRegistry>,
    audit: AuditLogger,
    reclaimer: SessionReclaimer,
    tokens: ClientTokenDeriver,
}

impl AdmissionEngine {
    /// Creates a new admission engine.
    pub fn new(
        keys: Arc<dyn KeyStore>,
        sessions: Arc<dyn SessionRegistry>,
        audit: AuditLogger,
        reclaimer: SessionReclaimer,
        tokens: ClientTokenDeriver,
    ) -> Self {
        Self {
            keys,
            sessions,
            audit,
            reclaimer,
            tokens,
        }
    }

    fn locks(&self) -> &KeyLockRegistry {
        self.reclaimer.locks()
    }

    /// Try to occupy a slot of the key named by `request.credential`.
    ///
    /// Every denial except an internal failure is written to the audit trail
    /// before it is returned.
    pub async fn connect(&self, request: ConnectRequest) -> Result<ConnectGrant, AdmissionError> {
        let ConnectRequest {
            credential,
            hwid,
            client,
        } = request;
        let credential = present(credential);
        let hwid = present(hwid);

        let Some(credential) = credential else {
            return Err(self
                .deny(None, hwid.as_deref(), &client, AdmissionError::KeyRequired)
                .await);
        };
        let Some(hwid) = hwid else {
            return Err(self
                .deny(None, None, &client, AdmissionError::HwidRequired)
                .await);
        };

        let key = match resolve_credential(self.keys.as_ref(), &credential).await {
            Ok(Some(key)) => key,
            Ok(None) => {
                return Err(self
                    .deny(None, Some(&hwid), &client, AdmissionError::InvalidKey)
                    .await);
            }
            Err(e) => return Err(internal("resolve credential", e)),
        };

        // Stored `expired` reports KeyExpired rather than the generic suspended
        // reason, so a lazily expired key answers the same on every retry.
        match key.status {
            KeyStatus::Active => {}
            KeyStatus::Expired => {
                return Err(self
                    .deny(Some(key.id), Some(&hwid), &client, AdmissionError::KeyExpired)
                    .await);
            }
            KeyStatus::Suspended => {
                return Err(self
                    .deny(Some(key.id), Some(&hwid), &client, AdmissionError::KeySuspended)
                    .await);
            }
        }

        let now = Utc::now();
        if key.is_past_expiry(now) {
            let update = KeyUpdate {
                status: Some(KeyStatus::Expired),
                ..Default::default()
            };
            if let Err(e) = self.keys.update(key.id, update).await {
                return Err(internal("mark key expired", e));
            }
            info!(key_id = %key.id, "License key expired");
            return Err(self
                .deny(Some(key.id), Some(&hwid), &client, AdmissionError::KeyExpired)
                .await);
        }

        let LockedAdmission { reclaimed, result } =
            self.admit_locked(&key, &hwid, &client, now).await;
        // The own key was recounted under the lock unless decide failed midway.
        let settled = matches!(result, Ok(_) | Err(AdmissionError::MaxUsersReached(_)));
        self.reclaimer
            .recount_each(&reclaimed, settled.then_some(key.id))
            .await;

        let (key, refreshed) = match result {
            Ok(admitted) => admitted,
            Err(AdmissionError::Internal) => return Err(AdmissionError::Internal),
            Err(denial) => {
                return Err(self.deny(Some(key.id), Some(&hwid), &client, denial).await);
            }
        };

        self.audit
            .record(entry(
                CONNECT_ENDPOINT,
                Some(key.id),
                Some(&hwid),
                &client,
                "success: access granted",
                true,
            ))
            .await;

        info!(
            key_id = %key.id,
            hwid = %hwid,
            refreshed,
            current_users = key.current_users,
            max_users = key.max_users,
            "Access granted"
        );

        Ok(ConnectGrant {
            token: self.tokens.derive(&key.secret, &hwid),
            issued_at: now,
            key,
            refreshed,
        })
    }

    /// Reclaim, count, decide and write while holding the key's lock.
    async fn admit_locked(
        &self,
        key: &LicenseKey,
        hwid: &str,
        client: &ClientInfo,
        now: DateTime<Utc>,
    ) -> LockedAdmission {
        let _guard = self.locks().acquire(key.id).await;

        let reclaimed = match self.reclaimer.reclaim(now).await {
            Ok(reclaimed) => reclaimed,
            Err(e) => {
                return LockedAdmission {
                    reclaimed: Vec::new(),
                    result: Err(internal("reclaim stale sessions", e)),
                };
            }
        };

        let result = self.decide(key, hwid, client, now, &reclaimed).await;
        LockedAdmission { reclaimed, result }
    }

    async fn decide(
        &self,
        key: &LicenseKey,
        hwid: &str,
        client: &ClientInfo,
        now: DateTime<Utc>,
        reclaimed: &[KeyId],
    ) -> Result<(LicenseKey, bool), AdmissionError> {
        let sessions = self
            .sessions
            .list_for_key(key.id)
            .await
            .map_err(|e| internal("list sessions", e))?;

        let refreshed = sessions.iter().any(|s| s.hwid == hwid);
        if !refreshed && sessions.len() as i64 >= i64::from(key.max_users) {
            if reclaimed.contains(&key.id) {
                self.reclaimer
                    .recount(key.id)
                    .await
                    .map_err(|e| internal("recount occupancy", e))?;
            }
            warn!(
                key_id = %key.id,
                hwid = %hwid,
                max_users = key.max_users,
                "Maximum users limit reached"
            );
            return Err(AdmissionError::MaxUsersReached(key.max_users));
        }

        self.sessions
            .upsert(UpsertSession {
                key_id: key.id,
                hwid: hwid.to_string(),
                ip_address: client.ip_address.clone(),
                user_agent: client.user_agent.clone(),
                last_seen: now,
            })
            .await
            .map_err(|e| internal("upsert session", e))?;

        let current = self
            .sessions
            .list_for_key(key.id)
            .await
            .map_err(|e| internal("list sessions", e))?
            .len() as i32;

        let update = KeyUpdate {
            last_used: Some(now),
            current_users: Some(current),
            ..Default::default()
        };
        match self.keys.update(key.id, update).await {
            Ok(Some(updated)) => Ok((updated, refreshed)),
            Ok(None) => Err(internal(
                "update key",
                AppError::not_found(format!("Key {} vanished during admission", key.id)),
            )),
            Err(e) => Err(internal("update key", e)),
        }
    }

    /// Release the slot held by `(credential, hwid)`.
    ///
    /// Unknown keys and absent sessions are successes.
    pub async fn disconnect(&self, request: DisconnectRequest) -> Result<(), AdmissionError> {
        let DisconnectRequest {
            credential,
            hwid,
            client,
        } = request;
        let (Some(credential), Some(hwid)) = (present(credential), present(hwid)) else {
            return Err(AdmissionError::MissingParameters);
        };

        let key = match resolve_credential(self.keys.as_ref(), &credential).await {
            Ok(Some(key)) => key,
            Ok(None) => {
                debug!(hwid = %hwid, "Disconnect for unknown key");
                return Ok(());
            }
            Err(e) => return Err(internal("resolve credential", e)),
        };

        let reclaimed = {
            let _guard = self.locks().acquire(key.id).await;

            let reclaimed = self
                .reclaimer
                .reclaim(Utc::now())
                .await
                .unwrap_or_else(|e| {
                    warn!(key_id = %key.id, error = %e, "Reclaim during disconnect failed");
                    Vec::new()
                });

            let removed = self
                .sessions
                .remove(key.id, &hwid)
                .await
                .map_err(|e| internal("remove session", e))?;
            let current = self
                .reclaimer
                .recount(key.id)
                .await
                .map_err(|e| internal("recount occupancy", e))?;

            info!(
                key_id = %key.id,
                hwid = %hwid,
                removed,
                current_users = current.unwrap_or_default(),
                "Disconnected"
            );
            reclaimed
        };
        self.reclaimer.recount_each(&reclaimed, Some(key.id)).await;

        self.audit
            .record(entry(
                DISCONNECT_ENDPOINT,
                Some(key.id),
                Some(&hwid),
                &client,
                "success: disconnected",
                true,
            ))
            .await;
        Ok(())
    }

    /// Report whether a key secret is currently usable, without side effects.
    ///
    /// Only the secret is matched; display names are not accepted here.
    pub async fn validate(&self, credential: Option<String>) -> AppResult<KeyValidation> {
        let Some(credential) = present(credential) else {
            return Ok(KeyValidation::Unknown);
        };
        let Some(key) = self.keys.find_by_secret(&credential).await? else {
            return Ok(KeyValidation::Unknown);
        };
        Ok(KeyValidation::Known {
            valid: key.is_active() && !key.is_past_expiry(Utc::now()),
            key_type: key.key_type,
            status: key.status,
            expires_at: key.expires_at,
        })
    }

    async fn deny(
        &self,
        key_id: Option<KeyId>,
        hwid: Option<&str>,
        client: &ClientInfo,
        denial: AdmissionError,
    ) -> AdmissionError {
        debug!(
            key_id = ?key_id,
            hwid = ?hwid,
            reason = %denial,
            "Connect denied"
        );
        self.audit
            .record(entry(
                CONNECT_ENDPOINT,
                key_id,
                hwid,
                client,
                denial.audit_response(),
                false,
            ))
            .await;
        denial
    }
}

fn entry(
    endpoint: &str,
    key_id: Option<KeyId>,
    hwid: Option<&str>,
    client: &ClientInfo,
    response: &str,
    success: bool,
) -> CreateApiLogEntry {
    CreateApiLogEntry {
        endpoint: endpoint.to_string(),
        method: ADMISSION_METHOD.to_string(),
        key_id,
        hwid: hwid.map(str::to_string),
        ip_address: client.ip_address.clone(),
        user_agent: client.user_agent.clone(),
        response: response.to_string(),
        success,
    }
}

fn internal(operation: &str, err: AppError) -> AdmissionError {
    error!(operation, error = %err, "Admission store failure");
    AdmissionError::Internal
}
