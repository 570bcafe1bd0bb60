// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The token-gated energy transfer protocol.
//!
//! Energy moves over a connection in steps.  Each step presents the token
//! issued by the previous step, and is credited with the energy the source
//! could deliver at its current rate since that previous step, bounded by
//! what the source can give or the sink can take.
//!
//! ```text
//! take(no token)     -> 0 Wh, token A, expires in 10 minutes
//! take(A)            -> 14 Wh, token B
//! take(B)            -> 18 Wh, token C
//! [wait past expiry]
//! take(C)            -> 0 Wh, token D
//! ```
//!
//! Every token can authorize at most one transfer.  Callers that present
//! anything but the most recently issued token get nothing and leave the
//! session untouched, which turns duplicate and racing calls into no-ops.

use std::fmt::Display;

use serde::Serialize;
use uuid::Uuid;

use crate::{GridConfig, TransferSession};

const SECONDS_PER_HOUR: f64 = 60.0 * 60.0;

/// Upper bounds for a single transfer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferCapacity {
    /// The rate at which the source delivers energy.
    pub rate_w: f64,
    /// The most energy that can be moved, limited by what the source holds
    /// or what the sink can store.
    pub energy_wh: f64,
}

/// Why a transfer moved the energy it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferNote {
    /// The connection had no session yet.  A new one was started.
    FirstContact,
    /// The presented token wasn't the current one.  Nothing changed.
    WrongToken,
    /// The session had expired.  A new one was started.
    Expired,
    /// No time passed since the last transfer.  Nothing changed.
    NoTimeElapsed,
    /// Energy was transferred.
    Transferred,
}

impl Display for TransferNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferNote::FirstContact => write!(f, "New connection (no previous token)"),
            TransferNote::WrongToken => write!(f, "Bad connection (wrong token)"),
            TransferNote::Expired => write!(f, "Disconnected. Connection expired."),
            TransferNote::NoTimeElapsed => write!(f, "No time has passed"),
            TransferNote::Transferred => write!(f, "Energy transferred"),
        }
    }
}

/// The outcome of [`calculate_transfer`].
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyTransfer {
    /// Energy to move from the source to the sink.
    pub energy_wh: f64,
    /// Time covered by the transfer.
    pub duration_hours: f64,
    /// Effective rate of the transfer.  Lower than the nominal rate when
    /// the energy bound was hit.
    pub rate_w: f64,
    /// The session to store on the connection.
    pub session: TransferSession,
    pub note: TransferNote,
}

impl EnergyTransfer {
    fn nothing(session: TransferSession, note: TransferNote) -> Self {
        Self {
            energy_wh: 0.0,
            duration_hours: 0.0,
            rate_w: 0.0,
            session,
            note,
        }
    }

    /// Returns true if the transfer left the session as it was.
    pub fn kept_session(&self) -> bool {
        matches!(
            self.note,
            TransferNote::WrongToken | TransferNote::NoTimeElapsed
        )
    }
}

/// Calculates how much energy can be moved over a connection at
/// `now_utc_seconds`, and the session to store afterwards.
///
/// `session` is the session currently stored on the connection, and
/// `presented_token` the token the caller was last given.  A fresh token is
/// minted on every call; it is only part of the returned session when the
/// session is (re)started or advanced.
pub fn calculate_transfer(
    session: Option<&TransferSession>,
    now_utc_seconds: i64,
    presented_token: &str,
    capacity: TransferCapacity,
    config: &GridConfig,
) -> EnergyTransfer {
    let new_session = TransferSession {
        token: Uuid::new_v4().to_string(),
        connection_time_utc_seconds: now_utc_seconds,
        expire_time_utc_seconds: now_utc_seconds + config.session_window_seconds,
    };

    let Some(session) = session else {
        tracing::debug!("First usage of connection.");
        return EnergyTransfer::nothing(new_session, TransferNote::FirstContact);
    };

    if presented_token != session.token {
        tracing::debug!("Incorrect power token presented.");
        return EnergyTransfer::nothing(session.clone(), TransferNote::WrongToken);
    }

    if now_utc_seconds > session.expire_time_utc_seconds {
        tracing::debug!(
            expired_at = session.expire_time_utc_seconds,
            now = now_utc_seconds,
            "Expired power token presented."
        );
        return EnergyTransfer::nothing(new_session, TransferNote::Expired);
    }

    let duration_hours =
        (now_utc_seconds - session.connection_time_utc_seconds) as f64 / SECONDS_PER_HOUR;
    if duration_hours <= 0.0 {
        tracing::debug!("No time has passed since the last transfer.");
        return EnergyTransfer::nothing(session.clone(), TransferNote::NoTimeElapsed);
    }

    let rate_w = capacity.rate_w.max(0.0);
    let energy_wh = (rate_w * duration_hours).min(capacity.energy_wh.max(0.0));

    EnergyTransfer {
        energy_wh,
        duration_hours,
        rate_w: energy_wh / duration_hours,
        session: new_session,
        note: TransferNote::Transferred,
    }
}
