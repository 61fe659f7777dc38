//! # トリガーアダプタ
//!
//! ドキュメントストアの作成通知（HTTP で届く JSON）を解釈し、
//! テナント ID・予約 ID・予約内容を取り出す。
//!
//! ## ペイロード
//!
//! ```json
//! {
//!   "document": "negocios/salon-x/citas/cita-1",
//!   "params": { "negocioId": "salon-x", "citaId": "cita-1" },
//!   "data": {
//!     "clienteNombre": "Ana",
//!     "clienteEmail": "ana@x.com",
//!     "staffNombre": "Luis",
//!     "servicioNombre": "Corte",
//!     "fechaInicio": "2024-05-01T10:00:00Z",
//!     "fechaFin": { "seconds": 1714559400, "nanos": 0 }
//!   }
//! }
//! ```
//!
//! - `params` はパスより優先する
//! - `document` の先頭に `projects/{p}/databases/{d}/documents/` が付いていてもよい
//! - 日時は RFC 3339 文字列、または `{seconds, nanos}` / `{_seconds, _nanoseconds}`

use agenda_domain::{
    appointment::{Appointment, AppointmentId},
    tenant::TenantId,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::TriggerError;

/// テナントのコレクション名
const TENANT_COLLECTION: &str = "negocios";
/// 予約のサブコレクション名
const APPOINTMENT_COLLECTION: &str = "citas";
/// 完全なリソース名に含まれるドキュメントルートの区切り
const DOCUMENTS_MARKER: &str = "/documents/";

/// 解釈済みのトリガー
#[derive(Debug, Clone)]
pub struct AppointmentCreated {
    pub tenant_id:      TenantId,
    pub appointment_id: Option<AppointmentId>,
    pub appointment:    Appointment,
}

#[derive(Debug, Deserialize)]
struct TriggerEnvelope {
    document: Option<String>,
    #[serde(default)]
    params:   TriggerParams,
    data:     Option<AppointmentDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerParams {
    negocio_id: Option<String>,
    cita_id:    Option<String>,
}

/// 保存されている予約ドキュメント
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentDocument {
    cliente_nombre:  Option<String>,
    cliente_email:   Option<String>,
    staff_nombre:    Option<String>,
    servicio_nombre: Option<String>,
    fecha_inicio:    Option<TimestampValue>,
    fecha_fin:       Option<TimestampValue>,
}

/// ドキュメントストアの日時表現
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimestampValue {
    Text(String),
    Proto {
        seconds: i64,
        #[serde(default)]
        nanos:   u32,
    },
    Admin {
        #[serde(rename = "_seconds")]
        seconds:     i64,
        #[serde(rename = "_nanoseconds", default)]
        nanoseconds: u32,
    },
}

impl TimestampValue {
    fn to_utc(&self, field: &'static str) -> Result<DateTime<Utc>, TriggerError> {
        match self {
            TimestampValue::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| TriggerError::InvalidTimestamp {
                    field,
                    reason: format!("{text}: {e}"),
                }),
            TimestampValue::Proto { seconds, nanos } => from_epoch(field, *seconds, *nanos),
            TimestampValue::Admin {
                seconds,
                nanoseconds,
            } => from_epoch(field, *seconds, *nanoseconds),
        }
    }
}

fn from_epoch(field: &'static str, seconds: i64, nanos: u32) -> Result<DateTime<Utc>, TriggerError> {
    DateTime::from_timestamp(seconds, nanos).ok_or_else(|| TriggerError::InvalidTimestamp {
        field,
        reason: format!("範囲外のエポック秒: {seconds}"),
    })
}

/// トリガーペイロードを解釈する
pub fn parse_trigger(body: &[u8]) -> Result<AppointmentCreated, TriggerError> {
    let envelope: TriggerEnvelope =
        serde_json::from_slice(body).map_err(|e| TriggerError::InvalidPayload(e.to_string()))?;

    let path_ids = envelope.document.as_deref().map(parse_document_path);

    let tenant_id = match (envelope.params.negocio_id, &path_ids) {
        (Some(id), _) => TenantId::new(id)?,
        (None, Some(Ok((tenant_id, _)))) => tenant_id.clone(),
        (None, Some(Err(e))) => return Err(TriggerError::InvalidDocumentPath(e.clone())),
        (None, None) => return Err(TriggerError::MissingField("document")),
    };

    let appointment_id = match envelope.params.cita_id {
        Some(id) => Some(AppointmentId::new(id)?),
        None => path_ids.and_then(Result::ok).map(|(_, id)| id),
    };

    let data = envelope.data.ok_or(TriggerError::MissingField("data"))?;

    Ok(AppointmentCreated {
        tenant_id,
        appointment_id,
        appointment: data.into_appointment()?,
    })
}

impl AppointmentDocument {
    fn into_appointment(self) -> Result<Appointment, TriggerError> {
        let client_email = self
            .cliente_email
            .ok_or(TriggerError::MissingField("clienteEmail"))?;
        let start = self
            .fecha_inicio
            .ok_or(TriggerError::MissingField("fechaInicio"))?
            .to_utc("fechaInicio")?;
        let end = self
            .fecha_fin
            .ok_or(TriggerError::MissingField("fechaFin"))?
            .to_utc("fechaFin")?;

        Appointment::new(
            self.cliente_nombre,
            client_email,
            self.staff_nombre,
            self.servicio_nombre,
            start,
            end,
        )
        .map_err(TriggerError::from)
    }
}

/// `negocios/{tenantId}/citas/{appointmentId}` からテナント ID と予約 ID を取り出す
fn parse_document_path(document: &str) -> Result<(TenantId, AppointmentId), String> {
    let relative = match document.find(DOCUMENTS_MARKER) {
        Some(index) => &document[index + DOCUMENTS_MARKER.len()..],
        None => document,
    };

    let segments: Vec<&str> = relative.trim_matches('/').split('/').collect();
    let [TENANT_COLLECTION, tenant_id, APPOINTMENT_COLLECTION, appointment_id] = segments[..]
    else {
        return Err(document.to_string());
    };

    let tenant_id = TenantId::new(tenant_id).map_err(|e| format!("{document}: {e}"))?;
    let appointment_id =
        AppointmentId::new(appointment_id).map_err(|e| format!("{document}: {e}"))?;
    Ok((tenant_id, appointment_id))
}
