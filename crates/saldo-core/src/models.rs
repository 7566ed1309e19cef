//! Shared data types for the extraction pipeline

use serde::Serialize;

/// One accepted installment line under a card.
///
/// Field names follow the statement export vocabulary so the JSON response
/// matches what downstream consumers already parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Installment {
    /// Pending installment count, kept as found in the sheet
    pub cuotas_pendientes: String,
    /// Receipt identifier, whitespace-trimmed
    pub comprobante: String,
    /// Remaining amount, truncated toward zero
    pub importe_restante: i64,
}

/// Per-card aggregation result, emitted in the order card markers were
/// first encountered.
#[derive(Debug, Clone, Serialize)]
pub struct CardSummary {
    /// Masked card number, e.g. "XXXX-1234"
    pub tarjeta: String,
    /// Accepted installment lines in row order
    pub datos: Vec<Installment>,
    #[serde(rename = "sumaTotalRestante")]
    pub suma_total_restante: i64,
    /// Advisory text, filled in by the annotation pass
    pub consejo: String,
}
