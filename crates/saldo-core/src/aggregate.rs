//! Per-card aggregation over decoded statement rows
//!
//! Walks rows in sheet order, tracking the most recently seen card marker.
//! Rows matching the requested installment count are deduplicated by
//! receipt identifier and accumulated into per-card totals.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{CardSummary, Installment};
use crate::sheet::{Row, COL_AMOUNT, COL_INSTALLMENTS, COL_MARKER, COL_RECEIPT};

/// Prefix announcing a new card's block in the marker column.
const MARKER_PREFIX: &str = "Tarjeta VISA";

/// Masked card number inside a marker cell.
const CARD_ID_PATTERN: &str = r"\bXXXX-\d{4}\b";

#[derive(Debug, Default)]
struct CardAggregate {
    tarjeta: String,
    seen_receipts: HashSet<String>,
    total: i64,
    datos: Vec<Installment>,
}

/// Aggregate rows into one summary per card, in first-seen card order.
///
/// `requested` is compared against the installment-count cell by exact
/// string equality; no numeric coercion. Rows preceding any card marker
/// are ignored. A marker whose text starts with the card prefix but does
/// not contain a masked card number is a data-integrity violation and
/// fails the whole run.
pub fn aggregate_cards(rows: &[Row], requested: &str) -> Result<Vec<CardSummary>> {
    let card_id = Regex::new(CARD_ID_PATTERN).expect("card id pattern is valid");

    let mut cards: Vec<CardAggregate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut current: Option<usize> = None;

    for row in rows {
        if let Some(marker) = row
            .cell(COL_MARKER)
            .filter(|c| c.starts_with(MARKER_PREFIX))
        {
            let id = card_id
                .find(marker)
                .ok_or_else(|| Error::PatternMismatch(marker.to_string()))?
                .as_str()
                .to_string();

            let slot = *index.entry(id.clone()).or_insert_with(|| {
                cards.push(CardAggregate {
                    tarjeta: id,
                    ..Default::default()
                });
                cards.len() - 1
            });
            current = Some(slot);
            // A marker row carries no detail record
            continue;
        }

        let Some(slot) = current else { continue };
        if row.cell(COL_INSTALLMENTS) != Some(requested) {
            continue;
        }

        let comprobante = row.cell(COL_RECEIPT).unwrap_or("").trim().to_string();
        let importe = parse_amount(row.cell(COL_AMOUNT).unwrap_or(""))?;

        let card = &mut cards[slot];
        if card.seen_receipts.insert(comprobante.clone()) {
            card.total += importe;
            card.datos.push(Installment {
                cuotas_pendientes: requested.to_string(),
                comprobante,
                importe_restante: importe,
            });
        }
    }

    Ok(cards
        .into_iter()
        .map(|card| CardSummary {
            tarjeta: card.tarjeta,
            datos: card.datos,
            suma_total_restante: card.total,
            consejo: String::new(),
        })
        .collect())
}

/// Parse a locale-formatted amount into an integer, truncating toward zero.
///
/// The format uses `.` as thousands separator and `,` as decimal separator
/// ("1.234,56" → 1234). Truncation, not rounding, is the contract:
/// "-50,99" → -50.
pub fn parse_amount(s: &str) -> Result<i64> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    normalized
        .parse::<f64>()
        .map(|v| v.trunc() as i64)
        .map_err(|_| Error::NumericParse(s.to_string()))
}
