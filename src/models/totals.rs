use serde::{Deserialize, Serialize};

use super::InvoiceItem;

/// Bloque numérico derivado de una factura
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub total: f64,
}

impl Totals {
    pub fn taxable_amount(&self) -> f64 {
        self.subtotal - self.discount_amount
    }
}

/// Calcula subtotal, descuento, impuesto y total a partir de los items y las tasas.
///
/// Las tasas son porcentajes. No se valida nada: valores negativos o mayores
/// a 100 se propagan tal cual.
pub fn recompute(items: &[InvoiceItem], tax_rate: f64, discount_rate: f64) -> Totals {
    let subtotal: f64 = items.iter().map(|item| item.total).sum();
    from_subtotal(subtotal, tax_rate, discount_rate)
}

pub(crate) fn from_subtotal(subtotal: f64, tax_rate: f64, discount_rate: f64) -> Totals {
    let discount_amount = subtotal * (discount_rate / 100.0);
    with_discount(subtotal, discount_amount, tax_rate)
}

pub(crate) fn with_discount(subtotal: f64, discount_amount: f64, tax_rate: f64) -> Totals {
    let taxable_amount = subtotal - discount_amount;
    let tax_amount = taxable_amount * (tax_rate / 100.0);

    Totals {
        subtotal,
        discount_amount,
        tax_amount,
        total: taxable_amount + tax_amount,
    }
}
