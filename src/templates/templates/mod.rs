// Exportar todas las plantillas disponibles

mod gas_bill;
mod petrol_bill;
mod restaurant_bill;
mod standard_invoice;

pub use gas_bill::GasBillTemplate;
pub use petrol_bill::PetrolBillTemplate;
pub use restaurant_bill::{GstSplit, RestaurantBillTemplate};
pub use standard_invoice::StandardInvoiceTemplate;

use crate::models::InvoiceItem;

/// Texto del registro o el valor de relleno de la plantilla si está vacío
fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Valor numérico del primer item o el de relleno si falta o es cero
fn first_item_value(items: &[InvoiceItem], pick: impl Fn(&InvoiceItem) -> f64, placeholder: f64) -> f64 {
    items
        .first()
        .map(pick)
        .filter(|value| *value != 0.0 && !value.is_nan())
        .unwrap_or(placeholder)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::models::InvoiceRecord;
    use crate::templates::RenderContext;

    pub fn record() -> InvoiceRecord {
        InvoiceRecord::seed(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap())
    }

    pub fn context() -> RenderContext {
        let at: NaiveDateTime = NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        RenderContext::new(at, "₹")
    }
}
