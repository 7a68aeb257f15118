use uuid::Uuid;

use crate::models::totals;
use crate::models::{InvoiceItem, InvoiceRecord, InvoiceType};

/// Campo editable de la cabecera, las partes o los textos de la factura.
/// Las tasas pasan por aquí también para que cada cambio recalcule los totales.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordField {
    InvoiceNumber(String),
    Date(String),
    DueDate(String),
    Type(InvoiceType),
    CompanyName(String),
    CompanyAddress(String),
    CompanyEmail(String),
    CompanyPhone(String),
    ClientName(String),
    ClientAddress(String),
    ClientEmail(String),
    ClientPhone(String),
    TaxRate(f64),
    DiscountRate(f64),
    Notes(String),
    PaymentTerms(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemField {
    Description(String),
    Quantity(f64),
    Price(f64),
}

impl ItemField {
    fn affects_total(&self) -> bool {
        matches!(self, ItemField::Quantity(_) | ItemField::Price(_))
    }
}

/// Convierte la entrada numérica del formulario; lo que no es un número finito vale 0
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

impl InvoiceRecord {
    pub fn apply(&mut self, field: RecordField) {
        match field {
            RecordField::InvoiceNumber(v) => self.invoice_number = v,
            RecordField::Date(v) => self.date = v,
            RecordField::DueDate(v) => self.due_date = v,
            RecordField::Type(v) => self.invoice_type = v,
            RecordField::CompanyName(v) => self.company.name = v,
            RecordField::CompanyAddress(v) => self.company.address = v,
            RecordField::CompanyEmail(v) => self.company.email = v,
            RecordField::CompanyPhone(v) => self.company.phone = v,
            RecordField::ClientName(v) => self.client.name = v,
            RecordField::ClientAddress(v) => self.client.address = v,
            RecordField::ClientEmail(v) => self.client.email = v,
            RecordField::ClientPhone(v) => self.client.phone = v,
            RecordField::TaxRate(rate) => self.update_tax_rate(rate),
            RecordField::DiscountRate(rate) => self.update_discount_rate(rate),
            RecordField::Notes(v) => self.notes = v,
            RecordField::PaymentTerms(v) => self.payment_terms = v,
        }
    }

    /// Agrega un item vacío al final. Su aporte es 0, así que no recalcula.
    pub fn add_item(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        self.items.push(InvoiceItem::blank(id.clone()));
        id
    }

    /// Modifica un campo del item `id`; si no existe no hace nada
    pub fn update_item(&mut self, id: &str, field: ItemField) {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            tracing::debug!(item_id = %id, "update on unknown item ignored");
            return;
        };

        let affects_total = field.affects_total();
        match field {
            ItemField::Description(v) => item.description = v,
            ItemField::Quantity(v) => item.quantity = v,
            ItemField::Price(v) => item.price = v,
        }
        if affects_total {
            item.refresh_total();
        }

        self.recalculate();
    }

    pub fn remove_item(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            tracing::debug!(item_id = %id, "remove on unknown item ignored");
            return;
        }

        self.recalculate();
    }

    /// Cambia la tasa de impuesto reutilizando el subtotal y descuento guardados
    pub fn update_tax_rate(&mut self, rate: f64) {
        self.tax_rate = rate;
        let totals = totals::with_discount(self.subtotal, self.discount_amount, rate);
        self.set_totals(totals);
    }

    /// Cambia la tasa de descuento reutilizando el subtotal y la tasa de impuesto guardados
    pub fn update_discount_rate(&mut self, rate: f64) {
        self.discount_rate = rate;
        let totals = totals::from_subtotal(self.subtotal, self.tax_rate, rate);
        self.set_totals(totals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recompute;
    use chrono::NaiveDate;

    fn seed() -> InvoiceRecord {
        InvoiceRecord::seed(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap())
    }

    fn assert_invariants(record: &InvoiceRecord) {
        for item in &record.items {
            assert_eq!(item.total, item.quantity * item.price);
        }
        let expected = recompute(&record.items, record.tax_rate, record.discount_rate);
        assert_eq!(record.totals(), expected);
    }

    #[test]
    fn test_add_item_appends_blank_row() {
        let mut record = seed();
        let id = record.add_item();

        let last = record.items.last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.description, "");
        assert_eq!(last.quantity, 1.0);
        assert_eq!(last.price, 0.0);
        assert_eq!(last.total, 0.0);
        assert_eq!(record.total, 1003.0);
    }

    #[test]
    fn test_added_ids_are_unique() {
        let mut record = seed();
        let a = record.add_item();
        let b = record.add_item();
        assert_ne!(a, b);
        assert_ne!(a, "1");
    }

    #[test]
    fn test_second_item_updates_totals() {
        let mut record = seed();
        let id = record.add_item();
        record.update_item(&id, ItemField::Quantity(2.0));
        record.update_item(&id, ItemField::Price(100.0));

        assert_eq!(record.item(&id).unwrap().total, 200.0);
        assert_eq!(record.subtotal, 1050.0);
        assert_eq!(record.tax_amount, 189.0);
        assert_eq!(record.total, 1239.0);
    }

    #[test]
    fn test_discount_on_two_items() {
        let mut record = seed();
        let id = record.add_item();
        record.update_item(&id, ItemField::Quantity(2.0));
        record.update_item(&id, ItemField::Price(100.0));
        record.update_discount_rate(10.0);

        assert_eq!(record.discount_amount, 105.0);
        assert_eq!(record.totals().taxable_amount(), 945.0);
        assert!((record.tax_amount - 170.1).abs() < 1e-9);
        assert!((record.total - 1115.1).abs() < 1e-9);
        assert_invariants(&record);
    }

    #[test]
    fn test_removing_only_item_zeroes_totals() {
        let mut record = seed();
        record.remove_item("1");

        assert!(record.items.is_empty());
        assert_eq!(record.subtotal, 0.0);
        assert_eq!(record.discount_amount, 0.0);
        assert_eq!(record.tax_amount, 0.0);
        assert_eq!(record.total, 0.0);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut record = seed();
        let before = record.clone();
        record.update_item("missing", ItemField::Price(10.0));
        record.remove_item("missing");
        assert_eq!(record, before);
    }

    #[test]
    fn test_description_edit_keeps_total() {
        let mut record = seed();
        record.update_item("1", ItemField::Description("Refill".to_string()));
        assert_eq!(record.items[0].description, "Refill");
        assert_eq!(record.items[0].total, 850.0);
        assert_invariants(&record);
    }

    #[test]
    fn test_rate_updates_are_order_independent() {
        let mut tax_first = seed();
        tax_first.update_tax_rate(12.0);
        tax_first.update_discount_rate(5.0);

        let mut discount_first = seed();
        discount_first.update_discount_rate(5.0);
        discount_first.update_tax_rate(12.0);

        assert_eq!(tax_first.totals(), discount_first.totals());
        assert_invariants(&tax_first);
    }

    #[test]
    fn test_invariants_hold_after_mixed_edits() {
        let mut record = seed();
        let a = record.add_item();
        let b = record.add_item();
        record.update_item(&a, ItemField::Price(19.99));
        record.update_item(&b, ItemField::Quantity(3.0));
        record.update_item(&b, ItemField::Price(7.5));
        record.apply(RecordField::TaxRate(5.0));
        record.apply(RecordField::DiscountRate(2.5));
        record.remove_item(&a);
        record.update_item("1", ItemField::Quantity(4.0));

        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[1].id, b);
        assert_invariants(&record);
    }

    #[test]
    fn test_apply_sets_party_and_type_fields() {
        let mut record = seed();
        record.apply(RecordField::ClientName("Asha".to_string()));
        record.apply(RecordField::Type(InvoiceType::GasBill));
        record.apply(RecordField::PaymentTerms("Net 15".to_string()));

        assert_eq!(record.client.name, "Asha");
        assert_eq!(record.invoice_type, InvoiceType::GasBill);
        assert_eq!(record.payment_terms, "Net 15");
        assert_eq!(record.total, 1003.0);
    }

    #[test]
    fn test_parse_amount_coerces_garbage_to_zero() {
        assert_eq!(parse_amount("12.5"), 12.5);
        assert_eq!(parse_amount(" 3 "), 3.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("-4"), -4.0);
    }

    #[test]
    fn test_parse_amount_rejects_non_finite_text() {
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("-infinity"), 0.0);
        assert_eq!(parse_amount("1e400"), 0.0);
    }
}
