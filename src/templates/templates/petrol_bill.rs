use serde_json::{json, Value};

use crate::core::StudioResult;
use crate::models::InvoiceRecord;
use crate::templates::template_trait::{utils, InvoiceTemplate, RenderContext};

use super::{first_item_value, or_placeholder};

/// Recibo de estación de combustible. Bomba y boquilla son literales.
pub struct PetrolBillTemplate;

impl InvoiceTemplate for PetrolBillTemplate {
    fn template_id(&self) -> &'static str {
        "petrol_bill"
    }

    fn source(&self) -> &'static str {
        include_str!("../typst/petrol_bill.typ")
    }

    fn context(&self, record: &InvoiceRecord, ctx: &RenderContext) -> StudioResult<Value> {
        let product = record
            .items
            .first()
            .map(|item| item.description.as_str())
            .unwrap_or_default();

        Ok(json!({
            "company_name": or_placeholder(&record.company.name, "BHARAT PETROLEUM"),
            "company_address": or_placeholder(&record.company.address, "Highway Road, Mumbai"),
            "invoice_number": record.invoice_number,
            "date": utils::format_long_date(&record.date),
            "time": ctx.rendered_at.format("%I:%M:%S %p").to_string(),
            "product": or_placeholder(product, "PETROL"),
            "quantity": first_item_value(&record.items, |item| item.quantity, 10.0),
            "rate": first_item_value(&record.items, |item| item.price, 103.50),
            "subtotal": record.subtotal,
            "tax_rate": record.tax_rate,
            "tax_amount": record.tax_amount,
            "total": record.total,
            "symbol": ctx.currency_symbol,
        }))
    }

    fn description(&self) -> &str {
        "Recibo de combustible"
    }
}
