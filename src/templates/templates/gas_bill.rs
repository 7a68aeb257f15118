use serde_json::{json, Value};

use crate::core::StudioResult;
use crate::models::InvoiceRecord;
use crate::templates::template_trait::{utils, InvoiceTemplate, RenderContext};

use super::{first_item_value, or_placeholder};

/// Boleta de consumo de GLP doméstico
pub struct GasBillTemplate;

impl InvoiceTemplate for GasBillTemplate {
    fn template_id(&self) -> &'static str {
        "gas_bill"
    }

    fn source(&self) -> &'static str {
        include_str!("../typst/gas_bill.typ")
    }

    fn context(&self, record: &InvoiceRecord, ctx: &RenderContext) -> StudioResult<Value> {
        Ok(json!({
            "company_name": or_placeholder(&record.company.name, "INDIAN GAS CORPORATION"),
            "invoice_number": record.invoice_number,
            "date": utils::format_long_date(&record.date),
            "due_date": utils::format_long_date(&record.due_date),
            "client_name": record.client.name,
            "client_address": record.client.address,
            "quantity": first_item_value(&record.items, |item| item.quantity, 1.0),
            "rate": first_item_value(&record.items, |item| item.price, 850.0),
            "subtotal": record.subtotal,
            "tax_rate": record.tax_rate,
            "tax_amount": record.tax_amount,
            "total": record.total,
            "symbol": ctx.currency_symbol,
        }))
    }

    fn description(&self) -> &str {
        "Boleta de gas doméstico"
    }
}
