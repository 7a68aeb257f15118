use serde::Serialize;
use serde_json::{json, Value};

use crate::core::StudioResult;
use crate::models::InvoiceRecord;
use crate::templates::template_trait::{utils, InvoiceTemplate, RenderContext};

use super::or_placeholder;

/// Impuesto dividido en dos mitades iguales, CGST y SGST
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GstSplit {
    pub cgst_rate: f64,
    pub sgst_rate: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
}

impl GstSplit {
    pub fn halves(tax_rate: f64, tax_amount: f64) -> Self {
        GstSplit {
            cgst_rate: tax_rate / 2.0,
            sgst_rate: tax_rate / 2.0,
            cgst_amount: tax_amount / 2.0,
            sgst_amount: tax_amount / 2.0,
        }
    }
}

/// Cuenta de restaurante con mesa, comensales y mesero fijos
pub struct RestaurantBillTemplate;

impl InvoiceTemplate for RestaurantBillTemplate {
    fn template_id(&self) -> &'static str {
        "restaurant_bill"
    }

    fn source(&self) -> &'static str {
        include_str!("../typst/restaurant_bill.typ")
    }

    fn context(&self, record: &InvoiceRecord, ctx: &RenderContext) -> StudioResult<Value> {
        let gst = GstSplit::halves(record.tax_rate, record.tax_amount);

        Ok(json!({
            "company_name": or_placeholder(&record.company.name, "SPICE GARDEN RESTAURANT"),
            "company_address": or_placeholder(&record.company.address, "MG Road, Bangalore"),
            "company_phone": or_placeholder(&record.company.phone, "+91-80-12345678"),
            "invoice_number": record.invoice_number,
            "date": utils::format_long_date(&record.date),
            "time": ctx.rendered_at.format("%I:%M:%S %p").to_string(),
            "items": record.items,
            "subtotal": record.subtotal,
            "discount_amount": record.discount_amount,
            "has_discount": record.discount_amount > 0.0,
            "gst": gst,
            "total": record.total,
            "symbol": ctx.currency_symbol,
        }))
    }

    fn description(&self) -> &str {
        "Cuenta de restaurante"
    }
}
