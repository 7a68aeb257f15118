use serde_json::{json, Value};

use crate::core::StudioResult;
use crate::models::InvoiceRecord;
use crate::templates::template_trait::{utils, InvoiceTemplate, RenderContext};

/// Factura estándar compartida por los tipos standard, service, product y freelance.
/// Solo cambia el título.
pub struct StandardInvoiceTemplate;

impl InvoiceTemplate for StandardInvoiceTemplate {
    fn template_id(&self) -> &'static str {
        "standard_invoice"
    }

    fn source(&self) -> &'static str {
        include_str!("../typst/standard_invoice.typ")
    }

    fn context(&self, record: &InvoiceRecord, ctx: &RenderContext) -> StudioResult<Value> {
        Ok(json!({
            "title": record.invoice_type.title(),
            "invoice_number": record.invoice_number,
            "company": record.company,
            "client": record.client,
            "date": utils::format_long_date(&record.date),
            "due_date": utils::format_long_date(&record.due_date),
            "items": record.items,
            "subtotal": record.subtotal,
            "discount_rate": record.discount_rate,
            "discount_amount": record.discount_amount,
            "tax_rate": record.tax_rate,
            "tax_amount": record.tax_amount,
            "total": record.total,
            "notes": record.notes,
            "payment_terms": record.payment_terms,
            "symbol": ctx.currency_symbol,
        }))
    }

    fn description(&self) -> &str {
        "Factura estándar"
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::editor::ItemField;
    use crate::models::InvoiceType;
    use crate::templates::TemplateRegistry;

    #[test]
    fn test_seed_invoice_renders_totals() {
        let registry = TemplateRegistry::new().unwrap();
        let doc = registry.render(&fixtures::record(), &fixtures::context()).unwrap();

        assert_eq!(doc.template_id, "standard_invoice");
        assert!(doc.source.contains("[Invoice]"));
        assert!(doc.source.contains("Invoice \\#INV-001"));
        assert!(doc.source.contains("[LPG Cylinder 14.2 KG], [1], [₹850.00], [₹850.00]"));
        assert!(doc.source.contains("[Tax (18%)], [₹153.00]"));
        assert!(doc.source.contains("[Discount (0%)], [#text(fill: red)[-₹0.00]]"));
        assert!(doc.source.contains("[₹1003.00]"));
        assert!(doc.source.contains("14 October 2026"));
        assert!(doc.source.contains("13 November 2026"));
    }

    #[test]
    fn test_title_follows_type_tag() {
        let registry = TemplateRegistry::new().unwrap();
        let mut record = fixtures::record();

        for (kind, title) in [
            (InvoiceType::Service, "Service Bill"),
            (InvoiceType::Product, "Product Invoice"),
            (InvoiceType::Freelance, "Freelance Invoice"),
        ] {
            record.invoice_type = kind;
            let doc = registry.render(&record, &fixtures::context()).unwrap();
            assert_eq!(doc.template_id, "standard_invoice");
            assert!(doc.source.contains(&format!("[{}]", title)));
        }
    }

    #[test]
    fn test_user_text_is_escaped() {
        let registry = TemplateRegistry::new().unwrap();
        let mut record = fixtures::record();
        record.update_item("1", ItemField::Description("#1 [premium] *refill*".to_string()));

        let doc = registry.render(&record, &fixtures::context()).unwrap();
        assert!(doc.source.contains("[\\#1 \\[premium\\] \\*refill\\*]"));
        assert!(doc.source.contains("hello\\@company.com"));
    }

    #[test]
    fn test_rows_follow_item_order() {
        let registry = TemplateRegistry::new().unwrap();
        let mut record = fixtures::record();
        let id = record.add_item();
        record.update_item(&id, ItemField::Description("Regulator".to_string()));

        let doc = registry.render(&record, &fixtures::context()).unwrap();
        let first = doc.source.find("LPG Cylinder").unwrap();
        let second = doc.source.find("Regulator").unwrap();
        assert!(first < second);
    }
}
