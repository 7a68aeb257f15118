use chrono::{Local, NaiveDateTime};
use minijinja::Environment;
use serde_json::Value;

use crate::core::StudioResult;
use crate::models::{InvoiceRecord, InvoiceType};

use super::templates::{
    GasBillTemplate, PetrolBillTemplate, RestaurantBillTemplate, StandardInvoiceTemplate,
};

/// Datos ambientales del render que no forman parte de la factura
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub rendered_at: NaiveDateTime,
    pub currency_symbol: String,
}

impl RenderContext {
    pub fn new(rendered_at: NaiveDateTime, currency_symbol: impl Into<String>) -> Self {
        RenderContext {
            rendered_at,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn now(currency_symbol: impl Into<String>) -> Self {
        Self::new(Local::now().naive_local(), currency_symbol)
    }
}

/// Documento Typst listo para montarse en la vista previa
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub template_id: &'static str,
    pub source: String,
}

/// Trait base para todas las plantillas de vista previa
pub trait InvoiceTemplate: Send + Sync {
    /// Retorna el ID único de la plantilla
    fn template_id(&self) -> &'static str;

    /// Fuente Typst con marcadores minijinja
    fn source(&self) -> &'static str;

    /// Construye el contexto que consume la fuente
    fn context(&self, record: &InvoiceRecord, ctx: &RenderContext) -> StudioResult<Value>;

    fn description(&self) -> &str {
        "Plantilla de factura"
    }
}

static STANDARD: StandardInvoiceTemplate = StandardInvoiceTemplate;
static GAS_BILL: GasBillTemplate = GasBillTemplate;
static PETROL_BILL: PetrolBillTemplate = PetrolBillTemplate;
static RESTAURANT_BILL: RestaurantBillTemplate = RestaurantBillTemplate;

static ALL_TEMPLATES: [&dyn InvoiceTemplate; 4] = [&STANDARD, &GAS_BILL, &PETROL_BILL, &RESTAURANT_BILL];

/// Registro de plantillas: resuelve el tipo de factura a su plantilla y la renderiza
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    pub fn new() -> StudioResult<Self> {
        let mut env = Environment::new();

        env.add_filter("typst", utils::escape_typst_filter);
        env.add_filter("typst_str", utils::escape_typst_string_filter);
        env.add_filter("money", utils::money_filter);
        env.add_filter("num", utils::number_filter);
        env.add_filter("decimal", utils::decimal_filter);

        for template in ALL_TEMPLATES.iter() {
            env.add_template(template.template_id(), template.source())?;
        }

        Ok(Self { env })
    }

    /// Registro sin fuentes: todo render falla por plantilla inexistente
    #[cfg(test)]
    pub(crate) fn without_templates() -> Self {
        Self { env: Environment::new() }
    }

    /// Selección pura: cada tipo tiene exactamente una plantilla
    pub fn select(invoice_type: InvoiceType) -> &'static dyn InvoiceTemplate {
        match invoice_type {
            InvoiceType::GasBill => &GAS_BILL,
            InvoiceType::PetrolBill => &PETROL_BILL,
            InvoiceType::RestaurantBill => &RESTAURANT_BILL,
            InvoiceType::Standard
            | InvoiceType::Service
            | InvoiceType::Product
            | InvoiceType::Freelance => &STANDARD,
        }
    }

    pub fn render(&self, record: &InvoiceRecord, ctx: &RenderContext) -> StudioResult<RenderedDocument> {
        let template = Self::select(record.invoice_type);
        let context = template.context(record, ctx)?;
        let source = self.env.get_template(template.template_id())?.render(&context)?;

        Ok(RenderedDocument {
            template_id: template.template_id(),
            source,
        })
    }

    /// Lista los tipos seleccionables con su etiqueta y la plantilla que usan
    pub fn list() -> Vec<(InvoiceType, &'static str, &'static str)> {
        InvoiceType::ALL
            .iter()
            .map(|t| (*t, t.label(), Self::select(*t).template_id()))
            .collect()
    }
}

// Utilidades compartidas para generar elementos Typst
pub mod utils {
    use chrono::NaiveDate;
    use minijinja::Value;

    /// Escapa texto de usuario para insertarlo en modo markup de Typst.
    /// Los saltos de línea se convierten en saltos forzados.
    pub fn escape_typst(text: &str) -> String {
        let mut out = String::with_capacity(text.len());

        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                out.push_str(" \\\n");
            }
            escape_line(line, &mut out);
        }

        out
    }

    fn escape_line(line: &str, out: &mut String) {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        out.push_str(indent);

        // Numeración "12." al inicio de línea abriría una lista
        let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
        let numbered = digits > 0 && trimmed[digits..].starts_with('.');

        for (i, c) in trimmed.char_indices() {
            let list_marker = i == 0 && matches!(c, '-' | '+' | '=');
            let enum_marker = numbered && i == digits;
            let special = matches!(
                c,
                '\\' | '#' | '$' | '*' | '_' | '@' | '<' | '>' | '[' | ']' | '`' | '~' | '/' | '"'
            );
            if special || list_marker || enum_marker {
                out.push('\\');
            }
            out.push(c);
        }
    }

    /// Escapa texto para un literal de cadena Typst ("...")
    pub fn escape_typst_string(text: &str) -> String {
        text.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', " ")
    }

    /// Importe con símbolo y dos decimales, sin separadores de miles
    pub fn format_money(amount: f64, symbol: &str) -> String {
        format!("{}{:.2}", escape_typst(symbol), amount)
    }

    /// Formato corto de número: 18 se muestra "18", 10.5 se muestra "10.5"
    pub fn format_number(value: f64) -> String {
        format!("{}", value)
    }

    /// Fecha larga "14 October 2026". Vacío queda vacío; lo que no se
    /// puede interpretar se devuelve como está.
    pub fn format_long_date(date: &str) -> String {
        let date = date.trim();
        if date.is_empty() {
            return String::new();
        }

        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed) => parsed.format("%-d %B %Y").to_string(),
            Err(_) => date.to_string(),
        }
    }

    pub fn escape_typst_filter(value: String) -> String {
        escape_typst(&value)
    }

    pub fn escape_typst_string_filter(value: String) -> String {
        escape_typst_string(&value)
    }

    /// Un importe no finito llega al contexto JSON como `none`; se muestra "NaN"
    fn amount(value: &Value) -> f64 {
        f64::try_from(value.clone()).unwrap_or(f64::NAN)
    }

    pub fn money_filter(value: Value, symbol: String) -> String {
        format_money(amount(&value), &symbol)
    }

    pub fn number_filter(value: Value) -> String {
        format_number(amount(&value))
    }

    pub fn decimal_filter(value: Value) -> String {
        format!("{:.2}", amount(&value))
    }
}
