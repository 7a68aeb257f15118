use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::totals::{self, Totals};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64, // Siempre quantity * price
}

impl InvoiceItem {
    /// Item recién agregado desde el formulario: cantidad 1, precio 0
    pub fn blank(id: String) -> Self {
        InvoiceItem {
            id,
            description: String::new(),
            quantity: 1.0,
            price: 0.0,
            total: 0.0,
        }
    }

    pub fn refresh_total(&mut self) {
        self.total = self.quantity * self.price;
    }
}

/// Etiqueta de tipo que selecciona la plantilla de vista previa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvoiceType {
    #[default]
    Standard,
    Service,
    Product,
    Freelance,
    GasBill,
    PetrolBill,
    RestaurantBill,
}

impl InvoiceType {
    pub const ALL: [InvoiceType; 7] = [
        InvoiceType::Standard,
        InvoiceType::Service,
        InvoiceType::Product,
        InvoiceType::Freelance,
        InvoiceType::GasBill,
        InvoiceType::PetrolBill,
        InvoiceType::RestaurantBill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Standard => "standard",
            InvoiceType::Service => "service",
            InvoiceType::Product => "product",
            InvoiceType::Freelance => "freelance",
            InvoiceType::GasBill => "gas-bill",
            InvoiceType::PetrolBill => "petrol-bill",
            InvoiceType::RestaurantBill => "restaurant-bill",
        }
    }

    /// Título mostrado en el encabezado del documento
    pub fn title(&self) -> &'static str {
        match self {
            InvoiceType::Standard => "Invoice",
            InvoiceType::Service => "Service Bill",
            InvoiceType::Product => "Product Invoice",
            InvoiceType::Freelance => "Freelance Invoice",
            InvoiceType::GasBill => "Gas Bill",
            InvoiceType::PetrolBill => "Fuel Receipt",
            InvoiceType::RestaurantBill => "Restaurant Bill",
        }
    }

    /// Nombre de la opción en el selector de tipo
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceType::Standard => "Standard Invoice",
            InvoiceType::Service => "Service Bill",
            InvoiceType::Product => "Product Invoice",
            InvoiceType::Freelance => "Freelance Invoice",
            InvoiceType::GasBill => "Indian Gas Bill",
            InvoiceType::PetrolBill => "Indian Petrol Bill",
            InvoiceType::RestaurantBill => "Restaurant Bill",
        }
    }
}

impl fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvoiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvoiceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("Tipo de factura desconocido: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub invoice_number: String,
    pub date: String,
    pub due_date: String,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,

    pub company: Party,
    pub client: Party,

    pub items: Vec<InvoiceItem>,

    // Bloque derivado: nunca se edita directamente
    #[serde(default)]
    pub subtotal: f64,
    pub tax_rate: f64,
    #[serde(default)]
    pub tax_amount: f64,
    pub discount_rate: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub total: f64,

    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub payment_terms: String,
}

impl InvoiceRecord {
    /// Registro inicial con el que arranca una sesión
    pub fn seed(today: NaiveDate) -> Self {
        let due = today + Duration::days(30);

        let mut record = InvoiceRecord {
            invoice_number: "INV-001".to_string(),
            date: today.format("%Y-%m-%d").to_string(),
            due_date: due.format("%Y-%m-%d").to_string(),
            invoice_type: InvoiceType::Standard,
            company: Party {
                name: "Your Company Name".to_string(),
                address: "123 Business Street\nCity, State 12345".to_string(),
                email: "hello@company.com".to_string(),
                phone: "+1 (555) 123-4567".to_string(),
            },
            client: Party {
                name: "Client Name".to_string(),
                address: "456 Client Avenue\nClient City, State 67890".to_string(),
                email: "client@email.com".to_string(),
                phone: "+1 (555) 987-6543".to_string(),
            },
            items: vec![InvoiceItem {
                id: "1".to_string(),
                description: "LPG Cylinder 14.2 KG".to_string(),
                quantity: 1.0,
                price: 850.0,
                total: 850.0,
            }],
            subtotal: 0.0,
            tax_rate: 18.0,
            tax_amount: 0.0,
            discount_rate: 0.0,
            discount_amount: 0.0,
            total: 0.0,
            notes: "Thank you for your business!".to_string(),
            payment_terms: "Payment is due within 30 days.".to_string(),
        };
        record.recalculate();
        record
    }

    /// Lee un registro JSON y restablece los invariantes derivados
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let mut record: InvoiceRecord = serde_json::from_str(raw)?;
        for item in &mut record.items {
            item.refresh_total();
        }
        record.recalculate();
        Ok(record)
    }

    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            tax_amount: self.tax_amount,
            total: self.total,
        }
    }

    pub(crate) fn set_totals(&mut self, totals: Totals) {
        self.subtotal = totals.subtotal;
        self.discount_amount = totals.discount_amount;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total;
    }

    /// Recalcula todo el bloque derivado desde los items actuales
    pub fn recalculate(&mut self) {
        let totals = totals::recompute(&self.items, self.tax_rate, self.discount_rate);
        self.set_totals(totals);
    }

    pub fn item(&self, id: &str) -> Option<&InvoiceItem> {
        self.items.iter().find(|item| item.id == id)
    }
}
