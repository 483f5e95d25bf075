use serde::{Deserialize, Serialize};

/// Issuing organization metadata, supplied by the caller per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub currency_symbol: String,
    pub tax_label: String,
}

impl Default for Organization {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            email: String::new(),
            phone: String::new(),
            currency_symbol: "$".to_owned(),
            tax_label: "Tax".to_owned(),
        }
    }
}
