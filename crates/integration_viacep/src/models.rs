//! ViaCEP response models

use serde::{Deserialize, Serialize};

/// Address record as returned by `/ws/{cep}/json/`
///
/// Unknown postal codes are answered with `{"erro": true}` and no address
/// fields, so everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Postal code in `00000-000` form
    #[serde(default)]
    pub cep: Option<String>,
    /// Street
    #[serde(default)]
    pub logradouro: Option<String>,
    /// Neighbourhood
    #[serde(default)]
    pub bairro: Option<String>,
    /// City name
    #[serde(default)]
    pub localidade: Option<String>,
    /// State abbreviation
    #[serde(default)]
    pub uf: Option<String>,
}

impl Address {
    /// City name, if present and not blank
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.localidade
            .as_deref()
            .filter(|city| !city.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record_deserializes() {
        let json = r#"{
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        }"#;
        let address: Address = serde_json::from_str(json).unwrap();
        assert_eq!(address.city(), Some("São Paulo"));
        assert_eq!(address.uf.as_deref(), Some("SP"));
    }

    #[test]
    fn error_payload_has_no_city() {
        let address: Address = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert_eq!(address.city(), None);
    }

    #[test]
    fn blank_city_is_treated_as_missing() {
        let address: Address = serde_json::from_str(r#"{"localidade": "  "}"#).unwrap();
        assert_eq!(address.city(), None);
    }
}
