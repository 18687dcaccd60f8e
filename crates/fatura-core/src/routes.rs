//! Supplier to OCR provider routing table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// External OCR provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Mailbox-based invoice parser.
    Parseur,
    /// Workflow-based receipt extractor.
    Docupipe,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Parseur => "parseur",
            Provider::Docupipe => "docupipe",
        }
    }

    /// Environment variable holding the provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Parseur => "PARSEUR_API_KEY",
            Provider::Docupipe => "DOCUPIPE_API_KEY",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a supplier's documents are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRoute {
    pub provider: Provider,

    /// Parseur mailbox.
    #[serde(default)]
    pub mailbox_id: Option<String>,

    /// Docupipe workflow.
    #[serde(default)]
    pub workflow_id: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ProviderRoute {
    pub fn parseur(mailbox_id: &str) -> Self {
        Self {
            provider: Provider::Parseur,
            mailbox_id: Some(mailbox_id.to_string()),
            workflow_id: None,
            enabled: true,
        }
    }

    pub fn docupipe(workflow_id: Option<&str>) -> Self {
        Self {
            provider: Provider::Docupipe,
            mailbox_id: None,
            workflow_id: workflow_id.map(str::to_string),
            enabled: true,
        }
    }

    /// Enabled and pointing at a concrete mailbox or workflow.
    pub fn has_integration(&self) -> bool {
        self.enabled && (self.mailbox_id.is_some() || self.workflow_id.is_some())
    }
}

/// Supplier key to route lookup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, ProviderRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes of the production deployment.
    pub fn builtin() -> Self {
        let parseur = [
            ("soares", "111948"),
            ("justdrinks", "112442"),
            ("novadis", "111943"),
            ("garcias", "112445"),
            ("teofilo", "112431"),
            ("jmv", "112446"),
            ("absolutlyvintage", "112448"),
        ];

        let docupipe_workflows = [
            ("continente", "4Vy92EQH"),
            ("makro", "jtVquUzt"),
            ("pingodoce", "PRtYtwC7"),
            ("lidl", "YxiR0kCy"),
            ("inframoura", "y2c7v2bS"),
            ("robalo", "kjigWqyQ"),
        ];

        let docupipe = [
            "magniberia",
            "teofilo_gd",
            "teofilo_nc",
            "intermarche",
            "overseas",
            "moeve",
            "galp",
            "cepsa",
            "makro_gas",
            "bp",
            "action",
            "worten",
            "wells",
            "ikea",
            "leroy",
            "staples",
            "note",
            "partyland",
            "kiabi",
            "constamarina",
            "constantino",
            "papelnet",
            "gildadasilva",
            "burgerking",
            "mcdonalds",
            "pizzahut",
            "dominos",
            "mourapao",
            "matchpoint",
            "osakasushi",
            "tribulum",
            "zorba",
            "sinfonia",
            "eurolatina",
            "apaisagem",
            "anticapizzeria",
            "italianrepublic",
            "reichurrasco",
            "solarfarelo",
            "botanico",
            "adegamonte",
            "afamilia",
            "artisan",
            "bagga",
            "maxidrive",
            "padoca",
            "seminoshopping",
            "orientalshopping",
            "shoppingloule",
            "a4tabacaria",
            "brisa",
            "brisatoll",
            "alparques",
        ];

        let mut table = Self::new();
        for (supplier, mailbox) in parseur {
            table.insert(supplier, ProviderRoute::parseur(mailbox));
        }
        for (supplier, workflow) in docupipe_workflows {
            table.insert(supplier, ProviderRoute::docupipe(Some(workflow)));
        }
        for supplier in docupipe {
            table.insert(supplier, ProviderRoute::docupipe(None));
        }
        table
    }

    /// Replace or add routes, e.g. from the `routes` config section.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, ProviderRoute>) -> Self {
        for (supplier, route) in overrides {
            self.insert(supplier, route.clone());
        }
        self
    }

    pub fn insert(&mut self, supplier: &str, route: ProviderRoute) {
        self.routes.insert(supplier.to_lowercase(), route);
    }

    /// Route for a supplier key (case-insensitive).
    pub fn get(&self, supplier: &str) -> Option<&ProviderRoute> {
        self.routes.get(&supplier.to_lowercase())
    }

    pub fn has_integration(&self, supplier: &str) -> bool {
        self.get(supplier).is_some_and(ProviderRoute::has_integration)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_routes() {
        let table = RouteTable::builtin();

        let soares = table.get("soares").unwrap();
        assert_eq!(soares.provider, Provider::Parseur);
        assert_eq!(soares.mailbox_id.as_deref(), Some("111948"));

        let lidl = table.get("LIDL").unwrap();
        assert_eq!(lidl.provider, Provider::Docupipe);
        assert_eq!(lidl.workflow_id.as_deref(), Some("YxiR0kCy"));
    }

    #[test]
    fn test_has_integration() {
        let table = RouteTable::builtin();
        assert!(table.has_integration("novadis"));
        assert!(table.has_integration("pingodoce"));
        // Docupipe route without a workflow
        assert!(!table.has_integration("galp"));
        assert!(!table.has_integration("nonexistent"));
    }

    #[test]
    fn test_disabled_route_has_no_integration() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "soares".to_string(),
            ProviderRoute {
                enabled: false,
                ..ProviderRoute::parseur("111948")
            },
        );
        let table = RouteTable::builtin().with_overrides(&overrides);
        assert!(!table.has_integration("soares"));
        assert!(table.get("soares").is_some());
    }

    #[test]
    fn test_route_deserialize_defaults() {
        let route: ProviderRoute = serde_json::from_str(r#"{"provider": "docupipe"}"#).unwrap();
        assert_eq!(route, ProviderRoute::docupipe(None));
    }
}
