//! Static descriptors of the supported import source types.
//!
//! Served to the UI for rendering the source-selection form; carries no
//! state.

use serde::Serialize;

use crate::session::SourceType;

/// An input field a connector expects in `source_data`.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectorField {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// Describes one supported source type.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectorDescriptor {
    pub source_type: SourceType,
    pub name: &'static str,
    pub description: &'static str,
    pub fields: Vec<ConnectorField>,
}

/// The fixed list of connectors this service supports.
pub fn supported_connectors() -> Vec<ConnectorDescriptor> {
    vec![
        ConnectorDescriptor {
            source_type: SourceType::Csv,
            name: "CSV upload",
            description: "Import products from a CSV file with name and price columns",
            fields: vec![ConnectorField {
                name: "csv_content",
                label: "CSV file content",
                required: true,
            }],
        },
        ConnectorDescriptor {
            source_type: SourceType::Website,
            name: "Website scrape",
            description: "Extract products from a storefront collection page",
            fields: vec![ConnectorField {
                name: "url",
                label: "Collection URL",
                required: true,
            }],
        },
        ConnectorDescriptor {
            source_type: SourceType::Api,
            name: "Product API",
            description: "Fetch products from a JSON API endpoint",
            fields: vec![
                ConnectorField {
                    name: "url",
                    label: "API endpoint URL",
                    required: true,
                },
                ConnectorField {
                    name: "api_key",
                    label: "API key",
                    required: false,
                },
            ],
        },
    ]
}
