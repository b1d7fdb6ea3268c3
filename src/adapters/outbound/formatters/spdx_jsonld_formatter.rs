use crate::ports::outbound::SpdxFormatter;
use crate::sbom_generation::domain::spdx::{SpdxDocumentModel, SpdxElement};
use crate::shared::Result;
use indexmap::IndexMap;
use serde::Serialize;

/// Published JSON-LD context of SPDX 3.0.1
pub const SPDX_CONTEXT_URL: &str = "https://spdx.org/rdf/3.0.1/spdx-context.jsonld";

#[derive(Debug, Serialize)]
struct JsonLdDocument<'a> {
    /// The SPDX context followed by the document's own prefix mappings
    #[serde(rename = "@context")]
    context: (&'static str, IndexMap<&'a str, &'a str>),
    #[serde(rename = "@graph")]
    graph: &'a [SpdxElement],
}

/// SpdxJsonLdFormatter adapter for generating SPDX 3.0 JSON-LD
///
/// This adapter implements the SpdxFormatter port. Output is compact
/// unless pretty printing is requested.
pub struct SpdxJsonLdFormatter {
    prettify: bool,
}

impl SpdxJsonLdFormatter {
    pub fn new(prettify: bool) -> Self {
        Self { prettify }
    }
}

impl Default for SpdxJsonLdFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SpdxFormatter for SpdxJsonLdFormatter {
    fn format(&self, document: &SpdxDocumentModel) -> Result<String> {
        let prefixes = document
            .namespaces()
            .iter()
            .map(|namespace| (namespace.prefix(), namespace.namespace()))
            .collect();

        let json_ld = JsonLdDocument {
            context: (SPDX_CONTEXT_URL, prefixes),
            graph: document.graph(),
        };

        let rendered = if self.prettify {
            serde_json::to_string_pretty(&json_ld)?
        } else {
            serde_json::to_string(&json_ld)?
        };
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::spdx::{
        DocumentKind, ProfileIdentifier, SpdxId, SpdxNamespace,
    };
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn create_test_document() -> SpdxDocumentModel {
        let uuid = Uuid::nil();
        let mut document = SpdxElement::spdx_document(
            SpdxId::new("source:0"),
            vec![ProfileIdentifier::Core, ProfileIdentifier::Software],
        );
        document.root_element.push(SpdxId::new("source:1"));
        SpdxDocumentModel::new(
            DocumentKind::Source,
            vec![
                SpdxNamespace::new("shared", "urn:spdx.dev:", &uuid),
                SpdxNamespace::new("source", "urn:spdx.dev:", &uuid),
            ],
            vec![
                SpdxElement::SpdxDocument(document),
                SpdxElement::software_agent(SpdxId::new("shared:0"), "kernel-sbom"),
            ],
        )
    }

    #[test]
    fn test_format_envelope() {
        let formatter = SpdxJsonLdFormatter::default();
        let rendered = formatter.format(&create_test_document()).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(
            value["@context"],
            json!([
                SPDX_CONTEXT_URL,
                {
                    "shared": "urn:spdx.dev:00000000-0000-0000-0000-000000000000/shared#",
                    "source": "urn:spdx.dev:00000000-0000-0000-0000-000000000000/source#"
                }
            ])
        );
        assert_eq!(value["@graph"][0]["type"], "SpdxDocument");
        assert_eq!(value["@graph"][0]["rootElement"], json!(["source:1"]));
        assert_eq!(value["@graph"][1]["name"], "kernel-sbom");
    }

    #[test]
    fn test_compact_and_pretty_output() {
        let document = create_test_document();
        let compact = SpdxJsonLdFormatter::new(false).format(&document).unwrap();
        let pretty = SpdxJsonLdFormatter::new(true).format(&document).unwrap();

        assert!(!compact.contains('\n'));
        assert!(pretty.contains("\n  \"@graph\""));
        assert_eq!(
            serde_json::from_str::<Value>(&compact).unwrap(),
            serde_json::from_str::<Value>(&pretty).unwrap()
        );
    }

    #[test]
    fn test_context_keeps_namespace_order() {
        let rendered = SpdxJsonLdFormatter::default()
            .format(&create_test_document())
            .unwrap();
        let shared = rendered.find("\"shared\":").unwrap();
        let source = rendered.find("\"source\":").unwrap();
        assert!(shared < source);
    }
}
