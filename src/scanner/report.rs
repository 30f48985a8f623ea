use crate::error::Result;
use crate::models::finalizers::ScanResponse;
use crate::models::OutputFormat;
use comfy_table::{presets::ASCII_BORDERS_ONLY_CONDENSED, Table};
use std::collections::BTreeMap;

/// The outcome of a scan in both machine-readable and rendered form.
#[derive(Debug, Clone)]
pub struct Report {
    pub response: ScanResponse,
    /// Two-space indented JSON of `response`.
    pub json: String,
    /// `response` rendered in the requested output format.
    pub rendered: String,
}

impl Report {
    pub fn pending_count(&self) -> usize {
        self.response
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

pub fn build_report(response: ScanResponse, format: OutputFormat) -> Result<Report> {
    let json = serde_json::to_string_pretty(&response)?;
    let text = render_text(&response);

    let rendered = match format {
        OutputFormat::Text => text,
        OutputFormat::Json => json.clone(),
        OutputFormat::Yaml => match serde_yaml::to_string(&response) {
            Ok(yaml) => yaml,
            Err(e) => {
                tracing::error!(error = %e, "Failed to render YAML report, falling back to text");
                text
            }
        },
    };

    Ok(Report {
        response,
        json,
        rendered,
    })
}

fn render_text(response: &ScanResponse) -> String {
    if response.is_empty() {
        return "No objects pending finalizers found\n".to_string();
    }
    let mut out = String::new();
    for (namespace, types) in response {
        if types.values().all(Vec::is_empty) {
            out.push_str(&format!("No objects pending finalizers in namespace: {}\n\n", namespace));
            continue;
        }

        out.push_str(&format!("Objects pending finalizers in namespace: {}\n", namespace));
        let mut table = Table::new();
        table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);
        table.set_header(vec!["#", "RESOURCE TYPE", "RESOURCE NAME"]);
        let rows = types
            .iter()
            .flat_map(|(resource, names)| names.iter().map(move |name| (resource, name)));
        for (i, (resource, name)) in rows.enumerate() {
            table.add_row(vec![(i + 1).to_string(), resource.clone(), name.clone()]);
        }
        out.push_str(&table.to_string());
        out.push_str("\n\n");
    }
    out
}
