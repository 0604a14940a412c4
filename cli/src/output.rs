//! Output formatting for flatten results, analyses, and argument tables.

use std::collections::{BTreeMap, HashMap};

use flatarg_core::{FlattenContext, GeneratedArgument, SchemaAnalysis};

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a flatten result in the requested output format.
pub fn format_context(context: &FlattenContext, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(context)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(context).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(context_to_markdown(context)),
        OutputFormat::Table => Ok(context_to_table(context)),
    }
}

/// Formats an analysis in the requested output format.
pub fn format_analysis(analysis: &SchemaAnalysis, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(analysis)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(analysis).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(analysis_to_markdown(analysis)),
        OutputFormat::Table => Ok(analysis_to_table(analysis)),
    }
}

/// Formats a generated argument table in the requested output format.
///
/// Keys are sorted so output is deterministic across runs.
pub fn format_arguments(
    arguments: &HashMap<String, GeneratedArgument>,
    format: OutputFormat,
) -> Result<String, String> {
    let sorted: BTreeMap<&String, &GeneratedArgument> = arguments.iter().collect();
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&sorted)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&sorted).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(arguments_to_markdown(&sorted)),
        OutputFormat::Table => Ok(arguments_to_table(&sorted)),
    }
}

fn context_to_markdown(context: &FlattenContext) -> String {
    let mut out = String::new();

    out.push_str("| Key | Type | Required | Depth | Path |\n");
    out.push_str("|-----|------|----------|-------|------|\n");
    for field in &context.fields {
        let required = if field.optional { "no" } else { "yes" };
        let base_type = format!("{:?}", field.info.base_type).to_lowercase();
        out.push_str(&format!(
            "| `{}` | {} | {} | {} | {} |\n",
            field.flat_key, base_type, required, field.depth, field.dot_path
        ));
    }

    if !context.collisions.is_empty() {
        out.push_str("\n## Collisions\n\n");
        for entry in context.collisions.entries() {
            out.push_str(&format!(
                "- `{}`: {}\n",
                entry.flat_key,
                entry.paths.join(", ")
            ));
        }
    }

    out
}

fn context_to_table(context: &FlattenContext) -> String {
    let mut out = String::new();

    let max_key = context
        .fields
        .iter()
        .map(|f| f.flat_key.len())
        .max()
        .unwrap_or(4);

    for field in &context.fields {
        let required = if field.optional { "" } else { "  required" };
        let base_type = format!("{:?}", field.info.base_type).to_lowercase();
        out.push_str(&format!(
            "  {:<width$}  {base_type}{required}\n",
            field.flat_key,
            width = max_key
        ));
    }

    if !context.collisions.is_empty() {
        out.push_str("\nCollisions:\n");
        out.push_str(&context.collisions.report());
    }

    out
}

fn analysis_to_markdown(analysis: &SchemaAnalysis) -> String {
    let mut out = String::new();

    out.push_str("# Shape Analysis\n\n");
    out.push_str(&format!(
        "- **Valid:** {}\n",
        if analysis.is_valid { "yes" } else { "no" }
    ));
    out.push_str(&format!("- **Fields:** {}\n", analysis.flattened.len()));
    out.push_str(&format!("- **Required:** {}\n", analysis.required.len()));
    out.push_str(&format!(
        "- **Nested:** {}\n",
        if analysis.has_nested { "yes" } else { "no" }
    ));
    out.push_str(&format!("- **Max depth:** {}\n", analysis.max_depth));

    if !analysis.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for warning in &analysis.warnings {
            out.push_str(&format!("- {warning}\n"));
        }
    }

    if !analysis.errors.is_empty() {
        out.push_str("\n## Errors\n\n");
        for error in &analysis.errors {
            out.push_str(&format!("- {error}\n"));
        }
    }

    out
}

fn analysis_to_table(analysis: &SchemaAnalysis) -> String {
    let mut out = String::new();

    let status = if analysis.is_valid { "OK" } else { "INVALID" };
    out.push_str(&format!(
        "{status}  fields={} required={} nested={} max_depth={}\n",
        analysis.flattened.len(),
        analysis.required.len(),
        analysis.has_nested,
        analysis.max_depth,
    ));

    for warning in &analysis.warnings {
        out.push_str(&format!("  warning: {warning}\n"));
    }
    for error in &analysis.errors {
        out.push_str(&format!("  error: {error}\n"));
    }

    out
}

fn arguments_to_markdown(arguments: &BTreeMap<&String, &GeneratedArgument>) -> String {
    let mut out = String::new();

    out.push_str("| Flag | Type | Required | Default | Description |\n");
    out.push_str("|------|------|----------|---------|-------------|\n");
    for (key, argument) in arguments {
        let type_tag = format!("{:?}", argument.type_tag).to_lowercase();
        let required = if argument.required == Some(true) {
            "yes"
        } else {
            ""
        };
        let default = argument
            .default
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let description = argument.description.as_deref().unwrap_or("");
        out.push_str(&format!(
            "| `--{key}` | {type_tag} | {required} | {default} | {description} |\n"
        ));
    }

    out
}

fn arguments_to_table(arguments: &BTreeMap<&String, &GeneratedArgument>) -> String {
    let mut out = String::new();

    let max_key = arguments.keys().map(|k| k.len() + 2).max().unwrap_or(4);

    for (key, argument) in arguments {
        let type_tag = format!("{:?}", argument.type_tag).to_lowercase();
        let mut notes = String::new();
        if argument.required == Some(true) {
            notes.push_str("  required");
        }
        if argument.multiple {
            notes.push_str("  multiple");
        }
        if let Some(default) = &argument.default {
            notes.push_str(&format!("  default={default}"));
        }
        out.push_str(&format!(
            "  --{:<width$}  {type_tag}{notes}\n",
            key,
            width = max_key
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use flatarg_core::{
        FieldSchema, FlattenOptions, Shape, SynthesizeOptions, analyze, flatten,
        synthesize_arguments,
    };

    use super::*;

    fn sample_shape() -> Shape {
        Shape::new()
            .with_field(
                "config",
                FieldSchema::object(
                    Shape::new().with_field("timeout", FieldSchema::number()),
                ),
            )
            .with_field("name", FieldSchema::string().describe("Display name"))
    }

    #[test]
    fn test_format_context_json() {
        let context = flatten(&sample_shape(), &FlattenOptions::default());
        let json = format_context(&context, OutputFormat::Json).unwrap();
        assert!(json.contains("\"flat_key\": \"config-timeout\""));
    }

    #[test]
    fn test_format_context_yaml() {
        let context = flatten(&sample_shape(), &FlattenOptions::default());
        let yaml = format_context(&context, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("flat_key: config-timeout"));
    }

    #[test]
    fn test_format_context_markdown_lists_keys() {
        let context = flatten(&sample_shape(), &FlattenOptions::default());
        let md = format_context(&context, OutputFormat::Markdown).unwrap();
        assert!(md.contains("`config-timeout`"));
        assert!(md.contains("| number |"));
    }

    #[test]
    fn test_format_context_table_shows_collisions() {
        let shape = Shape::new()
            .with_field(
                "foo",
                FieldSchema::object(Shape::new().with_field("bar", FieldSchema::string())),
            )
            .with_field("foo-bar", FieldSchema::number());

        let context = flatten(&shape, &FlattenOptions::default());
        let table = format_context(&context, OutputFormat::Table).unwrap();
        assert!(table.contains("Collisions:"));
        assert!(table.contains("foo-bar: foo.bar, foo-bar"));
    }

    #[test]
    fn test_format_analysis_markdown() {
        let analysis = analyze(&sample_shape(), &Default::default()).unwrap();
        let md = format_analysis(&analysis, OutputFormat::Markdown).unwrap();
        assert!(md.contains("# Shape Analysis"));
        assert!(md.contains("**Valid:** yes"));
    }

    #[test]
    fn test_format_arguments_table_is_sorted() {
        let args = synthesize_arguments(
            &sample_shape(),
            &HashMap::new(),
            &SynthesizeOptions::default(),
        )
        .unwrap();

        let table = format_arguments(&args, OutputFormat::Table).unwrap();
        let config_pos = table.find("--config-timeout").unwrap();
        let name_pos = table.find("--name").unwrap();
        assert!(config_pos < name_pos);
        assert!(table.contains("required"));
    }

    #[test]
    fn test_format_arguments_json_includes_type_tags() {
        let args = synthesize_arguments(
            &sample_shape(),
            &HashMap::new(),
            &SynthesizeOptions::default(),
        )
        .unwrap();

        let json = format_arguments(&args, OutputFormat::Json).unwrap();
        assert!(json.contains("\"type_tag\": \"number\""));
        assert!(json.contains("\"description\": \"Display name\""));
    }
}
