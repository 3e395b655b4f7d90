use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print text-shaped output: verbatim in raw mode, wrapped under `key` as JSON.
pub fn output_text(key: &str, text: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Raw => {
            print!("{text}");
            Ok(())
        }
        OutputFormat::Json => output(&serde_json::json!({ key: text }), format),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render;
    use crate::cli::OutputFormat;

    #[test]
    fn json_is_pretty_and_raw_is_compact() {
        let value = json!({"change_id": "chg-1", "horizon": 30});
        let pretty = render(&value, OutputFormat::Json).unwrap();
        let compact = render(&value, OutputFormat::Raw).unwrap();

        assert!(pretty.contains('\n'));
        assert_eq!(compact, r#"{"change_id":"chg-1","horizon":30}"#);
    }
}
