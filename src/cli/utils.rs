use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    println!("{}", render_success(output_format, message, data)?);
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) {
    match output_format {
        OutputFormat::Json => {
            let response = json!({ "success": false, "message": message });
            println!("{}", response);
        }
        OutputFormat::Text => eprintln!("Error: {}", message),
    }
}

fn render_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<String> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data) = data {
                response["data"] = data;
            }
            Ok(serde_json::to_string_pretty(&response)?)
        }
        OutputFormat::Text => {
            let mut text = format!("✓ {}", message);
            if let Some(Value::Object(fields)) = data {
                for (key, value) in fields {
                    match value {
                        Value::String(s) => text.push_str(&format!("\n{}: {}", key, s)),
                        other => text.push_str(&format!("\n{}: {}", key, other)),
                    }
                }
            }
            Ok(text)
        }
    }
}
