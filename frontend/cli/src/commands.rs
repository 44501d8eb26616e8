//! Headless commands sharing the UI's client and field folding.

use std::path::Path;

use anyhow::{bail, Context, Result};
use cardcheck_client::HttpCardService;
use cardcheck_config::{write_config, CardcheckConfig};
use cardcheck_core::{CardService, Detection, ExtractedFields};
use tracing::info;

use crate::terminal_output::{note_info, note_success, note_warn, render_table, Column};

fn detections_table(detections: &[Detection]) -> String {
    let columns = [
        Column::left("Class"),
        Column::left("Text"),
        Column::right("Confidence"),
    ];
    let rows: Vec<Vec<String>> = detections
        .iter()
        .map(|d| {
            vec![
                d.class_name.clone(),
                d.extracted_text.clone(),
                d.confidence.map_or_else(|| "-".to_string(), |c| format!("{c:.2}")),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

/// Read `image`, run extraction and print the folded fields as JSON.
pub async fn extract(service: &dyn CardService, image: &Path) -> Result<()> {
    let active = media::read_image_file(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let response = service.extract(&active).await.context("Extraction failed")?;

    if response.detections.is_empty() {
        note_warn("No detections returned");
    } else {
        eprint!("{}", detections_table(&response.detections));
    }
    let fields = ExtractedFields::from_detections(&response.detections);
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

/// Submit the given fields and print the service's reply.
pub async fn submit(service: &dyn CardService, fields: ExtractedFields) -> Result<()> {
    let missing = fields.missing();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|c| c.label()).collect();
        note_warn(&format!("Empty fields: {}", labels.join(", ")));
    }
    let response = service.submit(&fields).await.context("Submission failed")?;
    note_success(&response.message);
    Ok(())
}

pub async fn ping(service: &HttpCardService) -> Result<()> {
    let greeting = service.ping().await.context("Service is not reachable")?;
    note_success(&format!("Service is up: {}", greeting.trim()));
    Ok(())
}

/// Write a default config file to `path`.
pub async fn config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(&CardcheckConfig::default(), path).await?;
    info!(path = %path.display(), "Wrote default config");
    note_info(&format!("Wrote {}", path.display()));
    Ok(())
}

pub fn config_show(config: &CardcheckConfig) -> Result<()> {
    print!("{}", serde_yaml::to_string(config).context("Failed to render config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_detections() {
        let table = detections_table(&[
            Detection {
                class_name: "NAME".into(),
                extracted_text: "Asha Rao".into(),
                confidence: Some(0.925),
            },
            Detection {
                class_name: "GENDER".into(),
                extracted_text: "Female".into(),
                confidence: None,
            },
        ]);
        assert!(table.contains("Asha Rao"));
        assert!(table.contains("0.93") || table.contains("0.92"));
        assert!(table.lines().any(|l| l.contains("GENDER") && l.trim_end().ends_with('-')));
    }

    #[tokio::test]
    async fn config_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        config_init(&path, false).await.unwrap();
        assert!(path.exists());
        assert!(config_init(&path, false).await.is_err());
        config_init(&path, true).await.unwrap();
    }
}
