//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::runtime::{Artifact, BuilderReport};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Cluster-side state of one generated artifact
#[derive(Debug, Clone)]
pub struct ArtifactStatus {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub exists: bool,
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the builders of one assembly pass and the artifacts they produced
    pub fn render_assembly_summary(
        &self,
        job_name: &str,
        namespace: &str,
        reports: &[BuilderReport],
        artifacts: &[Artifact],
    ) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").set_alignment(CellAlignment::Center),
                Cell::new("BUILDER").set_alignment(CellAlignment::Left),
                Cell::new("ARTIFACTS").set_alignment(CellAlignment::Center),
            ]);

        for (idx, report) in reports.iter().enumerate() {
            let icon = StatusIcon::get_builder_icon(report.artifacts);
            table.add_row(vec![
                Cell::new(idx + 1).set_alignment(CellAlignment::Center),
                Cell::new(&report.builder),
                Cell::new(format!("{} {}", icon, report.artifacts))
                    .fg(self.theme.get_builder_color(report.artifacts))
                    .set_alignment(CellAlignment::Center),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ TrainJob {}/{} {} ─╮\n",
            namespace,
            job_name,
            format!("[{} builders]", reports.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');

        if artifacts.is_empty() {
            output.push_str("No artifacts generated\n");
        } else {
            for artifact in artifacts {
                output.push_str(&format!(
                    "  {} {}/{}\n",
                    StatusIcon::SUCCESS.green(),
                    artifact.kind(),
                    artifact.name().unwrap_or_default()
                ));
            }
        }

        output
    }

    /// Render whether the artifacts of a job exist in the cluster
    pub fn render_artifact_status(&self, statuses: &[ArtifactStatus]) -> String {
        if statuses.is_empty() {
            return "No artifacts expected for this TrainJob".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("NAMESPACE").set_alignment(CellAlignment::Left),
                Cell::new("STATUS").set_alignment(CellAlignment::Center),
            ]);

        for status in statuses {
            let text = if status.exists { "Present" } else { "Missing" };
            table.add_row(vec![
                Cell::new(&status.kind),
                Cell::new(&status.name),
                Cell::new(&status.namespace).fg(self.theme.info),
                Cell::new(format!(
                    "{} {}",
                    StatusIcon::get_presence_icon(status.exists),
                    text
                ))
                .fg(self.theme.get_presence_color(status.exists)),
            ]);
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::ConfigMap;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_render_assembly_summary() {
        let renderer = TableRenderer::new();
        let reports = vec![BuilderReport {
            builder: "remote".to_string(),
            artifacts: 1,
        }];
        let artifacts = vec![Artifact::ConfigMap(ConfigMap {
            metadata: ObjectMeta {
                name: Some("job-a-remote-script".to_string()),
                ..Default::default()
            },
            ..Default::default()
        })];

        let output = renderer.render_assembly_summary("job-a", "ns", &reports, &artifacts);
        assert!(output.contains("ns/job-a"));
        assert!(output.contains("remote"));
        assert!(output.contains("ConfigMap/job-a-remote-script"));
    }

    #[test]
    fn test_render_empty_status() {
        let renderer = TableRenderer::new();
        let output = renderer.render_artifact_status(&[]);
        assert!(output.contains("No artifacts expected"));
    }

    #[test]
    fn test_render_status() {
        let renderer = TableRenderer::new();
        let output = renderer.render_artifact_status(&[ArtifactStatus {
            kind: "ConfigMap".to_string(),
            name: "job-a-remote-script".to_string(),
            namespace: "ns".to_string(),
            exists: false,
        }]);
        assert!(output.contains("job-a-remote-script"));
        assert!(output.contains("Missing"));
    }
}
