use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use shadow_view::{Template, TemplateConfig, ViewSummary};
use tracing::{debug, info};

/// Outcome of compiling one template file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileReport {
    pub file: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<TemplateConfig> {
    let Some(path) = path else {
        return Ok(TemplateConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

pub fn load_data(path: &Path) -> anyhow::Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading data {}", path.display()))?;
    let data = serde_json::from_str(&content)
        .with_context(|| format!("parsing data {}", path.display()))?;
    Ok(data)
}

fn read_template(path: &Path, config: &TemplateConfig) -> anyhow::Result<Template> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading template {}", path.display()))?;
    let config = config.clone().with_source_url(path.display().to_string());
    Ok(Template::with_config(text, config))
}

/// Compile template text and describe the result.
pub fn compile_source(file: &str, text: &str, config: &TemplateConfig) -> CompileReport {
    let template = Template::with_config(text, config.clone().with_source_url(file));
    match template.shadow_view() {
        Ok(view) => CompileReport {
            file: file.to_string(),
            ok: true,
            view: Some(view.summary()),
            error: None,
        },
        Err(err) => CompileReport {
            file: file.to_string(),
            ok: false,
            view: None,
            error: Some(err.to_string()),
        },
    }
}

/// Compile every file in parallel. Reports come back in input order.
pub fn compile_files(files: &[PathBuf], config: &TemplateConfig) -> Vec<CompileReport> {
    let start = Instant::now();
    info!(files = files.len(), "compiling templates");

    let reports: Vec<CompileReport> = files
        .par_iter()
        .map(|path| {
            let file = path.display().to_string();
            match fs::read_to_string(path) {
                Ok(text) => compile_source(&file, &text, config),
                Err(err) => CompileReport {
                    file,
                    ok: false,
                    view: None,
                    error: Some(format!("reading template: {}", err)),
                },
            }
        })
        .collect();

    debug!(elapsed = ?start.elapsed(), "compilation finished");
    reports
}

/// Instantiate template text and return the rendered markup.
pub fn render_source(
    text: &str,
    data: Option<&Value>,
    class_name: Option<&str>,
    config: &TemplateConfig,
) -> anyhow::Result<String> {
    let template = Template::with_config(text, config.clone());
    let instance = template.compile_view(class_name, data)?;
    Ok(instance.render())
}

pub fn render_file(
    path: &Path,
    data: Option<&Value>,
    class_name: Option<&str>,
    config: &TemplateConfig,
) -> anyhow::Result<String> {
    let template = read_template(path, config)?;
    let instance = template
        .compile_view(class_name, data)
        .with_context(|| format!("instantiating {}", path.display()))?;
    Ok(instance.render())
}

pub fn apply_source(text: &str, data: &Value) -> String {
    Template::new(text).apply(data)
}

pub fn apply_file(path: &Path, data: &Value, config: &TemplateConfig) -> anyhow::Result<String> {
    Ok(read_template(path, config)?.apply(data))
}
