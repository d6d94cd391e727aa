//! Proxy bundle generation.
//!
//! A bundle is a zip archive of XML gateway configuration rendered from the
//! fixed templates in [`crate::templates`], with the directory layout the
//! gateway import API expects:
//!
//! ```text
//! apiproxy/{name}.xml
//! apiproxy/proxies/default.xml
//! apiproxy/targets/default.xml
//! apiproxy/policies/{AddCors,RetainHostHeader,SetRoutingAPIKey}.xml
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::CliError;
use crate::templates;

/// Values interpolated into the bundle templates.
#[derive(Debug, Clone)]
pub struct BundleSpec {
    pub app_name: String,
    /// Proxy base path exposed on the gateway.
    pub base_path: String,
    /// Host header presented to the backing deployment.
    pub target_host: String,
    /// Routing public key injected as `X-ROUTING-API-KEY`.
    pub routing_key: String,
}

impl BundleSpec {
    pub fn new(app_name: &str, base_path: &str, target_host: &str, routing_key: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            base_path: base_path.to_string(),
            target_host: target_host.to_string(),
            routing_key: routing_key.to_string(),
        }
    }
}

/// Interpolate `{placeholder}` markers. Unknown markers are left alone so a
/// template typo shows up in the generated XML instead of vanishing.
fn render(template: &str, spec: &BundleSpec) -> String {
    template
        .replace("{app_name}", &spec.app_name)
        .replace("{base_path}", &spec.base_path)
        .replace("{target_host}", &spec.target_host)
        .replace("{routing_key}", &spec.routing_key)
}

/// Entry names inside the archive, paired with their rendered contents.
fn entries(spec: &BundleSpec) -> Vec<(String, String)> {
    vec![
        (
            format!("apiproxy/{}.xml", spec.app_name),
            render(templates::PROXY_XML, spec),
        ),
        (
            "apiproxy/proxies/default.xml".to_string(),
            render(templates::PROXY_ENDPOINT, spec),
        ),
        (
            "apiproxy/targets/default.xml".to_string(),
            render(templates::TARGET_ENDPOINT, spec),
        ),
        (
            "apiproxy/policies/AddCors.xml".to_string(),
            render(templates::ADD_CORS, spec),
        ),
        (
            "apiproxy/policies/RetainHostHeader.xml".to_string(),
            render(templates::RETAIN_HOST, spec),
        ),
        (
            "apiproxy/policies/SetRoutingAPIKey.xml".to_string(),
            render(templates::ROUTING_KEY, spec),
        ),
    ]
}

/// Render the templates and write the archive at `zip_path`.
pub fn write_bundle(zip_path: &Path, spec: &BundleSpec) -> Result<(), CliError> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (name, contents) in entries(spec) {
        zip.start_file(name, options)?;
        zip.write_all(contents.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}
