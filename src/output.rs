//! Output formatting for JSON and text modes
//!
//! The text report is what a person reads at the end of a run; the JSON form
//! carries the same data plus the full dependency list.

use console::style;
use lsdeps::{Failure, Resolution};
use serde::Serialize;

/// Final dependency report
#[derive(Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub version: String,
    pub url: String,
    pub count: usize,
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl Report {
    pub fn new(resolution: &Resolution) -> Self {
        let name = resolution.root.name.clone();
        let version = resolution.root.specifier.clone();

        Self {
            url: package_url(&name, &version),
            count: resolution.count(),
            dependencies: resolution.names().into_iter().map(String::from).collect(),
            failed: resolution
                .failures()
                .iter()
                .map(|f| f.package.name.clone())
                .collect(),
            name,
            version,
        }
    }

    /// Render the human-readable report
    pub fn to_text(&self, list: bool) -> String {
        let mut out = format!(
            "\nName: {}\nURL: {}\nDependency count: {}\n",
            self.name, self.url, self.count
        );

        if list && !self.dependencies.is_empty() {
            out.push_str("\nDependencies:\n");
            for dep in &self.dependencies {
                out.push_str("  ");
                out.push_str(dep);
                out.push('\n');
            }
        }

        out
    }
}

/// Public package page for `name` at `version`
pub fn package_url(name: &str, version: &str) -> String {
    format!("https://npmjs.com/package/{}/v/{}", name, version)
}

/// Print the packages whose dependencies could not be explored
pub fn print_failures(failures: &[Failure]) {
    if failures.is_empty() {
        return;
    }

    eprintln!(
        "\n{}",
        style(format!(
            "Could not fetch dependencies for {} package(s):",
            failures.len()
        ))
        .red()
    );
    for failure in failures {
        eprintln!("  {} ({})", style(&failure.package).red(), failure.error);
    }
}

/// Print JSON output to stdout
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    }
}
