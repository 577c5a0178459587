//! package.json generator shared by both dialects.

const DEFAULT_VERSION: &str = "1.0.0";

/// The package.json configuration file.
#[derive(Debug, Clone)]
pub struct PackageJson {
    pub name: String,
    pub version: String,
    pub main: String,
    pub scripts: Vec<(String, String)>,
    pub dependencies: Vec<Dependency>,
    pub dev_dependencies: Vec<Dependency>,
}

impl PackageJson {
    /// Manifest with the runtime stack every generated project needs.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: DEFAULT_VERSION.to_string(),
            main: "src/index.js".to_string(),
            scripts: Vec::new(),
            dependencies: vec![
                Dependency::new("cors", "^2.8.5"),
                Dependency::new("express", "^4.21.0"),
                Dependency::new("mongoose", "^8.7.0"),
            ],
            dev_dependencies: Vec::new(),
        }
    }

    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = main.into();
        self
    }

    pub fn with_script(mut self, name: impl Into<String>, command: impl Into<String>) -> Self {
        self.scripts.push((name.into(), command.into()));
        self
    }

    pub fn with_dev_dependencies(
        mut self,
        deps: impl IntoIterator<Item = impl Into<Dependency>>,
    ) -> Self {
        self.dev_dependencies
            .extend(deps.into_iter().map(Into::into));
        self
    }

    fn render_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
        pairs
            .map(|(k, v)| format!("    {}: {}", quote(k), quote(v)))
            .collect::<Vec<_>>()
            .join(",\n")
    }

    pub fn render(&self) -> String {
        let scripts = Self::render_pairs(self.scripts.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let dependencies = Self::render_pairs(
            self.dependencies
                .iter()
                .map(|d| (d.name.as_str(), d.version.as_str())),
        );
        let dev_dependencies = Self::render_pairs(
            self.dev_dependencies
                .iter()
                .map(|d| (d.name.as_str(), d.version.as_str())),
        );

        format!(
            r#"{{
  "name": {},
  "version": {},
  "main": {},
  "scripts": {{
{}
  }},
  "dependencies": {{
{}
  }},
  "devDependencies": {{
{}
  }}
}}
"#,
            quote(&self.name),
            quote(&self.version),
            quote(&self.main),
            scripts,
            dependencies,
            dev_dependencies
        )
    }
}

/// JSON string literal for `raw`.
fn quote(raw: &str) -> String {
    serde_json::Value::from(raw).to_string()
}

/// A dependency with name and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    name: String,
    version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Dependency {
    fn from((name, version): (N, V)) -> Self {
        Self::new(name, version)
    }
}
