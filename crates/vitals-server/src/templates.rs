use anyhow::{Context, Result};
use serde::Serialize;
use tera::Tera;

/// HTML page templates, compiled into the binary
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("login.html", include_str!("../templates/login.html")),
            ("register.html", include_str!("../templates/register.html")),
            ("dashboard.html", include_str!("../templates/dashboard.html")),
            ("record_form.html", include_str!("../templates/record_form.html")),
            ("admin.html", include_str!("../templates/admin.html")),
        ])
        .context("Failed to parse templates")?;
        Ok(Self { tera })
    }

    /// Render a template against any serializable view
    pub fn render<T: Serialize>(&self, name: &str, view: &T) -> Result<String> {
        let context =
            tera::Context::from_serialize(view).context("Failed to build template context")?;
        self.tera
            .render(name, &context)
            .with_context(|| format!("Failed to render template: {}", name))
    }
}
