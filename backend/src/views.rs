use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 6] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("set_conditions.html", include_str!("../templates/set_conditions.html")),
    ("add_motor.html", include_str!("../templates/add_motor.html")),
    ("analysis.html", include_str!("../templates/analysis.html")),
];

/// Page templates, compiled once at startup.
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> tera::Result<String> {
        self.tera.render(template, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_escaped() {
        let views = Views::new().unwrap();
        let mut context = Context::new();
        context.insert("logged_in", &false);
        context.insert("message", "<b>All fields are required.</b>");

        let html = views.render("add_motor.html", &context).unwrap();
        assert!(html.contains("&lt;b&gt;All fields are required.&lt;&#x2F;b&gt;"));
        assert!(html.contains("href=\"/login\""));
    }
}
