use crate::content::SectionView;
use crate::render::{escape, Element};
use crate::views::{render_section, View};

pub struct Page<'a> {
    pub view: View,
    /// Section highlighted in the navigation, if the page is one of the view's sections.
    pub active: Option<&'a str>,
    pub section: &'a SectionView,
    pub authenticated: bool,
    pub backend_url: &'a str,
}

pub fn render_page(page: &Page<'_>) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", page.view.title())
        .replace("{{NAV}}", &render_nav(page))
        .replace("{{HEADER}}", &escape(&page.section.header))
        .replace("{{BACKEND_URL}}", &script_string(page.backend_url))
        .replace("{{BODY}}", &render_section(page.section))
}

fn render_nav(page: &Page<'_>) -> String {
    let mut list = Element::new("ul").class("nav-menu");
    for entry in page.view.nav() {
        let class = if page.active == Some(entry.section) {
            "nav-item selected-menu-item"
        } else {
            "nav-item"
        };
        let mut label = Element::new("span");
        label.push_raw(entry.label);
        list.push(
            Element::new("li").class(class).attr("id", entry.section).child(
                Element::new("a")
                    .attr("href", page.view.section_path(entry.section))
                    .child(Element::new("i").class(entry.icon).attr("aria-hidden", "true"))
                    .child(label),
            ),
        );
    }
    if page.authenticated {
        list.push(
            Element::new("li").class("nav-item").child(
                Element::new("form")
                    .attr("method", "post")
                    .attr("action", page.view.logout_path())
                    .child(
                        Element::new("button")
                            .attr("type", "submit")
                            .class("btn btn-link nav-logout")
                            .child(
                                Element::new("i")
                                    .class("fas fa-right-from-bracket")
                                    .attr("aria-hidden", "true"),
                            )
                            .child(Element::new("span").text("Log out")),
                    ),
            ),
        );
    }
    list.to_html()
}

/// JSON string literal safe to embed inside a `<script>` element.
fn script_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" data-bs-theme="dark">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css" />
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css" />
  <link rel="stylesheet" href="/static/css/app.css" />
</head>
<body>
  <div class="app">
    <nav class="sidebar">
      {{NAV}}
    </nav>
    <main class="main">
      <header>
        <h1 id="page-title" class="fade-in">{{HEADER}}</h1>
      </header>
      {{BODY}}
    </main>
  </div>

  <script>
    const backendUrl = {{BACKEND_URL}};
  </script>
  <script src="/static/js/app.js"></script>
</body>
</html>
"#;
