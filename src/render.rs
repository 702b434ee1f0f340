//! Turns content descriptors into an HTML element tree.

use crate::content::{Align, Cell, Column, Form, Input, Item, Table, TextField};
use std::fmt::Write;
use tracing::{error, warn};

const GRID_UNITS: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Markup inserted verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_raw(&mut self, html: impl Into<String>) {
        self.children.push(Node::Raw(html.into()));
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements, skipping text and raw nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// All descendant elements with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_tag(tag, &mut found);
        found
    }

    fn collect_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        for child in self.elements() {
            if child.tag == tag {
                found.push(child);
            }
            child.collect_tag(tag, found);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        out.push('>');
        if is_void(self.tag) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_html(out),
                Node::Text(text) => out.push_str(&escape(text)),
                Node::Raw(html) => out.push_str(html),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "hr" | "input" | "br" | "meta" | "link")
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn align_style(align: Align) -> String {
    format!("text-align: {}", align.as_css())
}

/// Renders each item into `container`, in order.
pub fn render_content(container: &mut Element, items: &[Item]) {
    for item in items {
        render_item(item, container);
    }
}

/// Renders a row of grid columns into `container`.
pub fn render_columns(container: &mut Element, columns: &[Column]) {
    let mut row = Element::new("div").class("row");
    for column in columns {
        let mut col = Element::new("div").class(format!("col-{}", grid_width(column.cols)));
        render_content(&mut col, &column.content);
        row.push(col);
    }
    container.push(row);
}

fn grid_width(cols: u8) -> u8 {
    let width = cols.clamp(1, GRID_UNITS);
    if width != cols {
        warn!(cols, width, "column width outside the 12-unit grid");
    }
    width
}

pub fn render_item(item: &Item, container: &mut Element) {
    match item {
        Item::Title { text, align } => {
            container.push(
                Element::new("h2")
                    .attr("style", align_style(*align))
                    .text(text.as_str()),
            );
        }
        Item::Paragraph { text, align } => {
            let mut paragraph = Element::new("p").attr("style", align_style(*align));
            paragraph.push_raw(text.as_str());
            container.push(paragraph);
        }
        Item::Div { html, align } => {
            let mut div = Element::new("div").attr("style", align_style(*align));
            div.push_raw(html.as_str());
            container.push(div);
        }
        Item::Separator => container.push(Element::new("hr")),
        Item::Table(table) => container.push(render_table(table)),
        Item::Form(form) => container.push(render_form(form)),
        Item::Unsupported => error!("unsupported content item, skipping"),
    }
}

pub fn render_table(table: &Table) -> Element {
    let header_row = table.headers.iter().fold(Element::new("tr"), |row, header| {
        row.child(Element::new("th").text(header.as_str()))
    });
    let head = Element::new("thead").class("sticky-top").child(header_row);

    let body = table.rows.iter().fold(Element::new("tbody"), |body, row| {
        body.child(row.iter().fold(Element::new("tr"), |tr, cell| tr.child(render_cell(cell))))
    });

    Element::new("div")
        .class("table-scrollable-container custom-table-scrollable")
        .child(Element::new("table").class("table").child(head).child(body))
}

fn render_cell(cell: &Cell) -> Element {
    match cell {
        Cell::Text { value, align } => Element::new("td")
            .attr("style", align_style(*align))
            .text(value.as_str()),
        Cell::Action {
            value,
            label,
            style,
            action,
        } => {
            let button = Element::new("button")
                .attr("type", "submit")
                .class(style.as_deref().unwrap_or("btn btn-outline-danger"))
                .text(label.as_deref().unwrap_or("Action"));
            let form = Element::new("form")
                .attr("method", "post")
                .attr("action", action.route())
                .class("d-inline")
                .child(hidden("value", value))
                .child(button);
            Element::new("td").attr("style", align_style(Align::Center)).child(form)
        }
    }
}

pub fn render_form(form: &Form) -> Element {
    let mut element = Element::new("form")
        .attr("method", "post")
        .attr("action", form.submit_to.as_str());
    for input in &form.inputs {
        if let Some(control) = render_input(input) {
            element.push(control);
        }
    }

    let button = Element::new("button")
        .attr("type", "submit")
        .class(form.button_style.as_deref().unwrap_or("btn btn-outline-light"))
        .text(form.button_label.as_str());
    element.push(
        Element::new("div")
            .attr("style", format!("width: 100%; {}", align_style(form.button_align)))
            .child(button),
    );
    element
}

fn text_control(kind: &'static str, field: &TextField) -> Element {
    let mut control = Element::new("input")
        .attr("type", kind)
        .class("form-control")
        .attr("name", field.name.as_str())
        .attr("placeholder", field.hint());
    if let Some(value) = &field.value {
        control = control.attr("value", value.as_str());
    }
    group(&field.name).child(control)
}

/// Builds the control group for one input; `None` when the kind cannot be rendered.
pub fn render_input(input: &Input) -> Option<Element> {
    let control_group = match input {
        Input::Text(field) => text_control("text", field),
        Input::Password(field) => text_control("password", field),
        Input::Email(field) => text_control("email", field),
        Input::Checkbox { name, label } => Element::new("div")
            .class("form-check mb-3")
            .attr("id", name.as_str())
            .child(
                Element::new("input")
                    .attr("type", "checkbox")
                    .class("form-check-input")
                    .attr("id", format!("{name}_check"))
                    .attr("name", name.as_str()),
            )
            .child(
                Element::new("label")
                    .class("form-check-label")
                    .attr("for", format!("{name}_check"))
                    .text(label.as_str()),
            ),
        Input::Select {
            name,
            placeholder,
            options,
        } => {
            let select = options.iter().fold(
                Element::new("select")
                    .class("form-select")
                    .attr("name", name.as_str())
                    .attr("aria-label", placeholder.as_str()),
                |select, option| {
                    select.child(
                        Element::new("option")
                            .attr("value", option.value.as_str())
                            .text(option.label.as_str()),
                    )
                },
            );
            group(name).child(select)
        }
        Input::Slider { name, value } => {
            let mut control = Element::new("input")
                .attr("type", "range")
                .class("form-range")
                .attr("name", name.as_str());
            if let Some(value) = value {
                control = control.attr("value", value.as_str());
            }
            group(name).child(control)
        }
        Input::Date { name, prefix, label } => {
            let date_name = format!("{prefix}{name}_date");
            let time_name = format!("{prefix}{name}_time");
            let date_col = Element::new("div")
                .class("col-md-6")
                .child(
                    Element::new("label")
                        .attr("for", date_name.as_str())
                        .attr("style", "text-align: left; width: 100%")
                        .text(label.as_str()),
                )
                .child(
                    Element::new("input")
                        .attr("type", "date")
                        .class("form-control")
                        .attr("id", date_name.as_str())
                        .attr("name", date_name.as_str()),
                );
            let time_col = Element::new("div")
                .class("col-md-6")
                .child(Element::new("label").attr("for", time_name.as_str()).text("\u{a0}"))
                .child(
                    Element::new("input")
                        .attr("type", "time")
                        .class("form-control")
                        .attr("id", time_name.as_str())
                        .attr("name", time_name.as_str()),
                );
            Element::new("div")
                .class("mb-3 row")
                .attr("id", format!("date_{name}"))
                .child(date_col)
                .child(time_col)
        }
        Input::Hidden { name, value } => group(name).child(hidden(name, value)),
        Input::Unsupported => {
            error!("unsupported input type, control omitted");
            return None;
        }
    };
    Some(control_group)
}

fn group(name: &str) -> Element {
    Element::new("div").class("mb-3").attr("id", name)
}

fn hidden(name: &str, value: &str) -> Element {
    Element::new("input")
        .attr("type", "hidden")
        .attr("name", name)
        .attr("value", value)
}
