//! HTML form model.
//!
//! The service exposes no structured API for the edits this crate makes, so
//! every edit is an HTML form: loaded from a page, filled in, and submitted
//! the way a browser would. This module parses forms out of a page with
//! `scraper` and turns a filled-in form back into url-encoded pairs.

use crate::fields::FieldValue;
use crate::{MusicBrainzError, Result};
use http_types::Url;
use scraper::{ElementRef, Html, Selector};

/// Kind of a form control, with whatever the kind needs to submit itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// Any single-line input (text, hidden, password, ...)
    Text,
    /// Multi-line text
    TextArea,
    /// Checkbox; submitted only while checked
    Checkbox { on_value: String },
    /// Radio group, merged from all inputs sharing a name
    Radio { options: Vec<String> },
    /// Drop-down or list box
    Select { multiple: bool, options: Vec<String> },
    /// Submit button; submitted only when clicked
    Submit,
}

/// A named control and its current value list.
///
/// Text-like controls hold exactly one value. Selectors hold the selected
/// option values, checkboxes and radios the checked values (empty when
/// unchecked).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub name: String,
    pub kind: ControlKind,
    pub values: Vec<String>,
    pub disabled: bool,
}

impl Control {
    fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ControlKind::Text,
            values: vec![value.to_string()],
            disabled: false,
        }
    }
}

/// A form as loaded from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlForm {
    action: String,
    method: String,
    controls: Vec<Control>,
}

impl HtmlForm {
    /// Parse every form on a page.
    ///
    /// Relative action addresses are resolved against `page_url`; a form
    /// without an action submits to the page itself.
    pub fn parse_all(html: &str, page_url: &str) -> Vec<HtmlForm> {
        let document = Html::parse_document(html);
        let form_selector = Selector::parse("form").unwrap();
        let page = Url::parse(page_url).ok();

        document
            .select(&form_selector)
            .map(|form| {
                let raw_action = form.value().attr("action").unwrap_or("").trim();
                let action = if raw_action.is_empty() {
                    page_url.to_string()
                } else {
                    page.as_ref()
                        .and_then(|base| base.join(raw_action).ok())
                        .map(|url| url.to_string())
                        .unwrap_or_else(|| raw_action.to_string())
                };
                let method = form
                    .value()
                    .attr("method")
                    .unwrap_or("GET")
                    .to_ascii_uppercase();

                HtmlForm {
                    action,
                    method,
                    controls: parse_controls(&form),
                }
            })
            .collect()
    }

    /// Pick the POST form whose action contains `action_fragment`.
    ///
    /// Selection never relies on position, so unrelated forms added to a page
    /// (search boxes, navigation) do not change which form is edited.
    pub fn select_post(
        html: &str,
        page_url: &str,
        action_fragment: &str,
    ) -> Result<HtmlForm> {
        Self::parse_all(html, page_url)
            .into_iter()
            .find(|form| form.method == "POST" && form.action.contains(action_fragment))
            .ok_or_else(|| MusicBrainzError::FormNotFound(action_fragment.to_string()))
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn has_control(&self, name: &str) -> bool {
        self.control(name).is_some()
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.name == name)
    }

    fn control_mut(&mut self, name: &str) -> Result<&mut Control> {
        self.controls
            .iter_mut()
            .find(|control| control.name == name)
            .ok_or_else(|| MusicBrainzError::ControlNotFound(name.to_string()))
    }

    /// Current value list of a control.
    pub fn get(&self, name: &str) -> Result<Vec<String>> {
        self.control(name)
            .map(|control| control.values.clone())
            .ok_or_else(|| MusicBrainzError::ControlNotFound(name.to_string()))
    }

    /// Current value of a single-valued control (empty if it has none).
    pub fn value(&self, name: &str) -> Result<String> {
        Ok(self.get(name)?.into_iter().next().unwrap_or_default())
    }

    /// Replace a control's value.
    ///
    /// A list value on a checkbox checks it when the list is non-empty; an
    /// empty list unchecks it. Selectors and radio groups only take values
    /// among their options (or empty); anything else is a
    /// [`MusicBrainzError::Precondition`] and leaves the control unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();
        let control = self.control_mut(name)?;
        if let ControlKind::Select { options, .. } | ControlKind::Radio { options } = &control.kind
        {
            if let Some(unknown) = value
                .values()
                .into_iter()
                .find(|value| !value.is_empty() && !options.contains(value))
            {
                return Err(MusicBrainzError::Precondition(format!(
                    "{unknown:?} is not an option of {name}"
                )));
            }
        }
        control.values = match (&control.kind, value) {
            (ControlKind::Checkbox { on_value }, FieldValue::List(values)) => {
                if values.is_empty() {
                    Vec::new()
                } else {
                    vec![on_value.clone()]
                }
            }
            (_, value) => value.values(),
        };
        Ok(())
    }

    /// Add an empty text control unless one with this name exists.
    pub fn ensure_text_control(&mut self, name: &str) {
        if !self.has_control(name) {
            self.controls.push(Control::text(name, ""));
        }
    }

    /// Name/value pairs a browser would send, in document order.
    ///
    /// `submit` names the clicked submit control; `None` clicks the first
    /// submit control on the form, if any.
    pub fn submission(&self, submit: Option<&str>) -> Result<Vec<(String, String)>> {
        let clicked = match submit {
            Some(name) => Some(
                self.controls
                    .iter()
                    .position(|c| c.kind == ControlKind::Submit && c.name == name)
                    .ok_or_else(|| MusicBrainzError::ControlNotFound(name.to_string()))?,
            ),
            None => self
                .controls
                .iter()
                .position(|c| c.kind == ControlKind::Submit),
        };

        let mut pairs = Vec::new();
        for (index, control) in self.controls.iter().enumerate() {
            if control.disabled || control.name.is_empty() {
                continue;
            }
            if control.kind == ControlKind::Submit && Some(index) != clicked {
                continue;
            }
            for value in &control.values {
                pairs.push((control.name.clone(), value.clone()));
            }
        }
        Ok(pairs)
    }
}

fn parse_controls(form: &ElementRef) -> Vec<Control> {
    let control_selector = Selector::parse("input, select, textarea, button").unwrap();
    let option_selector = Selector::parse("option").unwrap();
    let mut controls: Vec<Control> = Vec::new();

    for element in form.select(&control_selector) {
        let attrs = element.value();
        let Some(name) = attrs.attr("name") else {
            continue;
        };
        let disabled = attrs.attr("disabled").is_some();

        let control = match attrs.name() {
            "select" => {
                let multiple = attrs.attr("multiple").is_some();
                let mut options = Vec::new();
                let mut selected = Vec::new();
                for option in element.select(&option_selector) {
                    let value = option
                        .value()
                        .attr("value")
                        .map(str::to_string)
                        .unwrap_or_else(|| option.text().collect::<String>().trim().to_string());
                    if option.value().attr("selected").is_some() {
                        selected.push(value.clone());
                    }
                    options.push(value);
                }
                if selected.is_empty() && !multiple {
                    selected.extend(options.first().cloned());
                }
                if !multiple {
                    selected.truncate(1);
                }
                Control {
                    name: name.to_string(),
                    kind: ControlKind::Select { multiple, options },
                    values: selected,
                    disabled,
                }
            }
            "textarea" => Control {
                name: name.to_string(),
                kind: ControlKind::TextArea,
                values: vec![element.text().collect::<String>()],
                disabled,
            },
            "button" => match attrs.attr("type").unwrap_or("submit").to_ascii_lowercase().as_str() {
                "submit" => Control {
                    name: name.to_string(),
                    kind: ControlKind::Submit,
                    values: vec![attrs.attr("value").unwrap_or("").to_string()],
                    disabled,
                },
                _ => continue,
            },
            _ => {
                let input_type = attrs.attr("type").unwrap_or("text").to_ascii_lowercase();
                let value = attrs.attr("value");
                let checked = attrs.attr("checked").is_some();
                match input_type.as_str() {
                    "checkbox" => {
                        let on_value = value.unwrap_or("on").to_string();
                        Control {
                            name: name.to_string(),
                            values: if checked { vec![on_value.clone()] } else { Vec::new() },
                            kind: ControlKind::Checkbox { on_value },
                            disabled,
                        }
                    }
                    "radio" => {
                        let option = value.unwrap_or("on").to_string();
                        if let Some(group) = controls.iter_mut().find(|c| {
                            c.name == name && matches!(c.kind, ControlKind::Radio { .. })
                        }) {
                            if let ControlKind::Radio { options } = &mut group.kind {
                                options.push(option.clone());
                            }
                            if checked {
                                group.values = vec![option];
                            }
                            continue;
                        }
                        Control {
                            name: name.to_string(),
                            values: if checked { vec![option.clone()] } else { Vec::new() },
                            kind: ControlKind::Radio {
                                options: vec![option],
                            },
                            disabled,
                        }
                    }
                    "submit" => Control {
                        name: name.to_string(),
                        kind: ControlKind::Submit,
                        values: vec![value.unwrap_or("").to_string()],
                        disabled,
                    },
                    "button" | "reset" | "file" | "image" => continue,
                    _ => Control {
                        name: name.to_string(),
                        kind: ControlKind::Text,
                        values: vec![value.unwrap_or("").to_string()],
                        disabled,
                    },
                }
            }
        };
        controls.push(control);
    }

    controls
}
