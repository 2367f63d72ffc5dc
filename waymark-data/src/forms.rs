//! Google Forms API request bodies built from tabular rows.
//!
//! Each row becomes one form: a `forms.create` body carrying the title, then
//! a `forms.batchUpdate` body with one `createItem` request per field. The
//! description of every question shows the value currently held in the row
//! so respondents can confirm or correct it. Sending the requests, and the
//! OAuth flow that doing so needs, is left to the caller.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde_json::{Value, json};

const FORMS_URL: &str = "https://docs.google.com/forms/d";
const DEFAULT_OPTIONS: [&str; 2] = ["Option 1", "Option 2"];

/// Kind of question a field is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementType {
    /// Short free text.
    #[default]
    Text,
    /// Long free text.
    ParagraphText,
    /// Single choice shown as radio buttons.
    MultipleChoice,
    /// Any number of choices.
    Checkboxes,
    /// Single choice from a drop-down list.
    Dropdown,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
}

impl ElementType {
    /// The name used in field-type tables, e.g. `PARAGRAPH_TEXT`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::ParagraphText => "PARAGRAPH_TEXT",
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::Checkboxes => "CHECKBOXES",
            Self::Dropdown => "DROPDOWN",
            Self::Date => "DATE",
            Self::Time => "TIME",
        }
    }

    /// The Forms API choice type, for element types that offer choices.
    const fn choice_type(self) -> Option<&'static str> {
        match self {
            Self::MultipleChoice => Some("RADIO"),
            Self::Checkboxes => Some("CHECKBOX"),
            Self::Dropdown => Some("DROP_DOWN"),
            Self::Text | Self::ParagraphText | Self::Date | Self::Time => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown names become [`ElementType::Text`].
impl FromStr for ElementType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "TEXT" => Self::Text,
            "PARAGRAPH_TEXT" => Self::ParagraphText,
            "MULTIPLE_CHOICE" => Self::MultipleChoice,
            "CHECKBOXES" => Self::Checkboxes,
            "DROPDOWN" => Self::Dropdown,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            other => {
                debug!("unknown form element type {other:?}; using TEXT");
                Self::Text
            }
        })
    }
}

/// Title given to the form generated for the zero-based `row_index`.
#[must_use]
pub fn form_title(row_index: usize) -> String {
    format!("Form for Row {}", row_index.saturating_add(1))
}

/// Body of a `forms.create` call.
#[must_use]
pub fn create_form_body(title: &str) -> Value {
    json!({"info": {"title": title, "documentTitle": title}})
}

/// Choice options listed in `extra_info`, comma separated.
///
/// Blank input yields the two placeholder options.
#[must_use]
pub fn choice_options(extra_info: &str) -> Vec<String> {
    if extra_info.trim().is_empty() {
        return DEFAULT_OPTIONS.iter().map(|&option| option.to_owned()).collect();
    }
    extra_info
        .split(',')
        .map(|option| option.trim().to_owned())
        .collect()
}

/// A `createItem` request placing one question at the top of the form.
///
/// `options` is only read for choice element types; an empty slice falls
/// back to the placeholder options. Choice questions carry no description.
#[must_use]
pub fn question_item(
    title: &str,
    element: ElementType,
    description: &str,
    options: &[String],
) -> Value {
    let item = if let Some(choice_type) = element.choice_type() {
        let options: Vec<Value> = if options.is_empty() {
            DEFAULT_OPTIONS.iter().map(|option| json!({"value": option})).collect()
        } else {
            options.iter().map(|option| json!({"value": option})).collect()
        };
        json!({
            "title": title,
            "questionItem": {
                "question": {"choiceQuestion": {"type": choice_type, "options": options}}
            },
        })
    } else {
        let question = match element {
            ElementType::ParagraphText => json!({"paragraphQuestion": {}}),
            ElementType::Date => json!({"dateQuestion": {}}),
            ElementType::Time => json!({"timeQuestion": {}}),
            _ => json!({"textQuestion": {}}),
        };
        json!({
            "title": title,
            "description": description,
            "questionItem": {"question": question},
        })
    };
    json!({"createItem": {"item": item, "location": {"index": 0}}})
}

/// One `createItem` request per `(field, value)` pair of a row, in order.
///
/// Fields missing from `field_types` are rendered as text. Missing values
/// show as empty.
#[must_use]
pub fn row_requests<'r, I>(
    row: I,
    field_types: &BTreeMap<String, ElementType>,
    field_extra_info: &BTreeMap<String, String>,
) -> Vec<Value>
where
    I: IntoIterator<Item = (&'r str, Option<&'r str>)>,
{
    row.into_iter()
        .map(|(field, value)| {
            let element = field_types.get(field).copied().unwrap_or_default();
            let extra = field_extra_info.get(field).map_or("", String::as_str);
            let current = value.unwrap_or_default();
            let description = if extra.is_empty() {
                format!("Current value: {current}")
            } else {
                format!("{extra}\nCurrent value: {current}")
            };
            let options = if element.choice_type().is_some() {
                choice_options(extra)
            } else {
                Vec::new()
            };
            question_item(field, element, &description, &options)
        })
        .collect()
}

/// Body of a `forms.batchUpdate` call.
#[must_use]
pub fn batch_update_body(requests: Vec<Value>) -> Value {
    json!({"requests": requests})
}

/// Where a created form can be edited and answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLinks {
    /// Identifier the Forms API assigned.
    pub form_id: String,
    /// Owner-facing editor page.
    pub edit_url: String,
    /// Public page respondents fill in.
    pub response_url: String,
}

impl FormLinks {
    /// Links for the form with id `form_id`.
    #[must_use]
    pub fn for_form(form_id: &str) -> Self {
        Self {
            form_id: form_id.to_owned(),
            edit_url: format!("{FORMS_URL}/{form_id}/edit"),
            response_url: format!("{FORMS_URL}/{form_id}/viewform"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PARAGRAPH_TEXT", ElementType::ParagraphText)]
    #[case("DROPDOWN", ElementType::Dropdown)]
    #[case("SLIDER", ElementType::Text)]
    #[case("text", ElementType::Text)]
    fn parses_element_names(#[case] name: &str, #[case] expected: ElementType) {
        let Ok(parsed) = name.parse::<ElementType>();
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn titles_are_one_based() {
        assert_eq!(
            create_form_body(&form_title(0)),
            json!({"info": {"title": "Form for Row 1", "documentTitle": "Form for Row 1"}})
        );
    }

    #[rstest]
    fn text_questions_carry_the_description() {
        assert_eq!(
            question_item("Name", ElementType::Text, "Current value: Alice", &[]),
            json!({"createItem": {
                "item": {
                    "title": "Name",
                    "description": "Current value: Alice",
                    "questionItem": {"question": {"textQuestion": {}}},
                },
                "location": {"index": 0},
            }})
        );
    }

    #[rstest]
    #[case(ElementType::MultipleChoice, "RADIO")]
    #[case(ElementType::Checkboxes, "CHECKBOX")]
    #[case(ElementType::Dropdown, "DROP_DOWN")]
    fn choice_questions_default_their_options(#[case] element: ElementType, #[case] kind: &str) {
        let item = question_item("Colour", element, "ignored", &[]);
        let question = &item["createItem"]["item"]["questionItem"]["question"]["choiceQuestion"];
        assert_eq!(question["type"], kind);
        assert_eq!(
            question["options"],
            json!([{"value": "Option 1"}, {"value": "Option 2"}])
        );
        assert!(item["createItem"]["item"].get("description").is_none());
    }

    #[rstest]
    fn rows_become_one_request_per_field() {
        let types = BTreeMap::from([
            ("Age".to_owned(), ElementType::Dropdown),
            ("Born".to_owned(), ElementType::Date),
        ]);
        let extra = BTreeMap::from([
            ("Name".to_owned(), "Please confirm your name.".to_owned()),
            ("Age".to_owned(), " 18-30 , 31-50,51+ ".to_owned()),
        ]);

        let requests = row_requests(
            [("Name", Some("Alice")), ("Age", Some("30")), ("Born", None)],
            &types,
            &extra,
        );

        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0]["createItem"]["item"]["description"],
            "Please confirm your name.\nCurrent value: Alice"
        );
        assert_eq!(
            requests[1]["createItem"]["item"]["questionItem"]["question"]["choiceQuestion"]
                ["options"],
            json!([{"value": "18-30"}, {"value": "31-50"}, {"value": "51+"}])
        );
        assert_eq!(
            requests[2]["createItem"]["item"],
            json!({
                "title": "Born",
                "description": "Current value: ",
                "questionItem": {"question": {"dateQuestion": {}}},
            })
        );
        assert_eq!(batch_update_body(requests)["requests"].as_array().map(Vec::len), Some(3));
    }

    #[rstest]
    fn links_point_at_the_form() {
        let links = FormLinks::for_form("1FAIpQL");
        assert_eq!(links.edit_url, "https://docs.google.com/forms/d/1FAIpQL/edit");
        assert_eq!(links.response_url, "https://docs.google.com/forms/d/1FAIpQL/viewform");
    }
}
