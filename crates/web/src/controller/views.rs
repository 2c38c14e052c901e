//! Render results produced by the page controller.
//!
//! A [`Page`] is the title plus the body for one view. Bodies carry only the
//! data their template needs; turning them into HTML is the job of
//! [`crate::render`].

use pocketbook_core::{ContactForm, Field, FormErrors, SessionUser};

use crate::contacts::ListedContact;
use crate::router::View;
use crate::services::WeatherReport;

/// A rendered page: title, signed-in user for the header, and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub user: Option<SessionUser>,
    pub body: PageBody,
}

impl Page {
    /// The view this page renders.
    #[must_use]
    pub const fn view(&self) -> View {
        match self.body {
            PageBody::Home(_) => View::Home,
            PageBody::About => View::About,
            PageBody::Products => View::Products,
            PageBody::Services => View::Services,
            PageBody::Contact(_) => View::Contact,
            PageBody::ContactList(_) => View::ContactList,
            PageBody::Edit(_) => View::Edit,
            PageBody::Login(_) => View::Login,
            PageBody::Register => View::Register,
            PageBody::NotFound { .. } => View::NotFound,
        }
    }
}

/// Page body, one variant per view.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    Home(HomeView),
    About,
    Products,
    Services,
    Contact(ContactFormView),
    ContactList(ContactListView),
    Edit(EditView),
    Login(LoginView),
    Register,
    NotFound { path: String },
}

/// Home page with the weather widget.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    /// Current conditions, or `None` when they could not be fetched.
    pub weather: Option<WeatherReport>,
}

/// Feedback form on the contact page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormView {
    pub form: ContactForm,
    pub errors: Option<FormErrors>,
    pub subscribe: bool,
    pub notice: Option<&'static str>,
}

/// The numbered contact table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactListView {
    pub rows: Vec<ListedContact>,
}

/// Whether the edit page adds a new contact or edits a stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Add,
    /// Editing the contact under this key.
    Edit(String),
}

impl EditMode {
    /// Sub-parameter that selects this mode.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Add => "add",
            Self::Edit(key) => key,
        }
    }

    /// Label of the submit button.
    #[must_use]
    pub const fn button_label(&self) -> &'static str {
        match self {
            Self::Add => "Add Contact",
            Self::Edit(_) => "Edit Contact",
        }
    }
}

/// Add/edit contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditView {
    pub mode: EditMode,
    pub form: ContactForm,
    pub errors: Option<FormErrors>,
    pub notice: Option<&'static str>,
}

impl EditView {
    #[must_use]
    pub fn new(mode: EditMode, form: ContactForm) -> Self {
        Self {
            mode,
            form,
            errors: None,
            notice: None,
        }
    }
}

/// Login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginView {
    /// Username to refill after a failed attempt.
    pub username: String,
    pub error: Option<&'static str>,
}

/// One input of a contact form, ready for a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView<'a> {
    pub id: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub placeholder: &'static str,
    pub value: &'a str,
    pub error: Option<&'static str>,
}

/// Inputs for a contact form in display order.
#[must_use]
pub fn field_views<'a>(form: &'a ContactForm, errors: Option<&FormErrors>) -> Vec<FieldView<'a>> {
    Field::ALL
        .into_iter()
        .map(|field| {
            let (label, input_type, placeholder) = match field {
                Field::FullName => ("Full Name", "text", "Jane Doe"),
                Field::ContactNumber => ("Contact Number", "tel", "###-###-####"),
                Field::EmailAddress => ("Email Address", "email", "name@example.com"),
            };
            FieldView {
                id: field.id(),
                label,
                input_type,
                placeholder,
                value: form.value(field),
                error: errors.and_then(|errors| errors.message(field)),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_mode_labels() {
        assert_eq!(EditMode::Add.button_label(), "Add Contact");
        assert_eq!(EditMode::Add.target(), "add");

        let mode = EditMode::Edit("contact_17".to_string());
        assert_eq!(mode.button_label(), "Edit Contact");
        assert_eq!(mode.target(), "contact_17");
    }

    #[test]
    fn test_field_views_carry_errors() {
        let form = ContactForm {
            full_name: "Ada Lovelace".to_string(),
            contact_number: "9055550199".to_string(),
            email_address: String::new(),
        };
        let errors = form.validate().unwrap_err();

        let fields = field_views(&form, Some(&errors));
        let ids: Vec<&str> = fields.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["fullName", "contactNumber", "emailAddress"]);

        assert_eq!(fields[0].error, None);
        assert_eq!(fields[0].value, "Ada Lovelace");
        assert_eq!(
            fields[1].error,
            Some("Contact Number must be in format ###-###-####")
        );
        assert_eq!(fields[2].error, Some("The field is required"));
    }

    #[test]
    fn test_field_views_without_errors() {
        let form = ContactForm::default();
        assert!(field_views(&form, None).iter().all(|f| f.error.is_none()));
    }
}
