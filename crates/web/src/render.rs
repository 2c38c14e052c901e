//! Turns controller pages into HTML.
//!
//! Each view has a fragment template under `templates/pages/`; the fragment
//! is rendered first and then placed in the main region of `shell.html`.

use askama::Template;

use pocketbook_core::SessionUser;

use crate::contacts::ListedContact;
use crate::controller::{FieldView, Page, PageBody, field_views};
use crate::filters;
use crate::services::WeatherReport;

#[derive(Template)]
#[template(path = "shell.html")]
struct ShellTemplate<'a> {
    title: &'a str,
    user: Option<&'a SessionUser>,
    main: &'a str,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
struct HomeTemplate<'a> {
    weather: Option<&'a WeatherReport>,
}

#[derive(Template)]
#[template(path = "pages/about.html")]
struct AboutTemplate;

#[derive(Template)]
#[template(path = "pages/products.html")]
struct ProductsTemplate;

#[derive(Template)]
#[template(path = "pages/services.html")]
struct ServicesTemplate;

#[derive(Template)]
#[template(path = "pages/register.html")]
struct RegisterTemplate;

#[derive(Template)]
#[template(path = "pages/404.html")]
struct NotFoundTemplate<'a> {
    path: &'a str,
}

#[derive(Template)]
#[template(path = "pages/contact.html")]
struct ContactTemplate<'a> {
    fields: Vec<FieldView<'a>>,
    subscribe: bool,
    notice: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "pages/contact-list.html")]
struct ContactListTemplate<'a> {
    rows: &'a [ListedContact],
}

#[derive(Template)]
#[template(path = "pages/edit.html")]
struct EditTemplate<'a> {
    heading: &'a str,
    target: &'a str,
    button_label: &'a str,
    fields: Vec<FieldView<'a>>,
    notice: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "pages/login.html")]
struct LoginTemplate<'a> {
    username: &'a str,
    error: Option<&'a str>,
}

/// Render the page body and wrap it in the shell.
///
/// # Errors
///
/// Returns an error if a template fails to render.
pub fn render_page(page: &Page) -> askama::Result<String> {
    let main = render_body(page)?;

    ShellTemplate {
        title: &page.title,
        user: page.user.as_ref(),
        main: &main,
    }
    .render()
}

fn render_body(page: &Page) -> askama::Result<String> {
    match &page.body {
        PageBody::Home(view) => HomeTemplate {
            weather: view.weather.as_ref(),
        }
        .render(),
        PageBody::About => AboutTemplate.render(),
        PageBody::Products => ProductsTemplate.render(),
        PageBody::Services => ServicesTemplate.render(),
        PageBody::Register => RegisterTemplate.render(),
        PageBody::NotFound { path } => NotFoundTemplate { path }.render(),
        PageBody::Contact(view) => ContactTemplate {
            fields: field_views(&view.form, view.errors.as_ref()),
            subscribe: view.subscribe,
            notice: view.notice,
        }
        .render(),
        PageBody::ContactList(view) => ContactListTemplate { rows: &view.rows }.render(),
        PageBody::Edit(view) => EditTemplate {
            heading: &page.title,
            target: view.mode.target(),
            button_label: view.mode.button_label(),
            fields: field_views(&view.form, view.errors.as_ref()),
            notice: view.notice,
        }
        .render(),
        PageBody::Login(view) => LoginTemplate {
            username: &view.username,
            error: view.error,
        }
        .render(),
    }
}
