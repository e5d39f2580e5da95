//! Minimal server-rendered pages. Layout is deliberately plain; the only
//! hard requirement is that user-supplied text is HTML-escaped.

use axum::response::Html;

use crate::auth::dto::RegisterForm;
use crate::auth::repo::User;
use crate::error::FieldError;
use crate::tasks::repo::Task;

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: String) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>{}</body></html>",
        escape(title),
        body
    ))
}

fn notice_html(notice: Option<&str>) -> String {
    notice
        .map(|n| format!("<p class=\"notice\">{}</p>", escape(n)))
        .unwrap_or_default()
}

fn errors_html(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}: {}</li>", escape(e.field), escape(&e.message)))
        .collect();
    format!("<ul class=\"errors\">{}</ul>", items)
}

/// Registration form; submitted username and email are preserved on
/// redisplay, passwords never are.
pub fn register_page(form: &RegisterForm, errors: &[FieldError]) -> Html<String> {
    let body = format!(
        concat!(
            "<h1>Register</h1>{errors}",
            "<form method=\"post\" action=\"/register\">",
            "<label>Username <input name=\"username\" value=\"{username}\"></label>",
            "<label>Email <input name=\"email\" value=\"{email}\"></label>",
            "<label>Password <input type=\"password\" name=\"password\"></label>",
            "<label>Confirm Password <input type=\"password\" name=\"confirm_password\"></label>",
            "<button type=\"submit\">Register</button>",
            "</form>",
            "<p><a href=\"/login\">Log in</a></p>",
        ),
        errors = errors_html(errors),
        username = escape(&form.username),
        email = escape(&form.email),
    );
    page("Register", body)
}

pub fn login_page(notice: Option<&str>, error: Option<&str>) -> Html<String> {
    let error_html = error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default();
    let body = format!(
        concat!(
            "<h1>Login</h1>{notice}{error}",
            "<form method=\"post\" action=\"/login\">",
            "<label>Email <input name=\"email\"></label>",
            "<label>Password <input type=\"password\" name=\"password\"></label>",
            "<button type=\"submit\">Login</button>",
            "</form>",
            "<p><a href=\"/register\">Register</a></p>",
        ),
        notice = notice_html(notice),
        error = error_html,
    );
    page("Login", body)
}

pub fn tasks_page(user: &User, tasks: &[Task], notice: Option<&str>) -> Html<String> {
    let items: String = tasks
        .iter()
        .map(|t| format!("<li>{}</li>", escape(&t.description)))
        .collect();
    let body = format!(
        concat!(
            "<h1>To-Do List</h1>",
            "<p>Signed in as {username} (<a href=\"/logout\">Log out</a>)</p>{notice}",
            "<ul class=\"tasks\">{items}</ul>",
            "<form method=\"post\" action=\"/add\">",
            "<label>Task <input name=\"description\"></label>",
            "<button type=\"submit\">Add Task</button>",
            "</form>",
        ),
        username = escape(&user.username),
        notice = notice_html(notice),
        items = items,
    );
    page("To-Do List", body)
}

pub fn error_page(message: &str) -> Html<String> {
    page("Error", format!("<h1>Error</h1><p>{}</p>", escape(message)))
}
