//! Minimal server-side HTML rendering. Pages are assembled from string
//! fragments; no template engine in scope.

use axum::http::StatusCode;
use axum::response::Html;

use crate::domain::todo::Task;
use crate::domain::user::User;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n\
         <body>\n{}\n</body></html>",
        escape(title),
        body
    ))
}

fn nav(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            "<nav><a href=\"/\">Home</a> | <a href=\"/todo/todo_today\">Today</a> | \
             <a href=\"/todo/all_todos\">All tasks</a> | <a href=\"/user/account\">{}</a> | \
             <a href=\"/user/logout\">Log out</a></nav>",
            escape(user.username.as_str())
        ),
        None => "<nav><a href=\"/\">Home</a> | <a href=\"/user/register\">Register</a> | \
                 <a href=\"/user/login\">Log in</a></nav>"
            .to_string(),
    }
}

fn flash(error: Option<&str>) -> String {
    match error {
        Some(msg) => format!("<p class=\"error\">{}</p>", escape(msg)),
        None => String::new(),
    }
}

pub fn home_page(user: Option<&User>) -> Html<String> {
    let body = format!("{}<h1>Todo</h1><p>Daily task lists.</p>", nav(user));
    layout("Todo Home Page", &body)
}

pub fn register_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}<h1>Register</h1>{}\
         <form method=\"post\" action=\"/user/register\">\
         <label>Username <input name=\"username\" maxlength=\"25\"></label><br>\
         <label>Email <input name=\"email\" type=\"email\" maxlength=\"50\"></label><br>\
         <label>Password <input name=\"password\" type=\"password\"></label><br>\
         <button type=\"submit\">Register</button></form>",
        nav(None),
        flash(error)
    );
    layout("Register Page", &body)
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        "{}<h1>Log in</h1>{}\
         <form method=\"post\" action=\"/user/login\">\
         <label>Username <input name=\"username\"></label><br>\
         <label>Password <input name=\"password\" type=\"password\"></label><br>\
         <label><input name=\"remember\" type=\"checkbox\"> Remember me</label><br>\
         <button type=\"submit\">Log in</button></form>",
        nav(None),
        flash(error)
    );
    layout("Login Page", &body)
}

pub fn account_page(user: &User, error: Option<&str>) -> Html<String> {
    let fullname = user.fullname.as_deref().unwrap_or("");
    let body = format!(
        "{}<h1>Account</h1>{}\
         <img src=\"/static/img/{}\" alt=\"avatar\" width=\"128\">\
         <p>Username: {}</p><p>Email: {}</p>\
         <form method=\"post\" action=\"/user/account\" enctype=\"multipart/form-data\">\
         <label>Full name <input name=\"fullname\" maxlength=\"50\" value=\"{}\"></label><br>\
         <label>Avatar <input name=\"avatar\" type=\"file\"></label><br>\
         <button type=\"submit\">Save</button></form>",
        nav(Some(user)),
        flash(error),
        escape(&user.avatar),
        escape(&user.username),
        escape(&user.email),
        escape(fullname)
    );
    layout("Account Info Page", &body)
}

fn task_rows(tasks: &[Task]) -> String {
    let mut rows = String::new();
    for task in tasks {
        let state = if task.completed {
            "done".to_string()
        } else {
            format!("<a href=\"/todo/{}/task_completed\">complete</a>", task.id.0)
        };
        rows.push_str(&format!("<li>{} [{}]</li>", escape(&task.task), state));
    }
    rows
}

pub fn today_page(user: &User, today: Option<&[Task]>, error: Option<&str>) -> Html<String> {
    let content = match today {
        Some(tasks) => format!(
            "<ul>{}</ul>\
             <form method=\"post\" action=\"/todo/todo_today\">\
             <label>Task <input name=\"task\" maxlength=\"100\"></label>\
             <button type=\"submit\">Add</button></form>",
            task_rows(tasks)
        ),
        None => "<p>No list for today yet.</p>\
                 <form method=\"post\" action=\"/todo/new_todo\">\
                 <button type=\"submit\">Start today's list</button></form>"
            .to_string(),
    };
    let body = format!("{}<h1>Today</h1>{}{}", nav(Some(user)), flash(error), content);
    layout("Todo Today Page", &body)
}

pub fn task_list_page(user: &User, title: &str, tasks: &[Task]) -> Html<String> {
    let content = if tasks.is_empty() {
        "<p>No tasks.</p>".to_string()
    } else {
        format!("<ul>{}</ul>", task_rows(tasks))
    };
    let body = format!("{}<h1>{}</h1>{}", nav(Some(user)), escape(title), content);
    layout(title, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let body = format!(
        "<h1>{}</h1><p>{}</p><p><a href=\"/\">Home</a></p>",
        status.as_u16(),
        escape(message)
    );
    layout("Error", &body)
}
