//! Controller actions for the blog front controller.
//!
//! Each controller is a set of plain functions registered under
//! `Controller@action`. Path parameters are declared next to the
//! registration and checked against the route table at start-up.

use portico_router::{Context, HandlerRegistry, Response, Result};
use tracing::info;

use crate::state::AppState;

type Ctx<'a> = Context<'a, AppState>;

/// The login form.
pub const LOGIN_FORM: &str = r#"<form method="POST" action="/login">
    <label for="username">Username:</label>
    <input type="text" id="username" name="username"><br><br>
    <label for="password">Password:</label>
    <input type="password" id="password" name="password"><br><br>
    <input type="submit" value="Login">
</form>"#;

/// Registers every controller action.
pub fn registry() -> Result<HandlerRegistry<AppState>> {
    let mut registry: HandlerRegistry<AppState> = HandlerRegistry::new();

    registry.register("HomeController@index", &[], |_| {
        Response::html("Home Controller")
    })?;
    registry.register("TestController@index", &[], |_| {
        Response::html("Test Controller com AUTH")
    })?;

    registry.register("BlogController@index", &[], |_| Response::html("Blog Index"))?;
    registry.register("BlogController@show", &[], |_| Response::html("Blog Show"))?;
    registry.register("BlogController@category", &["category"], blog_category)?;
    registry.register("BlogController@item", &["id"], blog_item)?;

    registry.register("ShowController@detail", &["category", "title", "id"], show_detail)?;

    registry.register("DashBoardController@index", &[], |_| Response::html("Dashboard"))?;
    registry.register("DashBoardController@update", &[], |_| {
        Response::html("Update Dashboard")
    })?;
    registry.register("DashBoardController@insert", &[], |_| {
        Response::html("Insert Dashboard Item")
    })?;
    registry.register("DashBoardController@delete", &[], |_| {
        Response::html("Delete from Dashboard")
    })?;

    registry.register("LoginController@index", &[], |_| Response::html(LOGIN_FORM))?;
    registry.register("LoginController@authenticate", &[], login_authenticate)?;

    Ok(registry)
}

fn blog_category(ctx: &mut Ctx<'_>) -> Response {
    Response::html(format!(
        "Blog Category: {}",
        escape_html(ctx.param("category"))
    ))
}

fn blog_item(ctx: &mut Ctx<'_>) -> Response {
    Response::html(format!("Blog Item ID: {}", escape_html(ctx.param("id"))))
}

fn show_detail(ctx: &mut Ctx<'_>) -> Response {
    let [category, title, id] = ["category", "title", "id"].map(|name| escape_html(ctx.param(name)));
    Response::html(format!(
        "Show Details: Category - {category}, Title - {title}, ID - {id}"
    ))
}

fn login_authenticate(ctx: &mut Ctx<'_>) -> Response {
    let form = ctx.request().form();
    let username = form.get("username").map_or("", String::as_str);
    let password = form.get("password").map_or("", String::as_str);

    let verified = ctx
        .state()
        .users()
        .authenticate(username, password)
        .map(str::to_string);

    match verified {
        Ok(username) => {
            info!(username = %username, "login succeeded");
            ctx.state_mut().login(&username);
            Response::html("Login successful!")
                .status(302)
                .header("Location", "/dashboard")
        }
        Err(err) => Response::html(err.to_string()),
    }
}

/// Escapes text for HTML output (`&`, `<`, `>`, `"`, `'`).
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
