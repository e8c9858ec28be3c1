use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

pub mod categories;
pub mod items;
pub mod main;

/// Register every catalog route.
///
/// Literal `create` paths are registered ahead of `{id}` paths so that
/// "create" is never parsed as an identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::root).service(
        web::scope("/catalog")
            .service(main::index)
            .service(items::show_items)
            .service(items::create_item_form)
            .service(items::create_item)
            .service(items::update_item_form)
            .service(items::update_item)
            .service(items::delete_item_form)
            .service(items::delete_item)
            .service(items::show_item)
            .service(categories::show_categories)
            .service(categories::create_category_form)
            .service(categories::create_category)
            .service(categories::update_category_form)
            .service(categories::update_category)
            .service(categories::delete_category_form)
            .service(categories::delete_category)
            .service(categories::show_category),
    );
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

/// 404 page with a human readable explanation.
pub fn render_not_found(tera: &Tera, message: &str) -> HttpResponse {
    let mut context = Context::new();
    context.insert("title", "Not Found");
    context.insert("message", message);
    context.insert("alerts", &Vec::<(String, String)>::new());
    context.insert("current_page", "");
    let body = tera.render("error.html", &context).unwrap_or_else(|e| {
        log::error!("Failed to render template 'error.html': {e}");
        message.to_string()
    });
    HttpResponse::NotFound().body(body)
}

/// `303 See Other` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
    title: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("title", title);
    context
}

pub async fn not_found(tera: web::Data<Tera>) -> HttpResponse {
    render_not_found(&tera, "The page you requested does not exist.")
}
