use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::main::show_index;

#[get("/")]
pub async fn root() -> impl Responder {
    redirect("/catalog/")
}

#[get("/")]
pub async fn index(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_index(repo.get_ref()) {
        Ok(summary) => {
            let mut context =
                base_context(&flash_messages, "index", "Colorado Adventure Rentals Inc.");
            context.insert("category_count", &summary.category_count);
            context.insert("item_count", &summary.item_count);
            render_template(&tera, "index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
