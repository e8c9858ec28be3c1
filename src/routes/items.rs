use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::dto::categories::CategoryDto;
use crate::forms::items::{ItemForm, ItemFormPayload};
use crate::forms::{FieldError, escape_markup};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_not_found, render_template};
use crate::services::ServiceError;
use crate::services::items::{
    create_item as create_item_service, delete_item as delete_item_service,
    edit_item as edit_item_service, new_item_form as new_item_form_service,
    show_item as show_item_service, show_item_delete as show_item_delete_service,
    show_items as show_items_service, update_item as update_item_service,
};

const ITEM_LIST_URL: &str = "/catalog/items";
const ITEM_NOT_FOUND: &str = "Rental not found";
const CREATE_ACTION: &str = "/catalog/item/create";

fn update_action(item_id: i32) -> String {
    format!("/catalog/item/{item_id}/update")
}

/// Context for the create/update form.
///
/// Stored category names are escaped, so the current selection is escaped
/// the same way before the template compares them.
fn form_context(
    flash_messages: &IncomingFlashMessages,
    title: &str,
    action: &str,
    form: &ItemForm,
    categories: &[CategoryDto],
    errors: &[FieldError],
) -> Context {
    let selected = form
        .category
        .iter()
        .map(|c| escape_markup(c))
        .collect::<Vec<_>>();

    let mut context = base_context(flash_messages, "items", title);
    context.insert("action", action);
    context.insert("form", form);
    context.insert("categories", categories);
    context.insert("selected_categories", &selected);
    context.insert("errors", errors);
    context
}

/// Re-render a rejected submission with the category choices reloaded.
fn render_invalid(
    tera: &Tera,
    repo: &DieselRepository,
    flash_messages: &IncomingFlashMessages,
    title: &str,
    action: &str,
    form: &ItemForm,
    errors: &[FieldError],
) -> HttpResponse {
    match new_item_form_service(repo) {
        Ok(categories) => {
            let context = form_context(flash_messages, title, action, form, &categories, errors);
            render_template(tera, "items/form.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load categories for item form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/items")]
pub async fn show_items(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_items_service(repo.get_ref()) {
        Ok(items) => {
            let mut context = base_context(&flash_messages, "items", "All Rental Options");
            context.insert("item_list", &items);
            render_template(&tera, "items/list.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render items page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/item/create")]
pub async fn create_item_form(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_invalid(
        &tera,
        repo.get_ref(),
        &flash_messages,
        "Create Rental",
        CREATE_ACTION,
        &ItemForm::default(),
        &[],
    )
}

#[post("/item/create")]
pub async fn create_item(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let form = ItemForm::from_pairs(pairs).normalized();
    let payload: ItemFormPayload = match form.clone().try_into() {
        Ok(payload) => payload,
        Err(invalid) => {
            return render_invalid(
                &tera,
                repo.get_ref(),
                &flash_messages,
                "Create Rental",
                CREATE_ACTION,
                &invalid.values,
                &invalid.errors,
            );
        }
    };

    match create_item_service(payload, server_config.unknown_category, repo.get_ref()) {
        Ok(item) => {
            FlashMessage::success("Rental saved.").send();
            redirect(&item.url())
        }
        Err(ServiceError::Validation(errors)) => render_invalid(
            &tera,
            repo.get_ref(),
            &flash_messages,
            "Create Rental",
            CREATE_ACTION,
            &form,
            &errors,
        ),
        Err(err) => {
            log::error!("Failed to create item: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/item/{item_id}/update")]
pub async fn update_item_form(
    item_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let item_id = item_id.into_inner();
    match edit_item_service(item_id, repo.get_ref()) {
        Ok((form, categories)) => {
            let context = form_context(
                &flash_messages,
                "Update Rental",
                &update_action(item_id),
                &form,
                &categories,
                &[],
            );
            render_template(&tera, "items/form.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, ITEM_NOT_FOUND),
        Err(err) => {
            log::error!("Failed to render item update form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/item/{item_id}/update")]
pub async fn update_item(
    item_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let item_id = item_id.into_inner();
    let action = update_action(item_id);

    let form = ItemForm::from_pairs(pairs).normalized();
    let payload: ItemFormPayload = match form.clone().try_into() {
        Ok(payload) => payload,
        Err(invalid) => {
            return render_invalid(
                &tera,
                repo.get_ref(),
                &flash_messages,
                "Update Rental",
                &action,
                &invalid.values,
                &invalid.errors,
            );
        }
    };

    match update_item_service(
        item_id,
        payload,
        server_config.unknown_category,
        repo.get_ref(),
    ) {
        Ok(item) => {
            FlashMessage::success("Rental updated.").send();
            redirect(&item.url())
        }
        Err(ServiceError::Validation(errors)) => render_invalid(
            &tera,
            repo.get_ref(),
            &flash_messages,
            "Update Rental",
            &action,
            &form,
            &errors,
        ),
        Err(ServiceError::NotFound) => render_not_found(&tera, ITEM_NOT_FOUND),
        Err(err) => {
            log::error!("Failed to update item: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/item/{item_id}/delete")]
pub async fn delete_item_form(
    item_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_item_delete_service(item_id.into_inner(), repo.get_ref()) {
        Ok(Some(item)) => {
            let mut context = base_context(&flash_messages, "items", "Delete Rental");
            context.insert("rental", &item);
            render_template(&tera, "items/delete.html", &context)
        }
        Ok(None) => redirect(ITEM_LIST_URL),
        Err(err) => {
            log::error!("Failed to render item delete page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/item/{item_id}/delete")]
pub async fn delete_item(
    item_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_item_service(item_id.into_inner(), repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Rental deleted.").send();
            redirect(ITEM_LIST_URL)
        }
        Ok(false) => redirect(ITEM_LIST_URL),
        Err(err) => {
            log::error!("Failed to delete item: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/item/{item_id}")]
pub async fn show_item(
    item_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_item_service(item_id.into_inner(), repo.get_ref()) {
        Ok(item) => {
            let mut context = base_context(&flash_messages, "items", "Rental Details");
            context.insert("rental", &item);
            render_template(&tera, "items/detail.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, ITEM_NOT_FOUND),
        Err(err) => {
            log::error!("Failed to render item page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
