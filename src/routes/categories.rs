use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::dto::categories::CategoryDetailDto;
use crate::forms::FieldError;
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_not_found, render_template};
use crate::services::ServiceError;
use crate::services::categories::{
    CategoryDeletion, create_category as create_category_service,
    delete_category as delete_category_service, edit_category as edit_category_service,
    show_categories as show_categories_service, show_category as show_category_service,
    show_category_delete as show_category_delete_service,
    update_category as update_category_service,
};

const CATEGORY_LIST_URL: &str = "/catalog/categories";
const CATEGORY_NOT_FOUND: &str = "Category not found";

const CREATE_ACTION: &str = "/catalog/category/create";

fn update_action(category_id: i32) -> String {
    format!("/catalog/category/{category_id}/update")
}

/// Context for the create/update form; `action` is where the form posts to.
fn form_context(
    flash_messages: &IncomingFlashMessages,
    title: &str,
    action: &str,
    form: &CategoryForm,
    errors: &[FieldError],
) -> Context {
    let mut context = base_context(flash_messages, "categories", title);
    context.insert("action", action);
    context.insert("form", form);
    context.insert("errors", errors);
    context
}

fn delete_context(
    flash_messages: &IncomingFlashMessages,
    detail: &CategoryDetailDto,
) -> Context {
    let mut context = base_context(flash_messages, "categories", "Delete Category");
    context.insert("category", &detail.category);
    context.insert("category_items", &detail.items);
    context
}

#[get("/categories")]
pub async fn show_categories(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_categories_service(repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, "categories", "All Categories");
            context.insert("category_list", &categories);
            render_template(&tera, "categories/list.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/create")]
pub async fn create_category_form(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = form_context(
        &flash_messages,
        "Create Category",
        CREATE_ACTION,
        &CategoryForm::default(),
        &[],
    );
    render_template(&tera, "categories/form.html", &context)
}

#[post("/category/create")]
pub async fn create_category(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(invalid) => {
            let context = form_context(
                &flash_messages,
                "Create Category",
                CREATE_ACTION,
                &invalid.values,
                &invalid.errors,
            );
            return render_template(&tera, "categories/form.html", &context);
        }
    };

    match create_category_service(payload, repo.get_ref()) {
        Ok(category) => {
            FlashMessage::success("Category saved.").send();
            redirect(&category.url())
        }
        Err(err) => {
            log::error!("Failed to create category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{category_id}/update")]
pub async fn update_category_form(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let category_id = category_id.into_inner();
    match edit_category_service(category_id, repo.get_ref()) {
        Ok(category) => {
            let form = CategoryForm::from_category(&category);
            let context = form_context(
                &flash_messages,
                "Update Category",
                &update_action(category_id),
                &form,
                &[],
            );
            render_template(&tera, "categories/form.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, CATEGORY_NOT_FOUND),
        Err(err) => {
            log::error!("Failed to render category update form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/category/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let category_id = category_id.into_inner();
    let action = update_action(category_id);

    let form = form.normalized();
    let payload: CategoryFormPayload = match form.clone().try_into() {
        Ok(payload) => payload,
        Err(invalid) => {
            let context = form_context(
                &flash_messages,
                "Update Category",
                &action,
                &invalid.values,
                &invalid.errors,
            );
            return render_template(&tera, "categories/form.html", &context);
        }
    };

    match update_category_service(category_id, payload, repo.get_ref()) {
        Ok(updated) => {
            FlashMessage::success("Category updated.").send();
            redirect(&updated.url())
        }
        Err(ServiceError::Validation(errors)) => {
            let context = form_context(
                &flash_messages,
                "Update Category",
                &action,
                &form,
                &errors,
            );
            render_template(&tera, "categories/form.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, CATEGORY_NOT_FOUND),
        Err(err) => {
            log::error!("Failed to update category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{category_id}/delete")]
pub async fn delete_category_form(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_category_delete_service(category_id.into_inner(), repo.get_ref()) {
        Ok(Some(detail)) => {
            let context = delete_context(&flash_messages, &detail);
            render_template(&tera, "categories/delete.html", &context)
        }
        Ok(None) => redirect(CATEGORY_LIST_URL),
        Err(err) => {
            log::error!("Failed to render category delete page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/category/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match delete_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(CategoryDeletion::Deleted) => {
            FlashMessage::success("Category deleted.").send();
            redirect(CATEGORY_LIST_URL)
        }
        Ok(CategoryDeletion::Missing) => redirect(CATEGORY_LIST_URL),
        Ok(CategoryDeletion::Blocked(detail)) => {
            let context = delete_context(&flash_messages, &detail);
            render_template(&tera, "categories/delete.html", &context)
        }
        Err(err) => {
            log::error!("Failed to delete category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{category_id}")]
pub async fn show_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, "categories", "Category Detail");
            context.insert("category", &detail.category);
            context.insert("category_items", &detail.items);
            render_template(&tera, "categories/detail.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, CATEGORY_NOT_FOUND),
        Err(err) => {
            log::error!("Failed to render category page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
