use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTodo, Todo, TodoUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Lists every todo, newest first.
///
/// Todos are shared: the list is not scoped to the authenticated user.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Todo` objects.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn list_todos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = state.db.list_todos().await?;
    log::debug!("User {} listed {} todos", user.id, todos.len());
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a todo from `{"text": ...}` (or the older `{"title": ...}`).
///
/// ## Responses:
/// - `201 Created`: the stored `Todo`, with `completed` set to `false`.
/// - `400 Bad Request`: the body is not valid JSON or lacks `text`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: `text` is empty or longer than 500 characters.
#[post("")]
pub async fn create_todo(
    state: web::Data<AppState>,
    todo_data: web::Json<NewTodo>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = state.db.insert_todo(&Todo::new(todo_data.into_inner())).await?;
    log::info!("User {} created todo {}", user.id, todo.id);

    Ok(HttpResponse::Created().json(todo))
}

/// Fetches a single todo.
///
/// ## Responses:
/// - `200 OK`: the `Todo`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no todo has this id.
#[get("/{id}")]
pub async fn get_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state
        .db
        .find_todo(todo_id.into_inner())
        .await?
        .map(|todo| HttpResponse::Ok().json(todo))
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))
}

/// Applies a partial update, typically `{"completed": true}`.
///
/// Fields missing from the body keep their stored value.
///
/// ## Responses:
/// - `200 OK`: the updated `Todo`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no todo has this id.
/// - `422 Unprocessable Entity`: `text` is present but empty or too long.
#[put("/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<Uuid>,
    changes: web::Json<TodoUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    changes.validate()?;
    let todo_id = todo_id.into_inner();

    match state.db.update_todo(todo_id, &changes).await? {
        Some(todo) => {
            log::info!("User {} updated todo {}", user.id, todo.id);
            Ok(HttpResponse::Ok().json(todo))
        }
        None => Err(AppError::NotFound("Todo not found".into())),
    }
}

/// Deletes a todo.
///
/// Idempotent: deleting an id that does not exist (any more) still succeeds.
///
/// ## Responses:
/// - `204 No Content`: always, once authenticated.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo_id = todo_id.into_inner();
    let removed = state.db.delete_todo(todo_id).await?;
    if removed > 0 {
        log::info!("User {} deleted todo {}", user.id, todo_id);
    }

    Ok(HttpResponse::NoContent().finish())
}
