use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_student, delete_student, get_student, get_students, update_student};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
