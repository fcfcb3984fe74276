use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    assign_student, assign_teacher, create_class, delete_class, get_class, get_class_students,
    get_class_teacher, get_classes, update_class,
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_classes).post(create_class))
        .route("/{id}", get(get_class).put(update_class).delete(delete_class))
        .route(
            "/{id}/assign-teacher",
            get(get_class_teacher).post(assign_teacher),
        )
        .route(
            "/{id}/assign-students",
            get(get_class_students).post(assign_student),
        )
}
