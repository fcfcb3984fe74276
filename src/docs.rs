use utoipa::OpenApi;

use classroom_core::errors::ErrorResponse;
use classroom_core::pagination::{Order, PageMeta, PageOptions};
use classroom_models::classes::{
    AssignStudentDto, AssignTeacherDto, ClassDto, ClassFields, CreateClassDto, UpdateClassDto,
};
use classroom_models::students::{CreateStudentDto, StudentDto, StudentFields, UpdateStudentDto};
use classroom_models::teachers::{CreateTeacherDto, TeacherDto, TeacherFields, UpdateTeacherDto};

use crate::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health::health_check,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::teachers::controller::get_teacher_classes,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::assign_teacher,
        crate::modules::classes::controller::get_class_teacher,
        crate::modules::classes::controller::assign_student,
        crate::modules::classes::controller::get_class_students,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            Order,
            PageMeta,
            PageOptions,
            TeacherDto,
            TeacherFields,
            CreateTeacherDto,
            UpdateTeacherDto,
            StudentDto,
            StudentFields,
            CreateStudentDto,
            UpdateStudentDto,
            ClassDto,
            ClassFields,
            CreateClassDto,
            UpdateClassDto,
            AssignTeacherDto,
            AssignStudentDto,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Teachers", description = "Teacher management endpoints"),
        (name = "Students", description = "Student management endpoints"),
        (name = "Classes", description = "Class management and assignment endpoints")
    ),
    info(
        title = "Classroom API",
        version = "0.1.0",
        description = "REST API for teachers, students and classes.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
