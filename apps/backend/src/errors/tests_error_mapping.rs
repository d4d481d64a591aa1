//! End-to-end mapping from storage errors to `AppError` codes.

use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::errors::ErrorCode;

#[test]
fn optimistic_lock_from_db_surfaces_as_conflict() {
    let err = sea_orm::DbErr::Custom(r#"OPTIMISTIC_LOCK:{"expected":1,"actual":2}"#.into());
    let app: AppError = err.into();
    assert!(matches!(app, AppError::Conflict { .. }));
    assert_eq!(app.code(), ErrorCode::OptimisticLock);
}

#[test]
fn missing_room_from_db_surfaces_as_room_not_found() {
    let app: AppError = sea_orm::DbErr::Custom("ROOM_NOT_FOUND:7".into()).into();
    assert_eq!(app.code(), ErrorCode::RoomNotFound);
    assert!(app.to_string().contains("Room 7 not found"));
}

#[test]
fn unique_violation_keeps_its_own_code() {
    let app: AppError =
        DomainError::conflict(ConflictKind::Other("Unique".into()), "dup").into();
    assert_eq!(app.code(), ErrorCode::UniqueViolation);
}

#[test]
fn other_validation_kinds_fall_back_to_generic_code() {
    let app: AppError =
        DomainError::validation(ValidationKind::Other("Pawn".into()), "bad pawn").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);

    let app: AppError =
        DomainError::validation(ValidationKind::InvalidConfig, "window is zero").into();
    assert_eq!(app.code(), ErrorCode::ConfigError);
}

#[test]
fn unclassified_db_error_is_a_db_error() {
    let app: AppError = sea_orm::DbErr::Custom("disk on fire".into()).into();
    assert!(matches!(app, AppError::Db { .. }));
    assert_eq!(app.code(), ErrorCode::DbError);
}

#[test]
fn config_and_internal_errors_have_fixed_codes() {
    assert_eq!(AppError::config("x").code(), ErrorCode::ConfigError);
    assert_eq!(AppError::internal("x").code(), ErrorCode::Internal);
}
