//! SeaORM adapter for the rooms table - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::rooms;

pub mod dto;

pub use dto::{RoomCreate, RoomUpdate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find_by_id(room_id).one(conn).await
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<rooms::Model>, sea_orm::DbErr> {
    rooms::Entity::find()
        .order_by_asc(rooms::Column::Id)
        .all(conn)
        .await
}

pub async fn create_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomCreate,
) -> Result<rooms::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = rooms::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        started: Set(dto.started),
        winner: Set(dto.winner),
        player_count: Set(dto.player_count),
        document: Set(dto.document),
        created_at: Set(now),
        updated_at: Set(now),
        lock_version: Set(1),
    };

    active.insert(conn).await
}

/// Overwrite a room row if its lock version still matches, then refetch.
///
/// Zero affected rows means either the room is gone or someone else saved
/// first; the two are told apart with a follow-up read.
pub async fn update_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoomUpdate,
) -> Result<rooms::Model, sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();
    let result = rooms::Entity::update_many()
        .col_expr(rooms::Column::Name, Expr::val(dto.name).into())
        .col_expr(rooms::Column::Started, Expr::val(dto.started).into())
        .col_expr(rooms::Column::Winner, Expr::val(dto.winner).into())
        .col_expr(rooms::Column::PlayerCount, Expr::val(dto.player_count).into())
        .col_expr(rooms::Column::Document, Expr::val(dto.document).into())
        .col_expr(rooms::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            rooms::Column::LockVersion,
            Expr::col(rooms::Column::LockVersion).add(1),
        )
        .filter(rooms::Column::Id.eq(dto.id))
        .filter(rooms::Column::LockVersion.eq(dto.expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let room = rooms::Entity::find_by_id(dto.id).one(conn).await?;
        if let Some(room) = room {
            let payload = format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                dto.expected_version, room.lock_version
            );
            return Err(sea_orm::DbErr::Custom(payload));
        } else {
            return Err(sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{}", dto.id)));
        }
    }

    rooms::Entity::find_by_id(dto.id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("ROOM_NOT_FOUND:{}", dto.id)))
}
