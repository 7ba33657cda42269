use chrono::Utc;
use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::config::TeamRosterEntry;
use crate::entity::{evaluation, team};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't create composite indexes, so the one that
/// makes evaluation upserts work is created here on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_evaluation_judge_team")
        .table(evaluation::Entity)
        .col(evaluation::Column::JudgeId)
        .col(evaluation::Column::TeamId)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_evaluation_judge_team exists");

    Ok(())
}

/// Delete all evaluations and teams, then insert `roster`. Run inside a transaction.
pub async fn replace_teams<C: ConnectionTrait>(
    conn: &C,
    roster: &[TeamRosterEntry],
) -> Result<usize, DbErr> {
    let evaluations = evaluation::Entity::delete_many().exec(conn).await?;
    let teams = team::Entity::delete_many().exec(conn).await?;
    info!(
        evaluations = evaluations.rows_affected,
        teams = teams.rows_affected,
        "cleared teams and evaluations"
    );

    insert_roster(conn, roster).await
}

/// Insert the configured roster when the team table is empty.
///
/// The roster goes in as one transaction, so a failed seed leaves the table
/// empty and the next start tries again.
pub async fn seed_teams(
    db: &DatabaseConnection,
    roster: &[TeamRosterEntry],
) -> Result<usize, DbErr> {
    if roster.is_empty() {
        return Ok(0);
    }

    let txn = db.begin().await?;
    if team::Entity::find().count(&txn).await? > 0 {
        return Ok(0);
    }
    let inserted = insert_roster(&txn, roster).await?;
    txn.commit().await?;

    info!("Seeded {} teams from the event roster", inserted);
    Ok(inserted)
}

async fn insert_roster<C: ConnectionTrait>(
    conn: &C,
    roster: &[TeamRosterEntry],
) -> Result<usize, DbErr> {
    let now = Utc::now();
    for entry in roster {
        team::ActiveModel {
            id: Set(Uuid::now_v7()),
            team_number: Set(entry.team_number),
            team_leader: Set(entry.team_leader.trim().to_string()),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
    }

    Ok(roster.len())
}
