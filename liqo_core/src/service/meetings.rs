use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    entity::prelude::*,
    error::{CoreError, EntityKind},
    ids::{AttendanceId, GroupId, MeetingId, MenteeId, UserId},
    service::{guard, membership},
};

#[derive(Clone)]
pub struct MeetingsService {
    db: DatabaseConnection,
}

impl MeetingsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Schedule a meeting for a group.
    ///
    /// The group's mentor at creation time is snapshotted onto the row, so
    /// later reassignments don't rewrite who ran past meetings.
    pub async fn create_meeting(
        &self,
        group_id: GroupId,
        date: DateTimeUtc,
        kind: MeetingKind,
        topic: String,
        place: Option<String>,
        notes: Option<String>,
    ) -> Result<MeetingModel, CoreError> {
        let group = guard::require_group(&self.db, group_id).await?;
        let mentor_id = membership::derived_current_mentor(&self.db, &group).await?;

        let meeting = MeetingActiveModel {
            id: Set(MeetingId::new()),
            group_id: Set(group_id),
            mentor_id: Set(mentor_id),
            date: Set(date),
            kind: Set(kind),
            topic: Set(topic),
            place: Set(place),
            notes: Set(notes),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        };

        let meeting = Meeting::insert(meeting).exec_with_returning(&self.db).await?;
        info!(meeting_id = %meeting.id, %group_id, "meeting created");
        Ok(meeting)
    }

    /// Get an active meeting by ID
    pub async fn get_meeting(&self, meeting_id: MeetingId) -> Result<MeetingModel, CoreError> {
        guard::require_meeting(&self.db, meeting_id).await
    }

    /// List active meetings of a group
    pub async fn list_by_group(&self, group_id: GroupId) -> Result<Vec<MeetingModel>, CoreError> {
        let meetings = Meeting::find()
            .filter(MeetingColumn::GroupId.eq(group_id))
            .filter(MeetingColumn::DeletedAt.is_null())
            .all(&self.db)
            .await?;

        Ok(meetings)
    }

    /// Record attendance for a mentee at a meeting.
    ///
    /// The mentee must currently belong to the meeting's group; there is one
    /// attendance row per (meeting, mentee), and recording again replaces
    /// status and notes.
    pub async fn record_attendance(
        &self,
        meeting_id: MeetingId,
        mentee_id: MenteeId,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> Result<AttendanceModel, CoreError> {
        let meeting = guard::require_meeting(&self.db, meeting_id).await?;
        let mentee = guard::require_mentee(&self.db, mentee_id).await?;

        let mentee_group = membership::derived_current_group(&self.db, &mentee).await?;
        if mentee_group != meeting.group_id {
            return Err(CoreError::Validation(
                "mentee does not belong to the meeting's group".to_owned(),
            ));
        }

        // Atomic upsert on the (meeting, mentee) unique index; a re-record
        // replaces status/notes on the existing row instead of racing it
        let row = AttendanceActiveModel {
            id: Set(AttendanceId::new()),
            meeting_id: Set(meeting_id),
            mentee_id: Set(mentee_id),
            status: Set(status),
            notes: Set(notes),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        };
        let attendance = Attendance::insert(row)
            .on_conflict(
                OnConflict::columns([AttendanceColumn::MeetingId, AttendanceColumn::MenteeId])
                    .update_columns([AttendanceColumn::Status, AttendanceColumn::Notes])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        Ok(attendance)
    }

    /// List attendance rows of a meeting
    pub async fn list_attendance(
        &self,
        meeting_id: MeetingId,
    ) -> Result<Vec<AttendanceModel>, CoreError> {
        let rows = Attendance::find()
            .filter(AttendanceColumn::MeetingId.eq(meeting_id))
            .filter(AttendanceColumn::DeletedAt.is_null())
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Tombstone an attendance row (e.g. recorded against the wrong mentee)
    pub async fn remove_attendance(
        &self,
        attendance_id: AttendanceId,
    ) -> Result<AttendanceModel, CoreError> {
        let row = Attendance::find_by_id(attendance_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Attendance))?;

        if row.deleted_at.is_some() {
            return Err(CoreError::DeletedEntity(EntityKind::Attendance));
        }

        let mut active = row.into_active_model();
        active.deleted_at = Set(Some(Utc::now()));
        Ok(active.update(&self.db).await?)
    }

    pub async fn restore_attendance(
        &self,
        attendance_id: AttendanceId,
    ) -> Result<AttendanceModel, CoreError> {
        let row = Attendance::find_by_id(attendance_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Attendance))?;

        if row.deleted_at.is_none() {
            return Err(CoreError::NotDeleted(EntityKind::Attendance));
        }

        let mut active = row.into_active_model();
        active.deleted_at = Set(None);
        Ok(active.update(&self.db).await?)
    }

    pub async fn soft_delete(&self, meeting_id: MeetingId) -> Result<MeetingModel, CoreError> {
        let meeting = guard::require_meeting(&self.db, meeting_id).await?;

        let mut active = meeting.into_active_model();
        active.deleted_at = Set(Some(Utc::now()));
        Ok(active.update(&self.db).await?)
    }

    pub async fn restore(&self, meeting_id: MeetingId) -> Result<MeetingModel, CoreError> {
        let meeting = Meeting::find_by_id(meeting_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Meeting))?;

        if !meeting.is_deleted() {
            return Err(CoreError::NotDeleted(EntityKind::Meeting));
        }

        let mut active = meeting.into_active_model();
        active.deleted_at = Set(None);
        Ok(active.update(&self.db).await?)
    }

    /// Irreversibly remove an already-tombstoned meeting; attendance rows
    /// cascade away. Admin only.
    pub async fn hard_delete(
        &self,
        meeting_id: MeetingId,
        acting_user: UserId,
    ) -> Result<(), CoreError> {
        guard::require_actor(&self.db, acting_user, Role::Admin).await?;

        let meeting = Meeting::find_by_id(meeting_id)
            .one(&self.db)
            .await?
            .ok_or(CoreError::NotFound(EntityKind::Meeting))?;

        if !meeting.is_deleted() {
            return Err(CoreError::NotDeleted(EntityKind::Meeting));
        }

        Meeting::delete_by_id(meeting_id).exec(&self.db).await?;
        info!(%meeting_id, "meeting hard-deleted");
        Ok(())
    }
}
