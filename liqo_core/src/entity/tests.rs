#[cfg(test)]
mod entity_tests {
    use crate::entity::prelude::*;
    use crate::ids::*;
    use crate::test_utils::{insert_group, insert_user, setup_test_db};
    use chrono::Utc;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = setup_test_db().await;

        let user_id = UserId::new();
        let user = UserActiveModel {
            id: Set(user_id),
            name: Set("Ustadz Rahmat".to_string()),
            email: Set(Some("rahmat@example.com".to_string())),
            role: Set(Role::Mentor),
            blocked_at: Set(None),
            block_reason: Set(None),
            blocked_by: Set(None),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        };

        User::insert(user).exec(&db).await.expect("Failed to insert user");

        let found = User::find_by_id(user_id)
            .one(&db)
            .await
            .expect("Failed to query user")
            .expect("User should exist");

        assert_eq!(found.name, "Ustadz Rahmat");
        assert_eq!(found.role, Role::Mentor);
        assert!(!found.is_blocked());
        assert!(!found.is_deleted());
    }

    #[tokio::test]
    async fn test_role_enum_round_trips_through_db() {
        let db = setup_test_db().await;

        for role in [Role::SuperAdmin, Role::Admin, Role::Mentor] {
            let id = insert_user(&db, role).await;
            let found = User::find_by_id(id).one(&db).await.unwrap().unwrap();
            assert_eq!(found.role, role);
        }
    }

    #[tokio::test]
    async fn test_mentee_belongs_to_group() {
        let db = setup_test_db().await;
        let mentor = insert_user(&db, Role::Mentor).await;
        let group_id = insert_group(&db, Some(mentor)).await;

        let mentee = MenteeActiveModel {
            id: Set(MenteeId::new()),
            full_name: Set("Khadijah".to_string()),
            gender: Set("female".to_string()),
            status: Set(MenteeStatus::Active),
            current_group: Set(group_id),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        };
        let mentee = Mentee::insert(mentee).exec_with_returning(&db).await.unwrap();

        let group = mentee
            .find_related(Group)
            .one(&db)
            .await
            .unwrap()
            .expect("related group should resolve");
        assert_eq!(group.id, group_id);
    }

    #[tokio::test]
    async fn test_history_ids_increase_with_insertion() {
        let db = setup_test_db().await;
        let mentor = insert_user(&db, Role::Mentor).await;
        let group_id = insert_group(&db, None).await;

        let mut last_id = 0;
        for _ in 0..3 {
            let row = GroupMentorHistoryActiveModel {
                id: NotSet,
                group_id: Set(group_id),
                from_mentor: Set(None),
                to_mentor: Set(mentor),
                changed_at: Set(Utc::now()),
                changed_by: Set(None),
                notes: Set(None),
                deleted_at: Set(None),
            };
            let row = GroupMentorHistory::insert(row)
                .exec_with_returning(&db)
                .await
                .unwrap();
            assert!(row.id > last_id, "ids must grow with insertion order");
            last_id = row.id;
        }
    }

    #[tokio::test]
    async fn test_role_capability_ordering() {
        assert!(Role::SuperAdmin.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::Mentor));
        assert!(!Role::Mentor.satisfies(Role::Admin));
        assert!(!Role::Admin.satisfies(Role::SuperAdmin));
    }
}
