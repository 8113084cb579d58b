// ABOUTME: Integration tests for rewards and citizen reports
// ABOUTME: Green point earning through verification and spending through redemption

mod common;

use airwatch_storage::reports::{
    PollutionType, ReportAssignInput, ReportCreateInput, ReportSeverity, ReportStatus,
    ReportStatusInput,
};
use airwatch_storage::rewards::{RedemptionStatus, RewardCategory, RewardCreateInput};
use airwatch_storage::users::UserRole;
use airwatch_storage::{DbState, StorageError};
use chrono::{Duration, Utc};
use common::{create_test_db, create_user, create_ward};

fn reward_input(title: &str, points: i64) -> RewardCreateInput {
    RewardCreateInput {
        title: title.to_string(),
        points_required: points,
        category: RewardCategory::Transport,
        description: None,
        partner: Some("Metro".to_string()),
        valid_until: None,
        redeem_instructions: None,
        image: None,
        available: None,
    }
}

fn report_input(ward: &str, title: &str) -> ReportCreateInput {
    ReportCreateInput {
        ward: ward.to_string(),
        title: title.to_string(),
        description: Some("Thick smoke near the market".to_string()),
        pollution_type: PollutionType::GarbageBurn,
        severity: None,
        photos: vec!["https://img.example.org/1.jpg".to_string()],
        videos: Vec::new(),
        location: Some([77.12, 28.72]),
        address: None,
    }
}

async fn award_points(db: &DbState, citizen_id: &str, ward_id: &str, points: i64) {
    let report = db
        .report_storage
        .create_report(report_input(ward_id, "smoke"), citizen_id)
        .await
        .unwrap();
    db.report_storage
        .update_status(
            &report.id,
            ReportStatusInput {
                status: ReportStatus::Verified,
                action_taken: None,
                green_points_awarded: Some(points),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_report_counts_submission() {
    let db = create_test_db().await;
    let citizen = create_user(&db, "Kavya", UserRole::Citizen).await;
    let ward = create_ward(&db, "Rohini", [77.11, 28.73]).await;

    let report = db
        .report_storage
        .create_report(report_input(&ward.id, "Garbage fire"), &citizen.user.id)
        .await
        .unwrap();

    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.severity, ReportSeverity::Medium);
    assert_eq!(report.ward_name.as_deref(), Some("Rohini"));
    assert_eq!(report.citizen.unwrap().name.as_deref(), Some("Kavya"));
    assert_eq!(report.location, Some([77.12, 28.72]));
    assert!(report.comments.is_empty());

    let user = db.user_storage.get_user(&citizen.user.id).await.unwrap();
    assert_eq!(user.reports_submitted, 1);
}

#[tokio::test]
async fn test_report_for_missing_ward() {
    let db = create_test_db().await;
    let citizen = create_user(&db, "Kavya", UserRole::Citizen).await;

    let err = db
        .report_storage
        .create_report(report_input("ward-nope", "smoke"), &citizen.user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound("Ward")));
}

#[tokio::test]
async fn test_verification_credits_points_and_resolution_stamps() {
    let db = create_test_db().await;
    let citizen = create_user(&db, "Kavya", UserRole::Citizen).await;
    let ward = create_ward(&db, "Rohini", [77.11, 28.73]).await;

    award_points(&db, &citizen.user.id, &ward.id, 50).await;
    let user = db.user_storage.get_user(&citizen.user.id).await.unwrap();
    assert_eq!(user.green_points, 50);

    let report = db
        .report_storage
        .create_report(report_input(&ward.id, "dust"), &citizen.user.id)
        .await
        .unwrap();
    let resolved = db
        .report_storage
        .update_status(
            &report.id,
            ReportStatusInput {
                status: ReportStatus::Resolved,
                action_taken: Some("Fined the contractor".to_string()),
                green_points_awarded: None,
            },
        )
        .await
        .unwrap();
    assert!(resolved.resolved_date.is_some());
    assert_eq!(resolved.action_taken.as_deref(), Some("Fined the contractor"));

    // Resolution awards nothing
    let user = db.user_storage.get_user(&citizen.user.id).await.unwrap();
    assert_eq!(user.green_points, 50);
}

#[tokio::test]
async fn test_assign_comment_and_pending_queue() {
    let db = create_test_db().await;
    let citizen = create_user(&db, "Kavya", UserRole::Citizen).await;
    let officer = create_user(&db, "Meera", UserRole::Officer).await;
    let ward = create_ward(&db, "Rohini", [77.11, 28.73]).await;

    let first = db
        .report_storage
        .create_report(report_input(&ward.id, "first"), &citizen.user.id)
        .await
        .unwrap();
    db.report_storage
        .create_report(report_input(&ward.id, "second"), &citizen.user.id)
        .await
        .unwrap();

    let due = Utc::now() + Duration::days(2);
    let assigned = db
        .report_storage
        .assign(
            &first.id,
            ReportAssignInput {
                assigned_to: officer.user.id.clone(),
                due_date: Some(due),
            },
        )
        .await
        .unwrap();
    assert_eq!(assigned.status, ReportStatus::Assigned);
    assert_eq!(assigned.assigned_to.unwrap().name.as_deref(), Some("Meera"));
    assert_eq!(assigned.due_date, Some(due));
    assert!(assigned.assigned_date.is_some());

    db.report_storage
        .add_comment(&first.id, &officer.user.id, "Meera", "On my way")
        .await
        .unwrap();
    let commented = db
        .report_storage
        .add_comment(&first.id, &citizen.user.id, "Kavya", "Thanks")
        .await
        .unwrap();
    let comments: Vec<&str> = commented.comments.iter().map(|c| c.comment.as_str()).collect();
    assert_eq!(comments, vec!["On my way", "Thanks"]);
    assert_eq!(commented.comments[0].user_name, "Meera");

    let pending = db.report_storage.list_pending(10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].title, "second");

    let (mine, total) = db
        .report_storage
        .list_for_citizen(&citizen.user.id, Some(ReportStatus::Assigned), 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(mine[0].id, first.id);

    let err = db
        .report_storage
        .add_comment("report-nope", &citizen.user.id, "Kavya", "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound("Report")));
}

#[tokio::test]
async fn test_redeem_with_insufficient_points() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Arjun", UserRole::Admin).await;
    let citizen = create_user(&db, "Kavya", UserRole::Citizen).await;

    let reward = db
        .reward_storage
        .create_reward(reward_input("Metro pass", 100), &admin.user.id)
        .await
        .unwrap();

    let err = db
        .reward_storage
        .redeem(&reward.id, &citizen.user.id)
        .await
        .unwrap_err();
    match err {
        StorageError::Invalid(message) => assert!(message.starts_with("Insufficient green points")),
        other => panic!("expected invalid, got {:?}", other),
    }

    assert!(db
        .reward_storage
        .list_for_user(&citizen.user.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_redeem_deducts_and_issues_voucher() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Arjun", UserRole::Admin).await;
    let citizen = create_user(&db, "Kavya", UserRole::Citizen).await;
    let ward = create_ward(&db, "Rohini", [77.11, 28.73]).await;
    award_points(&db, &citizen.user.id, &ward.id, 150).await;

    let reward = db
        .reward_storage
        .create_reward(reward_input("Metro pass", 100), &admin.user.id)
        .await
        .unwrap();

    let voucher = db
        .reward_storage
        .redeem(&reward.id, &citizen.user.id)
        .await
        .unwrap();
    assert_eq!(voucher.status, RedemptionStatus::Redeemed);
    assert!(voucher.redemption_code.is_some());
    assert_eq!(voucher.reward.points_required, Some(100));
    assert_eq!(voucher.reward.title.as_deref(), Some("Metro pass"));

    let user = db.user_storage.get_user(&citizen.user.id).await.unwrap();
    assert_eq!(user.green_points, 50);

    let used = db
        .reward_storage
        .update_redemption_status(&voucher.id, RedemptionStatus::Used)
        .await
        .unwrap();
    assert_eq!(used.status, RedemptionStatus::Used);
}

#[tokio::test]
async fn test_unavailable_and_expired_rewards() {
    let db = create_test_db().await;
    let admin = create_user(&db, "Arjun", UserRole::Admin).await;
    let citizen = create_user(&db, "Kavya", UserRole::Citizen).await;

    let mut hidden = reward_input("Hidden", 0);
    hidden.available = Some(false);
    let hidden = db.reward_storage.create_reward(hidden, &admin.user.id).await.unwrap();

    let mut expired = reward_input("Expired", 0);
    expired.valid_until = Some(Utc::now() - Duration::days(1));
    let expired = db.reward_storage.create_reward(expired, &admin.user.id).await.unwrap();

    let listed = db.reward_storage.list_available(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Expired");
    assert!(db
        .reward_storage
        .list_available(Some(RewardCategory::Food))
        .await
        .unwrap()
        .is_empty());

    for id in [&hidden.id, &expired.id] {
        let err = db.reward_storage.redeem(id, &citizen.user.id).await.unwrap_err();
        assert!(matches!(err, StorageError::Invalid(ref m) if m == "Reward is not available"));
    }

    let err = db
        .reward_storage
        .create_reward(reward_input("Negative", -5), &admin.user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)));
}
