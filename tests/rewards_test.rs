mod common;

use anyhow::Result;
use common::test_profile;
use goodwill::application::{AppError, Severity};
use goodwill::domain::{ActivityKind, BloodGroup};

#[tokio::test]
async fn test_donate_then_checkout_scenario() -> Result<()> {
    let mut profile = test_profile().await?;
    assert_eq!(profile.service.balance(), 0);

    let donation = profile.service.donate(1).await?;
    assert_eq!(donation.points_earned, 15);
    assert_eq!(profile.service.balance(), 15);

    // Paracetamol earns 10 points
    profile.service.add_to_cart(1).await?;
    profile.service.checkout().await?;

    assert_eq!(profile.service.balance(), 25);
    assert!(profile.service.cart().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_donation_updates_stats_and_history() -> Result<()> {
    let mut profile = test_profile().await?;
    let before = profile.service.stats().await?;

    profile.service.donate(3).await?;

    let after = profile.service.stats().await?;
    assert_eq!(after.donations_count, before.donations_count + 1);

    let history = profile.service.history().await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, ActivityKind::Donation);
    assert!(history[0].details.contains("Ajay Sharma"));
    Ok(())
}

#[tokio::test]
async fn test_donate_to_unknown_patient_fails() -> Result<()> {
    let mut profile = test_profile().await?;

    let result = profile.service.donate(99).await;

    assert!(matches!(result, Err(AppError::PatientNotFound(99))));
    assert_eq!(profile.service.balance(), 0);
    Ok(())
}

#[tokio::test]
async fn test_people_in_need_match_exact_group() -> Result<()> {
    let profile = test_profile().await?;

    let a_pos = profile.service.people_in_need(BloodGroup::APositive);
    assert_eq!(a_pos.len(), 2);
    assert!(a_pos.iter().all(|p| p.blood_group == BloodGroup::APositive));

    // No universal-donor rules
    assert!(profile.service.people_in_need(BloodGroup::ONegative).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_redeem_with_insufficient_points_is_refused() -> Result<()> {
    let mut profile = test_profile().await?;
    profile.service.donate(1).await?; // 15 points

    // ORS Solution costs 30 points
    let result = profile.service.redeem(3).await;

    match result {
        Err(AppError::InsufficientPoints {
            balance,
            required,
            shortfall,
        }) => {
            assert_eq!(balance, 15);
            assert_eq!(required, 30);
            assert_eq!(shortfall, 15);
        }
        Err(other) => panic!("expected InsufficientPoints, got {other}"),
        Ok(receipt) => panic!("redemption should fail, got balance {}", receipt.balance),
    }
    assert_eq!(profile.service.balance(), 15);

    let last = profile.notifier.notifications().pop().unwrap();
    assert_eq!(last.title, "Insufficient Points");
    assert_eq!(last.severity, Severity::Destructive);
    Ok(())
}

#[tokio::test]
async fn test_redeem_spends_points() -> Result<()> {
    let mut profile = test_profile().await?;
    profile.service.ledger_mut().add_points(100).await?;

    let receipt = profile.service.redeem(4).await?; // Bandages, 40 points

    assert_eq!(receipt.balance, 60);
    assert_eq!(profile.service.balance(), 60);

    let history = profile.service.history().await?;
    assert_eq!(history[0].kind, ActivityKind::Redemption);
    assert_eq!(history[0].points, -40);
    Ok(())
}

#[tokio::test]
async fn test_redeem_exact_balance_reaches_zero() -> Result<()> {
    let mut profile = test_profile().await?;
    profile.service.ledger_mut().add_points(50).await?;

    profile.service.redeem(1).await?; // Paracetamol, 50 points

    assert_eq!(profile.service.balance(), 0);
    Ok(())
}

#[tokio::test]
async fn test_redeem_unknown_reward_fails() -> Result<()> {
    let mut profile = test_profile().await?;

    let result = profile.service.redeem(77).await;

    assert!(matches!(result, Err(AppError::RewardNotFound(77))));
    Ok(())
}

#[tokio::test]
async fn test_history_is_newest_first() -> Result<()> {
    let mut profile = test_profile().await?;
    profile.service.donate(1).await?;
    profile.service.donate(2).await?;
    profile.service.redeem(3).await?;

    let kinds: Vec<_> = profile
        .service
        .history()
        .await?
        .into_iter()
        .map(|e| e.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            ActivityKind::Redemption,
            ActivityKind::Donation,
            ActivityKind::Donation
        ]
    );
    Ok(())
}
